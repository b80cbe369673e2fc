use crate::utils::header::rewrite_size_fields;
use crate::wav::{CanonicalHeader, HEADER_SIZE};

/// Splice a copy of the reference header onto `payload` and fix both size fields.
///
/// The shared header is never touched; the caller guarantees `payload` fits
/// the 32-bit size fields (see `payload_len`).
pub fn assemble(header: &CanonicalHeader, payload: &[u8]) -> Vec<u8> {
    let total_len = HEADER_SIZE + payload.len();

    let mut bytes = Vec::with_capacity(total_len);
    bytes.extend_from_slice(header.as_bytes());
    bytes.extend_from_slice(payload);

    rewrite_size_fields(&mut bytes, total_len);
    bytes
}
