use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{RepairError, Result};
use crate::wav::HEADER_SIZE;

/// Bytes at the end of every damaged file that are never sample data.
pub const TRAILER_SIZE: u64 = 334;

/// Largest payload a 32-bit RIFF size field can describe
const MAX_PAYLOAD: u64 = u32::MAX as u64 - HEADER_SIZE as u64;

/// Number of payload bytes a damaged file of `file_size` bytes yields.
pub fn payload_len(path: &Path, file_size: u64, offset: u64) -> Result<u64> {
    let required = TRAILER_SIZE + offset;
    let len = file_size
        .checked_sub(required)
        .ok_or_else(|| RepairError::InsufficientPayload {
            path: path.to_path_buf(),
            file_size,
            required,
        })?;

    if len > MAX_PAYLOAD {
        return Err(RepairError::PayloadTooLarge {
            path: path.to_path_buf(),
            len,
        });
    }
    Ok(len)
}

/// Read the sample region of a damaged file: from `offset` up to the trailer.
///
/// Hitting end of file early yields a shorter payload rather than an error.
pub fn load_payload<P: AsRef<Path>>(path: P, offset: u64) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| RepairError::io(path, e))?;
    let file_size = file
        .metadata()
        .map_err(|e| RepairError::io(path, e))?
        .len();

    let len = payload_len(path, file_size, offset)?;

    file.seek(SeekFrom::Start(offset))
        .map_err(|e| RepairError::io(path, e))?;

    let mut payload = Vec::with_capacity(len as usize);
    file.take(len)
        .read_to_end(&mut payload)
        .map_err(|e| RepairError::io(path, e))?;

    Ok(payload)
}
