use crate::wav::{CanonicalHeader, HEADER_SIZE};

/// Rewrite the RIFF size at offset 4 and the data size at offset 40 so they
/// describe a file of `total_len` bytes.
///
/// `data` must hold at least the 44 header bytes; `total_len` must fit the
/// 32-bit fields, which callers check before assembling.
pub fn rewrite_size_fields(data: &mut [u8], total_len: usize) {
    debug_assert!(data.len() >= HEADER_SIZE);
    debug_assert!(total_len >= HEADER_SIZE);

    // Overall file size minus the 8-byte RIFF preamble
    let riff_size = (total_len - 8) as u32;
    data[4..8].copy_from_slice(&riff_size.to_le_bytes());

    // Payload size: everything after the 44-byte header
    let data_size = (total_len - HEADER_SIZE) as u32;
    data[40..44].copy_from_slice(&data_size.to_le_bytes());
}

/// Human-readable lines for every header field, markers included.
pub fn describe_header(header: &CanonicalHeader) -> Vec<String> {
    let fields = header.fields();
    let mut lines = Vec::new();

    lines.push(format!(
        "RIFF signature: {}",
        String::from_utf8_lossy(&fields.chunk_id)
    ));
    lines.push(format!("RIFF chunk size: {} bytes", fields.chunk_size));
    lines.push(format!("Format: {}", String::from_utf8_lossy(&fields.format)));
    lines.push(format!(
        "Format marker: {}",
        String::from_utf8_lossy(&fields.subchunk1_id)
    ));
    lines.push(format!("Format length: {} bytes", fields.subchunk1_size));
    lines.push(format!("Format type: {} (1 = PCM)", fields.audio_format));
    lines.push(format!("Number of channels: {}", fields.num_channels));
    lines.push(format!("Sample rate: {} Hz", fields.sample_rate));
    lines.push(format!("Byte rate: {} bytes/sec", fields.byte_rate));
    lines.push(format!("Block align: {} bytes", fields.block_align));
    lines.push(format!("Bits per sample: {}", fields.bits_per_sample));
    lines.push(format!(
        "Data marker: {}",
        String::from_utf8_lossy(&fields.subchunk2_id)
    ));
    lines.push(format!("Data chunk size: {} bytes", fields.subchunk2_size));

    if !header.has_canonical_markers() {
        lines.push(
            "Warning: header does not carry canonical RIFF/WAVE/fmt /data markers".to_string(),
        );
    }

    lines
}
