use std::fs::File;
use std::io::Cursor;
use std::io::Read;
use std::path::Path;

use crate::error::{RepairError, Result};

/// Size of the canonical RIFF/WAVE/fmt /data header
pub const HEADER_SIZE: usize = 44;

const RIFF_SIZE_RANGE: std::ops::Range<usize> = 4..8;
const NUM_CHANNELS_RANGE: std::ops::Range<usize> = 22..24;
const BITS_PER_SAMPLE_RANGE: std::ops::Range<usize> = 34..36;
const DATA_SIZE_RANGE: std::ops::Range<usize> = 40..44;

/// Decoded view of the 44 header bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavHeader {
    pub chunk_id: [u8; 4],     // "RIFF"
    pub chunk_size: u32,       // File size - 8
    pub format: [u8; 4],       // "WAVE"
    pub subchunk1_id: [u8; 4], // "fmt "
    pub subchunk1_size: u32,   // 16 for PCM
    pub audio_format: u16,     // 1 for PCM
    pub num_channels: u16,     // 1 for mono, 2 for stereo
    pub sample_rate: u32,      // e.g., 44100
    pub byte_rate: u32,        // SampleRate * NumChannels * BitsPerSample/8
    pub block_align: u16,      // NumChannels * BitsPerSample/8
    pub bits_per_sample: u16,  // 8 bits = 8, 16 bits = 16, etc.
    pub subchunk2_id: [u8; 4], // "data"
    pub subchunk2_size: u32,   // payload length in bytes
}

/// The first 44 bytes of a known-good reference file.
///
/// Immutable once read; repairs borrow it and copy the bytes before rewriting
/// the size fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalHeader {
    bytes: [u8; HEADER_SIZE],
}

impl CanonicalHeader {
    pub fn from_array(bytes: [u8; HEADER_SIZE]) -> Self {
        CanonicalHeader { bytes }
    }

    /// Read exactly 44 bytes from `reader`. `path` is only used for errors.
    pub fn from_reader<R: Read>(reader: R, path: &Path) -> Result<Self> {
        let mut buffer = Vec::with_capacity(HEADER_SIZE);
        reader
            .take(HEADER_SIZE as u64)
            .read_to_end(&mut buffer)
            .map_err(|e| RepairError::io(path, e))?;

        let bytes: [u8; HEADER_SIZE] =
            buffer
                .as_slice()
                .try_into()
                .map_err(|_| RepairError::ShortHeader {
                    path: path.to_path_buf(),
                    len: buffer.len(),
                })?;

        Ok(CanonicalHeader { bytes })
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| RepairError::io(path, e))?;
        Self::from_reader(file, path)
    }

    pub fn as_bytes(&self) -> &[u8; HEADER_SIZE] {
        &self.bytes
    }

    pub fn num_channels(&self) -> u16 {
        read_u16_at(&self.bytes, NUM_CHANNELS_RANGE)
    }

    pub fn bits_per_sample(&self) -> u16 {
        read_u16_at(&self.bytes, BITS_PER_SAMPLE_RANGE)
    }

    pub fn riff_chunk_size(&self) -> u32 {
        read_u32_at(&self.bytes, RIFF_SIZE_RANGE)
    }

    pub fn data_chunk_size(&self) -> u32 {
        read_u32_at(&self.bytes, DATA_SIZE_RANGE)
    }

    /// True when the RIFF, WAVE, fmt and data markers sit where a canonical header has them
    pub fn has_canonical_markers(&self) -> bool {
        &self.bytes[0..4] == b"RIFF"
            && &self.bytes[8..12] == b"WAVE"
            && &self.bytes[12..16] == b"fmt "
            && &self.bytes[36..40] == b"data"
    }

    pub fn fields(&self) -> WavHeader {
        let mut cursor = Cursor::new(&self.bytes[..]);
        // A 44-byte cursor always satisfies these reads.
        let mut header = WavHeader {
            chunk_id: [0; 4],
            chunk_size: 0,
            format: [0; 4],
            subchunk1_id: [0; 4],
            subchunk1_size: 0,
            audio_format: 0,
            num_channels: 0,
            sample_rate: 0,
            byte_rate: 0,
            block_align: 0,
            bits_per_sample: 0,
            subchunk2_id: [0; 4],
            subchunk2_size: 0,
        };

        read_tag(&mut cursor, &mut header.chunk_id);
        header.chunk_size = read_u32(&mut cursor);
        read_tag(&mut cursor, &mut header.format);
        read_tag(&mut cursor, &mut header.subchunk1_id);
        header.subchunk1_size = read_u32(&mut cursor);
        header.audio_format = read_u16(&mut cursor);
        header.num_channels = read_u16(&mut cursor);
        header.sample_rate = read_u32(&mut cursor);
        header.byte_rate = read_u32(&mut cursor);
        header.block_align = read_u16(&mut cursor);
        header.bits_per_sample = read_u16(&mut cursor);
        read_tag(&mut cursor, &mut header.subchunk2_id);
        header.subchunk2_size = read_u32(&mut cursor);

        header
    }
}

fn read_u16_at(bytes: &[u8; HEADER_SIZE], range: std::ops::Range<usize>) -> u16 {
    u16::from_le_bytes([bytes[range.start], bytes[range.start + 1]])
}

fn read_u32_at(bytes: &[u8; HEADER_SIZE], range: std::ops::Range<usize>) -> u32 {
    let s = range.start;
    u32::from_le_bytes([bytes[s], bytes[s + 1], bytes[s + 2], bytes[s + 3]])
}

fn read_tag(cursor: &mut Cursor<&[u8]>, tag: &mut [u8; 4]) {
    let _ = cursor.read_exact(tag);
}

fn read_u32(cursor: &mut Cursor<&[u8]>) -> u32 {
    let mut buffer = [0; 4];
    let _ = cursor.read_exact(&mut buffer);
    u32::from_le_bytes(buffer)
}

fn read_u16(cursor: &mut Cursor<&[u8]>) -> u16 {
    let mut buffer = [0; 2];
    let _ = cursor.read_exact(&mut buffer);
    u16::from_le_bytes(buffer)
}

/// Build a canonical PCM header. Used by tests and the synthetic fixtures.
///
/// Derived fields wrap like the 16/32-bit header fields they are stored in,
/// so out-of-range geometry still yields a header instead of a panic.
pub fn pcm_header(
    sample_rate: u32,
    num_channels: u16,
    bits_per_sample: u16,
    data_len: u32,
) -> CanonicalHeader {
    let block_align = num_channels.wrapping_mul(bits_per_sample / 8);
    let byte_rate = sample_rate.wrapping_mul(u32::from(block_align));

    let mut bytes = Vec::with_capacity(HEADER_SIZE);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(data_len.wrapping_add(36)).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&num_channels.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&byte_rate.to_le_bytes());
    bytes.extend_from_slice(&block_align.to_le_bytes());
    bytes.extend_from_slice(&bits_per_sample.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());

    let mut array = [0u8; HEADER_SIZE];
    array.copy_from_slice(&bytes);
    CanonicalHeader::from_array(array)
}
