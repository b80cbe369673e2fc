use crate::error::{RepairError, Result};
use crate::wav::{CanonicalHeader, HEADER_SIZE};

/// Byte position where the damaged files' raw sample region starts before
/// frame alignment. Empirical; depends on the process that damaged the files.
pub const RAW_START: u64 = 153_605;

/// Byte size of one sample frame across all channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    frame_size: u64,
}

impl FrameGeometry {
    /// `(bits_per_sample / 8) * num_channels`, rejected when it comes out as zero.
    pub fn new(bits_per_sample: u16, num_channels: u16) -> Result<Self> {
        let frame_size = (bits_per_sample / 8) as u64 * num_channels as u64;
        if frame_size == 0 {
            return Err(RepairError::InvalidGeometry {
                bits_per_sample,
                num_channels,
            });
        }
        Ok(FrameGeometry { frame_size })
    }

    pub fn from_header(header: &CanonicalHeader) -> Result<Self> {
        Self::new(header.bits_per_sample(), header.num_channels())
    }

    pub fn frame_size(&self) -> u64 {
        self.frame_size
    }

    /// First frame boundary at or after `RAW_START`, counted from the end of the header.
    pub fn aligned_offset(&self) -> u64 {
        let header = HEADER_SIZE as u64;
        let frames = (RAW_START - header).div_ceil(self.frame_size);
        header + frames * self.frame_size
    }
}
