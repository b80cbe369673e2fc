//! Error types for wav-repair

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for repair operations
pub type Result<T> = std::result::Result<T, RepairError>;

#[derive(Error, Debug)]
pub enum RepairError {
    /// Open, seek, read or write failure on a specific file
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reference file ended before the 44-byte canonical header
    #[error("{} is too short for a WAV header: {len} of 44 bytes", path.display())]
    ShortHeader { path: PathBuf, len: usize },

    /// Header describes a frame of zero bytes
    #[error(
        "invalid frame geometry: {bits_per_sample} bits per sample x {num_channels} channels"
    )]
    InvalidGeometry {
        bits_per_sample: u16,
        num_channels: u16,
    },

    /// Damaged file cannot hold the aligned start plus the trailer
    #[error(
        "{} is too small to repair: {file_size} bytes, need at least {required}",
        path.display()
    )]
    InsufficientPayload {
        path: PathBuf,
        file_size: u64,
        required: u64,
    },

    /// Payload does not fit a 32-bit RIFF size field
    #[error("{} payload of {len} bytes exceeds the WAV size limit", path.display())]
    PayloadTooLarge { path: PathBuf, len: u64 },

    /// Front-end input that failed validation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration file could not be parsed
    #[error("Configuration error in {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl RepairError {
    /// Wrap an IO error with the path it happened on
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        RepairError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        RepairError::InvalidInput(msg.into())
    }
}
