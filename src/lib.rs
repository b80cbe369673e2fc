//! Rebuild playable WAV files from recordings whose header was destroyed.
//!
//! A known-good reference file of the same format lends its 44-byte header;
//! each damaged file's payload is read from a frame-aligned offset, the
//! trailing footer is dropped, and the RIFF and data sizes are recomputed.

pub mod config;
pub mod error;
pub mod frontend;
pub mod repair;
pub mod ui;
pub mod utils;
pub mod wav;

pub use config::RepairConfig;
pub use error::{RepairError, Result};
pub use repair::{
    repair_file, run_batch, scan_damaged_files, BatchSummary, FrameGeometry, RepairOutcome,
    RepairPlan, RAW_START, TRAILER_SIZE,
};
pub use wav::{CanonicalHeader, HEADER_SIZE};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
