//! Header reconstruction pipeline: align, load, assemble, write.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::error::{RepairError, Result};
use crate::wav::CanonicalHeader;

pub mod align;
pub mod assemble;
pub mod naming;
pub mod payload;

pub use align::{FrameGeometry, RAW_START};
pub use assemble::assemble;
pub use naming::{is_double_extension_wav, repaired_file_name};
pub use payload::{load_payload, payload_len, TRAILER_SIZE};

/// Everything a batch shares: the reference header and the aligned read offset.
///
/// Computed once from the reference file and read-only afterwards, so it can
/// be handed to any number of workers.
#[derive(Debug, Clone)]
pub struct RepairPlan {
    header: Arc<CanonicalHeader>,
    geometry: FrameGeometry,
    offset: u64,
}

impl RepairPlan {
    pub fn new(header: CanonicalHeader) -> Result<Self> {
        let geometry = FrameGeometry::from_header(&header)?;
        let offset = geometry.aligned_offset();
        Ok(RepairPlan {
            header: Arc::new(header),
            geometry,
            offset,
        })
    }

    /// Read the reference header and derive the offset. Any error here is fatal to the batch.
    pub fn prepare<P: AsRef<Path>>(reference: P) -> Result<Self> {
        let reference = reference.as_ref();
        let header = CanonicalHeader::load_from_file(reference)?;
        if !header.has_canonical_markers() {
            warn!(
                "Reference {} lacks canonical RIFF/WAVE/fmt /data markers",
                reference.display()
            );
        }

        let plan = Self::new(header)?;
        info!(
            "Position of the first complete frame: {} (frame size {} bytes)",
            plan.offset,
            plan.geometry.frame_size()
        );
        Ok(plan)
    }

    pub fn header(&self) -> &CanonicalHeader {
        &self.header
    }

    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }
}

/// Repair one damaged file and write it into `output_dir`. Returns the written path.
///
/// Nothing is written until the whole file is assembled in memory; a failed
/// write removes what it left behind.
pub fn repair_file(plan: &RepairPlan, input: &Path, output_dir: &Path) -> Result<PathBuf> {
    let name = repaired_file_name(input).ok_or_else(|| {
        RepairError::invalid_input(format!("{} has no file name", input.display()))
    })?;

    let payload = load_payload(input, plan.offset())?;
    let assembled = assemble(plan.header(), &payload);

    // create_dir_all tolerates a sibling worker creating it first
    fs::create_dir_all(output_dir).map_err(|e| RepairError::io(output_dir, e))?;

    let output = output_dir.join(name);
    if let Err(e) = fs::write(&output, &assembled) {
        let _ = fs::remove_file(&output);
        return Err(RepairError::io(&output, e));
    }

    Ok(output)
}

/// Result of one file's repair
#[derive(Debug)]
pub struct RepairOutcome {
    pub input: PathBuf,
    pub result: Result<PathBuf>,
}

impl RepairOutcome {
    /// One-line report for front-ends
    pub fn message(&self) -> String {
        match &self.result {
            Ok(path) => format!("File saved to {}", path.display()),
            Err(e) => format!("Failed {}: {}", display_name(&self.input), e),
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub repaired: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
    pub elapsed: Duration,
}

impl BatchSummary {
    fn record(&mut self, outcome: &RepairOutcome) {
        match &outcome.result {
            Ok(path) => self.repaired.push(path.clone()),
            Err(e) => self.failed.push((outcome.input.clone(), e.to_string())),
        }
    }

    pub fn total(&self) -> usize {
        self.repaired.len() + self.failed.len()
    }
}

/// Repair every input in parallel, one thread per file, and wait for all of them.
///
/// `on_outcome` runs on the calling thread as each file finishes, in
/// completion order. A failing file never stops its siblings, and a worker
/// thread the OS refuses to start is reported as that file's failure.
pub fn run_batch<F>(
    plan: &RepairPlan,
    inputs: &[PathBuf],
    output_dir: &Path,
    on_outcome: F,
) -> BatchSummary
where
    F: FnMut(&RepairOutcome),
{
    run_batch_with(plan, inputs, output_dir, worker_builder, on_outcome)
}

fn worker_builder(index: usize) -> thread::Builder {
    thread::Builder::new().name(format!("repair-{}", index))
}

fn run_batch_with<B, F>(
    plan: &RepairPlan,
    inputs: &[PathBuf],
    output_dir: &Path,
    builder: B,
    mut on_outcome: F,
) -> BatchSummary
where
    B: Fn(usize) -> thread::Builder,
    F: FnMut(&RepairOutcome),
{
    let started = Instant::now();
    let mut summary = BatchSummary::default();
    let (tx, rx) = mpsc::channel::<RepairOutcome>();

    thread::scope(|scope| {
        let mut claimed = HashSet::new();

        for (index, input) in inputs.iter().enumerate() {
            // Two inputs mapping to one output path would race on the same file
            if let Some(name) = repaired_file_name(input) {
                if !claimed.insert(output_dir.join(&name)) {
                    let _ = tx.send(RepairOutcome {
                        input: input.clone(),
                        result: Err(RepairError::invalid_input(format!(
                            "output name {} already used by another file in this batch",
                            name
                        ))),
                    });
                    continue;
                }
            }

            let worker_tx = tx.clone();
            let spawned = builder(index).spawn_scoped(scope, move || {
                debug!("Repairing {}", input.display());
                let result = repair_file(plan, input, output_dir);
                let _ = worker_tx.send(RepairOutcome {
                    input: input.clone(),
                    result,
                });
            });
            if let Err(e) = spawned {
                let _ = tx.send(RepairOutcome {
                    input: input.clone(),
                    result: Err(RepairError::io(input, e)),
                });
            }
        }
        drop(tx);

        for outcome in rx {
            match &outcome.result {
                Ok(path) => info!("File saved to {}", path.display()),
                Err(e) => warn!("Error repairing {}: {}", outcome.input.display(), e),
            }
            on_outcome(&outcome);
            summary.record(&outcome);
        }
    });

    summary.elapsed = started.elapsed();
    summary
}

/// Damaged files in `dir`: regular files named like `name.wav.<ext>`, sorted.
pub fn scan_damaged_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| RepairError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| RepairError::io(dir, e))?;
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        let name = entry.file_name();
        let name = name.to_string_lossy();

        debug!("Checking file: {}", name);
        if is_file && is_double_extension_wav(&name) {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wav::pcm_header;

    fn plan_16_stereo() -> RepairPlan {
        RepairPlan::new(pcm_header(44100, 2, 16, 0)).unwrap()
    }

    #[test]
    fn test_plan_offset() {
        let plan = plan_16_stereo();
        assert_eq!(plan.offset(), 153_608);
        assert_eq!(plan.geometry().frame_size(), 4);
    }

    #[test]
    fn test_plan_rejects_zero_channels() {
        let result = RepairPlan::new(pcm_header(44100, 0, 16, 0));
        assert!(matches!(result, Err(RepairError::InvalidGeometry { .. })));
    }

    #[test]
    fn test_repair_file_concrete_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("take.wav.locked");
        fs::write(&input, vec![0x5Au8; 200_000]).unwrap();
        let out_dir = dir.path().join("Repaired");

        let written = repair_file(&plan_16_stereo(), &input, &out_dir).unwrap();

        assert_eq!(written, out_dir.join("take.wav"));
        let bytes = fs::read(&written).unwrap();
        assert_eq!(bytes.len(), 46_102);
        assert_eq!(u32::from_le_bytes(bytes[4..8].try_into().unwrap()), 46_094);
        assert_eq!(u32::from_le_bytes(bytes[40..44].try_into().unwrap()), 46_058);
    }

    #[test]
    fn test_repair_file_too_small_leaves_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tiny.wav.locked");
        fs::write(&input, vec![0u8; 1000]).unwrap();
        let out_dir = dir.path().join("out");

        let result = repair_file(&plan_16_stereo(), &input, &out_dir);

        assert!(matches!(result, Err(RepairError::InsufficientPayload { .. })));
        assert!(!out_dir.join("tiny.wav").exists());
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.wav.enc", "a.WAV.locked", "c.locked", "d.wav", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        fs::create_dir(dir.path().join("e.wav.dir")).unwrap();

        let files = scan_damaged_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.WAV.locked", "b.wav.enc"]);
    }

    #[test]
    fn test_batch_duplicate_output_name_reported() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("x.wav.a");
        let b = dir.path().join("x.wav.b");
        fs::write(&a, vec![1u8; 160_000]).unwrap();
        fs::write(&b, vec![2u8; 160_000]).unwrap();

        let summary = run_batch(
            &plan_16_stereo(),
            &[a, b.clone()],
            &dir.path().join("out"),
            |_| {},
        );

        assert_eq!(summary.repaired.len(), 1);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, b);
    }

    #[test]
    fn test_batch_names_differing_in_case_both_repaired() {
        let dir = tempfile::tempdir().unwrap();
        let upper = dir.path().join("Take.wav.x");
        let lower = dir.path().join("take.wav.x");
        fs::write(&upper, vec![1u8; 160_000]).unwrap();
        fs::write(&lower, vec![2u8; 160_000]).unwrap();
        let out_dir = dir.path().join("out");

        let summary = run_batch(&plan_16_stereo(), &[upper, lower], &out_dir, |_| {});

        assert!(summary.failed.is_empty(), "{:?}", summary.failed);
        let mut repaired = summary.repaired.clone();
        repaired.sort();
        assert_eq!(repaired, vec![out_dir.join("Take.wav"), out_dir.join("take.wav")]);
    }

    #[test]
    fn test_batch_refused_worker_is_a_file_failure() {
        let dir = tempfile::tempdir().unwrap();
        let inputs: Vec<PathBuf> = (0..3)
            .map(|i| {
                let path = dir.path().join(format!("t{}.wav.x", i));
                fs::write(&path, vec![7u8; 160_000]).unwrap();
                path
            })
            .collect();

        // No address space can hold this stack, so every spawn is refused
        let mut reported = 0;
        let summary = run_batch_with(
            &plan_16_stereo(),
            &inputs,
            &dir.path().join("out"),
            |_| thread::Builder::new().stack_size(1 << 62),
            |outcome| {
                assert!(matches!(outcome.result, Err(RepairError::Io { .. })));
                reported += 1;
            },
        );

        assert_eq!(reported, 3);
        assert!(summary.repaired.is_empty());
        assert_eq!(summary.failed.len(), 3);
    }

    #[test]
    fn test_outcome_message() {
        let ok = RepairOutcome {
            input: PathBuf::from("a.wav.x"),
            result: Ok(PathBuf::from("out/a.wav")),
        };
        assert_eq!(ok.message(), format!("File saved to {}", Path::new("out/a.wav").display()));

        let err = RepairOutcome {
            input: PathBuf::from("/in/b.wav.x"),
            result: Err(RepairError::invalid_input("boom")),
        };
        assert_eq!(err.message(), "Failed b.wav.x: Invalid input: boom");
    }
}
