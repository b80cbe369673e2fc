//! Front-end contract: collect the three paths, report per-file results.
//!
//! The stdin prompt and the terminal form both implement [`Frontend`] and
//! share [`drive`], so the repair core never knows which one is in use.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::RepairConfig;
use crate::error::{RepairError, Result};
use crate::repair::{run_batch, scan_damaged_files, BatchSummary, RepairOutcome, RepairPlan};

pub mod prompt;

pub use prompt::{PromptFrontend, RepairRequestDraft};

/// Paths as entered by the user, not yet checked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairRequest {
    pub reference: PathBuf,
    pub input_dir: PathBuf,
    /// `None` selects the configured default next to the damaged folder
    pub output_dir: Option<PathBuf>,
}

/// A request whose paths have been checked against the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairJob {
    pub reference: PathBuf,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl RepairRequest {
    pub fn resolve(&self, config: &RepairConfig) -> Result<RepairJob> {
        if !self.reference.is_file() {
            return Err(RepairError::invalid_input(format!(
                "reference file {} does not exist",
                self.reference.display()
            )));
        }
        if !self.input_dir.is_dir() {
            return Err(RepairError::invalid_input(format!(
                "damaged files folder {} does not exist",
                self.input_dir.display()
            )));
        }

        let output_dir = self
            .output_dir
            .clone()
            .unwrap_or_else(|| config.default_output_dir(&self.input_dir));
        if output_dir.exists() && !output_dir.is_dir() {
            return Err(RepairError::invalid_input(format!(
                "output path {} is not a folder",
                output_dir.display()
            )));
        }

        Ok(RepairJob {
            reference: self.reference.clone(),
            input_dir: self.input_dir.clone(),
            output_dir,
        })
    }
}

pub trait Frontend {
    /// Ask for the paths. `Ok(None)` means the user backed out.
    fn collect(&mut self, config: &RepairConfig) -> Result<Option<RepairRequest>>;

    /// Called once the plan is ready and the files to repair are known.
    fn begin(&mut self, plan: &RepairPlan, files: &[PathBuf], output_dir: &Path) -> Result<()>;

    /// One call per finished file, in completion order.
    fn report(&mut self, outcome: &RepairOutcome);

    fn finish(&mut self, summary: &BatchSummary) -> Result<()>;

    /// The batch could not start: bad input or unusable reference file.
    fn fail(&mut self, error: &RepairError) -> Result<()>;
}

/// Run one batch through `frontend`. Returns `None` if the user quit before starting.
///
/// Paths that led to a completed batch are written back to `config_path`.
pub fn drive(
    frontend: &mut dyn Frontend,
    config: &mut RepairConfig,
    config_path: &Path,
) -> Result<Option<BatchSummary>> {
    let request = match frontend.collect(config)? {
        Some(request) => request,
        None => return Ok(None),
    };

    let job = match request.resolve(config) {
        Ok(job) => job,
        Err(e) => {
            frontend.fail(&e)?;
            return Err(e);
        }
    };

    let summary = match run_job(frontend, &job) {
        Ok(summary) => summary,
        Err(e) => {
            frontend.fail(&e)?;
            return Err(e);
        }
    };

    config.reference = Some(job.reference);
    config.input_dir = Some(job.input_dir);
    config.output_dir = request.output_dir;
    if let Err(e) = config.save(config_path) {
        warn!("Could not save configuration: {}", e);
    }

    Ok(Some(summary))
}

fn run_job(frontend: &mut dyn Frontend, job: &RepairJob) -> Result<BatchSummary> {
    let plan = RepairPlan::prepare(&job.reference)?;
    let files = scan_damaged_files(&job.input_dir)?;

    frontend.begin(&plan, &files, &job.output_dir)?;
    let summary = run_batch(&plan, &files, &job.output_dir, |outcome| {
        frontend.report(outcome)
    });
    frontend.finish(&summary)?;

    Ok(summary)
}
