use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{RepairError, Result};

pub const CONFIG_FILE_NAME: &str = "wav-repair.json";
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "Repaired";

fn default_output_dir_name() -> String {
    DEFAULT_OUTPUT_DIR_NAME.to_string()
}

/// Last used paths, remembered between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepairConfig {
    #[serde(default)]
    pub reference: Option<PathBuf>,
    #[serde(default)]
    pub input_dir: Option<PathBuf>,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    #[serde(default = "default_output_dir_name")]
    pub output_dir_name: String,
}

impl Default for RepairConfig {
    fn default() -> Self {
        RepairConfig {
            reference: None,
            input_dir: None,
            output_dir: None,
            output_dir_name: default_output_dir_name(),
        }
    }
}

impl RepairConfig {
    pub fn default_path() -> PathBuf {
        std::env::current_dir()
            .unwrap_or_default()
            .join(CONFIG_FILE_NAME)
    }

    /// Missing file means defaults; a file that exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(RepairError::io(path, e)),
        };
        serde_json::from_str(&json).map_err(|source| RepairError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|source| RepairError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|e| RepairError::io(path, e))
    }

    /// Output folder for a batch over `input_dir` when none was chosen:
    /// a sibling of the damaged folder named `output_dir_name`.
    pub fn default_output_dir(&self, input_dir: &Path) -> PathBuf {
        match input_dir.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(&self.output_dir_name),
            _ => input_dir.join(&self.output_dir_name),
        }
    }
}
