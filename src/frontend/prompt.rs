use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{Frontend, RepairRequest};
use crate::config::RepairConfig;
use crate::error::{RepairError, Result};
use crate::repair::{BatchSummary, RepairOutcome, RepairPlan};

/// Line-oriented front-end: asks on `input` for any path not already given.
pub struct PromptFrontend<R, W> {
    input: R,
    output: W,
    preset: RepairRequestDraft,
}

/// Paths supplied up front (e.g. command-line flags); the rest are prompted for.
#[derive(Debug, Clone, Default)]
pub struct RepairRequestDraft {
    pub reference: Option<PathBuf>,
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

impl<R: BufRead, W: Write> PromptFrontend<R, W> {
    pub fn new(input: R, output: W, preset: RepairRequestDraft) -> Self {
        PromptFrontend {
            input,
            output,
            preset,
        }
    }

    fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{}", line).map_err(|e| RepairError::io("<stdout>", e))
    }

    /// Ask one question. Empty answers take `default`; end of input gives `None`.
    fn ask(&mut self, question: &str, default: Option<&Path>) -> Result<Option<String>> {
        loop {
            let written = match default {
                Some(d) => write!(self.output, "{} [{}]: ", question, d.display()),
                None => write!(self.output, "{}: ", question),
            };
            written
                .and_then(|_| self.output.flush())
                .map_err(|e| RepairError::io("<stdout>", e))?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .map_err(|e| RepairError::io("<stdin>", e))?;
            if read == 0 {
                return Ok(None);
            }

            let answer = line.trim();
            if !answer.is_empty() {
                return Ok(Some(answer.to_string()));
            }
            if let Some(d) = default {
                return Ok(Some(d.display().to_string()));
            }
        }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Frontend for PromptFrontend<R, W> {
    fn collect(&mut self, config: &RepairConfig) -> Result<Option<RepairRequest>> {
        // Reference and folder both given up front: run without any questions
        let unattended = self.preset.reference.is_some() && self.preset.input_dir.is_some();

        if let Ok(cwd) = std::env::current_dir() {
            self.say(&format!("Current working directory: {}", cwd.display()))?;
        }

        let reference = match self.preset.reference.take() {
            Some(path) => path,
            None => match self.ask(
                "Enter the path to the reference WAV file",
                config.reference.as_deref(),
            )? {
                Some(answer) => PathBuf::from(answer),
                None => return Ok(None),
            },
        };

        let input_dir = match self.preset.input_dir.take() {
            Some(path) => path,
            None => match self.ask(
                "Enter the path to the folder containing damaged WAV files",
                config.input_dir.as_deref(),
            )? {
                Some(answer) => PathBuf::from(answer),
                None => return Ok(None),
            },
        };

        let output_dir = match self.preset.output_dir.take() {
            Some(path) => Some(path),
            None if unattended => None,
            None => {
                let default = config
                    .output_dir
                    .clone()
                    .unwrap_or_else(|| config.default_output_dir(&input_dir));
                match self.ask("Enter the output folder", Some(&default))? {
                    Some(answer) if Path::new(&answer) == default.as_path() => {
                        config.output_dir.clone()
                    }
                    Some(answer) => Some(PathBuf::from(answer)),
                    None => return Ok(None),
                }
            }
        };

        Ok(Some(RepairRequest {
            reference,
            input_dir,
            output_dir,
        }))
    }

    fn begin(&mut self, plan: &RepairPlan, files: &[PathBuf], output_dir: &Path) -> Result<()> {
        self.say(&format!(
            "Position of the first complete frame: {}",
            plan.offset()
        ))?;
        if files.is_empty() {
            self.say("No damaged WAV files found")
        } else {
            self.say(&format!(
                "Repairing {} file(s) into {}",
                files.len(),
                output_dir.display()
            ))
        }
    }

    fn report(&mut self, outcome: &RepairOutcome) {
        if let Err(e) = writeln!(self.output, "{}", outcome.message()) {
            debug!("Could not print result for {}: {}", outcome.input.display(), e);
        }
    }

    fn finish(&mut self, summary: &BatchSummary) -> Result<()> {
        self.say(&format!(
            "Repaired {} of {} file(s)",
            summary.repaired.len(),
            summary.total()
        ))?;
        self.say(&format!(
            "Execution time: {:.2} seconds",
            summary.elapsed.as_secs_f64()
        ))
    }

    fn fail(&mut self, error: &RepairError) -> Result<()> {
        self.say(&format!("Error: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::drive;
    use crate::wav::pcm_header;
    use std::fs;
    use std::io::{self, Cursor};

    fn frontend(
        answers: &str,
        preset: RepairRequestDraft,
    ) -> PromptFrontend<Cursor<Vec<u8>>, Vec<u8>> {
        PromptFrontend::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new(), preset)
    }

    #[test]
    fn test_collect_asks_each_path() {
        let mut prompt = frontend("/ref.wav\n/locked\n/out\n", RepairRequestDraft::default());
        let request = prompt.collect(&RepairConfig::default()).unwrap().unwrap();

        assert_eq!(request.reference, PathBuf::from("/ref.wav"));
        assert_eq!(request.input_dir, PathBuf::from("/locked"));
        assert_eq!(request.output_dir, Some(PathBuf::from("/out")));

        let (_, out) = prompt.into_inner();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Enter the path to the reference WAV file: "));
        assert!(text.contains("Enter the output folder [/Repaired]: "));
    }

    #[test]
    fn test_empty_answers_take_config_defaults() {
        let config = RepairConfig {
            reference: Some(PathBuf::from("/music/ref.wav")),
            input_dir: Some(PathBuf::from("/music/locked")),
            ..RepairConfig::default()
        };
        let mut prompt = frontend("\n\n\n", RepairRequestDraft::default());
        let request = prompt.collect(&config).unwrap().unwrap();

        assert_eq!(request.reference, PathBuf::from("/music/ref.wav"));
        assert_eq!(request.input_dir, PathBuf::from("/music/locked"));
        assert_eq!(request.output_dir, None);
    }

    #[test]
    fn test_empty_answer_without_default_asks_again() {
        let mut prompt = frontend("\n/ref.wav\n/in\n\n", RepairRequestDraft::default());
        let request = prompt.collect(&RepairConfig::default()).unwrap().unwrap();
        assert_eq!(request.reference, PathBuf::from("/ref.wav"));
    }

    #[test]
    fn test_end_of_input_quits() {
        let mut prompt = frontend("/ref.wav\n", RepairRequestDraft::default());
        assert!(prompt.collect(&RepairConfig::default()).unwrap().is_none());
    }

    #[test]
    fn test_preset_paths_skip_questions() {
        let preset = RepairRequestDraft {
            reference: Some(PathBuf::from("/ref.wav")),
            input_dir: Some(PathBuf::from("/in")),
            output_dir: None,
        };
        let mut prompt = frontend("", preset);
        let request = prompt.collect(&RepairConfig::default()).unwrap().unwrap();

        assert_eq!(request.output_dir, None);
        let (_, out) = prompt.into_inner();
        assert!(!String::from_utf8(out).unwrap().contains("Enter"));
    }

    #[test]
    fn test_batch_report_lines() {
        let dir = tempfile::tempdir().unwrap();
        let reference = dir.path().join("ref.wav");
        fs::write(&reference, pcm_header(44100, 2, 16, 0).as_bytes()).unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("good.wav.x"), vec![5u8; 200_000]).unwrap();
        fs::write(locked.join("bad.wav.x"), vec![5u8; 100]).unwrap();
        let out_dir = dir.path().join("fixed");

        let preset = RepairRequestDraft {
            reference: Some(reference),
            input_dir: Some(locked),
            output_dir: Some(out_dir.clone()),
        };
        let mut prompt = frontend("", preset);
        let mut config = RepairConfig::default();
        let summary = drive(&mut prompt, &mut config, &dir.path().join("cfg.json"))
            .unwrap()
            .unwrap();
        assert_eq!(summary.total(), 2);

        let (_, out) = prompt.into_inner();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Position of the first complete frame: 153608\n"));
        assert!(text.contains(&format!("Repairing 2 file(s) into {}\n", out_dir.display())));
        assert!(text.contains(&format!(
            "File saved to {}\n",
            out_dir.join("good.wav").display()
        )));
        assert!(text.contains("Failed bad.wav.x: "));
        assert!(text.contains("Repaired 1 of 2 file(s)\n"));
        assert!(text.contains("Execution time: "));
        assert!(text.trim_end().ends_with("seconds"));
    }

    #[test]
    fn test_empty_folder_and_fatal_error_lines() {
        let dir = tempfile::tempdir().unwrap();
        let reference = dir.path().join("ref.wav");
        fs::write(&reference, pcm_header(48000, 1, 8, 0).as_bytes()).unwrap();
        let empty = dir.path().join("empty");
        fs::create_dir(&empty).unwrap();

        let preset = RepairRequestDraft {
            reference: Some(reference),
            input_dir: Some(empty.clone()),
            output_dir: None,
        };
        let mut prompt = frontend("", preset);
        let cfg = dir.path().join("cfg.json");
        drive(&mut prompt, &mut RepairConfig::default(), &cfg).unwrap();
        let (_, out) = prompt.into_inner();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Position of the first complete frame: 153605\n"));
        assert!(text.contains("No damaged WAV files found\n"));
        assert!(text.contains("Repaired 0 of 0 file(s)\n"));

        let preset = RepairRequestDraft {
            reference: Some(dir.path().join("missing.wav")),
            input_dir: Some(empty),
            output_dir: None,
        };
        let mut prompt = frontend("", preset);
        assert!(drive(&mut prompt, &mut RepairConfig::default(), &cfg).is_err());
        let (_, out) = prompt.into_inner();
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("Error: Invalid input: reference file"));
    }

    struct ClosedOutput;

    impl Write for ClosedOutput {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_report_survives_closed_output() {
        let mut prompt = PromptFrontend::new(
            Cursor::new(Vec::<u8>::new()),
            ClosedOutput,
            RepairRequestDraft::default(),
        );
        prompt.report(&RepairOutcome {
            input: PathBuf::from("a.wav.x"),
            result: Ok(PathBuf::from("out/a.wav")),
        });
        assert!(prompt.fail(&RepairError::invalid_input("x")).is_err());
    }
}
