//! wav-repair CLI
//!
//! Rebuilds WAV headers on damaged recordings from a known-good reference file.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use wav_repair::frontend::{drive, PromptFrontend, RepairRequestDraft};
use wav_repair::ui::TuiFrontend;
use wav_repair::utils::header::describe_header;
use wav_repair::{CanonicalHeader, FrameGeometry, RepairConfig, TRAILER_SIZE};

const TUI_LOG_FILE: &str = "wav-repair.log";

#[derive(Parser)]
#[command(name = "wav-repair")]
#[command(about = "Rebuild WAV headers on damaged recordings", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./wav-repair.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Repair a folder of damaged files, asking for anything not given here
    Repair {
        /// Known-good WAV file with the same format as the damaged files
        #[arg(short, long)]
        reference: Option<PathBuf>,

        /// Folder holding the damaged files (name.wav.<ext>)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Folder for repaired files
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Full-screen terminal form
    Tui,

    /// Show the header fields of a reference file and the offset a repair would use
    Inspect {
        /// WAV file to read the header from
        file: PathBuf,
    },
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // The terminal form owns the screen, so its logs go to a file
    if matches!(cli.command, Commands::Tui) {
        let file = File::create(TUI_LOG_FILE)
            .with_context(|| format!("creating log file {}", TUI_LOG_FILE))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
    Ok(())
}

fn load_config(path: &Path) -> RepairConfig {
    match RepairConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            warn!("{}; using defaults", e);
            RepairConfig::default()
        }
    }
}

fn cmd_inspect(file: &Path) -> anyhow::Result<()> {
    let header = CanonicalHeader::load_from_file(file)
        .with_context(|| format!("reading header of {}", file.display()))?;

    for line in describe_header(&header) {
        println!("{}", line);
    }

    match FrameGeometry::from_header(&header) {
        Ok(geometry) => {
            let offset = geometry.aligned_offset();
            println!("Frame size: {} bytes", geometry.frame_size());
            println!("Position of the first complete frame: {}", offset);
            println!(
                "Smallest repairable damaged file: {} bytes",
                offset + TRAILER_SIZE
            );
        }
        Err(e) => println!("Cannot be used as a reference: {}", e),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    info!("wav-repair v{}", wav_repair::VERSION);

    let config_path = cli.config.clone().unwrap_or_else(RepairConfig::default_path);
    let mut config = load_config(&config_path);

    let summary = match cli.command {
        Commands::Inspect { file } => return cmd_inspect(&file),
        Commands::Repair {
            reference,
            input,
            output,
        } => {
            let preset = RepairRequestDraft {
                reference,
                input_dir: input,
                output_dir: output,
            };
            let stdin = io::stdin();
            let mut prompt = PromptFrontend::new(stdin.lock(), io::stdout(), preset);
            drive(&mut prompt, &mut config, &config_path)?
        }
        Commands::Tui => {
            let mut tui = TuiFrontend::new().context("starting terminal interface")?;
            let result = drive(&mut tui, &mut config, &config_path);
            drop(tui);
            result?
        }
    };

    if let Some(summary) = summary {
        if !summary.failed.is_empty() {
            bail!(
                "{} of {} file(s) could not be repaired",
                summary.failed.len(),
                summary.total()
            );
        }
    }
    Ok(())
}
