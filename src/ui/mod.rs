use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};
use tracing::debug;

mod event_handler;
mod form_screen;
mod log_pane;
mod progress_screen;
mod screen_trait;
mod view;

use crate::config::RepairConfig;
use crate::error::{RepairError, Result};
use crate::frontend::{Frontend, RepairRequest};
use crate::repair::{BatchSummary, RepairOutcome, RepairPlan};
use event_handler::AppEventHandler;
use log_pane::LogPane;
use screen_trait::InputAction;
use view::AppView;

const LOG_CAPACITY: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Form,
    Progress,
    Summary,
}

pub struct App {
    pub screen: Screen,
    pub selected: usize,
    pub status: String,
    pub reference: String,
    pub input_dir: String,
    pub output_dir: String,
    pub total: usize,
    pub done: usize,
    pub failed: usize,
    pub log: LogPane,
}

impl App {
    fn new() -> Self {
        App {
            screen: Screen::Form,
            selected: 0,
            status: String::from("Ready"),
            reference: String::new(),
            input_dir: String::new(),
            output_dir: String::new(),
            total: 0,
            done: 0,
            failed: 0,
            log: LogPane::new(LOG_CAPACITY),
        }
    }

    fn prefill(&mut self, config: &RepairConfig) {
        let show = |p: &Option<PathBuf>| {
            p.as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default()
        };
        self.reference = show(&config.reference);
        self.input_dir = show(&config.input_dir);
        self.output_dir = show(&config.output_dir);
    }

    fn request(&self) -> RepairRequest {
        let output = self.output_dir.trim();
        RepairRequest {
            reference: PathBuf::from(self.reference.trim()),
            input_dir: PathBuf::from(self.input_dir.trim()),
            output_dir: (!output.is_empty()).then(|| PathBuf::from(output)),
        }
    }

    fn progress_ratio(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.done as f64 / self.total as f64).clamp(0.0, 1.0)
    }
}

/// Full-screen terminal form. The terminal is restored when this is dropped.
pub struct TuiFrontend {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    app: App,
}

fn terminal_error(e: io::Error) -> RepairError {
    RepairError::io("<terminal>", e)
}

impl TuiFrontend {
    pub fn new() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(TuiFrontend {
            terminal,
            app: App::new(),
        })
    }

    fn draw(&mut self) -> io::Result<()> {
        let app = &self.app;
        self.terminal.draw(|f| AppView::render(f, app))?;
        Ok(())
    }

    /// Show the summary screen until a key is pressed.
    fn wait_for_dismiss(&mut self) -> Result<()> {
        self.app.screen = Screen::Summary;
        AppEventHandler::drain_pending().map_err(terminal_error)?;
        loop {
            self.draw().map_err(terminal_error)?;
            let action = AppEventHandler::process_events(&mut self.app).map_err(terminal_error)?;
            if action == InputAction::Quit {
                return Ok(());
            }
        }
    }
}

impl Frontend for TuiFrontend {
    fn collect(&mut self, config: &RepairConfig) -> Result<Option<RepairRequest>> {
        self.app.prefill(config);

        loop {
            self.draw().map_err(terminal_error)?;
            match AppEventHandler::process_events(&mut self.app).map_err(terminal_error)? {
                InputAction::Quit => return Ok(None),
                InputAction::Submit => {
                    let request = self.app.request();
                    // Keep the user in the form until the paths check out
                    match request.resolve(config) {
                        Ok(_) => return Ok(Some(request)),
                        Err(e) => self.app.status = e.to_string(),
                    }
                }
                InputAction::Continue => {}
            }
        }
    }

    fn begin(&mut self, plan: &RepairPlan, files: &[PathBuf], output_dir: &Path) -> Result<()> {
        self.app.screen = Screen::Progress;
        self.app.total = files.len();
        self.app.done = 0;
        self.app.failed = 0;
        self.app.log.push(format!(
            "Position of the first complete frame: {}",
            plan.offset()
        ));
        self.app.status = if files.is_empty() {
            "No damaged WAV files found".to_string()
        } else {
            format!(
                "Repairing {} file(s) into {}",
                files.len(),
                output_dir.display()
            )
        };
        self.draw().map_err(terminal_error)
    }

    fn report(&mut self, outcome: &RepairOutcome) {
        self.app.done += 1;
        if outcome.result.is_err() {
            self.app.failed += 1;
        }
        self.app.log.push(outcome.message());
        if let Err(e) = self.draw() {
            debug!("Redraw failed: {}", e);
        }
    }

    fn finish(&mut self, summary: &BatchSummary) -> Result<()> {
        self.app.status = format!(
            "Repaired {} of {} file(s) in {:.2} seconds. Press any key to exit",
            summary.repaired.len(),
            summary.total(),
            summary.elapsed.as_secs_f64()
        );
        self.wait_for_dismiss()
    }

    fn fail(&mut self, error: &RepairError) -> Result<()> {
        self.app.log.push(format!("Error: {}", error));
        self.app.status = format!("Error: {}. Press any key to exit", error);
        self.wait_for_dismiss()
    }
}

impl Drop for TuiFrontend {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}
