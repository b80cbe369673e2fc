use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use std::io;
use std::time::Duration;

use super::form_screen::{FormItem, FormScreen};
use super::progress_screen::ProgressScreen;
use super::screen_trait::{InputAction, ScreenTrait};
use super::{App, Screen};

mod event_config {
    use crossterm::event::KeyCode;

    pub const POLL_TIMEOUT_MS: u64 = 100;
    pub const QUIT_KEY: char = 'q';
    pub const BACK_KEY: KeyCode = KeyCode::Esc;
}

pub struct AppEventHandler;

impl AppEventHandler {
    /// Wait briefly for one key and apply it to `app`.
    pub fn process_events(app: &mut App) -> io::Result<InputAction> {
        if event::poll(Duration::from_millis(event_config::POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(Self::handle_key(app, key.code));
                }
            }
        }
        Ok(InputAction::Continue)
    }

    /// Throw away keys typed while the batch was running.
    pub fn drain_pending() -> io::Result<()> {
        while event::poll(Duration::ZERO)? {
            let _ = event::read()?;
        }
        Ok(())
    }

    pub fn handle_key(app: &mut App, key: KeyCode) -> InputAction {
        // In a text field 'q' is just a letter
        let is_text_input = matches!(app.screen, Screen::Form)
            && FormItem::at(app.selected).is_some_and(|item| item.is_text_field());

        match key {
            KeyCode::Char(c) if c == event_config::QUIT_KEY && !is_text_input => {
                if matches!(app.screen, Screen::Progress) {
                    return InputAction::Continue;
                }
                InputAction::Quit
            }
            code if code == event_config::BACK_KEY && matches!(app.screen, Screen::Form) => {
                InputAction::Quit
            }
            _ => Self::route_to_screen_handler(app, key),
        }
    }

    fn route_to_screen_handler(app: &mut App, key: KeyCode) -> InputAction {
        match app.screen {
            Screen::Form => FormScreen.handle_input(app, key),
            Screen::Progress | Screen::Summary => ProgressScreen.handle_input(app, key),
        }
    }
}
