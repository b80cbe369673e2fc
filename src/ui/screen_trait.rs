use crossterm::event::KeyCode;
use ratatui::{layout::Rect, Frame};

use super::App;

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Continue,
    Submit,
    Quit,
}

pub trait ScreenTrait {
    fn render(&self, f: &mut Frame, app: &App, area: Rect);

    fn handle_input(&self, app: &mut App, key: KeyCode) -> InputAction;
}
