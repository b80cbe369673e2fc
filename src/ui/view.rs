use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::form_screen::FormScreen;
use super::progress_screen::ProgressScreen;
use super::screen_trait::ScreenTrait;
use super::{App, Screen};

/// Layout constants for the repair window
mod layout_config {
    use super::*;

    pub const TITLE: &str = "WAV Header Repair";
    pub const TITLE_COLOR: Color = Color::Cyan;
    pub const STATUS_TITLE: &str = "Status";
    pub const STATUS_COLOR: Color = Color::Yellow;
    pub const HINT_COLOR: Color = Color::DarkGray;

    pub const HEADER_HEIGHT: u16 = 3;
    // Status line, key hints and two border rows
    pub const FOOTER_HEIGHT: u16 = 4;
    pub const MIN_CONTENT_HEIGHT: u16 = 7;
    pub const MARGIN: u16 = 1;
}

pub struct AppView;

impl AppView {
    /// Draw title, the active screen and the status footer
    pub fn render(f: &mut Frame, app: &App) {
        let chunks = Self::create_layout(f.area());

        Self::render_title(f, app, chunks[0]);
        Self::render_content(f, app, chunks[1]);
        Self::render_footer(f, app, chunks[2]);
    }

    fn create_layout(area: Rect) -> std::rc::Rc<[Rect]> {
        Layout::default()
            .direction(Direction::Vertical)
            .margin(layout_config::MARGIN)
            .constraints([
                Constraint::Length(layout_config::HEADER_HEIGHT),
                Constraint::Min(layout_config::MIN_CONTENT_HEIGHT),
                Constraint::Length(layout_config::FOOTER_HEIGHT),
            ])
            .split(area)
    }

    /// Title bar with the version and the current stage of the run
    fn render_title(f: &mut Frame, app: &App, area: Rect) {
        let line = Line::from(vec![
            Span::styled(
                layout_config::TITLE,
                Style::default()
                    .fg(layout_config::TITLE_COLOR)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" v{} | {}", crate::VERSION, Self::stage(app.screen))),
        ]);
        let title = Paragraph::new(line)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, area);
    }

    fn render_content(f: &mut Frame, app: &App, area: Rect) {
        match app.screen {
            Screen::Form => FormScreen.render(f, app, area),
            Screen::Progress | Screen::Summary => ProgressScreen.render(f, app, area),
        }
    }

    /// Status message plus the keys that work on the current screen
    fn render_footer(f: &mut Frame, app: &App, area: Rect) {
        let lines = vec![
            Line::styled(
                app.status.clone(),
                Style::default().fg(layout_config::STATUS_COLOR),
            ),
            Line::styled(
                Self::key_hints(app.screen),
                Style::default().fg(layout_config::HINT_COLOR),
            ),
        ];
        let footer = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(layout_config::STATUS_TITLE),
            );
        f.render_widget(footer, area);
    }

    fn stage(screen: Screen) -> &'static str {
        match screen {
            Screen::Form => "Choose files",
            Screen::Progress => "Repairing",
            Screen::Summary => "Done",
        }
    }

    fn key_hints(screen: Screen) -> &'static str {
        match screen {
            Screen::Form => "Up/Down move | type to edit | Enter next/run | Esc quit",
            Screen::Progress => "Working...",
            Screen::Summary => "Any key exits",
        }
    }
}
