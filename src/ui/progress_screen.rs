use super::screen_trait::{InputAction, ScreenTrait};
use super::{App, Screen};
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Gauge, List, ListItem},
    Frame,
};

mod layout_config {
    use ratatui::style::Color;

    pub const RUNNING_TITLE: &str = "Repairing";
    pub const DONE_TITLE: &str = "Finished";
    pub const LOG_TITLE: &str = "Log";
    pub const GAUGE_COLOR: Color = Color::Green;
    pub const OK_FG: Color = Color::White;
    pub const ERROR_FG: Color = Color::Red;
    pub const GAUGE_HEIGHT: u16 = 3;
}

/// Gauge plus log, used while the batch runs and for the final summary
pub struct ProgressScreen;

impl ScreenTrait for ProgressScreen {
    fn render(&self, f: &mut Frame, app: &App, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(layout_config::GAUGE_HEIGHT),
                Constraint::Min(1),
            ])
            .split(area);

        let title = match app.screen {
            Screen::Summary => layout_config::DONE_TITLE,
            _ => layout_config::RUNNING_TITLE,
        };
        let gauge = Gauge::default()
            .block(Block::default().borders(Borders::ALL).title(title))
            .gauge_style(Style::default().fg(layout_config::GAUGE_COLOR))
            .ratio(app.progress_ratio())
            .label(format!(
                "{}/{} ({} failed)",
                app.done, app.total, app.failed
            ));
        f.render_widget(gauge, chunks[0]);

        // Borders take two rows
        let visible = chunks[1].height.saturating_sub(2) as usize;
        let items: Vec<ListItem> = app
            .log
            .tail(visible)
            .map(|line| {
                let fg = if line.starts_with("Failed") || line.starts_with("Error") {
                    layout_config::ERROR_FG
                } else {
                    layout_config::OK_FG
                };
                ListItem::new(line.to_string()).style(Style::default().fg(fg))
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(layout_config::LOG_TITLE),
        );
        f.render_widget(list, chunks[1]);
    }

    fn handle_input(&self, app: &mut App, _key: KeyCode) -> InputAction {
        // Any key dismisses the summary; keys during the run are ignored
        match app.screen {
            Screen::Summary => InputAction::Quit,
            _ => InputAction::Continue,
        }
    }
}
