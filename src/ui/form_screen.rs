use super::screen_trait::{InputAction, ScreenTrait};
use super::App;
use crossterm::event::KeyCode;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, List, ListItem},
    Frame,
};
use strum::{EnumCount, EnumIter, IntoEnumIterator};

mod layout_config {
    use ratatui::style::Color;

    pub const TITLE: &str = "Repair Damaged WAV Files";
    pub const SELECTED_FG: Color = Color::Black;
    pub const SELECTED_BG: Color = Color::Green;
    pub const DEFAULT_FG: Color = Color::White;
    pub const CURSOR: &str = "_";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumCount)]
pub enum FormItem {
    Reference,
    InputDir,
    OutputDir,
    Repair,
    Quit,
}

impl FormItem {
    pub fn at(index: usize) -> Option<FormItem> {
        FormItem::iter().nth(index)
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormItem::Reference => "Reference WAV file",
            FormItem::InputDir => "Damaged files folder",
            FormItem::OutputDir => "Output folder (empty = default)",
            FormItem::Repair => "Repair",
            FormItem::Quit => "Quit",
        }
    }

    pub fn is_text_field(&self) -> bool {
        matches!(
            self,
            FormItem::Reference | FormItem::InputDir | FormItem::OutputDir
        )
    }

    fn value<'a>(&self, app: &'a App) -> Option<&'a String> {
        match self {
            FormItem::Reference => Some(&app.reference),
            FormItem::InputDir => Some(&app.input_dir),
            FormItem::OutputDir => Some(&app.output_dir),
            FormItem::Repair | FormItem::Quit => None,
        }
    }

    fn value_mut<'a>(&self, app: &'a mut App) -> Option<&'a mut String> {
        match self {
            FormItem::Reference => Some(&mut app.reference),
            FormItem::InputDir => Some(&mut app.input_dir),
            FormItem::OutputDir => Some(&mut app.output_dir),
            FormItem::Repair | FormItem::Quit => None,
        }
    }
}

pub struct FormScreen;

impl ScreenTrait for FormScreen {
    fn render(&self, f: &mut Frame, app: &App, area: Rect) {
        let list_items: Vec<ListItem> = FormItem::iter()
            .enumerate()
            .map(|(i, item)| {
                let selected = i == app.selected;
                let text = match item.value(app) {
                    Some(value) if selected => {
                        format!("{}: {}{}", item.label(), value, layout_config::CURSOR)
                    }
                    Some(value) => format!("{}: {}", item.label(), value),
                    None => format!("[ {} ]", item.label()),
                };
                let style = if selected {
                    Style::default()
                        .fg(layout_config::SELECTED_FG)
                        .bg(layout_config::SELECTED_BG)
                } else {
                    Style::default().fg(layout_config::DEFAULT_FG)
                };
                ListItem::new(text).style(style)
            })
            .collect();

        let list = List::new(list_items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(layout_config::TITLE),
        );
        f.render_widget(list, area);
    }

    fn handle_input(&self, app: &mut App, key: KeyCode) -> InputAction {
        let Some(item) = FormItem::at(app.selected) else {
            app.selected = 0;
            return InputAction::Continue;
        };

        match key {
            KeyCode::Up | KeyCode::BackTab => {
                if app.selected > 0 {
                    app.selected -= 1;
                }
            }
            KeyCode::Down | KeyCode::Tab => {
                if app.selected < FormItem::COUNT - 1 {
                    app.selected += 1;
                }
            }
            KeyCode::Char(c) => {
                if let Some(value) = item.value_mut(app) {
                    value.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(value) = item.value_mut(app) {
                    value.pop();
                }
            }
            KeyCode::Enter => match item {
                FormItem::Repair => return InputAction::Submit,
                FormItem::Quit => return InputAction::Quit,
                _ => app.selected += 1,
            },
            _ => {}
        }
        InputAction::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            FormScreen.handle_input(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_fills_selected_field() {
        let mut app = App::new();
        type_text(&mut app, "/ref.wav");
        FormScreen.handle_input(&mut app, KeyCode::Down);
        type_text(&mut app, "/lockedx");
        FormScreen.handle_input(&mut app, KeyCode::Backspace);

        assert_eq!(app.reference, "/ref.wav");
        assert_eq!(app.input_dir, "/locked");
        assert_eq!(app.output_dir, "");
    }

    #[test]
    fn test_enter_walks_fields_then_submits() {
        let mut app = App::new();
        for _ in 0..3 {
            assert_eq!(
                FormScreen.handle_input(&mut app, KeyCode::Enter),
                InputAction::Continue
            );
        }
        assert_eq!(FormItem::at(app.selected), Some(FormItem::Repair));
        assert_eq!(
            FormScreen.handle_input(&mut app, KeyCode::Enter),
            InputAction::Submit
        );
    }

    #[test]
    fn test_quit_item() {
        let mut app = App::new();
        for _ in 0..10 {
            FormScreen.handle_input(&mut app, KeyCode::Down);
        }
        assert_eq!(FormItem::at(app.selected), Some(FormItem::Quit));
        assert_eq!(
            FormScreen.handle_input(&mut app, KeyCode::Enter),
            InputAction::Quit
        );
    }

    #[test]
    fn test_typing_on_action_is_ignored() {
        let mut app = App::new();
        app.selected = 3;
        type_text(&mut app, "abc");
        assert!(app.reference.is_empty() && app.input_dir.is_empty() && app.output_dir.is_empty());
    }
}
