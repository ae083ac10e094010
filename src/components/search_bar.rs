use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout},
    prelude::{Frame, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{BaseStyle, Padding, TextInput, TextInputProps, TextInputStyle};

use super::Component;
use crate::action::Action;
use crate::state::SortKey;

pub const SEARCH_PLACEHOLDER: &str = "Search by name or Pokedex number...";

/// Search input plus the sort selector
pub struct SearchBar {
    input: TextInput,
}

pub struct SearchBarProps<'a> {
    pub query: &'a str,
    pub sort_key: SortKey,
    pub is_focused: bool,
    pub on_query_change: fn(String) -> Action,
}

impl Default for SearchBar {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
        }
    }
}

impl SearchBar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for SearchBar {
    type Props<'a> = SearchBarProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => vec![Action::SearchBlur],
            _ => {
                let input_props = TextInputProps {
                    value: props.query,
                    placeholder: SEARCH_PLACEHOLDER,
                    is_focused: true,
                    style: TextInputStyle {
                        base: BaseStyle {
                            border: None,
                            padding: Padding::xy(1, 0),
                            bg: None,
                            fg: None,
                        },
                        placeholder_style: None,
                        cursor_style: None,
                    },
                    on_change: props.on_query_change,
                    on_submit: |_| Action::SearchBlur,
                    on_cursor_move: Some(|_| Action::Render),
                };
                self.input
                    .handle_event(event, input_props)
                    .into_iter()
                    .collect()
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::horizontal([Constraint::Min(10), Constraint::Length(26)]).split(area);

        let bg = if props.is_focused {
            Color::Rgb(50, 50, 60)
        } else {
            Color::Rgb(30, 30, 38)
        };
        let input_props = TextInputProps {
            value: props.query,
            placeholder: SEARCH_PLACEHOLDER,
            is_focused: props.is_focused,
            style: TextInputStyle {
                base: BaseStyle {
                    border: None,
                    padding: Padding::xy(1, 0),
                    bg: Some(bg),
                    fg: None,
                },
                placeholder_style: None,
                cursor_style: None,
            },
            on_change: props.on_query_change,
            on_submit: |_| Action::SearchBlur,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input.render(frame, chunks[0], input_props);

        let sort = Line::from(vec![
            Span::styled(" s ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::styled(props.sort_key.label(), Style::default().fg(Color::Gray)),
        ]);
        frame.render_widget(Paragraph::new(sort), chunks[1]);
    }
}
