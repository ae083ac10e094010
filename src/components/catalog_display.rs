use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Flex, Layout};
use ratatui::prelude::{Frame, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps,
    StatusBarSection, StatusBarStyle,
};

use super::{
    CatalogGrid, CatalogGridProps, CatalogHeader, CatalogHeaderProps, Component, SearchBar,
    SearchBarProps,
};
use crate::action::Action;
use crate::state::{AppState, SortKey, ViewPhase};

pub const ERROR_ICON: &str = "\u{26a0}\u{fe0f}";
pub const LOADING_MESSAGE: &str = "Loading Pokémon...";
pub const ATTRIBUTION: &str = "Data provided by PokéAPI (https://pokeapi.co/)";

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];
const PAGE_ROWS: i16 = 5;

/// Props for CatalogDisplay - read-only view of state
pub struct CatalogDisplayProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The whole catalog screen: loading, failure, or header + search + grid
#[derive(Default)]
pub struct CatalogDisplay {
    search: SearchBar,
}

impl CatalogDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route an event to the focused search input
    pub fn handle_search_event(&mut self, event: &EventKind, state: &AppState) -> Vec<Action> {
        self.search
            .handle_event(
                event,
                SearchBarProps {
                    query: &state.search_term,
                    sort_key: state.sort_key,
                    is_focused: state.search_active,
                    on_query_change: Action::SearchTermChange,
                },
            )
            .into_iter()
            .collect()
    }
}

impl Component<Action> for CatalogDisplay {
    type Props<'a> = CatalogDisplayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused || props.state.search_active {
            return None;
        }

        let EventKind::Key(key) = event else {
            return None;
        };

        if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
            return Some(Action::Quit);
        }

        match props.state.phase() {
            ViewPhase::Loading => None,
            ViewPhase::Failed => match key.code {
                KeyCode::Char('r') | KeyCode::F(5) => Some(Action::CatalogRetry),
                _ => None,
            },
            ViewPhase::Ready => match key.code {
                KeyCode::Char('/') => Some(Action::SearchFocus),
                KeyCode::Char('s') => Some(Action::SortToggle),
                KeyCode::Char('i') => Some(Action::SortSet(SortKey::Id)),
                KeyCode::Char('n') => Some(Action::SortSet(SortKey::Name)),
                KeyCode::Down | KeyCode::Char('j') => Some(Action::GridScroll(1)),
                KeyCode::Up | KeyCode::Char('k') => Some(Action::GridScroll(-1)),
                KeyCode::PageDown => Some(Action::GridScroll(PAGE_ROWS)),
                KeyCode::PageUp => Some(Action::GridScroll(-PAGE_ROWS)),
                _ => None,
            },
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: CatalogDisplayProps<'_>) {
        let state = props.state;
        let chunks = Layout::vertical([
            Constraint::Length(1), // Header
            Constraint::Length(1), // Spacer
            Constraint::Min(1),    // Body
            Constraint::Length(1), // Attribution
            Constraint::Length(1), // Help bar
        ])
        .split(area);

        let mut header = CatalogHeader;
        header.render(
            frame,
            chunks[0],
            CatalogHeaderProps {
                stats: state.stats,
                optimizations: &state.optimizations,
            },
        );

        match state.phase() {
            ViewPhase::Loading => render_loading(frame, chunks[2], state.tick),
            ViewPhase::Failed => {
                render_error(frame, chunks[2], state.catalog.error().unwrap_or_default())
            }
            ViewPhase::Ready => {
                let body = Layout::vertical([
                    Constraint::Length(1), // Search + sort
                    Constraint::Length(1), // Spacer
                    Constraint::Min(1),    // Grid
                ])
                .split(chunks[2]);

                self.search.render(
                    frame,
                    body[0],
                    SearchBarProps {
                        query: &state.search_term,
                        sort_key: state.sort_key,
                        is_focused: props.is_focused && state.search_active,
                        on_query_change: Action::SearchTermChange,
                    },
                );

                let mut grid = CatalogGrid;
                grid.render(
                    frame,
                    body[2],
                    CatalogGridProps {
                        records: &state.visible,
                        scroll: state.scroll,
                    },
                );
            }
        }

        let attribution =
            Line::from(Span::styled(ATTRIBUTION, Style::default().fg(Color::DarkGray))).centered();
        frame.render_widget(Paragraph::new(attribution), chunks[3]);

        render_status_bar(frame, chunks[4], state);
    }
}

fn render_loading(frame: &mut Frame, area: Rect, tick: u32) {
    let chunks = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .split(area);
    let spinner = SPINNER[tick as usize % SPINNER.len()];
    let line = Line::from(vec![
        Span::styled(
            format!("{spinner} "),
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(LOADING_MESSAGE, Style::default().fg(Color::Gray)),
    ])
    .centered();
    frame.render_widget(Paragraph::new(line), chunks[0]);
}

fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // icon
        Constraint::Length(1), // "Error"
        Constraint::Length(1), // message
        Constraint::Length(1), // blank
        Constraint::Length(1), // hint
    ])
    .flex(Flex::Center)
    .split(area);

    frame.render_widget(Paragraph::new(Line::from(ERROR_ICON).centered()), chunks[0]);
    let title = Span::styled(
        "Error",
        Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(Paragraph::new(Line::from(title).centered()), chunks[1]);
    frame.render_widget(
        Paragraph::new(
            Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::Rgb(200, 100, 100)),
            ))
            .centered(),
        ),
        chunks[2],
    );
    frame.render_widget(
        Paragraph::new(
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::DarkGray)),
                Span::styled(
                    "r",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to try again", Style::default().fg(Color::DarkGray)),
            ])
            .centered(),
        ),
        chunks[4],
    );
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let (left_hints, center_hints) = status_hints(state);

    let status = match &state.refresh_error {
        Some(_) => "refresh failed, showing previous results".to_string(),
        None if state.phase() == ViewPhase::Ready => {
            format!("{} of {}", state.visible.len(), state.base_records().len())
        }
        None => String::new(),
    };
    let status_span = Span::styled(status.as_str(), Style::default().fg(Color::Yellow));
    let status_items = [StatusBarItem::span(status_span)];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: Some(Color::Rgb(30, 30, 38)),
            fg: Some(Color::Gray),
        },
        text: Style::default().fg(Color::DarkGray),
        hint_key: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(Color::DarkGray),
        separator: Style::default().fg(Color::DarkGray),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&left_hints).with_separator("  "),
        center: StatusBarSection::hints(&center_hints).with_separator("  "),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    let mut status_bar = StatusBar::new();
    Component::<Action>::render(&mut status_bar, frame, area, props);
}

fn status_hints(state: &AppState) -> (Vec<StatusBarHint<'static>>, Vec<StatusBarHint<'static>>) {
    if state.search_active {
        let left = vec![
            StatusBarHint::new("Enter", "Done"),
            StatusBarHint::new("Esc", "Done"),
        ];
        return (left, Vec::new());
    }

    let center = vec![StatusBarHint::new("q", "Quit")];
    let left = match state.phase() {
        ViewPhase::Loading => Vec::new(),
        ViewPhase::Failed => vec![StatusBarHint::new("r", "Retry")],
        ViewPhase::Ready => vec![
            StatusBarHint::new("/", "Search"),
            StatusBarHint::new("s", "Sort"),
            StatusBarHint::new("j/k", "Scroll"),
        ],
    };
    (left, center)
}
