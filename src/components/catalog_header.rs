use ratatui::{
    layout::{Constraint, Layout},
    prelude::{Frame, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::action::Action;
use crate::config::OptimizationConfig;
use crate::state::FetchStats;

pub const TITLE: &str = "Pokémon Explorer";

pub struct CatalogHeaderProps<'a> {
    pub stats: FetchStats,
    pub optimizations: &'a OptimizationConfig,
}

/// Title on the left, optimization stats on the right
#[derive(Default)]
pub struct CatalogHeader;

impl Component<Action> for CatalogHeader {
    type Props<'a> = CatalogHeaderProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::horizontal([Constraint::Length(20), Constraint::Min(1)]).split(area);

        let title = Line::from(Span::styled(
            TITLE,
            Style::default()
                .fg(Color::Rgb(220, 60, 60))
                .add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(title), chunks[0]);

        let dim = Style::default().fg(Color::DarkGray);
        let value = Style::default().fg(Color::Cyan);
        let stats = Line::from(vec![
            Span::styled("Fetch function count: ", dim),
            Span::styled(props.stats.fetch_calls.to_string(), value),
            Span::styled("  Fetch request count: ", dim),
            Span::styled(props.stats.request_count.to_string(), value),
            Span::styled(flags(props.optimizations), dim),
        ])
        .right_aligned();
        frame.render_widget(Paragraph::new(stats), chunks[1]);
    }
}

fn flags(optimizations: &OptimizationConfig) -> String {
    let mut enabled = Vec::new();
    if optimizations.initial_cache {
        enabled.push("cache".to_string());
    }
    if optimizations.debounce {
        enabled.push(format!("debounce {}ms", optimizations.debounce_ms));
    }
    if enabled.is_empty() {
        String::new()
    } else {
        format!("  [{}]", enabled.join(", "))
    }
}
