use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Frame, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::Component;
use crate::action::Action;
use crate::state::DisplayRecord;
use crate::view::{dex_number, sprite_label};

pub const TILE_WIDTH: u16 = 20;
/// Border, dex number, sprite, name, border.
pub const TILE_HEIGHT: u16 = 5;

pub const NO_MATCH_MESSAGE: &str = "No Pokémon found match search";

pub struct CatalogGridProps<'a> {
    pub records: &'a [DisplayRecord],
    /// First row to draw
    pub scroll: usize,
}

/// One tile per record, laid out row by row
#[derive(Default)]
pub struct CatalogGrid;

pub fn columns_for(width: u16) -> usize {
    (width / TILE_WIDTH).max(1) as usize
}

impl Component<Action> for CatalogGrid {
    type Props<'a> = CatalogGridProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if props.records.is_empty() {
            render_no_match(frame, area);
            return;
        }

        let columns = columns_for(area.width);
        let visible_rows = (area.height / TILE_HEIGHT).max(1) as usize;
        let total_rows = props.records.len().div_ceil(columns);
        let first_row = props.scroll.min(total_rows.saturating_sub(1));

        for (screen_row, row) in (first_row..total_rows).take(visible_rows).enumerate() {
            for column in 0..columns {
                let Some(record) = props.records.get(row * columns + column) else {
                    break;
                };
                let tile = Rect {
                    x: area.x + column as u16 * TILE_WIDTH,
                    y: area.y + screen_row as u16 * TILE_HEIGHT,
                    width: TILE_WIDTH,
                    height: TILE_HEIGHT,
                }
                .intersection(area);
                if tile.is_empty() {
                    continue;
                }
                render_tile(frame, tile, record);
            }
        }
    }
}

fn render_tile(frame: &mut Frame, area: Rect, record: &DisplayRecord) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(70, 70, 80)));

    let sprite_style = if record.sprite.is_some() {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)
    };
    let lines = vec![
        Line::from(Span::styled(
            dex_number(record.id),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(sprite_label(record.sprite.as_deref()), sprite_style)),
        Line::from(Span::styled(
            record.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_no_match(frame: &mut Frame, area: Rect) {
    let chunks = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .split(area);
    let message = Line::from(Span::styled(
        NO_MATCH_MESSAGE,
        Style::default().fg(Color::DarkGray),
    ))
    .centered();
    frame.render_widget(Paragraph::new(message), chunks[0]);
}
