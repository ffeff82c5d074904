use neurosnake_engine::{Arena, Coord, GameSnapshot};
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Style,
    widgets::{Block as BlockWidget, BlockExt, Widget},
};

use crate::ui::widgets::style;

const SEGMENT_SYMBOL: &str = " ";
const FOOD_SYMBOL: &str = "●";

/// Draws the arena one terminal cell per game cell, with `y = 0` at the bottom.
#[derive(Debug)]
pub struct ArenaDisplay<'a> {
    snapshot: &'a GameSnapshot,
    block: Option<BlockWidget<'a>>,
}

impl<'a> ArenaDisplay<'a> {
    pub fn new(snapshot: &'a GameSnapshot) -> Self {
        Self {
            snapshot,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        cell_count(self.snapshot.arena.width) + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        cell_count(self.snapshot.arena.height) + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for ArenaDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &ArenaDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        let arena = self.snapshot.arena;
        let mut paint = |coord: Coord, style: Style, symbol: &str| {
            if let Some(position) = screen_position(area, arena, coord)
                && let Some(cell) = buf.cell_mut(position)
            {
                cell.set_style(style).set_symbol(symbol);
            }
        };

        paint(self.snapshot.food, style::FOOD, FOOD_SYMBOL);
        for &segment in &self.snapshot.snake.body {
            paint(segment, style::SNAKE_BODY, SEGMENT_SYMBOL);
        }
        paint(self.snapshot.snake.head, style::SNAKE_HEAD, SEGMENT_SYMBOL);
    }
}

fn cell_count(cells: i32) -> u16 {
    u16::try_from(cells.max(0)).unwrap_or(u16::MAX)
}

/// Terminal position of `coord`, or `None` if it lies outside the arena or `area`.
fn screen_position(area: Rect, arena: Arena, coord: Coord) -> Option<Position> {
    if !arena.contains(coord) {
        return None;
    }
    let dx = u16::try_from(coord.x).ok()?;
    let dy = u16::try_from(arena.height - 1 - coord.y).ok()?;
    (dx < area.width && dy < area.height).then(|| Position::new(area.x + dx, area.y + dy))
}
