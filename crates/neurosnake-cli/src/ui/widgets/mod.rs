use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::arena_display::*;

mod arena_display;

mod color {
    use ratatui::style::Color;

    pub const GREEN: Color = Color::Rgb(0, 200, 0);
    pub const LIME: Color = Color::Rgb(160, 255, 80);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use ratatui::style::{Color, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    const fn bg_only(color: Color) -> Style {
        Style::new().fg(color).bg(color)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const HINT: Style = fg_bg(color::GRAY, color::BLACK);
    pub const SNAKE_BODY: Style = bg_only(color::GREEN);
    pub const SNAKE_HEAD: Style = bg_only(color::LIME);
    pub const FOOD: Style = fg_bg(color::RED, color::BLACK);

    pub const BORDER_PLAYING: Color = color::WHITE;
    pub const BORDER_GAME_OVER: Color = color::RED;
    pub const STATS: Style = fg_bg(color::YELLOW, color::BLACK);
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
