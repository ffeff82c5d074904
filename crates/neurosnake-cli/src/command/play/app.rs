use std::time::Duration;

use crossterm::event::{Event, KeyCode};
use neurosnake_brain::{EpochStats, channel::SimulationEnd};
use neurosnake_engine::{Direction, GameSession};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    text::Line,
    widgets::Block,
};

use crate::{
    tui::{App, Tui},
    ui::widgets::{ArenaDisplay, style},
};

#[derive(Debug)]
enum Driver {
    /// Arrow keys steer the snake.
    Human,
    /// A controller thread steers the snake through the channel.
    Evolution {
        simulation: SimulationEnd,
        stats: EpochStats,
    },
}

/// Runs a [`GameSession`] at the configured speed and draws it.
#[derive(Debug)]
pub(crate) struct SnakeApp {
    session: GameSession,
    driver: Driver,
    speed_ms: u64,
    is_exiting: bool,
}

impl SnakeApp {
    pub(crate) fn human(session: GameSession, speed_ms: u64) -> Self {
        Self {
            session,
            driver: Driver::Human,
            speed_ms,
            is_exiting: false,
        }
    }

    pub(crate) fn evolution(
        session: GameSession,
        simulation: SimulationEnd,
        speed_ms: u64,
        stats: EpochStats,
    ) -> Self {
        Self {
            session,
            driver: Driver::Evolution { simulation, stats },
            speed_ms,
            is_exiting: false,
        }
    }

    fn is_human(&self) -> bool {
        matches!(self.driver, Driver::Human)
    }

    fn tick_interval(&self) -> Duration {
        self.session.move_interval(self.speed_ms)
    }

    fn title(&self) -> String {
        match &self.driver {
            Driver::Human => "Snake".to_owned(),
            Driver::Evolution { stats, .. } => stats.to_string(),
        }
    }

    fn help_text(&self) -> &'static str {
        if self.is_human() {
            "Controls: ← → ↑ ↓ (Move) | R (Retry) | Q/Esc (Quit)"
        } else {
            "Controls: Q/Esc (Quit)"
        }
    }
}

impl App for SnakeApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_interval(Some(self.tick_interval()));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: &Event) {
        let Some(key) = event.as_key_event() else {
            return;
        };
        let is_human = self.is_human();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.is_exiting = true,
            KeyCode::Up if is_human => self.session.change_direction(Direction::Up),
            KeyCode::Down if is_human => self.session.change_direction(Direction::Down),
            KeyCode::Left if is_human => self.session.change_direction(Direction::Left),
            KeyCode::Right if is_human => self.session.change_direction(Direction::Right),
            KeyCode::Char('r') if is_human => self.session.retry(),
            _ => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let snapshot = self.session.snapshot();
        let border_style = if snapshot.is_over {
            style::BORDER_GAME_OVER
        } else {
            style::BORDER_PLAYING
        };
        let arena = ArenaDisplay::new(&snapshot).block(
            Block::bordered()
                .title(Line::from(format!(" Score: {} ", snapshot.score)).centered())
                .border_style(border_style)
                .style(style::DEFAULT),
        );
        let title = Line::from(self.title()).style(style::STATS).centered();
        let help = Line::from(self.help_text()).style(style::HINT).centered();

        let [title_area, arena_area, help_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(arena.height()),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        let [arena_area] = Layout::horizontal([Constraint::Length(arena.width())])
            .flex(Flex::Center)
            .areas(arena_area);

        frame.render_widget(title, title_area);
        frame.render_widget(&arena, arena_area);
        frame.render_widget(help, help_area);
    }

    fn update(&mut self, tui: &mut Tui) {
        if let Driver::Evolution { simulation, .. } = &self.driver {
            for command in simulation.pending_commands() {
                self.session.apply(command);
            }
        }
        self.session.step();
        if let Driver::Evolution { simulation, stats } = &mut self.driver {
            if !simulation.publish(self.session.snapshot()) {
                self.is_exiting = true;
            }
            if let Some(latest) = simulation.latest_stats() {
                *stats = latest;
            }
        }
        tui.set_tick_interval(Some(self.tick_interval()));
    }
}
