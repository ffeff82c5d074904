use std::{collections::VecDeque, time::Duration};

use rand::{SeedableRng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;

use crate::{Arena, Command, Coord, Direction, GameSnapshot, SnakeSnapshot};

const INITIAL_BODY: [Coord; 4] = [
    Coord::new(1, 1),
    Coord::new(1, 2),
    Coord::new(1, 3),
    Coord::new(1, 4),
];
const INITIAL_DIRECTION: Direction = Direction::Right;
const POINTS_PER_FOOD: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    GameOver,
}

/// A single snake game that can be restarted any number of times.
///
/// The snake moves one cell per [`step`](Self::step). Leaving the arena or running
/// into its own body ends the round. Eating food scores a point, grows the snake
/// by one segment and resets the step counter.
#[derive(Debug, Clone)]
pub struct GameSession {
    arena: Arena,
    rng: Pcg32,
    body: VecDeque<Coord>,
    heading: Direction,
    next_heading: Direction,
    food: Coord,
    score: u32,
    steps: u32,
    state: SessionState,
    round: u64,
}

impl GameSession {
    /// Creates a session on the default 50×20 arena.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_arena(Arena::DEFAULT, seed)
    }

    #[must_use]
    pub fn with_arena(arena: Arena, seed: u64) -> Self {
        let mut session = Self {
            arena,
            rng: Pcg32::seed_from_u64(seed),
            body: VecDeque::new(),
            heading: INITIAL_DIRECTION,
            next_heading: INITIAL_DIRECTION,
            food: Coord::default(),
            score: 0,
            steps: 0,
            state: SessionState::Playing,
            round: 0,
        };
        session.reset();
        session
    }

    #[must_use]
    pub fn arena(&self) -> Arena {
        self.arena
    }

    #[must_use]
    pub fn head(&self) -> Coord {
        *self.body.back().expect("Snake body should never be empty")
    }

    pub fn body(&self) -> impl ExactSizeIterator<Item = Coord> + '_ {
        self.body.iter().copied()
    }

    #[must_use]
    pub fn food(&self) -> Coord {
        self.food
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn steps(&self) -> u32 {
        self.steps
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Delay between two ticks for a base interval of `speed_ms` milliseconds.
    ///
    /// Every 10 points shave a millisecond off the interval.
    #[must_use]
    pub fn move_interval(&self, speed_ms: u64) -> Duration {
        Duration::from_millis(speed_ms.saturating_sub(u64::from(self.score / 10)))
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Move(direction) => self.change_direction(direction),
            Command::Retry => self.retry(),
        }
    }

    pub fn change_direction(&mut self, direction: Direction) {
        if direction != self.heading.opposite() {
            self.next_heading = direction;
        }
    }

    /// Restarts from the initial snake and bumps the round counter.
    pub fn retry(&mut self) {
        self.round += 1;
        self.reset();
    }

    /// Advances the game by one move. Does nothing once the round is over.
    pub fn step(&mut self) {
        if self.state.is_game_over() {
            return;
        }

        self.heading = self.next_heading;
        let next = self.head().step(self.heading);
        let eats = next == self.food;
        // the tail leaves its cell this tick unless the snake grows
        let hits_body = self
            .body
            .iter()
            .skip(usize::from(!eats))
            .any(|&segment| segment == next);
        if !self.arena.contains(next) || hits_body {
            self.state = SessionState::GameOver;
            return;
        }

        if !eats {
            self.body.pop_front();
        }
        self.body.push_back(next);
        if eats {
            self.score += POINTS_PER_FOOD;
            self.steps = 0;
            self.place_food();
        } else {
            self.steps += 1;
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            arena: self.arena,
            snake: SnakeSnapshot {
                head: self.head(),
                body: self.body.iter().copied().collect(),
                steps: self.steps,
            },
            food: self.food,
            score: self.score,
            is_over: self.state.is_game_over(),
            round: self.round,
        }
    }

    fn reset(&mut self) {
        self.body = INITIAL_BODY.into_iter().collect();
        self.heading = INITIAL_DIRECTION;
        self.next_heading = INITIAL_DIRECTION;
        self.score = 0;
        self.steps = 0;
        self.state = SessionState::Playing;
        self.place_food();
    }

    fn place_food(&mut self) {
        let free: Vec<Coord> = self
            .arena
            .cells()
            .filter(|cell| !self.body.contains(cell))
            .collect();
        match free.choose(&mut self.rng) {
            Some(&cell) => self.food = cell,
            // the snake covers the whole arena
            None => self.state = SessionState::GameOver,
        }
    }
}
