use crate::{Arena, Coord};

/// Immutable view of the snake published once per tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnakeSnapshot {
    pub head: Coord,
    /// Every segment from tail to head; the head is the last element.
    pub body: Vec<Coord>,
    /// Moves made since the snake last ate.
    pub steps: u32,
}

/// Complete game state published once per tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub arena: Arena,
    pub snake: SnakeSnapshot,
    pub food: Coord,
    pub score: u32,
    pub is_over: bool,
    /// Number of resets the session has gone through.
    ///
    /// Consumers use it to tell ticks of a round they already asked to retry
    /// from ticks of the fresh round.
    pub round: u64,
}
