use crate::Direction;

/// Instruction sent to a running [`GameSession`](crate::GameSession).
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Command {
    /// Change heading; ignored when it would reverse the snake onto itself.
    Move(Direction),
    /// Abandon the current round and restart from the initial state.
    Retry,
}
