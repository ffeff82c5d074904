//! Game engine logic.
//!
//! [`GameSession`] owns the arena, the snake and the food, advances the game by one
//! move per [`GameSession::step`], and publishes its state as a
//! [`GameSnapshot`](crate::GameSnapshot).
//!
//! # Game Flow
//!
//! 1. Create a session with a seed (food placement is deterministic per seed)
//! 2. Apply [`Command`](crate::Command)s from a player or a controller
//! 3. Call [`GameSession::step`] once per tick
//! 4. Publish [`GameSession::snapshot`]
//! 5. After game over, nothing moves until a [`Command::Retry`](crate::Command::Retry)
//!
//! # Example
//!
//! ```
//! use neurosnake_engine::{Command, Direction, GameSession};
//!
//! let mut session = GameSession::new(42);
//! session.apply(Command::Move(Direction::Up));
//! session.step();
//!
//! let snapshot = session.snapshot();
//! assert!(!snapshot.is_over);
//! assert_eq!(snapshot.snake.head, snapshot.snake.body[snapshot.snake.body.len() - 1]);
//! ```

pub use self::session::*;

mod session;
