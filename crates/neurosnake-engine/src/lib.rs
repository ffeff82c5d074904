//! Snake simulation and the snapshot/command types exchanged with a controller.
//!
//! - [`core`] - Plain data: coordinates, directions, arena size, snapshots, commands
//! - [`engine`] - [`GameSession`], the stateful simulation that produces snapshots

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
