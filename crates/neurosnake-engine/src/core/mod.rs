//! Core data structures shared between the simulation and its controllers.

pub use self::{command::*, coord::*, snapshot::*};

mod command;
mod coord;
mod snapshot;
