//! Neural controller for the snake game and the genetic loop that trains it.
//!
//! - [`genome`] - Network weights ([`Genome`]) and scored genomes ([`Individual`])
//! - [`activation`] - ReLU and softmax used by the network
//! - [`network`] - Forward pass from features to a [`Direction`](neurosnake_engine::Direction)
//! - [`sensor`] - Encodes a game snapshot into the 24 network inputs
//! - [`genetic`] - Mutation and crossover operators
//! - [`persistence`] - Brain files on disk
//! - [`channel`] - Endpoints connecting a simulation to a controller
//! - [`controller`] - [`EvolutionController`], the per-snapshot evolution state machine

pub use self::{
    controller::{EpochStats, EvolutionConfig, EvolutionController},
    genome::{Genome, Individual},
};

pub mod activation;
pub mod channel;
pub mod controller;
pub mod genetic;
pub mod genome;
pub mod network;
pub mod persistence;
pub mod sensor;
