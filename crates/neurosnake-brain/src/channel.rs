//! Message-passing endpoints between a simulation and an
//! [`EvolutionController`](crate::controller::EvolutionController).
//!
//! ```text
//!            snapshots (rendezvous)
//! simulation ───────────────────────▶ controller
//!            ◀─────────────────────── commands (unbounded)
//!            ◀─────────────────────── epoch stats (unbounded)
//! ```
//!
//! The snapshot channel has zero capacity: publishing a snapshot blocks the
//! simulation until the controller takes it, so the controller sees every tick
//! and the simulation never runs ahead of the controller. Commands and stats are
//! fire-and-forget. Dropping the [`SimulationEnd`] closes the snapshot channel and
//! stops the controller.

use std::sync::mpsc::{self, Receiver, Sender, SyncSender};

use neurosnake_engine::{Command, GameSnapshot};

use crate::controller::EpochStats;

/// Endpoints held by the simulation.
#[derive(Debug)]
pub struct SimulationEnd {
    snapshots: SyncSender<GameSnapshot>,
    commands: Receiver<Command>,
    stats: Receiver<EpochStats>,
}

/// Endpoints held by the controller.
#[derive(Debug)]
pub struct ControllerEnd {
    pub(crate) snapshots: Receiver<GameSnapshot>,
    pub(crate) commands: Sender<Command>,
    pub(crate) stats: Sender<EpochStats>,
}

/// Creates a connected pair of endpoints.
#[must_use]
pub fn link() -> (SimulationEnd, ControllerEnd) {
    let (snapshot_tx, snapshot_rx) = mpsc::sync_channel(0);
    let (command_tx, command_rx) = mpsc::channel();
    let (stats_tx, stats_rx) = mpsc::channel();
    (
        SimulationEnd {
            snapshots: snapshot_tx,
            commands: command_rx,
            stats: stats_rx,
        },
        ControllerEnd {
            snapshots: snapshot_rx,
            commands: command_tx,
            stats: stats_tx,
        },
    )
}

impl SimulationEnd {
    /// Hands `snapshot` to the controller, blocking until it is taken.
    ///
    /// Returns `false` once the controller has stopped.
    pub fn publish(&self, snapshot: GameSnapshot) -> bool {
        self.snapshots.send(snapshot).is_ok()
    }

    /// Commands emitted so far and not yet consumed, without blocking.
    pub fn pending_commands(&self) -> impl Iterator<Item = Command> + '_ {
        self.commands.try_iter()
    }

    /// Most recent stats emitted since the last call, without blocking.
    #[must_use]
    pub fn latest_stats(&self) -> Option<EpochStats> {
        self.stats.try_iter().last()
    }
}
