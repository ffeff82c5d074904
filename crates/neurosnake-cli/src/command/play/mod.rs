use std::thread;

use anyhow::{Context as _, anyhow};
use neurosnake_brain::{
    EpochStats, EvolutionController,
    channel::{self, SimulationEnd},
    persistence,
};
use neurosnake_engine::GameSession;
use rand::SeedableRng as _;
use rand_pcg::Pcg64;
use tracing::info;

use crate::{command::CommandArgs, tui::Tui};

use self::app::SnakeApp;

mod app;

pub(crate) fn run_human(args: &CommandArgs) -> anyhow::Result<()> {
    let session = GameSession::new(args.seed.unwrap_or_else(rand::random));
    let mut app = SnakeApp::human(session, args.speed);
    Tui::new().run(&mut app)
}

pub(crate) fn run_evolution(args: &CommandArgs) -> anyhow::Result<()> {
    if args.silent {
        super::init_tracing();
    }

    let brain_file = args.brain_file.as_ref().context("no brain file given")?;
    let champion = persistence::load_brain(brain_file)
        .with_context(|| format!("failed to load brain from {}", brain_file.display()))?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(
        seed,
        score = champion.score,
        path = %brain_file.display(),
        "starting evolution"
    );

    let initial_stats = EpochStats {
        champion_score: champion.score,
        ..EpochStats::default()
    };
    let controller = EvolutionController::new(
        args.evolution_config(),
        args.champion_store(),
        champion,
        Pcg64::seed_from_u64(seed),
    );
    let (simulation, controller_end) = channel::link();
    let handle = thread::Builder::new()
        .name("controller".to_owned())
        .spawn(move || controller.run(controller_end))
        .context("failed to spawn controller thread")?;

    let session = GameSession::new(seed);
    if args.silent {
        run_headless(session, &simulation, args.speed);
    } else {
        let mut app = SnakeApp::evolution(session, simulation, args.speed, initial_stats);
        Tui::new().run(&mut app)?;
        drop(app);
    }

    let champion = handle
        .join()
        .map_err(|_| anyhow!("controller thread panicked"))?
        .context("evolution stopped")?;
    info!(score = champion.score, "evolution finished");
    Ok(())
}

/// Drives the game without rendering until the controller hangs up.
fn run_headless(mut session: GameSession, simulation: &SimulationEnd, speed_ms: u64) {
    loop {
        for command in simulation.pending_commands() {
            session.apply(command);
        }
        session.step();
        if !simulation.publish(session.snapshot()) {
            break;
        }
        let interval = session.move_interval(speed_ms);
        if !interval.is_zero() {
            thread::sleep(interval);
        }
    }
}
