use std::thread;

use neurosnake_brain::{
    EpochStats, EvolutionConfig, EvolutionController, Genome, Individual, channel,
    persistence::{ChampionStore, load_brain},
};
use neurosnake_engine::{Arena, GameSession};
use rand::SeedableRng as _;
use rand_pcg::Pcg64;
use tempfile::TempDir;

const TICKS: usize = 3000;

#[test]
fn controller_thread_drives_session_through_epochs() {
    let dir = TempDir::new().unwrap();
    let mut rng = Pcg64::seed_from_u64(2024);
    let champion = Individual::new(Genome::random(&mut rng), 0);
    let config = EvolutionConfig {
        max_instance: 3,
        max_snake_steps: 30,
        ..EvolutionConfig::default()
    };
    let controller = EvolutionController::new(
        config,
        ChampionStore::new(dir.path(), "test"),
        champion,
        rng,
    );

    let (sim, ctrl) = channel::link();
    let handle = thread::spawn(move || controller.run(ctrl));

    let mut session = GameSession::with_arena(
        Arena {
            width: 12,
            height: 12,
        },
        7,
    );
    let mut last_stats: Option<EpochStats> = None;
    for _ in 0..TICKS {
        for command in sim.pending_commands() {
            session.apply(command);
        }
        session.step();
        assert!(sim.publish(session.snapshot()), "controller stopped early");
        if let Some(stats) = sim.latest_stats() {
            last_stats = Some(stats);
        }
    }
    assert!(session.round() > 0, "no instance was ever restarted");
    drop(sim);

    let champion = handle.join().unwrap().unwrap();
    let stats = last_stats.expect("no stats received");
    assert!(stats.epoch >= 1);
    assert!(stats.champion_score <= champion.score);

    if champion.score > 0 {
        let path = dir.path().join(format!("test-brain-{}.json", champion.score));
        let saved = load_brain(&path).unwrap();
        assert_eq!(saved.score, champion.score);
    }
}

#[test]
fn controller_stops_when_simulation_hangs_up() {
    let dir = TempDir::new().unwrap();
    let mut rng = Pcg64::seed_from_u64(5);
    let champion = Individual::new(Genome::random(&mut rng), 3);
    let expected = champion.clone();
    let controller = EvolutionController::new(
        EvolutionConfig::default(),
        ChampionStore::new(dir.path(), ""),
        champion,
        rng,
    );

    let (sim, ctrl) = channel::link();
    let handle = thread::spawn(move || controller.run(ctrl));
    drop(sim);

    assert_eq!(handle.join().unwrap().unwrap(), expected);
}
