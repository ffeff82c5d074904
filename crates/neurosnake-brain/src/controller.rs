//! The evolution loop that plays the game and evolves the champion.
//!
//! # State Machine
//!
//! The controller keeps two levels of state:
//!
//! - **Epoch level** - epoch counter, instance counter (bounded by
//!   [`EvolutionConfig::max_instance`]), the population collected in the current
//!   epoch, the epoch-local best score and the champion.
//! - **Instance level** - the last head position and the last emitted direction,
//!   used to skip redundant inference and commands. Cleared whenever a new
//!   instance starts.
//!
//! Each snapshot is handled as follows:
//!
//! 1. **Step cap** - if the snake has made more than
//!    [`EvolutionConfig::max_snake_steps`] moves without eating, the instance is
//!    abandoned unscored: `Retry` is emitted and the instance counter advances.
//! 2. **Game over** - the score enters the population if it exceeds
//!    [`EvolutionConfig::min_score_epoch`]. While the epoch has room, `Retry` is
//!    emitted and the next instance plays a mutated copy of the champion. When the
//!    epoch is full, its best individual is crossed into the champion, and the
//!    champion is saved if its score improved. Stats are emitted unless silent.
//! 3. **Live tick** - the network steers the snake. A `Move` is emitted only when
//!    the chosen direction changes.
//!
//! Commands are not acknowledged, so the simulation may publish a few more
//! snapshots of a round after `Retry` was emitted for it. Those snapshots are
//! recognised by their round number and ignored.

use std::{fmt, mem};

use neurosnake_engine::{Command, Coord, Direction, GameSnapshot};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::{
    channel::ControllerEnd,
    genetic,
    genome::{Genome, Individual},
    persistence::{ChampionStore, SaveBrainError},
    sensor,
};

/// Tuning parameters of the evolution loop.
#[derive(Debug, Clone, PartialEq)]
pub struct EvolutionConfig {
    /// Instances per epoch.
    pub max_instance: u32,
    /// Per-scalar mutation probability.
    pub mutation_rate: f64,
    /// Bound of the uniform mutation perturbation.
    pub mutation_range: f64,
    /// Moves without food after which an instance is abandoned.
    pub max_snake_steps: u32,
    /// Scores must exceed this to enter the population.
    pub min_score_epoch: u32,
    /// Suppress [`EpochStats`] emission and log progress instead.
    pub silent: bool,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            max_instance: 1000,
            mutation_rate: 0.1,
            mutation_range: 0.5,
            max_snake_steps: 200,
            min_score_epoch: 0,
            silent: false,
        }
    }
}

/// Progress summary emitted after every finished instance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EpochStats {
    pub epoch: u32,
    pub instance: u32,
    pub champion_score: u32,
    pub epoch_max_score: u32,
}

impl fmt::Display for EpochStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MaxScore: {}, epoch: {}, epochMaxScore: {}, inst: {}",
            self.champion_score, self.epoch, self.epoch_max_score, self.instance
        )
    }
}

/// What the controller emits for one snapshot.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub command: Option<Command>,
    pub stats: Option<EpochStats>,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ControllerError {
    #[display("failed to save champion with score {score}")]
    SaveChampion { score: u32, source: SaveBrainError },
}

/// Plays instances with mutated copies of the champion and evolves it.
#[derive(Debug)]
pub struct EvolutionController<R> {
    config: EvolutionConfig,
    store: ChampionStore,
    rng: R,
    champion: Individual,
    active: Genome,
    population: Vec<Individual>,
    epoch: u32,
    instance: u32,
    epoch_max_score: u32,
    last_head: Option<Coord>,
    last_direction: Option<Direction>,
    retried_round: Option<u64>,
}

impl<R> EvolutionController<R>
where
    R: Rng,
{
    /// Creates a controller whose first instance plays the champion itself.
    pub fn new(config: EvolutionConfig, store: ChampionStore, champion: Individual, rng: R) -> Self {
        let active = champion.genome.clone();
        Self {
            config,
            store,
            rng,
            champion,
            active,
            population: Vec::new(),
            epoch: 0,
            instance: 0,
            epoch_max_score: 0,
            last_head: None,
            last_direction: None,
            retried_round: None,
        }
    }

    #[must_use]
    pub fn champion(&self) -> &Individual {
        &self.champion
    }

    /// Genome playing the current instance.
    #[must_use]
    pub fn active_genome(&self) -> &Genome {
        &self.active
    }

    #[must_use]
    pub fn population(&self) -> &[Individual] {
        &self.population
    }

    #[must_use]
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    #[must_use]
    pub fn instance(&self) -> u32 {
        self.instance
    }

    #[must_use]
    pub fn stats(&self) -> EpochStats {
        EpochStats {
            epoch: self.epoch,
            instance: self.instance,
            champion_score: self.champion.score,
            epoch_max_score: self.epoch_max_score,
        }
    }

    /// Consumes snapshots until the simulation hangs up, then returns the champion.
    ///
    /// Fails only when an improved champion cannot be saved.
    pub fn run(mut self, end: ControllerEnd) -> Result<Individual, ControllerError> {
        for snapshot in &end.snapshots {
            let outcome = self.handle_snapshot(&snapshot)?;
            if let Some(command) = outcome.command
                && end.commands.send(command).is_err()
            {
                break;
            }
            if let Some(stats) = outcome.stats {
                // the renderer may already be gone while the game keeps running
                let _ = end.stats.send(stats);
            }
        }
        Ok(self.champion)
    }

    /// Advances the state machine by one snapshot.
    pub fn handle_snapshot(
        &mut self,
        snapshot: &GameSnapshot,
    ) -> Result<TickOutcome, ControllerError> {
        if let Some(round) = self.retried_round {
            if snapshot.round == round {
                return Ok(TickOutcome::default());
            }
            self.retried_round = None;
        }

        if snapshot.snake.steps > self.config.max_snake_steps {
            warn!(
                steps = snapshot.snake.steps,
                instance = self.instance,
                "abandoning instance at step cap"
            );
            let command = self.retry(snapshot.round);
            self.instance += 1;
            return Ok(TickOutcome {
                command: Some(command),
                stats: None,
            });
        }

        if snapshot.is_over {
            return self.finish_instance(snapshot);
        }

        Ok(TickOutcome {
            command: self.steer(snapshot),
            stats: None,
        })
    }

    fn finish_instance(&mut self, snapshot: &GameSnapshot) -> Result<TickOutcome, ControllerError> {
        let score = snapshot.score;
        if score > self.config.min_score_epoch {
            self.population
                .push(Individual::new(self.active.clone(), score));
        }

        let mut command = None;
        if self.instance < self.config.max_instance {
            command = Some(self.start_mutated_instance(snapshot.round));
            self.instance += 1;
        }

        if self.instance >= self.config.max_instance {
            self.advance_epoch()?;
            // step-cap retries can overshoot the epoch without leaving room for one
            if command.is_none() {
                command = Some(self.start_mutated_instance(snapshot.round));
            }
        }

        let stats = (!self.config.silent).then(|| self.stats());
        Ok(TickOutcome { command, stats })
    }

    fn advance_epoch(&mut self) -> Result<(), ControllerError> {
        self.epoch += 1;
        let population = mem::take(&mut self.population);
        let population_size = population.len();
        let best = fittest(population);
        self.instance = 0;
        self.epoch_max_score = 0;

        info!(
            epoch = self.epoch,
            population = population_size,
            best_score = best.as_ref().map_or(0, |b| b.score),
            champion_score = self.champion.score,
            "epoch finished"
        );

        let Some(best) = best else {
            return Ok(());
        };
        self.champion.genome = genetic::crossover(&self.champion.genome, &best.genome, &mut self.rng);
        if best.score > self.champion.score {
            self.champion.score = best.score;
            let path = self
                .store
                .save(&self.champion.genome, best.score)
                .map_err(|source| ControllerError::SaveChampion {
                    score: best.score,
                    source,
                })?;
            info!(score = best.score, path = %path.display(), "saved new champion");
        }
        Ok(())
    }

    fn steer(&mut self, snapshot: &GameSnapshot) -> Option<Command> {
        if snapshot.score > self.epoch_max_score {
            self.epoch_max_score = snapshot.score;
            if self.config.silent {
                info!("{}", self.stats());
            }
        }

        let head = snapshot.snake.head;
        if self.last_head == Some(head) {
            return None;
        }
        self.last_head = Some(head);

        let direction = self.active.forward(&sensor::encode(snapshot)).direction();
        let changed = self.last_direction != Some(direction);
        self.last_direction = Some(direction);
        changed.then_some(Command::Move(direction))
    }

    fn start_mutated_instance(&mut self, round: u64) -> Command {
        self.active = genetic::mutate(
            &self.champion.genome,
            self.config.mutation_rate,
            self.config.mutation_range,
            &mut self.rng,
        );
        self.retry(round)
    }

    fn retry(&mut self, round: u64) -> Command {
        debug!(round, instance = self.instance, "retrying");
        self.retried_round = Some(round);
        self.last_head = None;
        self.last_direction = None;
        Command::Retry
    }
}

/// Individual with the strictly greatest positive score; the first one wins ties.
fn fittest(population: Vec<Individual>) -> Option<Individual> {
    let mut best: Option<Individual> = None;
    for individual in population {
        if individual.score > best.as_ref().map_or(0, |b| b.score) {
            best = Some(individual);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use neurosnake_engine::{Arena, SnakeSnapshot};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;
    use tempfile::TempDir;

    use super::*;
    use crate::persistence::load_brain;

    fn snapshot(head: Coord, score: u32, steps: u32, is_over: bool, round: u64) -> GameSnapshot {
        GameSnapshot {
            arena: Arena::DEFAULT,
            snake: SnakeSnapshot {
                head,
                body: vec![Coord::new(head.x, head.y - 1), head],
                steps,
            },
            food: Coord::new(30, 10),
            score,
            is_over,
            round,
        }
    }

    fn live(x: i32, round: u64) -> GameSnapshot {
        snapshot(Coord::new(x, 5), 0, 1, false, round)
    }

    fn game_over(score: u32, round: u64) -> GameSnapshot {
        snapshot(Coord::new(10, 5), score, 3, true, round)
    }

    struct Fixture {
        dir: TempDir,
        controller: EvolutionController<Pcg64>,
    }

    fn fixture(config: EvolutionConfig, champion_score: u32) -> Fixture {
        let dir = TempDir::new().unwrap();
        let mut rng = Pcg64::seed_from_u64(17);
        let champion = Individual::new(Genome::random(&mut rng), champion_score);
        let store = ChampionStore::new(dir.path(), "");
        let controller = EvolutionController::new(config, store, champion, rng);
        Fixture { dir, controller }
    }

    fn config(max_instance: u32) -> EvolutionConfig {
        EvolutionConfig {
            max_instance,
            ..EvolutionConfig::default()
        }
    }

    #[test]
    fn test_epoch_advances_after_max_instances() {
        let Fixture {
            dir: _dir,
            mut controller,
        } = fixture(config(2), 0);

        let first = controller.handle_snapshot(&game_over(0, 0)).unwrap();
        assert_eq!(first.command, Some(Command::Retry));
        assert_eq!(controller.instance(), 1);
        assert_eq!(controller.epoch(), 0);

        let second = controller.handle_snapshot(&game_over(0, 1)).unwrap();
        assert_eq!(second.command, Some(Command::Retry));
        assert_eq!(controller.instance(), 0);
        assert_eq!(controller.epoch(), 1);
        assert_eq!(
            second.stats,
            Some(EpochStats {
                epoch: 1,
                instance: 0,
                champion_score: 0,
                epoch_max_score: 0,
            })
        );
    }

    #[test]
    fn test_single_instance_epoch_saves_improved_champion() {
        let Fixture {
            dir,
            mut controller,
        } = fixture(config(1), 0);

        controller.handle_snapshot(&live(3, 0)).unwrap();
        let outcome = controller.handle_snapshot(&game_over(5, 0)).unwrap();

        assert_eq!(outcome.command, Some(Command::Retry));
        assert_eq!(controller.epoch(), 1);
        assert_eq!(controller.instance(), 0);
        assert!(controller.population().is_empty());
        assert_eq!(controller.champion().score, 5);

        let saved = load_brain(dir.path().join("brain-5.json")).unwrap();
        assert_eq!(saved.score, 5);
        assert_eq!(&saved.genome, &controller.champion().genome);
    }

    #[test]
    fn test_population_collects_scores_above_minimum() {
        let Fixture {
            dir: _dir,
            mut controller,
        } = fixture(
            EvolutionConfig {
                max_instance: 5,
                min_score_epoch: 2,
                ..EvolutionConfig::default()
            },
            0,
        );

        for (round, score) in (0..).zip([1, 2, 3, 7]) {
            controller.handle_snapshot(&game_over(score, round)).unwrap();
        }
        let scores: Vec<u32> = controller.population().iter().map(|i| i.score).collect();
        assert_eq!(scores, [3, 7]);
    }

    #[test]
    fn test_empty_epoch_keeps_champion() {
        let Fixture {
            dir: _dir,
            mut controller,
        } = fixture(config(2), 4);
        let before = controller.champion().clone();

        controller.handle_snapshot(&game_over(0, 0)).unwrap();
        controller.handle_snapshot(&game_over(0, 1)).unwrap();

        assert_eq!(controller.epoch(), 1);
        assert_eq!(controller.champion(), &before);
    }

    #[test]
    fn test_champion_score_never_decreases() {
        let Fixture {
            dir,
            mut controller,
        } = fixture(config(1), 0);

        let mut history = vec![];
        for (round, score) in (0..).zip([5, 3, 8, 8, 1]) {
            controller.handle_snapshot(&game_over(score, round)).unwrap();
            history.push(controller.champion().score);
        }
        assert_eq!(history, [5, 5, 8, 8, 8]);
        assert!(dir.path().join("brain-5.json").exists());
        assert!(dir.path().join("brain-8.json").exists());
        assert!(!dir.path().join("brain-3.json").exists());
    }

    #[test]
    fn test_weaker_best_still_crosses_into_champion() {
        let Fixture {
            dir: _dir,
            mut controller,
        } = fixture(config(1), 10);
        let before = controller.champion().genome.clone();

        controller.handle_snapshot(&game_over(3, 0)).unwrap();

        assert_eq!(controller.champion().score, 10);
        // the first instance played the champion itself, so crossover is a no-op
        assert_eq!(controller.champion().genome, before);

        // the second instance plays a mutant whose rows may now be inherited
        controller.handle_snapshot(&game_over(3, 1)).unwrap();
        assert_eq!(controller.champion().score, 10);
        assert_ne!(controller.champion().genome, before);
    }

    #[test]
    fn test_game_over_mutates_next_instance() {
        let Fixture {
            dir: _dir,
            mut controller,
        } = fixture(config(10), 0);
        let champion = controller.champion().genome.clone();
        assert_eq!(controller.active_genome(), &champion);

        controller.handle_snapshot(&game_over(0, 0)).unwrap();
        assert_ne!(controller.active_genome(), &champion);
        assert_eq!(controller.champion().genome, champion);
    }

    #[test]
    fn test_unchanged_head_emits_nothing() {
        let Fixture {
            dir: _dir,
            mut controller,
        } = fixture(config(10), 0);

        let first = controller.handle_snapshot(&live(3, 0)).unwrap();
        assert!(matches!(first.command, Some(Command::Move(_))));

        let repeat = controller.handle_snapshot(&live(3, 0)).unwrap();
        assert_eq!(repeat, TickOutcome::default());
    }

    #[test]
    fn test_same_direction_is_not_repeated() {
        let Fixture {
            dir: _dir,
            mut controller,
        } = fixture(config(10), 0);
        let mut emitted = vec![];
        let mut decided = vec![];
        for x in 3..20 {
            let tick = live(x, 0);
            let direction = controller
                .active_genome()
                .forward(&sensor::encode(&tick))
                .direction();
            decided.push(direction);
            if let Some(Command::Move(d)) = controller.handle_snapshot(&tick).unwrap().command {
                emitted.push(d);
            }
        }
        let mut expected = decided.clone();
        expected.dedup();
        assert_eq!(emitted, expected);
    }

    #[test]
    fn test_step_cap_abandons_instance_without_scoring() {
        let Fixture {
            dir: _dir,
            mut controller,
        } = fixture(
            EvolutionConfig {
                max_snake_steps: 10,
                ..config(10)
            },
            0,
        );
        let genome = controller.active_genome().clone();

        let over_cap = snapshot(Coord::new(4, 4), 6, 11, false, 0);
        let outcome = controller.handle_snapshot(&over_cap).unwrap();
        assert_eq!(outcome.command, Some(Command::Retry));
        assert_eq!(outcome.stats, None);
        assert_eq!(controller.instance(), 1);
        assert!(controller.population().is_empty());
        assert_eq!(controller.active_genome(), &genome);

        // at the cap is still fine
        let at_cap = snapshot(Coord::new(4, 4), 0, 10, false, 1);
        assert!(matches!(
            controller.handle_snapshot(&at_cap).unwrap().command,
            Some(Command::Move(_))
        ));
    }

    #[test]
    fn test_ticks_of_retried_round_are_ignored() {
        let Fixture {
            dir: _dir,
            mut controller,
        } = fixture(config(10), 0);

        controller.handle_snapshot(&game_over(4, 0)).unwrap();
        assert_eq!(controller.instance(), 1);
        assert_eq!(controller.population().len(), 1);

        // the simulation has not applied the retry yet
        for _ in 0..3 {
            let stale = controller.handle_snapshot(&game_over(4, 0)).unwrap();
            assert_eq!(stale, TickOutcome::default());
        }
        assert_eq!(controller.instance(), 1);
        assert_eq!(controller.population().len(), 1);

        let fresh = controller.handle_snapshot(&live(3, 1)).unwrap();
        assert!(fresh.command.is_some());
    }

    #[test]
    fn test_new_instance_resets_head_tracking() {
        let Fixture {
            dir: _dir,
            mut controller,
        } = fixture(config(10), 0);

        controller.handle_snapshot(&live(3, 0)).unwrap();
        controller.handle_snapshot(&game_over(0, 0)).unwrap();

        // same head position as the last live tick of the previous round
        let outcome = controller.handle_snapshot(&live(3, 1)).unwrap();
        assert!(matches!(outcome.command, Some(Command::Move(_))));
    }

    #[test]
    fn test_step_cap_overshoot_still_retries_at_epoch_end() {
        let Fixture {
            dir,
            mut controller,
        } = fixture(
            EvolutionConfig {
                max_snake_steps: 10,
                ..config(1)
            },
            0,
        );

        controller
            .handle_snapshot(&snapshot(Coord::new(4, 4), 0, 11, false, 0))
            .unwrap();
        assert_eq!(controller.instance(), 1);

        let outcome = controller.handle_snapshot(&game_over(2, 1)).unwrap();
        assert_eq!(outcome.command, Some(Command::Retry));
        assert_eq!(controller.epoch(), 1);
        assert_eq!(controller.instance(), 0);
        assert_eq!(controller.champion().score, 2);
        assert!(dir.path().join("brain-2.json").exists());
    }

    #[test]
    fn test_epoch_max_score_tracks_live_ticks() {
        let Fixture {
            dir: _dir,
            mut controller,
        } = fixture(config(10), 0);
        controller
            .handle_snapshot(&snapshot(Coord::new(3, 3), 4, 0, false, 0))
            .unwrap();
        controller
            .handle_snapshot(&snapshot(Coord::new(4, 3), 2, 0, false, 0))
            .unwrap();
        assert_eq!(controller.stats().epoch_max_score, 4);

        let outcome = controller.handle_snapshot(&game_over(4, 0)).unwrap();
        assert_eq!(outcome.stats.unwrap().epoch_max_score, 4);
    }

    #[test]
    fn test_silent_suppresses_stats() {
        let Fixture {
            dir: _dir,
            mut controller,
        } = fixture(
            EvolutionConfig {
                silent: true,
                ..config(2)
            },
            0,
        );
        let outcome = controller.handle_snapshot(&game_over(1, 0)).unwrap();
        assert_eq!(outcome.stats, None);
        assert_eq!(outcome.command, Some(Command::Retry));
    }

    #[test]
    fn test_save_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut rng = Pcg64::seed_from_u64(1);
        let champion = Individual::new(Genome::random(&mut rng), 0);
        let store = ChampionStore::new(dir.path().join("missing"), "");
        let mut controller = EvolutionController::new(config(1), store, champion, rng);

        let err = controller.handle_snapshot(&game_over(3, 0)).unwrap_err();
        assert!(matches!(
            err,
            ControllerError::SaveChampion {
                score: 3,
                source: SaveBrainError::Io { .. }
            }
        ));
    }

    #[test]
    fn test_fittest_prefers_first_of_equal_scores() {
        let mut a = Genome::ZERO;
        a.bias_out[0] = 1.0;
        let mut b = Genome::ZERO;
        b.bias_out[0] = 2.0;
        let best = fittest(vec![
            Individual::new(Genome::ZERO, 2),
            Individual::new(a.clone(), 9),
            Individual::new(b, 9),
        ])
        .unwrap();
        assert_eq!(best.genome, a);
        assert_eq!(fittest(vec![Individual::new(Genome::ZERO, 0)]), None);
        assert_eq!(fittest(vec![]), None);
    }

    #[test]
    fn test_stats_display() {
        let stats = EpochStats {
            epoch: 3,
            instance: 12,
            champion_score: 40,
            epoch_max_score: 17,
        };
        assert_eq!(
            stats.to_string(),
            "MaxScore: 40, epoch: 3, epochMaxScore: 17, inst: 12"
        );
    }
}
