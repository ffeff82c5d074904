use std::path::PathBuf;

use clap::Parser;
use neurosnake_brain::{EvolutionConfig, persistence::ChampionStore};
use tracing_subscriber::EnvFilter;

mod create_brain;
mod play;

/// Evolves a neural network that plays snake.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Brain file to start from (`[<prefix>-]brain-<score>.json`)
    #[clap(required_unless_present_any = ["create_brain", "human"])]
    brain_file: Option<PathBuf>,
    /// Base tick interval in milliseconds, 0 runs as fast as possible
    #[clap(short, long, default_value_t = 100)]
    speed: u64,
    /// Instances played per epoch
    #[clap(
        short = 'i',
        long,
        default_value_t = 1000,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    max_instance: u32,
    /// Probability that a single weight is mutated
    #[clap(short = 'r', long, default_value_t = 0.1, value_parser = parse_probability)]
    mutation_rate: f64,
    /// Bound of the uniform perturbation added to a mutated weight
    #[clap(
        short = 'n',
        long,
        default_value_t = 0.5,
        allow_negative_numbers = true,
        value_parser = parse_finite
    )]
    mutation_range: f64,
    /// Moves without food after which an instance is abandoned
    #[clap(short = 't', long, default_value_t = 200)]
    max_snake_steps: u32,
    /// Scores must exceed this to take part in the epoch's selection
    #[clap(short, long, default_value_t = 0)]
    min_score_epoch: u32,
    /// Prefix of saved brain file names
    #[clap(short, long, default_value_t)]
    prefix: String,
    /// Directory where brain files are written
    #[clap(short, long, default_value = ".")]
    output_dir: PathBuf,
    /// Run without the terminal UI and log progress to stderr
    #[clap(short = 'q', long)]
    silent: bool,
    /// Play with the arrow keys instead of the network
    #[clap(long, conflicts_with_all = ["create_brain", "silent"])]
    human: bool,
    /// Write a randomly initialised brain and exit
    #[clap(short, long)]
    create_brain: bool,
    /// Seed for the game and the genetic operators (random if omitted)
    #[clap(long)]
    seed: Option<u64>,
}

impl CommandArgs {
    fn champion_store(&self) -> ChampionStore {
        ChampionStore::new(&self.output_dir, &self.prefix)
    }

    fn evolution_config(&self) -> EvolutionConfig {
        EvolutionConfig {
            max_instance: self.max_instance,
            mutation_rate: self.mutation_rate,
            mutation_range: self.mutation_range,
            max_snake_steps: self.max_snake_steps,
            min_score_epoch: self.min_score_epoch,
            silent: self.silent,
        }
    }
}

fn parse_probability(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in 0.0..=1.0"))
    }
}

fn parse_finite(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{value} is not a finite number"))
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    if args.create_brain {
        init_tracing();
        create_brain::run(&args)?;
    } else if args.human {
        play::run_human(&args)?;
    } else {
        play::run_evolution(&args)?;
    }
    Ok(())
}

/// Installs the stderr log subscriber. Must not be called while the terminal UI
/// owns the screen.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
