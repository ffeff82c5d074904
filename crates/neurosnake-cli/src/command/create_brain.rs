use anyhow::Context as _;
use neurosnake_brain::Genome;
use tracing::info;

use super::CommandArgs;

pub(crate) fn run(args: &CommandArgs) -> anyhow::Result<()> {
    let genome = Genome::random(&mut rand::rng());
    let path = args
        .champion_store()
        .save(&genome, 0)
        .context("failed to create brain")?;
    info!(path = %path.display(), "created random brain");
    println!("{}", path.display());
    Ok(())
}
