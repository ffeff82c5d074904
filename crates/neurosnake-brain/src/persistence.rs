//! Brain files: a serialized [`Genome`] whose score is encoded in the file name.
//!
//! A brain file is named `[<prefix>-]brain-<score>.json` and contains the genome
//! as a JSON object with the fields `WeightHidden1`, `BiasHidden1`,
//! `WeightHidden2`, `BiasHidden2`, `WeightOutput` and `BiasOut`. The score is
//! not stored inside the file; [`load_brain`] recovers it from the name.

use std::{
    fs, io,
    num::ParseIntError,
    path::{Path, PathBuf},
};

use crate::genome::{Genome, Individual};

/// Error returned by [`load_brain`].
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum LoadBrainError {
    #[display(
        "brain file name {} has no score separator, expected [<prefix>-]brain-<score>.json",
        path.display()
    )]
    MissingScoreSeparator { path: PathBuf },
    #[display("invalid score {score:?} in brain file name {}", path.display())]
    InvalidScore {
        path: PathBuf,
        score: String,
        source: ParseIntError,
    },
    #[display("failed to read brain file {}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("failed to decode brain file {}", path.display())]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Error returned when a brain file cannot be written.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum SaveBrainError {
    #[display("failed to encode brain")]
    Encode { source: serde_json::Error },
    #[display("failed to write brain file {}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// File name of a brain with the given prefix and score.
///
/// ```
/// use neurosnake_brain::persistence::brain_file_name;
///
/// assert_eq!(brain_file_name("", 12), "brain-12.json");
/// assert_eq!(brain_file_name("run1", 0), "run1-brain-0.json");
/// ```
#[must_use]
pub fn brain_file_name(prefix: &str, score: u32) -> String {
    if prefix.is_empty() {
        format!("brain-{score}.json")
    } else {
        format!("{prefix}-brain-{score}.json")
    }
}

/// Writes `genome` to `path`, replacing any existing file.
pub fn save_brain<P>(path: P, genome: &Genome) -> Result<(), SaveBrainError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut bytes =
        serde_json::to_vec_pretty(genome).map_err(|source| SaveBrainError::Encode { source })?;
    bytes.push(b'\n');
    fs::write(path, bytes).map_err(|source| SaveBrainError::Io {
        path: path.to_owned(),
        source,
    })
}

/// Reads a brain file and the score encoded in its name.
///
/// The name is validated before the file is opened: the score is the part of
/// the file stem after the last `-`.
pub fn load_brain<P>(path: P) -> Result<Individual, LoadBrainError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let score = parse_score(path)?;

    let bytes = fs::read(path).map_err(|source| LoadBrainError::Io {
        path: path.to_owned(),
        source,
    })?;
    let genome = serde_json::from_slice(&bytes).map_err(|source| LoadBrainError::Decode {
        path: path.to_owned(),
        source,
    })?;

    Ok(Individual::new(genome, score))
}

fn parse_score(path: &Path) -> Result<u32, LoadBrainError> {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    let Some((_, score)) = stem.rsplit_once('-') else {
        return Err(LoadBrainError::MissingScoreSeparator {
            path: path.to_owned(),
        });
    };
    score
        .parse()
        .map_err(|source| LoadBrainError::InvalidScore {
            path: path.to_owned(),
            score: score.to_owned(),
            source,
        })
}

/// Writes champions into a directory using the `[<prefix>-]brain-<score>.json`
/// naming scheme.
#[derive(Debug, Clone)]
pub struct ChampionStore {
    dir: PathBuf,
    prefix: String,
}

impl ChampionStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }

    #[must_use]
    pub fn path_for(&self, score: u32) -> PathBuf {
        self.dir.join(brain_file_name(&self.prefix, score))
    }

    /// Saves `genome` as the brain for `score` and returns the written path.
    pub fn save(&self, genome: &Genome, score: u32) -> Result<PathBuf, SaveBrainError> {
        let path = self.path_for(score);
        save_brain(&path, genome)?;
        Ok(path)
    }
}
