//! Network parameters and the individuals built from them.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of sensor features fed to the network.
pub const INPUTS: usize = 24;
/// Units in the first hidden layer.
pub const HIDDEN1: usize = 18;
/// Units in the second hidden layer.
pub const HIDDEN2: usize = 18;
/// Output units, one per steering direction.
pub const OUTPUTS: usize = 4;

/// Total number of scalar parameters in a [`Genome`].
pub const PARAMETER_COUNT: usize =
    INPUTS * HIDDEN1 + HIDDEN1 + HIDDEN1 * HIDDEN2 + HIDDEN2 + HIDDEN2 * OUTPUTS + OUTPUTS;

/// Weights and biases of the fixed 24 → 18 → 18 → 4 network.
///
/// Weight matrices are indexed `[input][output]`: row `i` holds the outgoing
/// weights of input unit `i`. The serialized field names are part of the brain
/// file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    #[serde(rename = "WeightHidden1")]
    pub weight_hidden1: [[f64; HIDDEN1]; INPUTS],
    #[serde(rename = "BiasHidden1")]
    pub bias_hidden1: [f64; HIDDEN1],
    #[serde(rename = "WeightHidden2")]
    pub weight_hidden2: [[f64; HIDDEN2]; HIDDEN1],
    #[serde(rename = "BiasHidden2")]
    pub bias_hidden2: [f64; HIDDEN2],
    #[serde(rename = "WeightOutput")]
    pub weight_output: [[f64; OUTPUTS]; HIDDEN2],
    #[serde(rename = "BiasOut")]
    pub bias_out: [f64; OUTPUTS],
}

impl Default for Genome {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Genome {
    /// A genome with every parameter set to zero.
    pub const ZERO: Self = Self {
        weight_hidden1: [[0.0; HIDDEN1]; INPUTS],
        bias_hidden1: [0.0; HIDDEN1],
        weight_hidden2: [[0.0; HIDDEN2]; HIDDEN1],
        bias_hidden2: [0.0; HIDDEN2],
        weight_output: [[0.0; OUTPUTS]; HIDDEN2],
        bias_out: [0.0; OUTPUTS],
    };

    /// Creates a genome whose parameters are drawn uniformly from `[-1, 1)`.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut genome = Self::ZERO;
        for value in genome.scalars_mut() {
            *value = rng.random_range(-1.0..1.0);
        }
        genome
    }

    /// Iterates over every parameter.
    ///
    /// The order is layer by layer (weights then bias), rows in input order,
    /// matching the field order of the brain file.
    pub fn scalars(&self) -> impl Iterator<Item = f64> + '_ {
        self.weight_hidden1
            .iter()
            .flatten()
            .chain(&self.bias_hidden1)
            .chain(self.weight_hidden2.iter().flatten())
            .chain(&self.bias_hidden2)
            .chain(self.weight_output.iter().flatten())
            .chain(&self.bias_out)
            .copied()
    }

    /// Mutable counterpart of [`scalars`](Self::scalars), in the same order.
    pub fn scalars_mut(&mut self) -> impl Iterator<Item = &mut f64> + '_ {
        let Self {
            weight_hidden1,
            bias_hidden1,
            weight_hidden2,
            bias_hidden2,
            weight_output,
            bias_out,
        } = self;
        weight_hidden1
            .iter_mut()
            .flatten()
            .chain(bias_hidden1)
            .chain(weight_hidden2.iter_mut().flatten())
            .chain(bias_hidden2)
            .chain(weight_output.iter_mut().flatten())
            .chain(bias_out)
    }
}

/// A genome together with the score it earned in one game instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual {
    pub genome: Genome,
    pub score: u32,
}

impl Individual {
    #[must_use]
    pub fn new(genome: Genome, score: u32) -> Self {
        Self { genome, score }
    }
}
