//! Forward pass of the fixed-topology network and action selection.
//!
//! ```text
//! features (24) ─▶ hidden1 (18, ReLU) ─▶ hidden2 (18, ReLU)
//!                       │
//!                       └──────────────▶ output (4, Softmax) ─▶ Direction
//! ```
//!
//! The output layer is wired to the first hidden layer. `hidden2` is still
//! computed and returned by [`Genome::forward`] for inspection, but it does not
//! influence the chosen direction. Existing brain files were evolved against this
//! wiring.

use neurosnake_engine::Direction;

use crate::{
    activation::{relu, softmax},
    genome::{Genome, HIDDEN1, HIDDEN2, INPUTS, OUTPUTS},
};

/// Sensor input of the network.
pub type Features = [f64; INPUTS];

/// Direction associated with each output unit.
pub const OUTPUT_DIRECTIONS: [Direction; OUTPUTS] = [
    Direction::Right,
    Direction::Left,
    Direction::Up,
    Direction::Down,
];

// The output weights are shaped for `hidden2` but fed from `hidden1`.
const _: () = assert!(HIDDEN1 == HIDDEN2);

/// Activations of every layer produced by one forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Activations {
    pub hidden1: [f64; HIDDEN1],
    pub hidden2: [f64; HIDDEN2],
    pub output: [f64; OUTPUTS],
}

impl Activations {
    /// Direction of the strongest output unit.
    #[must_use]
    pub fn direction(&self) -> Direction {
        select_direction(&self.output)
    }
}

impl Genome {
    /// Runs the network on `input`.
    ///
    /// Pure and deterministic: the same genome and input always produce
    /// bit-identical activations.
    #[must_use]
    pub fn forward(&self, input: &Features) -> Activations {
        let hidden1 = dense(input, &self.weight_hidden1, &self.bias_hidden1).map(relu);
        let hidden2 = dense(&hidden1, &self.weight_hidden2, &self.bias_hidden2).map(relu);
        let output = softmax(&dense(&hidden1, &self.weight_output, &self.bias_out));
        Activations {
            hidden1,
            hidden2,
            output,
        }
    }

    /// Action probabilities for `input`.
    #[must_use]
    pub fn predict(&self, input: &Features) -> [f64; OUTPUTS] {
        self.forward(input).output
    }
}

/// Index of the largest probability mapped through [`OUTPUT_DIRECTIONS`].
///
/// The first index wins ties.
#[must_use]
pub fn select_direction(output: &[f64; OUTPUTS]) -> Direction {
    let mut best = 0;
    for (i, &value) in output.iter().enumerate().skip(1) {
        if value > output[best] {
            best = i;
        }
    }
    OUTPUT_DIRECTIONS[best]
}

/// `bias + Σ input[i] * weights[i]`, accumulated in input order.
fn dense<const I: usize, const O: usize>(
    input: &[f64; I],
    weights: &[[f64; O]; I],
    bias: &[f64; O],
) -> [f64; O] {
    let mut sum = *bias;
    for (&x, row) in input.iter().zip(weights) {
        for (acc, &w) in sum.iter_mut().zip(row) {
            *acc += x * w;
        }
    }
    sum
}
