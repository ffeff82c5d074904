//! Genetic operators over [`Genome`] parameters.
//!
//! - [`mutate`] perturbs individual scalars
//! - [`crossover`] recombines two parents group by group
//!
//! The two operators work at different granularities. Mutation decides per
//! scalar. Crossover decides per group, where a group is one row of a weight
//! matrix (all outgoing weights of one unit) or one bias element. A row is
//! therefore always inherited whole from a single parent.
//!
//! Both operators draw from a caller-provided generator so that a run seeded once
//! is reproducible end to end.

use rand::Rng;

use crate::genome::Genome;

/// Probability of taking a group from the second parent.
const CROSSOVER_PROBABILITY: f64 = 0.5;

/// Returns a copy of `genome` with random perturbations.
///
/// Each scalar is independently perturbed with probability `rate` by a value drawn
/// uniformly from `[-range, range]`. A `rate` of zero returns an identical genome
/// and a `rate` of one perturbs every scalar.
///
/// # Arguments
///
/// * `genome` - Parent genome, left untouched
/// * `rate` - Per-scalar mutation probability
/// * `range` - Bound of the perturbation (its sign is ignored)
/// * `rng` - Random number generator
#[must_use]
pub fn mutate<R>(genome: &Genome, rate: f64, range: f64, rng: &mut R) -> Genome
where
    R: Rng + ?Sized,
{
    let bound = range.abs();
    let mut child = genome.clone();
    for value in child.scalars_mut() {
        if rng.random::<f64>() < rate {
            *value += bound * (2.0 * rng.random::<f64>() - 1.0);
        }
    }
    child
}

/// Recombines two parents into a new genome.
///
/// The child starts as a copy of `a`; each row of each weight matrix and each bias
/// element is then replaced by the one from `b` with probability 0.5.
#[must_use]
pub fn crossover<R>(a: &Genome, b: &Genome, rng: &mut R) -> Genome
where
    R: Rng + ?Sized,
{
    let mut child = a.clone();
    take_groups(&mut child.weight_hidden1, &b.weight_hidden1, rng);
    take_groups(&mut child.bias_hidden1, &b.bias_hidden1, rng);
    take_groups(&mut child.weight_hidden2, &b.weight_hidden2, rng);
    take_groups(&mut child.bias_hidden2, &b.bias_hidden2, rng);
    take_groups(&mut child.weight_output, &b.weight_output, rng);
    take_groups(&mut child.bias_out, &b.bias_out, rng);
    child
}

fn take_groups<T, R>(dst: &mut [T], src: &[T], rng: &mut R)
where
    T: Copy,
    R: Rng + ?Sized,
{
    for (d, s) in dst.iter_mut().zip(src) {
        if rng.random_bool(CROSSOVER_PROBABILITY) {
            *d = *s;
        }
    }
}
