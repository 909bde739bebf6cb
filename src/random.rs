//! Random source helpers.
//!
//! Every stochastic routine in the crate takes an explicit `R: Rng`
//! argument. These helpers create per-instance generators and provide
//! the few sampling primitives the placement code needs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Creates a deterministic generator from a seed.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Creates a generator from an optional seed, drawing a fresh seed from
/// the thread-local generator when none is given.
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => create_rng(seed),
        None => create_rng(rand::random()),
    }
}

/// Samples uniformly from `[0, max]`. Returns 0 when `max <= 0`.
pub fn uniform_upto<R: Rng>(rng: &mut R, max: f64) -> f64 {
    if max > 0.0 {
        rng.random_range(0.0..=max)
    } else {
        0.0
    }
}

/// Samples from a normal distribution with mean 0 and the given scale.
pub fn gaussian<R: Rng>(rng: &mut R, scale: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    z * scale
}

/// Picks two distinct indices from `0..n`. Requires `n >= 2`.
pub fn distinct_pair<R: Rng>(rng: &mut R, n: usize) -> (usize, usize) {
    debug_assert!(n >= 2);
    let i = rng.random_range(0..n);
    let mut j = rng.random_range(0..n - 1);
    if j >= i {
        j += 1;
    }
    (i, j)
}
