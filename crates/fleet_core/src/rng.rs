//! Pluggable random source.
//!
//! Every probabilistic decision (evasion, criticals, content rolls) goes
//! through [`RandomSource`] so tests can substitute a scripted or seeded
//! source and replays are reproducible.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform random numbers in `[0, 1)`.
pub trait RandomSource: Send {
    /// Next draw in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Bernoulli trial.
    fn chance(&mut self, probability: f64) -> bool {
        probability > 0.0 && self.next_f64() < probability
    }
}

/// Default source: ChaCha8 seeded from a `u64`.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    /// Create a source from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed sequence of draws, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    next: usize,
}

impl ScriptedRandom {
    /// Cycle through `values` (an empty list always yields 0.5).
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, next: 0 }
    }

    /// Always return the same draw.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.5;
        }
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}
