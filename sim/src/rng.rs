//! Seeded random source for the engine.
//!
//! Every island owns one generator, so runs with the same seed replay
//! exactly and separate islands never share state.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::f64::consts::TAU;

pub type SimRng = ChaCha8Rng;

pub fn seeded(seed: u64) -> SimRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Helpers for the stochastic rules of the annual cycle
pub trait RngExt {
    /// Bernoulli trial. Certain outcomes (p <= 0 or p >= 1) draw nothing.
    fn chance(&mut self, probability: f64) -> bool;

    /// Normal sample via the Box-Muller transform.
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64;
}

impl<R: Rng + ?Sized> RngExt for R {
    fn chance(&mut self, probability: f64) -> bool {
        if probability <= 0.0 || probability.is_nan() {
            false
        } else if probability >= 1.0 {
            true
        } else {
            self.gen::<f64>() < probability
        }
    }

    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        // u1 in (0, 1] keeps the log finite
        let u1 = 1.0 - self.gen::<f64>();
        let u2: f64 = self.gen();
        let z = (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos();
        mean + std_dev * z
    }
}
