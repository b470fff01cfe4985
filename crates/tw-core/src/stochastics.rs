//! Stochastics service consumed by probability-weighted parameter sampling.
//!
//! The world layer itself is deterministic; spawners and driver models draw
//! their randomness through the [`Stochastics`] trait so the host can swap in
//! its own service.  [`SeededStochastics`] is the default, a `SmallRng`
//! seeded from `WorldConfig::seed` so repeated runs are reproducible.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::{CoreError, CoreResult};

/// Opaque distribution sampling.
pub trait Stochastics {
    /// Uniform draw in `[low, high)`.  Returns `low` when the range is empty.
    fn uniform(&mut self, low: f64, high: f64) -> f64;

    /// Normal draw with the given mean and standard deviation.
    fn normal(&mut self, mean: f64, std_dev: f64) -> f64;

    /// Exponential draw with rate `lambda`.
    fn exponential(&mut self, lambda: f64) -> f64;

    /// Log-normal draw; `mu` and `sigma` parameterise the underlying normal.
    fn log_normal(&mut self, mu: f64, sigma: f64) -> f64 {
        self.normal(mu, sigma).exp()
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    fn bool(&mut self, p: f64) -> bool {
        self.uniform(0.0, 1.0) < p.clamp(0.0, 1.0)
    }
}

/// Deterministic [`Stochastics`] implementation.
pub struct SeededStochastics(SmallRng);

impl SeededStochastics {
    pub fn new(seed: u64) -> Self {
        SeededStochastics(SmallRng::seed_from_u64(seed))
    }

    /// Uniform draw in (0, 1], safe to take the logarithm of.
    #[inline]
    fn open_unit(&mut self) -> f64 {
        1.0 - self.0.r#gen::<f64>()
    }
}

// `rand` is the only randomness dependency (no `rand_distr`); the normal and
// exponential draws are computed directly from uniform samples.
impl Stochastics for SeededStochastics {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if !(high > low) {
            return low;
        }
        self.0.gen_range(low..high)
    }

    fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        // Box–Muller.
        let u1 = self.open_unit();
        let u2 = self.0.r#gen::<f64>();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn exponential(&mut self, lambda: f64) -> f64 {
        -self.open_unit().ln() / lambda
    }
}

/// Draw one element from a probability-weighted list.
///
/// Weights need not sum to one; they are normalised.  Fails on an empty list,
/// on negative weights, or when every weight is zero.
pub fn sample_weighted<'a, T>(
    stochastics: &mut dyn Stochastics,
    items: &'a [(T, f64)],
) -> CoreResult<&'a T> {
    if items.iter().any(|(_, w)| *w < 0.0 || !w.is_finite()) {
        return Err(CoreError::Weights("weights must be finite and non-negative".into()));
    }
    let total: f64 = items.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return Err(CoreError::Weights("weights sum to zero".into()));
    }

    let mut roll = stochastics.uniform(0.0, total);
    for (item, weight) in items {
        if roll < *weight {
            return Ok(item);
        }
        roll -= weight;
    }
    // Floating-point residue: fall back to the last positively weighted item.
    items
        .iter()
        .rev()
        .find(|(_, w)| *w > 0.0)
        .map(|(item, _)| item)
        .ok_or_else(|| CoreError::Weights("weights sum to zero".into()))
}
