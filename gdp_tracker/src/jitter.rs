//! Bounded random perturbation applied to fetched baselines.
//!
//! The original data feed reports one value per year, so the tracker
//! fabricates visible movement: every cycle each baseline is nudged by a
//! uniform draw from `[-amplitude, +amplitude]` of itself. The RNG lives
//! inside [`Jitter`] (no thread-local state), which is what makes seeded,
//! reproducible runs possible.

use rand::{Rng, SeedableRng, rngs::StdRng};

/// Default relative amplitude: ±1% of the baseline per cycle.
pub const DEFAULT_AMPLITUDE: f64 = 0.01;

/// Uniform relative perturbation with an owned RNG stream.
#[derive(Debug)]
pub struct Jitter {
    amplitude: f64,
    rng: StdRng,
}

impl Jitter {
    /// Jitter with an OS-seeded RNG.
    ///
    /// `amplitude` is the relative half-width of the perturbation band and
    /// must be a finite value in `[0, 1)`.
    pub fn new(amplitude: f64) -> Self {
        Self {
            amplitude,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Jitter with a deterministic RNG stream. Same seed, same sequence.
    pub fn seeded(amplitude: f64, seed: u64) -> Self {
        Self {
            amplitude,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Perturb one baseline: `baseline + baseline * u` with
    /// `u ~ U(-amplitude, +amplitude)`, drawn fresh per call.
    ///
    /// A zero baseline passes through as exactly `0.0`.
    pub fn apply(&mut self, baseline: f64) -> f64 {
        let u = self.rng.random_range(-self.amplitude..=self.amplitude);
        baseline + baseline * u
    }

    /// The configured relative half-width.
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_baseline_stays_zero() {
        let mut jitter = Jitter::seeded(DEFAULT_AMPLITUDE, 7);
        for _ in 0..100 {
            assert_eq!(jitter.apply(0.0), 0.0);
        }
    }

    #[test]
    fn draws_stay_inside_the_band() {
        let baseline = 3.9e12;
        for seed in 0..10 {
            let mut jitter = Jitter::seeded(DEFAULT_AMPLITUDE, seed);
            for _ in 0..1000 {
                let v = jitter.apply(baseline);
                assert!(v >= baseline * 0.99, "below band: {v}");
                assert!(v <= baseline * 1.01, "above band: {v}");
            }
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = Jitter::seeded(DEFAULT_AMPLITUDE, 42);
        let mut b = Jitter::seeded(DEFAULT_AMPLITUDE, 42);
        for _ in 0..50 {
            assert_eq!(a.apply(1.0), b.apply(1.0));
        }
    }

    #[test]
    fn zero_amplitude_is_an_identity() {
        let mut jitter = Jitter::seeded(0.0, 1);
        assert_eq!(jitter.apply(123.45), 123.45);
    }
}
