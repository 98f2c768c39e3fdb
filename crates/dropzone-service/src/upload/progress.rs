//! Sources of per-tick upload progress.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Produces the progress increment for each tick, in percentage points.
pub trait ProgressSource: Send + std::fmt::Debug + 'static {
    /// Increment for the next tick.
    fn next_increment(&mut self) -> f64;
}

/// Uniform random increments in `0..max`. A non-finite or non-positive
/// `max` yields zero.
#[derive(Debug)]
pub struct RandomProgress {
    rng: StdRng,
    max: f64,
}

impl RandomProgress {
    /// Random increments up to `max`. A seed makes the sequence repeatable.
    pub fn new(max: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, max }
    }
}

impl ProgressSource for RandomProgress {
    fn next_increment(&mut self) -> f64 {
        if self.max.is_finite() && self.max > 0.0 {
            self.rng.gen_range(0.0..self.max)
        } else {
            0.0
        }
    }
}

/// The same increment on every tick.
#[derive(Debug, Clone, Copy)]
pub struct FixedProgress(pub f64);

impl ProgressSource for FixedProgress {
    fn next_increment(&mut self) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unusable_bounds_yield_zero() {
        for max in [0.0, -5.0, f64::INFINITY, f64::NAN] {
            let mut source = RandomProgress::new(max, Some(1));
            assert_eq!(source.next_increment(), 0.0, "max = {max}");
        }
    }

    #[test]
    fn test_random_stays_in_range() {
        let mut source = RandomProgress::new(20.0, Some(7));
        for _ in 0..1000 {
            let step = source.next_increment();
            assert!((0.0..20.0).contains(&step), "{step}");
        }
    }

    #[test]
    fn test_seeded_is_repeatable() {
        let mut a = RandomProgress::new(20.0, Some(42));
        let mut b = RandomProgress::new(20.0, Some(42));
        for _ in 0..10 {
            assert_eq!(a.next_increment(), b.next_increment());
        }
    }

    #[test]
    fn test_zero_max_never_advances() {
        let mut source = RandomProgress::new(0.0, None);
        assert_eq!(source.next_increment(), 0.0);
    }
}
