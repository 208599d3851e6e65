//! Jitter: randomized stretching of inter-attempt delays.
//!
//! Jitter keeps independent callers that started retrying at the same
//! moment from hammering a shared resource in lockstep. The engine receives
//! its jitter as a value, so tests can pass [`NoJitter`] (or any closure)
//! and get exact delays.

use std::time::Duration;

use rand::Rng;

/// Turns a computed delay into the duration actually slept.
pub trait Jitter: Send + Sync {
    /// Apply jitter to `delay`.
    fn apply(&self, delay: Duration) -> Duration;
}

impl<F> Jitter for F
where
    F: Fn(Duration) -> Duration + Send + Sync,
{
    fn apply(&self, delay: Duration) -> Duration {
        self(delay)
    }
}

/// Adds a random `[min, max)` fraction of the delay on top of it.
///
/// The default adds between 10% and 30%. The result is never shorter than
/// the input delay.
///
/// ```rust
/// use retrier::{Jitter, ProportionalJitter};
/// use std::time::Duration;
///
/// let jitter = ProportionalJitter::default();
/// let slept = jitter.apply(Duration::from_secs(1));
/// assert!(slept >= Duration::from_millis(1100));
/// assert!(slept <= Duration::from_millis(1300));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProportionalJitter {
    min: f64,
    max: f64,
}

impl ProportionalJitter {
    /// Jitter adding between `min` and `max` of the delay.
    ///
    /// Fractions are clamped to `0.0..=1.0` and swapped if reversed; NaN
    /// counts as `0.0`.
    pub fn new(min: f64, max: f64) -> Self {
        let min = fraction(min);
        let max = fraction(max);
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Smallest added fraction.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest added fraction (exclusive).
    pub fn max(&self) -> f64 {
        self.max
    }
}

impl Default for ProportionalJitter {
    fn default() -> Self {
        Self { min: 0.1, max: 0.3 }
    }
}

fn fraction(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

impl Jitter for ProportionalJitter {
    fn apply(&self, delay: Duration) -> Duration {
        let fraction = if self.min < self.max {
            rand::rng().random_range(self.min..self.max)
        } else {
            self.min
        };
        delay.saturating_add(delay.mul_f64(fraction))
    }
}

/// Identity jitter: sleeps exactly the computed delay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoJitter;

impl Jitter for NoJitter {
    fn apply(&self, delay: Duration) -> Duration {
        delay
    }
}

#[cfg(test)]
mod jitter_tests {
    use super::*;

    #[test]
    fn test_default_adds_ten_to_thirty_percent() {
        let jitter = ProportionalJitter::default();
        let delay = Duration::from_millis(1000);
        for _ in 0..500 {
            let slept = jitter.apply(delay);
            assert!(slept >= Duration::from_millis(1100), "{:?}", slept);
            assert!(slept <= Duration::from_millis(1300), "{:?}", slept);
        }
    }

    #[test]
    fn test_zero_delay_stays_zero() {
        assert_eq!(ProportionalJitter::default().apply(Duration::ZERO), Duration::ZERO);
    }

    #[test]
    fn test_degenerate_range_is_deterministic() {
        let jitter = ProportionalJitter::new(0.5, 0.5);
        assert_eq!(jitter.apply(Duration::from_secs(2)), Duration::from_secs(3));
    }

    #[test]
    fn test_new_clamps_and_orders() {
        let jitter = ProportionalJitter::new(2.0, -1.0);
        assert_eq!(jitter.min(), 0.0);
        assert_eq!(jitter.max(), 1.0);
    }

    #[test]
    fn test_non_finite_fractions_never_panic() {
        let delay = Duration::from_secs(2);
        for (min, max) in [
            (0.1, f64::NAN),
            (f64::NAN, f64::NAN),
            (f64::INFINITY, 0.2),
            (f64::NEG_INFINITY, f64::INFINITY),
        ] {
            let jitter = ProportionalJitter::new(min, max);
            assert!((0.0..=1.0).contains(&jitter.min()));
            assert!((0.0..=1.0).contains(&jitter.max()));
            let stretched = jitter.apply(delay);
            assert!(stretched >= delay);
            assert!(stretched <= delay * 2);
        }

        let jitter = ProportionalJitter::new(f64::NAN, f64::NAN);
        assert_eq!(jitter.apply(delay), delay);
    }

    #[test]
    fn test_no_jitter_is_identity() {
        let delay = Duration::from_millis(1234);
        assert_eq!(NoJitter.apply(delay), delay);
    }

    #[test]
    fn test_closure_is_jitter() {
        let double = |d: Duration| d * 2;
        assert_eq!(double.apply(Duration::from_secs(1)), Duration::from_secs(2));
    }
}
