//! Backoff functions: pure maps from the previous delay cursor to the next.
//!
//! A cursor is a whole number of *time units* (one second unless the policy
//! says otherwise). Backoff values are stateless: the cursor is owned by the
//! retry session that calls them, so a single [`Backoff`] can be cloned and
//! shared between any number of independent retries.
//!
//! # Examples
//!
//! ```rust
//! use retrier::backoff::exponential_backoff;
//!
//! let backoff = exponential_backoff(10);
//!
//! let mut cursor = 1;
//! let mut seen = vec![cursor];
//! for _ in 0..5 {
//!     cursor = backoff.next(cursor);
//!     seen.push(cursor);
//! }
//!
//! assert_eq!(seen, vec![1, 2, 4, 8, 10, 10]);
//! ```

use std::fmt;
use std::sync::Arc;

use rand::Rng;

/// A shareable backoff function `previous cursor -> next cursor`.
///
/// Construct one with [`Backoff::new`] for custom curves, or use the
/// provided constructors ([`Backoff::fixed`], [`Backoff::random`],
/// [`Backoff::exponential`], [`Backoff::percentage`]).
#[derive(Clone)]
pub struct Backoff {
    func: Arc<dyn Fn(u64) -> u64 + Send + Sync>,
    label: &'static str,
}

impl Backoff {
    /// Wrap an arbitrary function as a backoff.
    ///
    /// ```rust
    /// use retrier::Backoff;
    ///
    /// let linear = Backoff::new(|last| last + 1);
    /// assert_eq!(linear.next(3), 4);
    /// ```
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(u64) -> u64 + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            label: "custom",
        }
    }

    fn labeled<F>(label: &'static str, func: F) -> Self
    where
        F: Fn(u64) -> u64 + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            label,
        }
    }

    /// Always returns `value`, whatever the previous cursor was.
    pub fn fixed(value: u64) -> Self {
        Self::labeled("fixed", move |_| value)
    }

    /// Uniformly random cursor in `[lower, upper]` (both inclusive).
    ///
    /// Bounds given in the wrong order are swapped.
    ///
    /// ```rust
    /// use retrier::Backoff;
    ///
    /// let backoff = Backoff::random(2, 7);
    /// for _ in 0..100 {
    ///     let next = backoff.next(1);
    ///     assert!((2..=7).contains(&next));
    /// }
    /// ```
    pub fn random(lower: u64, upper: u64) -> Self {
        let (lower, upper) = if lower <= upper {
            (lower, upper)
        } else {
            (upper, lower)
        };
        Self::labeled("random", move |_| rand::rng().random_range(lower..=upper))
    }

    /// Doubles the previous cursor, capped at `max`.
    pub fn exponential(max: u64) -> Self {
        Self::labeled("exponential", move |last| last.saturating_mul(2).min(max))
    }

    /// Grows the previous cursor by `percent` percent, capped at `max`.
    ///
    /// The result is truncated toward zero, so small cursors with small
    /// percentages may not grow at all.
    ///
    /// ```rust
    /// use retrier::Backoff;
    ///
    /// let backoff = Backoff::percentage(50.0, 20);
    /// assert_eq!(backoff.next(4), 6);
    /// assert_eq!(backoff.next(6), 9);
    /// assert_eq!(backoff.next(16), 20);
    /// assert_eq!(backoff.next(1), 1);
    /// ```
    pub fn percentage(percent: f64, max: u64) -> Self {
        Self::labeled("percentage", move |last| {
            let last = last as f64;
            let grown = last + last * percent / 100.0;
            // `as` saturates: NaN and negatives become 0, huge values u64::MAX.
            (grown as u64).min(max)
        })
    }

    /// Compute the next cursor from the previous one.
    pub fn next(&self, last: u64) -> u64 {
        (self.func)(last)
    }
}

impl fmt::Debug for Backoff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Backoff")
            .field("kind", &self.label)
            .finish_non_exhaustive()
    }
}

impl From<fn(u64) -> u64> for Backoff {
    fn from(func: fn(u64) -> u64) -> Self {
        Backoff::new(func)
    }
}

/// Uniformly random backoff in `[lower, upper]`. See [`Backoff::random`].
pub fn random_backoff(lower: u64, upper: u64) -> Backoff {
    Backoff::random(lower, upper)
}

/// Doubling backoff capped at `max`. See [`Backoff::exponential`].
pub fn exponential_backoff(max: u64) -> Backoff {
    Backoff::exponential(max)
}

/// Percentage growth backoff capped at `max`. See [`Backoff::percentage`].
pub fn percentage(percent: f64, max: u64) -> Backoff {
    Backoff::percentage(percent, max)
}

/// Constant backoff. See [`Backoff::fixed`].
pub fn fixed_backoff(value: u64) -> Backoff {
    Backoff::fixed(value)
}

/// Declarative description of a built-in backoff, for configuration files.
///
/// ```rust
/// use retrier::backoff::BackoffSpec;
///
/// let backoff = BackoffSpec::Exponential { max: 8 }.to_backoff();
/// assert_eq!(backoff.next(4), 8);
/// assert_eq!(backoff.next(8), 8);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum BackoffSpec {
    /// Constant cursor.
    Fixed {
        /// The cursor returned on every call.
        value: u64,
    },
    /// Random cursor within an inclusive range.
    Random {
        /// Smallest cursor.
        lower: u64,
        /// Largest cursor.
        upper: u64,
    },
    /// Doubling cursor.
    Exponential {
        /// Cap on the cursor.
        max: u64,
    },
    /// Percentage growth.
    Percentage {
        /// Growth per step, in percent.
        percent: f64,
        /// Cap on the cursor.
        max: u64,
    },
}

impl BackoffSpec {
    /// Build the backoff function this spec describes.
    pub fn to_backoff(&self) -> Backoff {
        match *self {
            BackoffSpec::Fixed { value } => Backoff::fixed(value),
            BackoffSpec::Random { lower, upper } => Backoff::random(lower, upper),
            BackoffSpec::Exponential { max } => Backoff::exponential(max),
            BackoffSpec::Percentage { percent, max } => Backoff::percentage(percent, max),
        }
    }
}
