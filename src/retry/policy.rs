//! Retry policy types and configuration.

use std::time::Duration;

use crate::backoff::Backoff;

/// Duration of one backoff step, and the default fixed delay.
pub const DEFAULT_TIME_UNIT: Duration = Duration::from_secs(1);

/// What stops a run that never succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bound {
    /// Retry until the probe reports success.
    #[default]
    Unbounded,
    /// At most this many probe invocations, the first one included.
    MaxAttempts(u64),
    /// Stop once this much time has passed since the run started.
    Deadline(Duration),
}

impl Bound {
    /// Bound from a signed attempt count.
    ///
    /// Negative counts are taken by absolute value and zero means no bound.
    ///
    /// ```rust
    /// use retrier::Bound;
    ///
    /// assert_eq!(Bound::attempts(-5), Bound::MaxAttempts(5));
    /// assert_eq!(Bound::attempts(0), Bound::Unbounded);
    /// ```
    pub fn attempts(n: i64) -> Self {
        match n.unsigned_abs() {
            0 => Bound::Unbounded,
            n => Bound::MaxAttempts(n),
        }
    }

    /// Bound from a retry window. A zero window means no bound.
    pub fn within(window: Duration) -> Self {
        if window.is_zero() {
            Bound::Unbounded
        } else {
            Bound::Deadline(window)
        }
    }
}

/// How long to wait between attempts, before jitter.
#[derive(Debug, Clone)]
pub enum Delay {
    /// The same duration every time.
    Fixed(Duration),
    /// `cursor := backoff(cursor)`, waiting `cursor` time units.
    Backoff(Backoff),
}

/// A retry policy: one [`Bound`] and one [`Delay`].
///
/// Policies are pure data - they describe retry behavior but don't execute
/// it. Use [`retry`](crate::retry()) or a [`Retrier`](crate::Retrier) to
/// run one.
///
/// # Examples
///
/// ```rust
/// use retrier::{backoff::exponential_backoff, Bound, RetryPolicy};
/// use std::time::Duration;
///
/// // Up to 5 attempts, doubling the wait each time, at most 10 seconds
/// let policy = RetryPolicy::max_attempts(5).with_backoff(exponential_backoff(10));
/// assert_eq!(policy.bound(), Bound::MaxAttempts(5));
///
/// // Keep trying for 30 seconds, every 2 seconds
/// let policy = RetryPolicy::deadline(Duration::from_secs(30))
///     .with_delay(Duration::from_secs(2));
/// assert_eq!(policy.bound(), Bound::Deadline(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    bound: Bound,
    delay: Option<Delay>,
    time_unit: Duration,
}

impl RetryPolicy {
    /// Retry forever, one time unit apart, until the probe succeeds.
    pub fn unbounded() -> Self {
        Self::with_bound(Bound::Unbounded)
    }

    /// Allow at most `|n|` probe invocations. Zero means unbounded.
    pub fn max_attempts(n: i64) -> Self {
        Self::with_bound(Bound::attempts(n))
    }

    /// Keep retrying until `window` has elapsed. Zero means unbounded.
    pub fn deadline(window: Duration) -> Self {
        Self::with_bound(Bound::within(window))
    }

    /// Policy with the given bound and the default delay.
    pub fn with_bound(bound: Bound) -> Self {
        Self {
            bound,
            delay: None,
            time_unit: DEFAULT_TIME_UNIT,
        }
    }

    /// Wait a fixed `delay` between attempts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(Delay::Fixed(delay));
        self
    }

    /// Derive the wait from a backoff function over time-unit cursors.
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.delay = Some(Delay::Backoff(backoff));
        self
    }

    /// Change how long one backoff step lasts.
    ///
    /// This also changes the default fixed delay, which is one time unit.
    ///
    /// ```rust
    /// use retrier::{Delay, RetryPolicy};
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::unbounded().with_time_unit(Duration::from_millis(10));
    /// assert!(matches!(policy.delay(), Delay::Fixed(d) if d == Duration::from_millis(10)));
    /// ```
    pub fn with_time_unit(mut self, unit: Duration) -> Self {
        self.time_unit = unit;
        self
    }

    /// Get the bound.
    pub fn bound(&self) -> Bound {
        self.bound
    }

    /// Get the resolved delay, falling back to one time unit.
    pub fn delay(&self) -> Delay {
        self.delay
            .clone()
            .unwrap_or(Delay::Fixed(self.time_unit))
    }

    /// Get the duration of one backoff step.
    pub fn time_unit(&self) -> Duration {
        self.time_unit
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}

#[cfg(test)]
mod policy_tests {
    use super::*;
    use crate::backoff::exponential_backoff;

    #[test]
    fn test_default_is_unbounded_with_one_second_delay() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.bound(), Bound::Unbounded);
        assert!(matches!(policy.delay(), Delay::Fixed(d) if d == Duration::from_secs(1)));
    }

    #[test]
    fn test_negative_attempts_are_absolute() {
        assert_eq!(RetryPolicy::max_attempts(-5).bound(), Bound::MaxAttempts(5));
        assert_eq!(
            RetryPolicy::max_attempts(-5).bound(),
            RetryPolicy::max_attempts(5).bound()
        );
    }

    #[test]
    fn test_min_attempts_does_not_overflow() {
        assert_eq!(
            Bound::attempts(i64::MIN),
            Bound::MaxAttempts(i64::MIN.unsigned_abs())
        );
    }

    #[test]
    fn test_zero_bounds_are_unbounded() {
        assert_eq!(RetryPolicy::max_attempts(0).bound(), Bound::Unbounded);
        assert_eq!(
            RetryPolicy::deadline(Duration::ZERO).bound(),
            Bound::Unbounded
        );
    }

    #[test]
    fn test_backoff_replaces_default_delay() {
        let policy = RetryPolicy::max_attempts(3).with_backoff(exponential_backoff(4));
        assert!(matches!(policy.delay(), Delay::Backoff(_)));
    }

    #[test]
    fn test_last_delay_setting_wins() {
        let policy = RetryPolicy::unbounded()
            .with_backoff(exponential_backoff(4))
            .with_delay(Duration::from_millis(3));
        assert!(matches!(policy.delay(), Delay::Fixed(d) if d == Duration::from_millis(3)));
    }

    #[test]
    fn test_explicit_delay_ignores_time_unit() {
        let policy = RetryPolicy::unbounded()
            .with_delay(Duration::from_secs(2))
            .with_time_unit(Duration::from_millis(1));
        assert!(matches!(policy.delay(), Delay::Fixed(d) if d == Duration::from_secs(2)));
        assert_eq!(policy.time_unit(), Duration::from_millis(1));
    }

    #[test]
    fn test_policy_is_clone_and_debug() {
        let policy = RetryPolicy::deadline(Duration::from_secs(1));
        let cloned = policy.clone();
        assert_eq!(policy.bound(), cloned.bound());
        assert!(format!("{:?}", cloned).contains("RetryPolicy"));
    }
}
