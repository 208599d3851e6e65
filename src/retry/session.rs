//! Per-run retry state.

use std::time::{Duration, Instant};

use super::error::{RetryError, RetryReport};
use super::policy::{Bound, Delay, RetryPolicy};

/// Mutable state of a single retry run.
///
/// Created when a run starts and dropped when it ends; never shared.
#[derive(Debug)]
pub(crate) struct RetrySession {
    bound: Bound,
    remaining: u64,
    deadline: Option<Instant>,
    delay: Delay,
    time_unit: Duration,
    last_delay: u64,
    attempts: u64,
    total_delay: Duration,
}

impl RetrySession {
    pub(crate) fn start(policy: &RetryPolicy, started_at: Instant) -> Self {
        let bound = policy.bound();
        let (remaining, deadline) = match bound {
            Bound::Unbounded => (0, None),
            Bound::MaxAttempts(n) => (n, None),
            // An unrepresentable deadline is one that never arrives.
            Bound::Deadline(window) => (0, started_at.checked_add(window)),
        };

        Self {
            bound,
            remaining,
            deadline,
            delay: policy.delay(),
            time_unit: policy.time_unit(),
            last_delay: 0,
            attempts: 0,
            total_delay: Duration::ZERO,
        }
    }

    /// Count one probe invocation.
    pub(crate) fn record_attempt(&mut self) {
        self.attempts += 1;
    }

    /// Count one sleep between attempts.
    pub(crate) fn record_sleep(&mut self, slept: Duration) {
        self.total_delay = self.total_delay.saturating_add(slept);
    }

    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    pub(crate) fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Spend one attempt from the budget before delaying.
    ///
    /// A budget of N allows N probe invocations: the first call is free and
    /// the budget runs out when the N-th call still asks to retry.
    pub(crate) fn check_attempts(&mut self) -> Result<(), RetryError> {
        if let Bound::MaxAttempts(_) = self.bound {
            self.remaining = self.remaining.saturating_sub(1);
            if self.remaining == 0 {
                return Err(RetryError::MaxRetryExceeded);
            }
        }
        Ok(())
    }

    /// Fail once `now` is strictly past the deadline.
    pub(crate) fn check_deadline(&self, now: Instant) -> Result<(), RetryError> {
        match self.deadline {
            Some(deadline) if now > deadline => Err(RetryError::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Decide whether another attempt may run after one that asked to retry.
    ///
    /// Both bounds are checked before delaying; on success returns the delay
    /// to wait, before jitter.
    pub(crate) fn next_attempt(&mut self, now: Instant) -> Result<Duration, RetryError> {
        self.check_attempts()?;
        self.check_deadline(now)?;
        Ok(self.next_delay())
    }

    /// The delay before the next attempt, before jitter.
    ///
    /// Advances the backoff cursor when a backoff function is configured.
    pub(crate) fn next_delay(&mut self) -> Duration {
        if self.last_delay == 0 {
            self.last_delay = 1;
        }
        match &self.delay {
            Delay::Fixed(delay) => *delay,
            Delay::Backoff(backoff) => {
                self.last_delay = backoff.next(self.last_delay);
                units(self.time_unit, self.last_delay)
            }
        }
    }

    pub(crate) fn report(&self, elapsed: Duration, result: Result<(), RetryError>) -> RetryReport {
        RetryReport {
            attempts: self.attempts,
            total_delay: self.total_delay,
            elapsed,
            result,
        }
    }
}

/// `unit * n`, saturating at the largest whole-nanosecond duration.
fn units(unit: Duration, n: u64) -> Duration {
    let nanos = unit.as_nanos().saturating_mul(u128::from(n));
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}
