//! The attempt loop.

use std::fmt;
use std::time::Duration;

use super::error::{RetryError, RetryReport};
use super::jitter::{Jitter, ProportionalJitter};
use super::policy::RetryPolicy;
use super::session::RetrySession;
use crate::clock::{Clock, SystemClock};

/// Runs probes under a [`RetryPolicy`].
///
/// A probe is any `FnMut() -> bool` where `true` means "try again" and
/// `false` means "done". The first call happens immediately; every later
/// call is preceded by a delay, stretched by the retrier's [`Jitter`] and
/// slept on its [`Clock`].
///
/// Termination:
/// - the probe returns `false` → `Ok(())`;
/// - [`Bound::MaxAttempts(n)`](crate::Bound::MaxAttempts): the n-th call
///   still returns `true` → [`RetryError::MaxRetryExceeded`], without a
///   final delay;
/// - [`Bound::Deadline(d)`](crate::Bound::Deadline): when the probe asks
///   to retry and the clock is already past `start + d` →
///   [`RetryError::DeadlineExceeded`]. The deadline is checked before the
///   delay, so the last call lands after the deadline, at most one delay
///   past it.
///
/// # Examples
///
/// ```rust
/// use retrier::{NoJitter, Retrier, RetryPolicy};
/// use std::time::Duration;
///
/// let mut calls = 0;
/// let result = Retrier::new(RetryPolicy::unbounded().with_delay(Duration::from_millis(1)))
///     .with_jitter(NoJitter)
///     .run(|| {
///         calls += 1;
///         calls < 4
///     });
///
/// assert!(result.is_ok());
/// assert_eq!(calls, 4);
/// ```
pub struct Retrier<J = ProportionalJitter, C = SystemClock> {
    policy: RetryPolicy,
    jitter: J,
    clock: C,
}

impl Retrier {
    /// Retrier with the default 10%–30% jitter and the system clock.
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            jitter: ProportionalJitter::default(),
            clock: SystemClock,
        }
    }
}

impl<J: Jitter, C: Clock> Retrier<J, C> {
    /// Replace the jitter.
    pub fn with_jitter<J2: Jitter>(self, jitter: J2) -> Retrier<J2, C> {
        Retrier {
            policy: self.policy,
            jitter,
            clock: self.clock,
        }
    }

    /// Replace the clock.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> Retrier<J, C2> {
        Retrier {
            policy: self.policy,
            jitter: self.jitter,
            clock,
        }
    }

    /// Get the policy.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `probe` until it returns `false` or the bound is hit.
    pub fn run<P>(&self, probe: P) -> Result<(), RetryError>
    where
        P: FnMut() -> bool,
    {
        self.run_with_report(probe).result
    }

    /// Like [`run`](Self::run), but also report attempts and timing.
    ///
    /// ```rust
    /// use retrier::testing::MockClock;
    /// use retrier::{NoJitter, Retrier, RetryError, RetryPolicy};
    /// use std::time::Duration;
    ///
    /// let report = Retrier::new(RetryPolicy::max_attempts(4).with_delay(Duration::from_secs(1)))
    ///     .with_jitter(NoJitter)
    ///     .with_clock(MockClock::new())
    ///     .run_with_report(|| true);
    ///
    /// assert_eq!(report.attempts, 4);
    /// assert_eq!(report.total_delay, Duration::from_secs(3));
    /// assert_eq!(report.result, Err(RetryError::MaxRetryExceeded));
    /// ```
    pub fn run_with_report<P>(&self, mut probe: P) -> RetryReport
    where
        P: FnMut() -> bool,
    {
        let started_at = self.clock.now();
        let mut session = RetrySession::start(&self.policy, started_at);
        let result = self.drive(&mut session, &mut probe);
        log_outcome(&session, &result);

        session.report(self.clock.now().duration_since(started_at), result)
    }

    fn drive<P>(&self, session: &mut RetrySession, probe: &mut P) -> Result<(), RetryError>
    where
        P: FnMut() -> bool,
    {
        session.record_attempt();
        let mut again = probe();

        while again {
            let delay = self.jitter.apply(session.next_attempt(self.clock.now())?);
            log_retry(session, delay);
            self.clock.sleep(delay);
            session.record_sleep(delay);

            session.record_attempt();
            again = probe();
        }

        Ok(())
    }
}

#[cfg(feature = "async")]
impl<J: Jitter, C: Clock> Retrier<J, C> {
    /// Async variant of [`run`](Self::run) for probes returning futures.
    ///
    /// Sleeps with `tokio::time::sleep` and measures the deadline with
    /// tokio's clock; the retrier's [`Clock`] is not consulted.
    ///
    /// ```rust
    /// use retrier::{NoJitter, Retrier, RetryError, RetryPolicy};
    /// use std::time::Duration;
    ///
    /// # tokio_test::block_on(async {
    /// let retrier = Retrier::new(RetryPolicy::max_attempts(2).with_delay(Duration::from_millis(1)))
    ///     .with_jitter(NoJitter);
    ///
    /// let result = retrier.run_async(|| async { true }).await;
    /// assert_eq!(result, Err(RetryError::MaxRetryExceeded));
    /// # });
    /// ```
    pub async fn run_async<P, Fut>(&self, mut probe: P) -> Result<(), RetryError>
    where
        P: FnMut() -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        let started_at = tokio::time::Instant::now();
        let mut session = RetrySession::start(&self.policy, started_at.into_std());
        let result = self.drive_async(&mut session, &mut probe).await;
        log_outcome(&session, &result);
        result
    }

    async fn drive_async<P, Fut>(
        &self,
        session: &mut RetrySession,
        probe: &mut P,
    ) -> Result<(), RetryError>
    where
        P: FnMut() -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        session.record_attempt();
        let mut again = probe().await;

        while again {
            let now = tokio::time::Instant::now().into_std();
            let delay = self.jitter.apply(session.next_attempt(now)?);
            log_retry(session, delay);
            tokio::time::sleep(delay).await;
            session.record_sleep(delay);

            session.record_attempt();
            again = probe().await;
        }

        Ok(())
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn log_retry(session: &RetrySession, delay: Duration) {
    #[cfg(feature = "tracing")]
    tracing::debug!(
        attempt = session.attempts(),
        delay_ms = delay.as_millis() as u64,
        "probe asked to retry"
    );
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn log_outcome(session: &RetrySession, result: &Result<(), RetryError>) {
    #[cfg(feature = "tracing")]
    if let Err(e) = result {
        tracing::warn!(attempts = session.attempts(), error = %e, "giving up on retry");
    }
}

impl<J, C> fmt::Debug for Retrier<J, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retrier")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<J: Clone, C: Clone> Clone for Retrier<J, C> {
    fn clone(&self) -> Self {
        Self {
            policy: self.policy.clone(),
            jitter: self.jitter.clone(),
            clock: self.clock.clone(),
        }
    }
}
