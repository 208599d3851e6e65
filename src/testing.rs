//! Testing utilities for code that retries.
//!
//! - [`MockClock`]: a manually advanced clock whose `sleep` moves time
//!   forward instantly and remembers every requested sleep.
//! - [`CallRecorder`]: wraps a probe and records when each call happened.
//!
//! # Example
//!
//! ```rust
//! use retrier::testing::{CallRecorder, MockClock};
//! use retrier::{NoJitter, Retrier, RetryError, RetryPolicy};
//! use std::time::Duration;
//!
//! let clock = MockClock::new();
//! let recorder = CallRecorder::with_clock(clock.clone());
//!
//! let result = Retrier::new(RetryPolicy::max_attempts(3).with_delay(Duration::from_secs(2)))
//!     .with_jitter(NoJitter)
//!     .with_clock(clock.clone())
//!     .run(recorder.wrap(|| true));
//!
//! assert_eq!(result, Err(RetryError::MaxRetryExceeded));
//! assert_eq!(recorder.count(), 3);
//! assert_eq!(recorder.gaps(), vec![Duration::from_secs(2); 2]);
//! assert_eq!(clock.elapsed(), Duration::from_secs(4));
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::clock::{Clock, SystemClock};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
struct MockState {
    elapsed: Duration,
    sleeps: Vec<Duration>,
}

/// Deterministic clock for tests.
///
/// Clones share the same timeline, so a test can hand one clone to the
/// engine and keep another to inspect or advance time.
///
/// ```rust
/// use retrier::clock::Clock;
/// use retrier::testing::MockClock;
/// use std::time::Duration;
///
/// let clock = MockClock::new();
/// let start = clock.now();
/// clock.sleep(Duration::from_secs(3));
/// clock.advance(Duration::from_secs(2));
///
/// assert_eq!(clock.now().duration_since(start), Duration::from_secs(5));
/// assert_eq!(clock.sleeps(), vec![Duration::from_secs(3)]);
/// ```
#[derive(Debug, Clone)]
pub struct MockClock {
    origin: Instant,
    state: Arc<Mutex<MockState>>,
}

impl MockClock {
    /// Create a clock frozen at the current real instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            state: Arc::new(Mutex::new(MockState {
                elapsed: Duration::ZERO,
                sleeps: Vec::new(),
            })),
        }
    }

    /// Move time forward without recording a sleep.
    pub fn advance(&self, duration: Duration) {
        let mut state = lock(&self.state);
        state.elapsed += duration;
    }

    /// Total time elapsed on this clock.
    pub fn elapsed(&self) -> Duration {
        lock(&self.state).elapsed
    }

    /// Every duration passed to [`Clock::sleep`], in order.
    pub fn sleeps(&self) -> Vec<Duration> {
        lock(&self.state).sleeps.clone()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.origin + lock(&self.state).elapsed
    }

    fn sleep(&self, duration: Duration) {
        let mut state = lock(&self.state);
        state.elapsed += duration;
        state.sleeps.push(duration);
    }
}

/// Records the instant of every probe call.
///
/// Cloning a recorder shares the recorded calls.
#[derive(Debug, Clone)]
pub struct CallRecorder<C = SystemClock> {
    clock: C,
    calls: Arc<Mutex<Vec<Instant>>>,
}

impl CallRecorder<SystemClock> {
    /// Recorder timestamping with the real clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for CallRecorder<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock + Clone> CallRecorder<C> {
    /// Recorder timestamping with `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Record a call at the clock's current instant.
    pub fn record(&self) {
        let now = self.clock.now();
        lock(&self.calls).push(now);
    }

    /// Wrap a probe so that every invocation is recorded before it runs.
    pub fn wrap<F>(&self, mut probe: F) -> impl FnMut() -> bool
    where
        F: FnMut() -> bool,
    {
        let recorder = self.clone();
        move || {
            recorder.record();
            probe()
        }
    }

    /// Number of recorded calls.
    pub fn count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Recorded call instants, oldest first.
    pub fn calls(&self) -> Vec<Instant> {
        lock(&self.calls).clone()
    }

    /// Time between each pair of consecutive calls.
    pub fn gaps(&self) -> Vec<Duration> {
        lock(&self.calls)
            .windows(2)
            .map(|pair| pair[1].duration_since(pair[0]))
            .collect()
    }
}
