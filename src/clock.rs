//! Time source and suspension point for the retry engine.
//!
//! The engine never calls [`Instant::now`] or [`std::thread::sleep`]
//! directly; it goes through a [`Clock`]. Production code uses
//! [`SystemClock`]; tests can swap in [`MockClock`](crate::testing::MockClock)
//! and observe deadlines and delays without real time passing.

use std::time::{Duration, Instant};

/// Source of monotonic time plus a way to block for a while.
pub trait Clock: Send + Sync {
    /// Current monotonic instant.
    fn now(&self) -> Instant;

    /// Block the calling thread for `duration`.
    fn sleep(&self, duration: Duration);
}

/// The real clock: [`Instant::now`] and [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}
