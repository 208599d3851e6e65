//! # Retrier
//!
//! Blocking retry orchestration for side-effecting operations.
//!
//! An operation is expressed as a *probe*: a closure returning `true` when
//! it wants another attempt and `false` when it is done. The engine calls it
//! until it is done or a bound is hit, sleeping between attempts.
//!
//! - **Bounds**: unbounded, at most N attempts, or a deadline.
//! - **Delays**: a fixed duration, or a [`Backoff`] function over the
//!   previous delay (exponential, percentage growth, random range, custom).
//! - **Jitter**: every delay grows by a random 10%–30% so that callers who
//!   started together drift apart. Swap it for [`NoJitter`] in tests.
//!
//! ## Quick Example
//!
//! ```rust
//! use retrier::backoff::exponential_backoff;
//! use retrier::{retry, RetryError, RetryPolicy};
//! use std::time::Duration;
//!
//! // Up to 3 attempts, delays doubling from 2ms and capped at 8ms
//! let policy = RetryPolicy::max_attempts(3)
//!     .with_backoff(exponential_backoff(8))
//!     .with_time_unit(Duration::from_millis(1));
//!
//! let mut attempts = 0;
//! let result = retry(
//!     || {
//!         attempts += 1;
//!         true // still failing
//!     },
//!     &policy,
//! );
//!
//! assert_eq!(result, Err(RetryError::MaxRetryExceeded));
//! assert_eq!(attempts, 3);
//! ```
//!
//! ## Features
//!
//! - `async`: [`Retrier::run_async`] for probes returning futures (tokio).
//! - `tracing`: debug events per retry and a warning when giving up.
//! - `serde`: (de)serialize [`RetryConfig`] and [`backoff::BackoffSpec`].

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod backoff;
pub mod clock;
pub mod retry;
pub mod testing;

// Re-exports
pub use backoff::Backoff;
pub use clock::{Clock, SystemClock};
pub use retry::{
    retry, retry_with_args, Bound, Delay, Jitter, NoJitter, ProportionalJitter, Retrier,
    RetryArg, RetryConfig, RetryError, RetryPolicy, RetryReport,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::backoff::{
        exponential_backoff, fixed_backoff, percentage, random_backoff, Backoff,
    };
    pub use crate::retry::{
        retry, retry_with_args, Bound, Delay, NoJitter, Retrier, RetryArg, RetryError,
        RetryPolicy,
    };
}
