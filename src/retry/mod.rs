//! Retrying boolean probes.
//!
//! A *probe* is a side-effecting `FnMut() -> bool`: it performs one attempt
//! and returns `true` when it wants to be called again, `false` when it is
//! done. The engine calls it under a [`RetryPolicy`] made of
//!
//! - a [`Bound`]: unbounded, a maximum number of attempts, or a deadline;
//! - a [`Delay`]: a fixed duration, or a [`Backoff`](crate::Backoff)
//!   function over a cursor of time units (one second by default).
//!
//! Each delay is stretched by 10%–30% of random [`Jitter`] before sleeping.
//!
//! # Quick Start
//!
//! ```rust
//! use retrier::{retry, RetryPolicy};
//! use std::time::Duration;
//!
//! let mut pending = 3;
//! let result = retry(
//!     || {
//!         pending -= 1;
//!         pending > 0
//!     },
//!     &RetryPolicy::max_attempts(5).with_delay(Duration::from_millis(1)),
//! );
//!
//! assert!(result.is_ok());
//! ```
//!
//! # Three ways to describe a policy
//!
//! - typed: [`RetryPolicy::max_attempts`], [`RetryPolicy::deadline`],
//!   [`RetryPolicy::with_delay`], [`RetryPolicy::with_backoff`];
//! - positional: [`retry!`](crate::retry!) / [`retry_with_args`], where the
//!   first argument is an attempt count or a duration and the second a
//!   duration or a backoff;
//! - named fields: [`RetryConfig`], (de)serializable with the `serde`
//!   feature.
//!
//! # Error Types
//!
//! - [`RetryError`]: `InvalidBoundArgument` / `InvalidDelayArgument` when the
//!   policy cannot be resolved (the probe never runs), `MaxRetryExceeded` /
//!   `DeadlineExceeded` when it ran out of attempts or time.
//! - [`RetryReport`]: attempts and timing of a finished run.

mod args;
mod config;
mod engine;
mod error;
mod jitter;
mod policy;
mod session;

pub use args::RetryArg;
pub use config::RetryConfig;
pub use engine::Retrier;
pub use error::{RetryError, RetryReport};
pub use jitter::{Jitter, NoJitter, ProportionalJitter};
pub use policy::{Bound, Delay, RetryPolicy, DEFAULT_TIME_UNIT};

/// Call `probe` under `policy` with default jitter and the system clock.
///
/// Blocks the calling thread between attempts.
pub fn retry<P>(probe: P, policy: &RetryPolicy) -> Result<(), RetryError>
where
    P: FnMut() -> bool,
{
    Retrier::new(policy.clone()).run(probe)
}

/// Call `probe` under a policy resolved from positional arguments.
///
/// See [`RetryPolicy::from_args`] for the accepted shapes. On an argument
/// error the probe is not called.
///
/// ```rust
/// use retrier::{retry_with_args, RetryArg, RetryError};
///
/// let mut called = false;
/// let err = retry_with_args(
///     || {
///         called = true;
///         true
///     },
///     &[RetryArg::from("wrong argument"), RetryArg::from(false)],
/// )
/// .unwrap_err();
///
/// assert_eq!(err, RetryError::InvalidBoundArgument);
/// assert!(!called);
/// ```
pub fn retry_with_args<P>(probe: P, args: &[RetryArg]) -> Result<(), RetryError>
where
    P: FnMut() -> bool,
{
    let policy = RetryPolicy::from_args(args)?;
    Retrier::new(policy).run(probe)
}

/// Retry a probe with up to two positional policy arguments.
///
/// - `retry!(probe)`: forever, one second apart;
/// - `retry!(probe, 5)`: at most 5 calls;
/// - `retry!(probe, Duration::from_secs(10))`: for 10 seconds;
/// - `retry!(probe, 5, Duration::from_secs(2))`: fixed delay;
/// - `retry!(probe, Duration::from_secs(10), exponential_backoff(4))`: backoff.
///
/// Each argument goes through [`RetryArg::from`], so anything with a `From`
/// impl is accepted at compile time and classified at run time.
///
/// ```rust
/// use retrier::{backoff::fixed_backoff, retry, RetryError};
/// use std::time::Duration;
///
/// let result = retry!(|| true, -2, Duration::from_millis(1));
/// assert_eq!(result, Err(RetryError::MaxRetryExceeded));
///
/// let result = retry!(|| false, Duration::from_secs(1), fixed_backoff(1));
/// assert!(result.is_ok());
///
/// let result = retry!(|| true, "three");
/// assert_eq!(result, Err(RetryError::InvalidBoundArgument));
/// ```
#[macro_export]
macro_rules! retry {
    ($probe:expr $(,)?) => {
        $crate::retry_with_args($probe, &[])
    };
    ($probe:expr, $($arg:expr),+ $(,)?) => {
        $crate::retry_with_args($probe, &[$($crate::RetryArg::from($arg)),+])
    };
}
