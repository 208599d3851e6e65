//! Positional, loosely-typed retry arguments.
//!
//! Some callers build retry settings from dynamic sources (scripting layers,
//! command lines, ported call sites) where the shape is "probe, then up to
//! two values of whatever type". [`RetryArg`] is the closed set of values such
//! a list can hold, and [`RetryPolicy::from_args`] turns the list into a
//! policy or rejects it.
//!
//! | position | accepted                          | otherwise                 |
//! |----------|-----------------------------------|---------------------------|
//! | first    | integer (attempts), duration (deadline) | `InvalidBoundArgument` |
//! | second   | duration (fixed delay), backoff   | `InvalidDelayArgument`    |
//!
//! Anything after the second argument is ignored.

use std::time::Duration;

use super::error::RetryError;
use super::policy::{Bound, RetryPolicy};
use crate::backoff::Backoff;

/// One positional argument to a retry call.
#[derive(Debug, Clone)]
pub enum RetryArg {
    /// Any integer.
    Int(i64),
    /// Any float. Never a valid bound or delay.
    Float(f64),
    /// A boolean. Never a valid bound or delay.
    Bool(bool),
    /// Text. Never a valid bound or delay.
    Text(String),
    /// A duration: a deadline in first position, a fixed delay in second.
    Duration(Duration),
    /// A backoff function, only valid in second position.
    Backoff(Backoff),
}

macro_rules! int_arg {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for RetryArg {
                fn from(n: $ty) -> Self {
                    RetryArg::Int(i64::from(n))
                }
            }
        )*
    };
}

// Unsigned widths that fit in `i64` are attempt counts as well.
int_arg!(i8, i16, i32, i64, u8, u16, u32);

impl From<isize> for RetryArg {
    fn from(n: isize) -> Self {
        RetryArg::Int(n as i64)
    }
}

impl From<f32> for RetryArg {
    fn from(x: f32) -> Self {
        RetryArg::Float(f64::from(x))
    }
}

impl From<f64> for RetryArg {
    fn from(x: f64) -> Self {
        RetryArg::Float(x)
    }
}

impl From<bool> for RetryArg {
    fn from(b: bool) -> Self {
        RetryArg::Bool(b)
    }
}

impl From<&str> for RetryArg {
    fn from(s: &str) -> Self {
        RetryArg::Text(s.to_string())
    }
}

impl From<String> for RetryArg {
    fn from(s: String) -> Self {
        RetryArg::Text(s)
    }
}

impl From<Duration> for RetryArg {
    fn from(d: Duration) -> Self {
        RetryArg::Duration(d)
    }
}

impl From<Backoff> for RetryArg {
    fn from(b: Backoff) -> Self {
        RetryArg::Backoff(b)
    }
}

impl From<fn(u64) -> u64> for RetryArg {
    fn from(f: fn(u64) -> u64) -> Self {
        RetryArg::Backoff(Backoff::from(f))
    }
}

impl RetryPolicy {
    /// Resolve a positional argument list into a policy.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use retrier::{Bound, RetryArg, RetryError, RetryPolicy};
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::from_args(&[RetryArg::from(-3), Duration::from_secs(2).into()])
    ///     .unwrap();
    /// assert_eq!(policy.bound(), Bound::MaxAttempts(3));
    ///
    /// let err = RetryPolicy::from_args(&["three".into()]).unwrap_err();
    /// assert_eq!(err, RetryError::InvalidBoundArgument);
    ///
    /// let err = RetryPolicy::from_args(&[3.into(), false.into()]).unwrap_err();
    /// assert_eq!(err, RetryError::InvalidDelayArgument);
    /// ```
    pub fn from_args(args: &[RetryArg]) -> Result<Self, RetryError> {
        let policy = match args.first() {
            None => return Ok(RetryPolicy::unbounded()),
            Some(RetryArg::Int(n)) => RetryPolicy::with_bound(Bound::attempts(*n)),
            Some(RetryArg::Duration(d)) => RetryPolicy::with_bound(Bound::within(*d)),
            Some(_) => return Err(RetryError::InvalidBoundArgument),
        };

        match args.get(1) {
            None => Ok(policy),
            Some(RetryArg::Duration(d)) => Ok(policy.with_delay(*d)),
            Some(RetryArg::Backoff(b)) => Ok(policy.with_backoff(b.clone())),
            Some(_) => Err(RetryError::InvalidDelayArgument),
        }
    }
}
