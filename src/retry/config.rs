//! Named-field retry configuration, suitable for config files.

use std::time::Duration;

use super::error::RetryError;
use super::policy::{Bound, RetryPolicy};
use crate::backoff::BackoffSpec;

/// Retry settings with named optional fields.
///
/// At most one of `max_attempts` / `retry_for_ms` and at most one of
/// `delay_ms` / `backoff` may be set. Durations are in milliseconds.
///
/// With the `serde` feature this (de)serializes from any serde format:
///
/// ```rust,ignore
/// let config: RetryConfig = serde_json::from_str(r#"{
///     "max_attempts": 5,
///     "backoff": { "kind": "exponential", "max": 30 }
/// }"#)?;
/// ```
///
/// # Examples
///
/// ```rust
/// use retrier::{Bound, RetryConfig, RetryError};
/// use std::time::Duration;
///
/// let config = RetryConfig {
///     retry_for_ms: Some(10_000),
///     delay_ms: Some(250),
///     ..RetryConfig::default()
/// };
/// let policy = config.into_policy().unwrap();
/// assert_eq!(policy.bound(), Bound::Deadline(Duration::from_secs(10)));
///
/// let conflicting = RetryConfig {
///     max_attempts: Some(3),
///     retry_for_ms: Some(1_000),
///     ..RetryConfig::default()
/// };
/// assert_eq!(conflicting.into_policy().unwrap_err(), RetryError::InvalidBoundArgument);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct RetryConfig {
    /// Attempt bound. Negative values count as their absolute value.
    pub max_attempts: Option<i64>,
    /// Deadline bound, in milliseconds.
    pub retry_for_ms: Option<u64>,
    /// Fixed delay, in milliseconds.
    pub delay_ms: Option<u64>,
    /// Backoff curve over time-unit cursors.
    pub backoff: Option<BackoffSpec>,
    /// Length of one time unit in milliseconds. Defaults to one second.
    pub time_unit_ms: Option<u64>,
}

impl RetryConfig {
    /// Resolve into a policy, rejecting conflicting fields.
    pub fn into_policy(self) -> Result<RetryPolicy, RetryError> {
        let bound = match (self.max_attempts, self.retry_for_ms) {
            (Some(_), Some(_)) => return Err(RetryError::InvalidBoundArgument),
            (Some(n), None) => Bound::attempts(n),
            (None, Some(ms)) => Bound::within(Duration::from_millis(ms)),
            (None, None) => Bound::Unbounded,
        };

        let mut policy = RetryPolicy::with_bound(bound);
        if let Some(ms) = self.time_unit_ms {
            policy = policy.with_time_unit(Duration::from_millis(ms));
        }

        match (self.delay_ms, self.backoff) {
            (Some(_), Some(_)) => Err(RetryError::InvalidDelayArgument),
            (Some(ms), None) => Ok(policy.with_delay(Duration::from_millis(ms))),
            (None, Some(spec)) => Ok(policy.with_backoff(spec.to_backoff())),
            (None, None) => Ok(policy),
        }
    }
}

impl TryFrom<RetryConfig> for RetryPolicy {
    type Error = RetryError;

    fn try_from(config: RetryConfig) -> Result<Self, Self::Error> {
        config.into_policy()
    }
}
