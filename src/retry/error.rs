//! Error types for retry operations.

use std::time::Duration;

/// Why a retry run stopped without the probe reporting success.
///
/// Every variant is a stateless sentinel: compare with `==` rather than
/// inspecting the message.
///
/// # Examples
///
/// ```rust
/// use retrier::{retry, RetryError, RetryPolicy};
/// use std::time::Duration;
///
/// let policy = RetryPolicy::max_attempts(2).with_delay(Duration::from_millis(1));
///
/// match retry(|| true, &policy) {
///     Err(RetryError::MaxRetryExceeded) => {}
///     other => panic!("unexpected {:?}", other),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetryError {
    /// The bound argument was neither an attempt count nor a duration.
    InvalidBoundArgument,
    /// The delay argument was neither a duration nor a backoff function.
    InvalidDelayArgument,
    /// The deadline passed while the probe still asked to retry.
    DeadlineExceeded,
    /// The attempt budget ran out while the probe still asked to retry.
    MaxRetryExceeded,
}

impl RetryError {
    /// Returns true if the policy could not be resolved from its arguments.
    ///
    /// The probe is never invoked in this case.
    pub fn is_argument_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidBoundArgument | Self::InvalidDelayArgument
        )
    }

    /// Returns true if the probe ran but never reported success in time.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::DeadlineExceeded | Self::MaxRetryExceeded)
    }
}

impl std::fmt::Display for RetryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::InvalidBoundArgument => {
                "invalid argument type: max retries must be an integer or a duration"
            }
            Self::InvalidDelayArgument => {
                "invalid argument type: delay must be a duration or a backoff function"
            }
            Self::DeadlineExceeded => "retry deadline has been exceeded",
            Self::MaxRetryExceeded => "maximum retry has been exceeded",
        };
        f.write_str(message)
    }
}

impl std::error::Error for RetryError {}

/// Summary of a finished retry run.
///
/// Returned by [`Retrier::run_with_report`](crate::Retrier::run_with_report)
/// for callers that want to know how the run went, not only whether it
/// succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryReport {
    /// How many times the probe was invoked.
    pub attempts: u64,
    /// Sum of all sleeps between attempts (jitter included).
    pub total_delay: Duration,
    /// Wall time from session start to termination.
    pub elapsed: Duration,
    /// `Ok(())` if the probe reported success.
    pub result: Result<(), RetryError>,
}

impl RetryReport {
    /// Returns true if the probe eventually reported success.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Discard the metadata and keep the outcome.
    pub fn into_result(self) -> Result<(), RetryError> {
        self.result
    }
}

impl std::fmt::Display for RetryReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.result {
            Ok(()) => write!(
                f,
                "succeeded after {} attempts ({:?})",
                self.attempts, self.elapsed
            ),
            Err(e) => write!(
                f,
                "gave up after {} attempts ({:?}): {}",
                self.attempts, self.elapsed, e
            ),
        }
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_errors_compare_by_identity() {
        assert_eq!(RetryError::DeadlineExceeded, RetryError::DeadlineExceeded);
        assert_ne!(RetryError::DeadlineExceeded, RetryError::MaxRetryExceeded);
        assert_ne!(
            RetryError::InvalidBoundArgument,
            RetryError::InvalidDelayArgument
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(RetryError::InvalidBoundArgument.is_argument_error());
        assert!(RetryError::InvalidDelayArgument.is_argument_error());
        assert!(!RetryError::MaxRetryExceeded.is_argument_error());

        assert!(RetryError::DeadlineExceeded.is_exhausted());
        assert!(RetryError::MaxRetryExceeded.is_exhausted());
        assert!(!RetryError::InvalidDelayArgument.is_exhausted());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            RetryError::DeadlineExceeded.to_string(),
            "retry deadline has been exceeded"
        );
        assert_eq!(
            RetryError::MaxRetryExceeded.to_string(),
            "maximum retry has been exceeded"
        );
        assert!(RetryError::InvalidBoundArgument
            .to_string()
            .contains("max retries"));
        assert!(RetryError::InvalidDelayArgument
            .to_string()
            .contains("backoff function"));
    }

    #[test]
    fn test_error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(RetryError::MaxRetryExceeded);
        assert!(err.source().is_none());
    }

    #[test]
    fn test_report_display() {
        let report = RetryReport {
            attempts: 3,
            total_delay: Duration::from_millis(20),
            elapsed: Duration::from_millis(25),
            result: Err(RetryError::MaxRetryExceeded),
        };
        let display = report.to_string();
        assert!(display.contains("3 attempts"));
        assert!(display.contains("maximum retry"));
        assert!(!report.is_success());
        assert_eq!(report.into_result(), Err(RetryError::MaxRetryExceeded));
    }
}
