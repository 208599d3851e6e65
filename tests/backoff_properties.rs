//! Property-based tests for backoff functions and attempt bounds

use proptest::prelude::*;
use retrier::backoff::{exponential_backoff, fixed_backoff, percentage, random_backoff};
use retrier::testing::MockClock;
use retrier::{Bound, NoJitter, Retrier, RetryError, RetryPolicy};

proptest! {
    #[test]
    fn prop_random_backoff_within_closed_range(
        lower in 0u64..1_000,
        span in 0u64..1_000,
        last in any::<u64>(),
    ) {
        let upper = lower + span;
        let next = random_backoff(lower, upper).next(last);
        prop_assert!(next >= lower && next <= upper);
    }

    #[test]
    fn prop_random_backoff_2_7(last in any::<u64>()) {
        let backoff = random_backoff(2, 7);
        for _ in 0..20 {
            let next = backoff.next(last);
            prop_assert!((2..=7).contains(&next));
        }
    }

    #[test]
    fn prop_exponential_is_monotonic_and_capped(cap in 1u64..10_000, steps in 1usize..64) {
        let backoff = exponential_backoff(cap);
        let mut cursor = 1u64;
        for _ in 0..steps {
            let next = backoff.next(cursor);
            prop_assert!(next <= cap);
            prop_assert!(next >= cursor.min(cap));
            cursor = next;
        }
    }

    #[test]
    fn prop_percentage_never_exceeds_cap(
        pct in 0.0f64..500.0,
        cap in 0u64..10_000,
        last in 0u64..10_000,
    ) {
        let next = percentage(pct, cap).next(last);
        prop_assert!(next <= cap);
        if last <= cap {
            prop_assert!(next >= last.min(cap));
        }
    }

    #[test]
    fn prop_fixed_ignores_input(value in any::<u64>(), last in any::<u64>()) {
        prop_assert_eq!(fixed_backoff(value).next(last), value);
    }

    #[test]
    fn prop_negative_attempts_match_positive(n in 1i64..40) {
        prop_assert_eq!(
            RetryPolicy::max_attempts(-n).bound(),
            RetryPolicy::max_attempts(n).bound()
        );
        prop_assert_eq!(RetryPolicy::max_attempts(n).bound(), Bound::MaxAttempts(n as u64));
    }

    #[test]
    fn prop_always_retrying_probe_runs_exactly_n_times(n in 1i64..40) {
        let mut calls = 0i64;
        let result = Retrier::new(RetryPolicy::max_attempts(n))
            .with_jitter(NoJitter)
            .with_clock(MockClock::new())
            .run(|| {
                calls += 1;
                true
            });

        prop_assert_eq!(result, Err(RetryError::MaxRetryExceeded));
        prop_assert_eq!(calls, n);
    }

    #[test]
    fn prop_unbounded_runs_k_plus_one_times(k in 0u32..50) {
        let mut calls = 0u32;
        let result = Retrier::new(RetryPolicy::unbounded())
            .with_jitter(NoJitter)
            .with_clock(MockClock::new())
            .run(|| {
                calls += 1;
                calls <= k
            });

        prop_assert!(result.is_ok());
        prop_assert_eq!(calls, k + 1);
    }
}

#[test]
fn test_exponential_sequence_from_one() {
    let backoff = exponential_backoff(10);
    let sequence: Vec<u64> = std::iter::successors(Some(1u64), |last| Some(backoff.next(*last)))
        .take(8)
        .collect();
    assert_eq!(sequence, vec![1, 2, 4, 8, 10, 10, 10, 10]);
}
