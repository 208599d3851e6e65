#![cfg(feature = "serde")]

use std::time::Duration;

use retrier::backoff::BackoffSpec;
use retrier::{Bound, Delay, RetryConfig, RetryError};

#[test]
fn test_config_from_json() {
    let config: RetryConfig = serde_json::from_str(
        r#"{
            "max_attempts": 5,
            "backoff": { "kind": "exponential", "max": 30 },
            "time_unit_ms": 100
        }"#,
    )
    .unwrap();

    assert_eq!(config.backoff, Some(BackoffSpec::Exponential { max: 30 }));

    let policy = config.into_policy().unwrap();
    assert_eq!(policy.bound(), Bound::MaxAttempts(5));
    assert_eq!(policy.time_unit(), Duration::from_millis(100));
    assert!(matches!(policy.delay(), Delay::Backoff(_)));
}

#[test]
fn test_empty_json_is_default() {
    let config: RetryConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, RetryConfig::default());
}

#[test]
fn test_unknown_field_rejected() {
    let result = serde_json::from_str::<RetryConfig>(r#"{ "retries": 3 }"#);
    assert!(result.is_err());
}

#[test]
fn test_conflicting_json_fields() {
    let config: RetryConfig =
        serde_json::from_str(r#"{ "delay_ms": 10, "backoff": { "kind": "fixed", "value": 2 } }"#)
            .unwrap();
    assert_eq!(config.into_policy().unwrap_err(), RetryError::InvalidDelayArgument);
}

#[test]
fn test_backoff_spec_serializes_tagged() {
    let spec = BackoffSpec::Random { lower: 2, upper: 7 };
    let json = serde_json::to_value(&spec).unwrap();
    assert_eq!(
        json,
        serde_json::json!({ "kind": "random", "lower": 2, "upper": 7 })
    );
}
