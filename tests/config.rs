// tests/config.rs

use rate_guard_limiter::{ConfigError, Limiter, LimiterConfig, ManualClock, Rate};

#[test]
fn test_config_builds_limiter() {
    let config = LimiterConfig::new(Some(4.0), 8);
    let limiter = config.build(ManualClock::new()).unwrap();

    assert_eq!(limiter.rate(), Rate::new(4.0).unwrap());
    assert_eq!(limiter.burst(), 8);
    assert_eq!(limiter.available_tokens(), 8.0);
}

#[test]
fn test_config_without_rate_is_unlimited() {
    let config = LimiterConfig::new(None, 1);
    assert_eq!(config.rate(), Ok(Rate::INFINITE));

    let limiter: Limiter = config.try_into().unwrap();
    assert!(limiter.allow_n(1_000_000));
}

#[test]
fn test_config_rejects_non_positive_rate() {
    for bad in [0.0, -1.0, f64::NEG_INFINITY] {
        let config = LimiterConfig::new(Some(bad), 10);
        assert_eq!(config.rate(), Err(ConfigError::InvalidRate(bad)));
        assert!(config.build(ManualClock::new()).is_err());
    }
    assert!(LimiterConfig::new(Some(f64::NAN), 10).rate().is_err());
}

#[test]
fn test_config_error_message() {
    assert_eq!(
        ConfigError::InvalidRate(-3.0).to_string(),
        "Invalid rate: must be positive events per second, got -3"
    );
}

#[cfg(feature = "serde")]
#[test]
fn test_config_deserializes() {
    let config: LimiterConfig = serde_json::from_str(r#"{ "rate": 2.5, "burst": 5 }"#).unwrap();
    assert_eq!(config, LimiterConfig::new(Some(2.5), 5));

    let unlimited: LimiterConfig = serde_json::from_str(r#"{ "burst": 5 }"#).unwrap();
    assert_eq!(unlimited.rate, None);
    assert!(unlimited.rate().unwrap().is_infinite());
}
