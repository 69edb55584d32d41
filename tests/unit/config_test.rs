//! Tests for configuration validation

use prometheus_poller::config::{ExecutionLimits, MemoryLimit, PollConfig, PollerConfig};

#[test]
fn test_poll_config_defaults() {
    let cfg = PollConfig::default();
    assert_eq!(cfg.max_attempts, 200);
    assert_eq!(cfg.lifetime_secs, 600);
    assert_eq!(cfg.interval_secs, 3);
    assert!(cfg.supports_inline_release);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_poll_config_invalid_max_attempts() {
    assert!(PollConfig::new().with_max_attempts(0).validate().is_err());
}

#[test]
fn test_poll_config_invalid_lifetime() {
    assert!(PollConfig::new().with_lifetime_secs(0).validate().is_err());
}

#[test]
fn test_poll_config_zero_interval_is_allowed() {
    assert!(PollConfig::new().with_interval_secs(0).validate().is_ok());
}

#[test]
fn test_poll_config_from_json_fills_defaults() {
    let cfg = PollConfig::from_json_str(r#"{ "max_attempts": 5, "supports_inline_release": false }"#)
        .unwrap();
    assert_eq!(cfg.max_attempts, 5);
    assert_eq!(cfg.interval_secs, 3);
    assert!(!cfg.supports_inline_release);
}

#[test]
fn test_poll_config_from_json_rejects_invalid() {
    assert!(PollConfig::from_json_str(r#"{ "lifetime_secs": 0 }"#).is_err());
    assert!(PollConfig::from_json_str("not json").is_err());
}

#[test]
fn test_poller_config_from_json() {
    let json = r#"{
        "polls": {
            "export": { "max_attempts": 10, "interval_secs": 5 },
            "payment": { "lifetime_secs": 3600 }
        }
    }"#;

    let cfg = PollerConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.for_poll_type("export").max_attempts, 10);
    assert_eq!(cfg.for_poll_type("payment").lifetime_secs, 3600);
    assert_eq!(cfg.for_poll_type("unknown"), PollConfig::default());
}

#[test]
fn test_poller_config_reports_invalid_poll_type() {
    let json = r#"{ "polls": { "export": { "max_attempts": 0 } } }"#;
    let err = PollerConfig::from_json_str(json).unwrap_err();
    assert!(err.to_string().contains("export"));
}

#[test]
fn test_memory_limit_examples() {
    assert_eq!(MemoryLimit::parse("128M").unwrap().bytes(), Some(134_217_728));
    assert_eq!(MemoryLimit::parse("1G").unwrap().bytes(), Some(1_073_741_824));
    assert_eq!(MemoryLimit::parse("512").unwrap().bytes(), Some(512));
    assert_eq!(MemoryLimit::parse("-1").unwrap(), MemoryLimit::Unlimited);
}

#[test]
fn test_execution_limits_serde() {
    let limits = ExecutionLimits::unlimited()
        .with_max_execution_secs(30)
        .with_memory_limit(MemoryLimit::Bytes(1024));
    let json = serde_json::to_string(&limits).unwrap();
    let back: ExecutionLimits = serde_json::from_str(&json).unwrap();
    assert_eq!(back, limits);
}

#[test]
fn test_poll_config_from_env() {
    std::env::set_var("POLL_MAX_ATTEMPTS", "7");
    std::env::set_var("POLL_SUPPORTS_INLINE_RELEASE", "false");
    let cfg = PollConfig::from_env();
    std::env::set_var("POLL_MAX_ATTEMPTS", "many");
    let bad = PollConfig::from_env();
    std::env::remove_var("POLL_MAX_ATTEMPTS");
    std::env::remove_var("POLL_SUPPORTS_INLINE_RELEASE");

    let cfg = cfg.unwrap();
    assert_eq!(cfg.max_attempts, 7);
    assert!(!cfg.supports_inline_release);
    assert_eq!(cfg.lifetime_secs, 600);
    assert!(bad.is_err());
}
