//! Integration tests for configuration validation

#![allow(clippy::expect_used)]

use source_query::config::{ClientConfig, LoggingConfig, QueryConfig, MAX_DATAGRAM_SIZE};
use std::time::Duration;
use tracing::Level;

#[test]
fn test_default_config_validates() {
    let config = QueryConfig::default();
    let errors = config.validate();
    assert!(
        errors.is_empty(),
        "Default config should be valid, but got errors: {:?}",
        errors
    );
}

#[test]
fn test_default_values() {
    let config = QueryConfig::default();
    assert_eq!(config.client.local_address, "0.0.0.0:0");
    assert_eq!(config.client.receive_timeout, Duration::from_secs(5));
    assert_eq!(config.client.max_datagram_size, MAX_DATAGRAM_SIZE);
    assert_eq!(config.logging.log_level, Level::INFO);
}

#[test]
fn test_empty_local_address() {
    let mut config = QueryConfig::default();
    config.client.local_address = String::new();

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("cannot be empty")));
}

#[test]
fn test_invalid_local_address() {
    let mut config = QueryConfig::default();
    config.client.local_address = "not:a:valid:address".to_string();

    let errors = config.validate();
    assert!(!errors.is_empty(), "Should have validation errors");
    assert!(errors
        .iter()
        .any(|e| e.contains("Invalid local address format")));
}

#[test]
fn test_short_receive_timeout() {
    let mut config = QueryConfig::default();
    config.client.receive_timeout = Duration::from_millis(5);

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Receive timeout too short")));
}

#[test]
fn test_long_send_timeout() {
    let mut config = QueryConfig::default();
    config.client.send_timeout = Duration::from_secs(400);

    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("Send timeout too long")));
}

#[test]
fn test_tiny_datagram_size() {
    let mut config = QueryConfig::default();
    config.client.max_datagram_size = 5;

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Max datagram size too small")));
}

#[test]
fn test_excessive_datagram_size() {
    let mut config = QueryConfig::default();
    config.client.max_datagram_size = 70_000;

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Max datagram size too large")));
}

#[test]
fn test_empty_app_name() {
    let mut config = QueryConfig::default();
    config.logging.app_name = String::new();

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Application name cannot be empty")));
}

#[test]
fn test_long_app_name() {
    let mut config = QueryConfig::default();
    config.logging.app_name = "a".repeat(100);

    let errors = config.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Application name too long")));
}

#[test]
fn test_validate_strict_with_valid_config() {
    let config = QueryConfig::default();
    assert!(config.validate_strict().is_ok());
}

#[test]
fn test_validate_strict_with_invalid_config() {
    let mut config = QueryConfig::default();
    config.client.local_address = String::new();

    let result = config.validate_strict();
    assert!(result.is_err());

    if let Err(e) = result {
        let error_str = e.to_string();
        assert!(error_str.contains("Configuration validation failed"));
    }
}

#[test]
fn test_multiple_validation_errors() {
    let mut config = QueryConfig::default();

    config.client.local_address = String::new();
    config.client.receive_timeout = Duration::ZERO;
    config.client.max_datagram_size = 0;
    config.logging.app_name = String::new();

    let errors = config.validate();
    assert_eq!(errors.len(), 4, "Unexpected errors: {:?}", errors);
}

#[test]
fn test_toml_round_trip_of_example() {
    let example = QueryConfig::example_config();
    let parsed = QueryConfig::from_toml(&example).expect("example config parses");
    assert!(parsed.validate().is_empty());
    assert_eq!(parsed.client.receive_timeout, Duration::from_secs(5));
}

#[test]
fn test_partial_toml_uses_defaults() {
    let config = QueryConfig::from_toml(
        r#"
        [logging]
        app_name = "browser"
        log_level = "debug"
        json_format = true
        "#,
    )
    .expect("partial config");

    assert_eq!(config.logging.app_name, "browser");
    assert_eq!(config.logging.log_level, Level::DEBUG);
    assert_eq!(config.client.local_address, "0.0.0.0:0");
}

#[test]
fn test_toml_timeouts_are_milliseconds() {
    let config = QueryConfig::from_toml(
        r#"
        [client]
        local_address = "127.0.0.1:0"
        send_timeout = 250
        receive_timeout = 1500
        max_datagram_size = 1400
        "#,
    )
    .expect("client config");

    assert_eq!(config.client.send_timeout, Duration::from_millis(250));
    assert_eq!(config.client.receive_timeout, Duration::from_millis(1500));
}

#[test]
fn test_bad_log_level_rejected() {
    let result = QueryConfig::from_toml(
        r#"
        [logging]
        app_name = "x"
        log_level = "loud"
        json_format = false
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn test_missing_file_is_config_error() {
    let err = QueryConfig::from_file("/nonexistent/source-query.toml").unwrap_err();
    assert!(err.to_string().contains("Failed to open config file"));
}

#[test]
fn test_valid_explicit_config() {
    let config = QueryConfig {
        client: ClientConfig {
            local_address: "[::]:0".to_string(),
            send_timeout: Duration::from_secs(1),
            receive_timeout: Duration::from_secs(2),
            max_datagram_size: 4096,
        },
        logging: LoggingConfig {
            app_name: "master-browser".to_string(),
            log_level: Level::WARN,
            json_format: true,
        },
    };

    let errors = config.validate();
    assert!(errors.is_empty(), "Config should be valid, got: {:?}", errors);
}
