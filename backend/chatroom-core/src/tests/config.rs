// Unit tests for AppConfig load/save/validate and environment overrides

use crate::api::DEFAULT_TIMEOUT_DURATION;
use crate::config::{AppConfig, CHAT_API_URL_ENV, RETRIEVAL_URL_ENV};
use crate::error::config::ConfigError;
use crate::{DEFAULT_CHAT_API_URL, DEFAULT_RETRIEVAL_URL};

use serial_test::serial;

#[test]
fn given_defaults_then_point_at_local_backends_with_fixed_metadata() {
    let config = AppConfig::default();

    assert_eq!(config.server.chat_api_url, "http://127.0.0.1:3100");
    assert_eq!(config.server.retrieval_url, "http://127.0.0.1:8500");
    assert_eq!(config.server.chat_api_url, DEFAULT_CHAT_API_URL);
    assert_eq!(config.server.retrieval_url, DEFAULT_RETRIEVAL_URL);
    assert_eq!(config.retrieval.upload_domain, "General");
    assert_eq!(config.retrieval.upload_user_tag, "");
    assert_eq!(config.retrieval.memory_domain, "chat");
    assert_eq!(config.retrieval.user, "user1");
    assert!(config.validate().is_ok());
}

/// **VALUE**: Configured and unconfigured clients share one default timeout.
#[test]
fn given_default_config_when_reading_timeout_then_matches_client_default() {
    let config = AppConfig::default();

    assert_eq!(config.request_timeout(), DEFAULT_TIMEOUT_DURATION);
    assert_eq!(config.server.request_timeout_secs, 120);
}

#[test]
fn given_missing_file_when_loading_then_returns_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let config = AppConfig::load(dir.path()).unwrap();

    assert_eq!(config, AppConfig::default());
}

/// **VALUE**: Saved config loads back unchanged and no temp file is left behind.
///
/// **BUG THIS CATCHES**: Would catch a broken atomic rename that leaves
/// `config.json.tmp` around or writes the file somewhere else.
#[test]
fn given_saved_config_when_loading_then_values_survive() {
    // GIVEN: A customized config saved to disk
    let dir = tempfile::tempdir().unwrap();
    let mut config = AppConfig::default();
    config.server.chat_api_url = "https://chat.example.com".to_string();
    config.retrieval.user = "alice".to_string();
    config.save(dir.path()).unwrap();

    // WHEN: Loading it back
    let loaded = AppConfig::load(dir.path()).unwrap();

    // THEN: Same values, no temp file
    assert_eq!(loaded, config);
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn given_partial_file_when_loading_then_missing_fields_use_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{ "server": { "chat_api_url": "http://10.0.0.5:3100" } }"#,
    )
    .unwrap();

    let config = AppConfig::load(dir.path()).unwrap();

    assert_eq!(config.server.chat_api_url, "http://10.0.0.5:3100");
    assert_eq!(config.server.retrieval_url, DEFAULT_RETRIEVAL_URL);
    assert_eq!(config.retrieval.user, "user1");
}

#[test]
fn given_corrupt_file_when_loading_then_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.json"), "{ not json").unwrap();

    let result = AppConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

#[test]
fn given_invalid_values_when_validating_then_validation_error() {
    let mut bad_url = AppConfig::default();
    bad_url.server.retrieval_url = "ftp://files".to_string();

    let mut empty_url = AppConfig::default();
    empty_url.server.chat_api_url = String::new();

    let mut bad_version = AppConfig::default();
    bad_version.version = 7;

    let mut bad_timeout = AppConfig::default();
    bad_timeout.server.request_timeout_secs = 0;

    for config in [bad_url, empty_url, bad_version, bad_timeout] {
        assert!(
            matches!(config.validate(), Err(ConfigError::ValidationError { .. })),
            "{config:?} should fail validation"
        );
    }
}

/// **VALUE**: Environment variables override the backend URLs.
///
/// **WHY THIS MATTERS**: Pointing the client at another machine should not
/// require editing config.json.
#[test]
#[serial]
fn given_env_overrides_when_applied_then_urls_replaced() {
    // GIVEN: Both override variables set
    // SAFETY: serialized with every other env-touching test
    unsafe {
        std::env::set_var(CHAT_API_URL_ENV, "http://192.168.1.20:3100");
        std::env::set_var(RETRIEVAL_URL_ENV, " http://192.168.1.20:8500 ");
    }

    // WHEN: Applying overrides to defaults
    let mut config = AppConfig::default();
    config.apply_env_overrides();

    // THEN: Both URLs replaced (and trimmed)
    assert_eq!(config.server.chat_api_url, "http://192.168.1.20:3100");
    assert_eq!(config.server.retrieval_url, "http://192.168.1.20:8500");

    unsafe {
        std::env::remove_var(CHAT_API_URL_ENV);
        std::env::remove_var(RETRIEVAL_URL_ENV);
    }
}

#[test]
#[serial]
fn given_empty_env_override_when_applied_then_ignored() {
    // SAFETY: serialized with every other env-touching test
    unsafe {
        std::env::set_var(CHAT_API_URL_ENV, "   ");
        std::env::remove_var(RETRIEVAL_URL_ENV);
    }

    let mut config = AppConfig::default();
    config.apply_env_overrides();

    assert_eq!(config.server.chat_api_url, DEFAULT_CHAT_API_URL);

    unsafe {
        std::env::remove_var(CHAT_API_URL_ENV);
    }
}
