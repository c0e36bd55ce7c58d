//! Config environment variable tests
//!
//! These tests verify that Config::from_env() reads the credential pool and
//! applies environment variable overrides.
//!
//! Tests use #[serial] to prevent race conditions with shared env vars.

use proofy_forensics::config::{Config, LogFormat, DEFAULT_MAX_UPLOAD_BYTES};
use serial_test::serial;
use std::env;

const VARS: &[&str] = &[
    "GEMINI_KEYS",
    "GEMINI_API_KEY",
    "GEMINI_BASE_URL",
    "MODEL_PRIMARY",
    "MODEL_FALLBACK",
    "REQUEST_TIMEOUT_MS",
    "MAX_UPLOAD_BYTES",
    "ARCHIVE_LISTING_LIMIT",
    "SERVER_ADDR",
    "LOG_FORMAT",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_keys() {
    clear_env();

    let config = Config::from_env().unwrap();
    assert!(config.gemini.api_keys.is_empty());
    assert_eq!(
        config.gemini.base_url,
        "https://generativelanguage.googleapis.com"
    );
    assert_eq!(config.models.primary, "gemini-2.5-flash");
    assert_eq!(config.models.fallback, "gemini-flash-latest");
    assert_eq!(config.request.timeout_ms, 120_000);
    assert_eq!(config.limits.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    assert_eq!(config.limits.archive_listing_limit, 100);
    assert_eq!(config.server.addr, "0.0.0.0:3001");
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
#[serial]
fn test_gemini_keys_takes_precedence() {
    clear_env();
    env::set_var("GEMINI_KEYS", "keyA, keyB,,keyC ");
    env::set_var("GEMINI_API_KEY", "single");

    let config = Config::from_env().unwrap();
    assert_eq!(config.gemini.api_keys, vec!["keyA", "keyB", "keyC"]);

    clear_env();
}

#[test]
#[serial]
fn test_single_key_variable_used_when_list_blank() {
    clear_env();
    env::set_var("GEMINI_KEYS", "  ");
    env::set_var("GEMINI_API_KEY", "k1,k2");

    let config = Config::from_env().unwrap();
    assert_eq!(config.gemini.api_keys, vec!["k1", "k2"]);

    clear_env();
}

#[test]
#[serial]
fn test_numeric_overrides_and_bad_values() {
    clear_env();
    env::set_var("REQUEST_TIMEOUT_MS", "5000");
    env::set_var("MAX_UPLOAD_BYTES", "not-a-number");
    env::set_var("ARCHIVE_LISTING_LIMIT", "20");

    let config = Config::from_env().unwrap();
    assert_eq!(config.request.timeout_ms, 5000);
    assert_eq!(config.limits.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    assert_eq!(config.limits.archive_listing_limit, 20);

    clear_env();
}

#[test]
#[serial]
fn test_json_log_format_and_server_addr() {
    clear_env();
    env::set_var("LOG_FORMAT", "JSON");
    env::set_var("SERVER_ADDR", "127.0.0.1:9000");

    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.server.addr, "127.0.0.1:9000");

    clear_env();
}

#[test]
#[serial]
fn test_blank_model_is_rejected() {
    clear_env();
    env::set_var("MODEL_FALLBACK", " ");

    let err = Config::from_env().unwrap_err();
    assert!(err.to_string().contains("MODEL_FALLBACK"));

    clear_env();
}
