//! Config environment variable tests
//!
//! These tests verify that Config::from_env() correctly reads and applies
//! environment variable overrides. Note that Config::from_env() also loads
//! from .env file via dotenvy, so these tests focus on override behavior.
//!
//! Tests use #[serial] to prevent race conditions with shared env vars.

use jdx_tech_hub::config::{Config, LogFormat};
use serial_test::serial;
use std::env;

const VARS: &[&str] = &[
    "DATABASE_PATH",
    "DATABASE_MAX_CONNECTIONS",
    "LOG_LEVEL",
    "LOG_FORMAT",
    "AUTOSAVE_DELAY_MS",
    "SESSION_HISTORY_LIMIT",
    "DEFAULT_TEMPLATE",
];

fn clear_vars() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_config_from_env_loads_successfully() {
    clear_vars();
    let result = Config::from_env();
    assert!(result.is_ok(), "Config::from_env() needs no required variables");
}

#[test]
#[serial]
fn test_config_from_env_custom_database() {
    clear_vars();
    env::set_var("DATABASE_PATH", "/custom/hub.db");
    env::set_var("DATABASE_MAX_CONNECTIONS", "10");

    let config = Config::from_env().unwrap();
    assert_eq!(config.database.path.to_str().unwrap(), "/custom/hub.db");
    assert_eq!(config.database.max_connections, 10);

    clear_vars();
}

#[test]
#[serial]
fn test_config_from_env_zero_connections_rejected() {
    clear_vars();
    env::set_var("DATABASE_MAX_CONNECTIONS", "0");

    let result = Config::from_env();
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("DATABASE_MAX_CONNECTIONS"));

    clear_vars();
}

#[test]
#[serial]
fn test_config_from_env_zero_session_limit_rejected() {
    clear_vars();
    env::set_var("SESSION_HISTORY_LIMIT", "0");

    let result = Config::from_env();
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("SESSION_HISTORY_LIMIT"));

    clear_vars();
}

#[test]
#[serial]
fn test_config_from_env_json_log_format() {
    clear_vars();
    env::set_var("LOG_FORMAT", "JSON");
    env::set_var("LOG_LEVEL", "debug");

    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.logging.level, "debug");

    clear_vars();
}

#[test]
#[serial]
fn test_config_from_env_unknown_log_format_is_pretty() {
    clear_vars();
    env::set_var("LOG_FORMAT", "xml");

    let config = Config::from_env().unwrap();
    assert_eq!(config.logging.format, LogFormat::Pretty);

    clear_vars();
}

#[test]
#[serial]
fn test_config_from_env_blueprint_settings() {
    clear_vars();
    env::set_var("AUTOSAVE_DELAY_MS", "500");
    env::set_var("SESSION_HISTORY_LIMIT", "3");
    env::set_var("DEFAULT_TEMPLATE", "saas");

    let config = Config::from_env().unwrap();
    assert_eq!(config.blueprint.autosave_delay_ms, 500);
    assert_eq!(config.blueprint.autosave_delay().as_millis(), 500);
    assert_eq!(config.blueprint.session_history_limit, 3);
    assert_eq!(config.blueprint.default_template, "saas");

    clear_vars();
}

#[test]
#[serial]
fn test_config_from_env_invalid_numbers_fall_back() {
    clear_vars();
    env::set_var("AUTOSAVE_DELAY_MS", "soon");
    env::set_var("SESSION_HISTORY_LIMIT", "-1");
    env::set_var("DEFAULT_TEMPLATE", "   ");

    let config = Config::from_env().unwrap();
    assert_eq!(config.blueprint.autosave_delay_ms, 2000);
    assert_eq!(config.blueprint.session_history_limit, 10);
    assert_eq!(config.blueprint.default_template, "jdx-tech-hub");

    clear_vars();
}
