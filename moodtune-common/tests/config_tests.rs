//! Configuration resolution tests
//!
//! Serialized because they mutate process environment variables.

use moodtune_common::config::{
    resolve_config, ConfigOverrides, PlayerConfig, ENV_PORT, ENV_RESOLVER_URL, ENV_TIMEOUT_MS,
};
use serial_test::serial;
use std::io::Write;

fn clear_env() {
    std::env::remove_var(ENV_PORT);
    std::env::remove_var(ENV_RESOLVER_URL);
    std::env::remove_var(ENV_TIMEOUT_MS);
    std::env::remove_var(moodtune_common::config::ENV_MODEL_URL);
}

#[test]
#[serial]
fn test_defaults_when_nothing_is_set() {
    clear_env();
    let config = resolve_config(&ConfigOverrides::default()).unwrap();
    assert_eq!(config, PlayerConfig::default());
}

#[test]
#[serial]
fn test_env_overrides_defaults() {
    clear_env();
    std::env::set_var(ENV_PORT, "6001");
    std::env::set_var(ENV_RESOLVER_URL, "http://resolver.test:5000");

    let config = resolve_config(&ConfigOverrides::default()).unwrap();
    assert_eq!(config.port, 6001);
    assert_eq!(config.resolver_url, "http://resolver.test:5000");
    // Untouched settings keep their defaults
    assert_eq!(config.request_timeout_ms, PlayerConfig::default().request_timeout_ms);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env();
    std::env::set_var(ENV_PORT, "6001");

    let overrides = ConfigOverrides {
        port: Some(7002),
        ..Default::default()
    };
    let config = resolve_config(&overrides).unwrap();
    assert_eq!(config.port, 7002);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_env_port_is_a_config_error() {
    clear_env();
    std::env::set_var(ENV_PORT, "not-a-port");

    let result = resolve_config(&ConfigOverrides::default());
    assert!(result.is_err());

    clear_env();
}

#[test]
#[serial]
fn test_explicit_config_file_is_loaded() {
    clear_env();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
port = 8080
resolver_url = "http://resolver.local:5000"
request_timeout_ms = 5000
"#
    )
    .unwrap();

    let overrides = ConfigOverrides {
        config_file: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    let config = resolve_config(&overrides).unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.resolver_url, "http://resolver.local:5000");
    assert_eq!(config.request_timeout_ms, 5000);
    // Missing keys fall back to defaults
    assert_eq!(config.model_url, PlayerConfig::default().model_url);
}

#[test]
#[serial]
fn test_env_overrides_config_file() {
    clear_env();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = 8080").unwrap();

    std::env::set_var(ENV_PORT, "9090");
    let overrides = ConfigOverrides {
        config_file: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    let config = resolve_config(&overrides).unwrap();
    assert_eq!(config.port, 9090);

    clear_env();
}

#[test]
#[serial]
fn test_missing_explicit_config_file_fails() {
    clear_env();
    let overrides = ConfigOverrides {
        config_file: Some("/nonexistent/moodtune/config.toml".into()),
        ..Default::default()
    };
    assert!(resolve_config(&overrides).is_err());
}
