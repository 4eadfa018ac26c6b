//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use crate::schema::BridgeConfig;
use richedit_common::ConfigError;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_richedit_bridge.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bridge.toml");
    std::fs::write(
        &path,
        r#"
[session]
initial_content = "<p>hello</p>"

[timing]
height_poll_interval_ms = 50
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.session.initial_content, "<p>hello</p>");
    assert_eq!(config.timing.height_poll_interval_ms, 50);
    // Defaults preserved
    assert_eq!(config.timing.request_timeout_ms, 5000);
    assert_eq!(config.session.min_height, 200.0);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bridge.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn unreadable_path_is_io_error_not_missing() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_from_path(dir.path());
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn create_under_a_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("richedit");
    std::fs::write(&blocker, "not a directory").unwrap();

    let result = create_default_config(&blocker.join("bridge.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn load_config_with_invalid_values_returns_parsed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bridge.toml");
    std::fs::write(
        &path,
        r#"
[timing]
request_timeout_ms = 0
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.timing.request_timeout_ms, 0);
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("richedit").join("bridge.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config, BridgeConfig::default());
}

#[test]
fn default_config_path_ends_with_bridge_toml() {
    if let Ok(path) = default_config_path() {
        assert!(path.ends_with("richedit/bridge.toml"));
    }
}
