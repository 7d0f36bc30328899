//! Integration tests for configuration loading and validation

use coursepack::config::{load_config, EngineConfig};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn full_config_round_trips_through_toml() {
    let file = write_config(
        r#"
[pack]
chunk_size = 2000
include_attachments = false
best_effort = true

[migrate]
chunk_batch_size = 250
validate_round_trip = true
cleanup_on_failure = true

[logging]
level = "warn"
file_enabled = false
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.pack.chunk_size, 2000);
    assert!(!config.pack.include_attachments);
    assert!(config.pack.best_effort);
    assert_eq!(config.migrate.chunk_batch_size, 250);
    assert!(config.migrate.validate_round_trip);
    assert!(config.migrate.cleanup_on_failure);
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn empty_config_falls_back_to_defaults() {
    let file = write_config("");

    let config = load_config(file.path()).unwrap();
    let defaults = EngineConfig::default();
    assert_eq!(config.pack.chunk_size, defaults.pack.chunk_size);
    assert_eq!(
        config.migrate.chunk_batch_size,
        defaults.migrate.chunk_batch_size
    );
    assert_eq!(config.logging.level, defaults.logging.level);
}

#[test]
fn env_substitution_fills_placeholders() {
    std::env::set_var("COURSEPACK_IT_LOG_DIR", "/var/log/coursepack");
    let file = write_config(
        r#"
[logging]
level = "info"
file_enabled = true
file_path = "${COURSEPACK_IT_LOG_DIR}"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.logging.file_path, "/var/log/coursepack");
    std::env::remove_var("COURSEPACK_IT_LOG_DIR");
}

#[test]
fn missing_env_variable_is_a_configuration_error() {
    std::env::remove_var("COURSEPACK_IT_UNSET");
    let file = write_config(
        r#"
[logging]
file_path = "${COURSEPACK_IT_UNSET}"
"#,
    );

    let result = load_config(file.path());
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("COURSEPACK_IT_UNSET"));
}

#[test]
fn env_override_beats_file_value() {
    std::env::set_var("COURSEPACK_PACK_CHUNK_SIZE", "777");
    let file = write_config(
        r#"
[pack]
chunk_size = 1000
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.pack.chunk_size, 777);
    std::env::remove_var("COURSEPACK_PACK_CHUNK_SIZE");
}

#[test]
fn invalid_values_are_rejected_at_load_time() {
    let file = write_config(
        r#"
[logging]
level = "loud"
"#,
    );

    let result = load_config(file.path());
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("level"));
}
