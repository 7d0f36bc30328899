//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::EngineConfig;
use crate::domain::errors::CoursePackError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into EngineConfig
/// 4. Applies environment variable overrides (COURSEPACK_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use coursepack::config::load_config;
///
/// let config = load_config("coursepack.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(CoursePackError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        CoursePackError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: EngineConfig = toml::from_str(&contents)
        .map_err(|e| CoursePackError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        CoursePackError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(CoursePackError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the COURSEPACK_* prefix
///
/// Environment variables follow the pattern: COURSEPACK_<SECTION>_<KEY>
/// For example: COURSEPACK_PACK_CHUNK_SIZE, COURSEPACK_LOGGING_LEVEL
fn apply_env_overrides(config: &mut EngineConfig) {
    // Pack overrides
    if let Ok(val) = std::env::var("COURSEPACK_PACK_CHUNK_SIZE") {
        if let Ok(size) = val.parse() {
            config.pack.chunk_size = size;
        }
    }
    if let Ok(val) = std::env::var("COURSEPACK_PACK_INCLUDE_ATTACHMENTS") {
        config.pack.include_attachments = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("COURSEPACK_PACK_BEST_EFFORT") {
        config.pack.best_effort = val.parse().unwrap_or(false);
    }

    // Migrate overrides
    if let Ok(val) = std::env::var("COURSEPACK_MIGRATE_CHUNK_BATCH_SIZE") {
        if let Ok(size) = val.parse() {
            config.migrate.chunk_batch_size = size;
        }
    }
    if let Ok(val) = std::env::var("COURSEPACK_MIGRATE_VALIDATE_ROUND_TRIP") {
        config.migrate.validate_round_trip = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("COURSEPACK_MIGRATE_CLEANUP_ON_FAILURE") {
        config.migrate.cleanup_on_failure = val.parse().unwrap_or(false);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("COURSEPACK_LOGGING_LEVEL") {
        config.logging.level = val;
    }
    if let Ok(val) = std::env::var("COURSEPACK_LOGGING_FILE_ENABLED") {
        config.logging.file_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("COURSEPACK_LOGGING_FILE_PATH") {
        config.logging.file_path = val;
    }
}
