//! Configuration schema types
//!
//! This module defines the TOML-facing configuration structure for
//! embedding applications. The engine itself never reads ambient
//! configuration: these types exist to be loaded once, validated, and
//! converted into the explicit [`PackConfig`] / [`MigrateConfig`] structs
//! threaded into each run, so two runs against different servers can use
//! different settings concurrently.

use crate::core::migrate::MigrateConfig;
use crate::core::pack::PackConfig;
use serde::{Deserialize, Serialize};

/// Root configuration structure
///
/// Maps to the TOML file consumed by [`load_config`].
///
/// [`load_config`]: crate::config::load_config
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pack run defaults
    #[serde(default)]
    pub pack: PackSection,

    /// Migration run defaults
    #[serde(default)]
    pub migrate: MigrateSection,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.pack.validate()?;
        self.migrate.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// `[pack]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackSection {
    /// Maximum documents per chunk (and listing page size)
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Extract binary attachments into the snapshot
    #[serde(default = "default_true")]
    pub include_attachments: bool,

    /// Skip unserializable documents instead of aborting the run
    #[serde(default)]
    pub best_effort: bool,
}

impl PackSection {
    fn validate(&self) -> Result<(), String> {
        if self.chunk_size < 1 {
            return Err("pack.chunk_size must be at least 1".to_string());
        }
        Ok(())
    }

    /// Converts to the explicit per-run pack configuration
    pub fn to_pack_config(&self, course_name: Option<String>) -> PackConfig {
        PackConfig {
            chunk_size: self.chunk_size,
            include_attachments: self.include_attachments,
            best_effort: self.best_effort,
            course_name,
        }
    }
}

impl Default for PackSection {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            include_attachments: true,
            best_effort: false,
        }
    }
}

/// `[migrate]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrateSection {
    /// Maximum documents per bulk upsert
    #[serde(default = "default_chunk_batch_size")]
    pub chunk_batch_size: usize,

    /// Diff target counts against the manifest after replay
    #[serde(default)]
    pub validate_round_trip: bool,

    /// Destroy a partially populated target on fatal failure
    #[serde(default)]
    pub cleanup_on_failure: bool,
}

impl MigrateSection {
    fn validate(&self) -> Result<(), String> {
        if self.chunk_batch_size < 1 {
            return Err("migrate.chunk_batch_size must be at least 1".to_string());
        }
        Ok(())
    }

    /// Converts to the explicit per-run migration configuration
    pub fn to_migrate_config(&self) -> MigrateConfig {
        MigrateConfig {
            chunk_batch_size: self.chunk_batch_size,
            validate_round_trip: self.validate_round_trip,
            cleanup_on_failure: self.cleanup_on_failure,
        }
    }
}

impl Default for MigrateSection {
    fn default() -> Self {
        Self {
            chunk_batch_size: default_chunk_batch_size(),
            validate_round_trip: false,
            cleanup_on_failure: false,
        }
    }
}

/// `[logging]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Enable rolling file logging
    #[serde(default)]
    pub file_enabled: bool,

    /// Directory for log files (when file logging is enabled)
    #[serde(default = "default_log_path")]
    pub file_path: String,

    /// Rotation policy: daily or hourly
    #[serde(default = "default_rotation")]
    pub file_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.as_str()) {
            return Err(format!(
                "Invalid logging.level '{}'. Must be one of: {}",
                self.level,
                valid_levels.join(", ")
            ));
        }
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.file_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.file_rotation '{}'. Must be one of: {}",
                self.file_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_enabled: false,
            file_path: default_log_path(),
            file_rotation: default_rotation(),
        }
    }
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_batch_size() -> usize {
    100
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}
