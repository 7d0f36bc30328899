//! Configuration management for coursepack.
//!
//! TOML-based configuration loading, parsing, and validation for embedding
//! applications. The engine never reads ambient configuration: the loaded
//! [`EngineConfig`] is converted into the explicit per-run
//! [`PackConfig`]/[`MigrateConfig`] structs and threaded as parameters, so
//! two runs against different servers can proceed concurrently without
//! interference.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use coursepack::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("coursepack.toml")?;
//!
//! let pack_config = config.pack.to_pack_config(Some("Anatomy 101".to_string()));
//! let migrate_config = config.migrate.to_migrate_config();
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [pack]
//! chunk_size = 1000
//! include_attachments = true
//!
//! [migrate]
//! chunk_batch_size = 100
//! validate_round_trip = false
//!
//! [logging]
//! level = "info"
//! file_enabled = false
//! ```
//!
//! # Environment Variables
//!
//! `${VAR_NAME}` placeholders in the file are substituted at load time, and
//! `COURSEPACK_<SECTION>_<KEY>` variables override individual values.
//!
//! [`PackConfig`]: crate::core::pack::PackConfig
//! [`MigrateConfig`]: crate::core::migrate::MigrateConfig

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{EngineConfig, LoggingConfig, MigrateSection, PackSection};
