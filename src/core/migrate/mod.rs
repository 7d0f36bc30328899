//! Migration: static snapshot to live target
//!
//! [`Migrator`] replays a validated snapshot into a live database through
//! the [`DocumentSource`] trait, gated by the [`Validator`].
//!
//! [`DocumentSource`]: crate::adapters::source::DocumentSource
//! [`Validator`]: crate::core::validate::Validator

pub mod migrator;

pub use migrator::{MigrateConfig, MigrationSummary, Migrator};
