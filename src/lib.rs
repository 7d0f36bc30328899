// Coursepack - course snapshot conversion engine
// Copyright (c) 2025 Coursepack Contributors
// Licensed under the MIT License

//! # Coursepack - live database to static snapshot, and back
//!
//! Coursepack is the bidirectional conversion engine between a live,
//! replicated, document-oriented database and a portable, chunked,
//! static-file snapshot of the same content (a "course"). It preserves
//! document identity, binary attachments, and database-side validation
//! logic across the format boundary, scales to courses with thousands of
//! documents and multi-megabyte attachments, and guarantees a snapshot is
//! never mistaken for complete when it is not.
//!
//! ## Overview
//!
//! Three operations make up the engine:
//!
//! - **Pack** ([`core::pack::Packer`]) reads a course once from a
//!   [`adapters::source::DocumentSource`] and produces an immutable
//!   snapshot directory through a [`adapters::fs::FileSystemAdapter`]
//! - **Validate** ([`core::validate::Validator`]) checks the structural
//!   integrity of a snapshot directory
//! - **Migrate** ([`core::migrate::Migrator`]) replays a validated snapshot
//!   into a live target
//!
//! Both directions go exclusively through the two adapter traits; the
//! engine never talks to concrete storage or network APIs.
//!
//! ## The commit marker
//!
//! Every chunk, index, attachment, and design-doc file is written before
//! `manifest.json`. The presence of a readable manifest is the sole marker
//! that a directory is a complete snapshot: an aborted or cancelled pack
//! leaves a directory that is correctly invalid.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use coursepack::adapters::fs::LocalFileSystem;
//! use coursepack::adapters::source::MemoryDocumentSource;
//! use coursepack::core::migrate::{MigrateConfig, Migrator};
//! use coursepack::core::pack::{PackConfig, Packer};
//! use coursepack::domain::CourseId;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fs = Arc::new(LocalFileSystem::new("/srv/courses"));
//!     let source = MemoryDocumentSource::new();
//!
//!     // Pack a course into a snapshot directory
//!     let packer = Packer::new(fs.clone(), PackConfig::default())?;
//!     let outcome = packer
//!         .pack(&source, &CourseId::new("anatomy-101").unwrap(), "anatomy-101", Vec::new())
//!         .await?;
//!     println!("packed {} documents", outcome.manifest.document_count);
//!
//!     // Replay it into an empty target
//!     let target = MemoryDocumentSource::new();
//!     let migrator = Migrator::new(fs, MigrateConfig::default())?;
//!     let summary = migrator.migrate("anatomy-101", &target).await?;
//!     println!("restored {} documents", summary.documents_restored);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`domain`] - identifiers, the two document forms, the manifest
//!   contract, and error types
//! - [`adapters`] - the consumed [`FileSystemAdapter`] and
//!   [`DocumentSource`] traits plus stock implementations
//! - [`core`] - Packer, Migrator, Validator, and progress plumbing
//! - [`config`] - TOML configuration for embedding applications
//! - [`logging`] - structured logging initialization
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`] with
//! [`domain::CoursePackError`]. Per-document and per-batch problems never
//! escape as errors; they accumulate into the warnings/errors lists of the
//! returned summaries:
//!
//! ```rust,no_run
//! use coursepack::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = coursepack::config::load_config("coursepack.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Progress Reporting
//!
//! Packer and Migrator accept a structured callback
//! (`{phase, message, current, total}`) invoked synchronously after each
//! unit of work; no human-readable formatting happens inside the engine.
//!
//! [`FileSystemAdapter`]: adapters::fs::FileSystemAdapter
//! [`DocumentSource`]: adapters::source::DocumentSource

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
