//! Core business logic for coursepack.
//!
//! This module contains both directions of the conversion engine and the
//! validation that sits between them.
//!
//! # Modules
//!
//! - [`pack`] - Packer: live source to static snapshot
//! - [`migrate`] - Migrator: static snapshot to live target
//! - [`validate`] - Validator: structural integrity of a snapshot
//! - [`progress`] - structured progress callback plumbing
//!
//! # Pack Workflow
//!
//! 1. **Probe**: confirm the source is reachable before anything is written
//! 2. **Collect**: page through document ids and fix the global order
//! 3. **Chunk**: fetch documents sequentially, chunk by chunk
//! 4. **Extract**: write attachments out-of-line, replacing them with stubs
//! 5. **Index**: feed each document through the registered index builders
//! 6. **Design docs**: copy reserved-id documents verbatim
//! 7. **Commit**: write the manifest last - the snapshot's commit marker
//!
//! # Migrate Workflow
//!
//! 1. **Gate**: run the Validator; fail fast with no writes on any error
//! 2. **Design docs**: upsert verbatim (failures degrade to warnings)
//! 3. **Replay**: chunks in manifest order, rehydrating attachment stubs,
//!    submitting bounded batches to the target
//! 4. **Verify** (optional): diff target counts against the manifest
//!
//! # Example
//!
//! ```rust,no_run
//! use coursepack::adapters::fs::LocalFileSystem;
//! use coursepack::adapters::source::MemoryDocumentSource;
//! use coursepack::core::pack::{PackConfig, Packer};
//! use coursepack::domain::CourseId;
//! use std::sync::Arc;
//!
//! # async fn example() -> coursepack::domain::Result<()> {
//! let fs = Arc::new(LocalFileSystem::new("/srv/courses"));
//! let source = MemoryDocumentSource::new();
//!
//! let packer = Packer::new(fs, PackConfig::default())?;
//! let outcome = packer
//!     .pack(&source, &CourseId::new("anatomy-101").unwrap(), "anatomy-101", Vec::new())
//!     .await?;
//!
//! println!("packed {} documents", outcome.manifest.document_count);
//! # Ok(())
//! # }
//! ```

pub mod migrate;
pub mod pack;
pub mod progress;
pub mod validate;
