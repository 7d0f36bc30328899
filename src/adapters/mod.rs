//! External system integrations for coursepack.
//!
//! This module holds the two adapter surfaces the engine consumes:
//!
//! - [`fs`] - byte-addressable storage ([`fs::FileSystemAdapter`]): local
//!   disk, in-memory capture, or an object store
//! - [`source`] - the live document database ([`source::DocumentSource`])
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies
//! and enable testing with in-memory implementations. Both directions of the
//! engine go exclusively through these traits; neither the Packer nor the
//! Migrator talks to concrete storage or network APIs directly, so a run's
//! side effects are confined to the injected adapters.
//!
//! ```rust
//! use coursepack::adapters::fs::MemoryFileSystem;
//! use coursepack::adapters::source::MemoryDocumentSource;
//! use std::sync::Arc;
//!
//! let fs = Arc::new(MemoryFileSystem::new());
//! let source = Arc::new(MemoryDocumentSource::new());
//! // hand both to a Packer / Migrator
//! ```

pub mod fs;
pub mod source;
