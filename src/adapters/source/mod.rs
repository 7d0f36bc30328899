//! Live database adapters
//!
//! The [`DocumentSource`] trait is the engine's only view of a live document
//! database, on both the pack side (read) and the migrate side (write). A
//! CouchDB-style replicated store is the expected production implementation;
//! [`MemoryDocumentSource`] ships for tests and round-trip verification.

pub mod memory;
pub mod traits;

pub use memory::MemoryDocumentSource;
pub use traits::{BulkUpsertOutcome, DocumentSource, UpsertRejection};
