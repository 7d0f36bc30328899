//! Domain models and types for coursepack.
//!
//! This module contains the data contracts shared by the Packer, Validator,
//! and Migrator.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`CourseId`], [`DocumentId`], [`ChunkId`])
//! - **Document models** ([`Document`], [`PackedDocument`], [`DesignDocument`])
//! - **The manifest contract** ([`Manifest`] and its descriptors)
//! - **Error types** ([`CoursePackError`]) and a **Result alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers use the newtype pattern so different id kinds cannot be mixed:
//!
//! ```rust
//! use coursepack::domain::{CourseId, DocumentId};
//!
//! # fn example() -> std::result::Result<(), String> {
//! let course_id = CourseId::new("anatomy-101")?;
//! let document_id = DocumentId::new("card-001")?;
//!
//! // This won't compile - type safety prevents mixing IDs
//! // let wrong: CourseId = document_id;  // Compile error!
//! # Ok(())
//! # }
//! ```
//!
//! # The two document forms
//!
//! [`Document`] is the live form with inline attachment bytes;
//! [`PackedDocument`] is the snapshot form with out-of-line
//! [`AttachmentStub`]s. Payloads are opaque JSON in both forms and are never
//! interpreted by this crate.

pub mod document;
pub mod errors;
pub mod ids;
pub mod manifest;
pub mod result;

// Re-export commonly used types for convenience
pub use document::{AttachmentData, AttachmentStub, DesignDocument, Document, PackedDocument};
pub use errors::CoursePackError;
pub use ids::{ChunkId, CourseId, DocumentId, DESIGN_DOC_PREFIX};
pub use manifest::{
    ChunkDescriptor, DesignDocDescriptor, IndexDescriptor, Manifest, ATTACHMENTS_DIR, CHUNKS_DIR,
    DESIGN_DOCS_DIR, INDICES_DIR, MANIFEST_FILE, MANIFEST_SCHEMA_VERSION,
};
pub use result::Result;
