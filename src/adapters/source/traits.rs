//! Live document database abstraction
//!
//! This module defines the trait a live database adapter must implement for
//! the engine to pack from it or migrate into it. The engine never talks to
//! a concrete database API; a CouchDB-style replicated store, a test
//! double, or anything else sits behind [`DocumentSource`].

use crate::domain::{DesignDocument, Document, DocumentId, Result};
use async_trait::async_trait;

/// Result of a bulk upsert operation
#[derive(Debug, Clone, Default)]
pub struct BulkUpsertOutcome {
    /// Number of documents the target accepted
    pub accepted: usize,

    /// Documents the target rejected, with reasons
    pub rejections: Vec<UpsertRejection>,
}

impl BulkUpsertOutcome {
    /// True if every submitted document was accepted
    pub fn is_complete(&self) -> bool {
        self.rejections.is_empty()
    }
}

/// Details of one rejected document within a bulk upsert
#[derive(Debug, Clone)]
pub struct UpsertRejection {
    /// Document that was rejected
    pub id: DocumentId,

    /// Reason reported by the target
    pub reason: String,
}

/// Client trait for a live, replicated document database
///
/// # Upsert contract
///
/// [`bulk_upsert`] must update-in-place when a document already exists in
/// the target, reusing the target's existing revision rather than failing
/// with a conflict. This is what makes a second migration run against an
/// already-partially-populated target idempotent.
///
/// A rejection of an individual document is reported through
/// [`BulkUpsertOutcome::rejections`]; an `Err` return means the whole batch
/// failed (connectivity loss) and is fatal for the run.
///
/// [`bulk_upsert`]: DocumentSource::bulk_upsert
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Connectivity probe
    ///
    /// # Errors
    ///
    /// Returns [`CoursePackError::Connection`] if the database is
    /// unreachable.
    ///
    /// [`CoursePackError::Connection`]: crate::domain::CoursePackError::Connection
    async fn ping(&self) -> Result<()>;

    /// Lists identifiers of non-design documents, one page at a time
    ///
    /// Identifiers are returned starting at `skip` in the source's own
    /// stable enumeration order, at most `limit` per call. A page shorter
    /// than `limit` signals the end of the collection. Design documents are
    /// never included.
    async fn list_document_ids(&self, limit: usize, skip: usize) -> Result<Vec<DocumentId>>;

    /// Fetches one document by id
    ///
    /// With `with_attachments` set, inline attachment bytes are included;
    /// otherwise [`Document::attachments`] is empty and only payload fields
    /// are populated.
    async fn fetch_document(&self, id: &DocumentId, with_attachments: bool) -> Result<Document>;

    /// Enumerates all design documents
    async fn design_documents(&self) -> Result<Vec<DesignDocument>>;

    /// Inserts or updates a single design document verbatim
    async fn put_design_document(&self, doc: &DesignDocument) -> Result<()>;

    /// Inserts or updates a batch of documents (see the upsert contract)
    async fn bulk_upsert(&self, docs: Vec<Document>) -> Result<BulkUpsertOutcome>;

    /// Number of non-design documents currently stored
    async fn document_count(&self) -> Result<usize>;

    /// Destroys the entire database
    ///
    /// Used by the Migrator's cleanup-on-failure path.
    async fn destroy(&self) -> Result<()>;
}
