//! In-memory document source
//!
//! A complete [`DocumentSource`] over ordered in-memory maps. Serves as the
//! test double for both directions of the engine and as a lightweight target
//! for round-trip verification. Failure paths are testable through two
//! switches: a simulated outage (every call fails with a connection error)
//! and a per-document rejection set (those ids are rejected by
//! `bulk_upsert` without failing the batch).

use super::traits::{BulkUpsertOutcome, DocumentSource, UpsertRejection};
use crate::domain::{CoursePackError, DesignDocument, Document, DocumentId, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Document source holding a course in memory
pub struct MemoryDocumentSource {
    documents: RwLock<BTreeMap<DocumentId, Document>>,
    design_docs: RwLock<BTreeMap<DocumentId, DesignDocument>>,
    available: AtomicBool,
    rejected_ids: RwLock<BTreeSet<DocumentId>>,
    failing_fetches: RwLock<BTreeSet<DocumentId>>,
    bulk_calls: AtomicUsize,
    bulk_failure_after: RwLock<Option<usize>>,
}

impl MemoryDocumentSource {
    /// Creates an empty, reachable source
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(BTreeMap::new()),
            design_docs: RwLock::new(BTreeMap::new()),
            available: AtomicBool::new(true),
            rejected_ids: RwLock::new(BTreeSet::new()),
            failing_fetches: RwLock::new(BTreeSet::new()),
            bulk_calls: AtomicUsize::new(0),
            bulk_failure_after: RwLock::new(None),
        }
    }

    /// Seeds a document, replacing any existing one with the same id
    pub async fn insert_document(&self, doc: Document) {
        if doc.id.is_design() {
            panic!("use insert_design_document for design documents");
        }
        self.documents.write().await.insert(doc.id.clone(), doc);
    }

    /// Seeds a design document
    pub async fn insert_design_document(&self, doc: DesignDocument) {
        self.design_docs.write().await.insert(doc.id.clone(), doc);
    }

    /// Simulates an outage (false) or restores connectivity (true)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Marks an id so `bulk_upsert` rejects it without failing the batch
    pub async fn reject_upserts_for(&self, id: DocumentId) {
        self.rejected_ids.write().await.insert(id);
    }

    /// Marks an id so `fetch_document` fails with a document error
    pub async fn fail_fetches_for(&self, id: DocumentId) {
        self.failing_fetches.write().await.insert(id);
    }

    /// Makes `bulk_upsert` fail with a connection error after `calls`
    /// successful batch calls, simulating mid-run connectivity loss
    pub async fn fail_bulk_upserts_after(&self, calls: usize) {
        *self.bulk_failure_after.write().await = Some(calls);
    }

    /// Returns a stored document by id, for test assertions
    pub async fn get(&self, id: &DocumentId) -> Option<Document> {
        self.documents.read().await.get(id).cloned()
    }

    /// Returns a stored design document by id, for test assertions
    pub async fn get_design(&self, id: &DocumentId) -> Option<DesignDocument> {
        self.design_docs.read().await.get(id).cloned()
    }

    fn check_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CoursePackError::Connection(
                "in-memory source is offline".to_string(),
            ))
        }
    }
}

impl Default for MemoryDocumentSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentSource for MemoryDocumentSource {
    async fn ping(&self) -> Result<()> {
        self.check_available()
    }

    async fn list_document_ids(&self, limit: usize, skip: usize) -> Result<Vec<DocumentId>> {
        self.check_available()?;
        Ok(self
            .documents
            .read()
            .await
            .keys()
            .skip(skip)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn fetch_document(&self, id: &DocumentId, with_attachments: bool) -> Result<Document> {
        self.check_available()?;
        if self.failing_fetches.read().await.contains(id) {
            return Err(CoursePackError::document(
                id.as_str(),
                "document cannot be serialized",
            ));
        }
        let mut doc = self
            .documents
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| CoursePackError::document(id.as_str(), "not found in source"))?;
        if !with_attachments {
            doc.attachments.clear();
        }
        Ok(doc)
    }

    async fn design_documents(&self) -> Result<Vec<DesignDocument>> {
        self.check_available()?;
        Ok(self.design_docs.read().await.values().cloned().collect())
    }

    async fn put_design_document(&self, doc: &DesignDocument) -> Result<()> {
        self.check_available()?;
        self.design_docs
            .write()
            .await
            .insert(doc.id.clone(), doc.clone());
        Ok(())
    }

    async fn bulk_upsert(&self, docs: Vec<Document>) -> Result<BulkUpsertOutcome> {
        self.check_available()?;
        if let Some(limit) = *self.bulk_failure_after.read().await {
            if self.bulk_calls.fetch_add(1, Ordering::SeqCst) >= limit {
                return Err(CoursePackError::Connection(
                    "connection lost during bulk upsert".to_string(),
                ));
            }
        }
        let rejected_ids = self.rejected_ids.read().await;
        let mut store = self.documents.write().await;
        let mut outcome = BulkUpsertOutcome::default();

        for doc in docs {
            if rejected_ids.contains(&doc.id) {
                outcome.rejections.push(UpsertRejection {
                    id: doc.id,
                    reason: "rejected by target".to_string(),
                });
                continue;
            }
            // Overwrite is the in-memory analogue of reusing the existing
            // revision: a re-run converges instead of conflicting.
            store.insert(doc.id.clone(), doc);
            outcome.accepted += 1;
        }

        Ok(outcome)
    }

    async fn document_count(&self) -> Result<usize> {
        self.check_available()?;
        Ok(self.documents.read().await.len())
    }

    async fn destroy(&self) -> Result<()> {
        self.check_available()?;
        self.documents.write().await.clear();
        self.design_docs.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str) -> Document {
        let fields = match json!({"n": id}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        Document::new(DocumentId::new(id).unwrap(), fields)
    }

    #[tokio::test]
    async fn test_paged_listing() {
        let source = MemoryDocumentSource::new();
        for i in 0..5 {
            source.insert_document(doc(&format!("card-{i:02}"))).await;
        }

        let first = source.list_document_ids(2, 0).await.unwrap();
        let second = source.list_document_ids(2, 2).await.unwrap();
        let last = source.list_document_ids(2, 4).await.unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert_eq!(last.len(), 1);
        assert_eq!(first[0].as_str(), "card-00");
        assert_eq!(last[0].as_str(), "card-04");
    }

    #[tokio::test]
    async fn test_fetch_without_attachments_strips_bytes() {
        use crate::domain::AttachmentData;

        let source = MemoryDocumentSource::new();
        let with_audio = doc("card-01")
            .with_attachment("a.mp3", AttachmentData::new("audio/mpeg", vec![1, 2, 3]));
        source.insert_document(with_audio).await;

        let id = DocumentId::new("card-01").unwrap();
        let bare = source.fetch_document(&id, false).await.unwrap();
        assert!(!bare.has_attachments());

        let full = source.fetch_document(&id, true).await.unwrap();
        assert!(full.has_attachments());
    }

    #[tokio::test]
    async fn test_bulk_upsert_is_idempotent() {
        let source = MemoryDocumentSource::new();

        let outcome = source.bulk_upsert(vec![doc("a"), doc("b")]).await.unwrap();
        assert_eq!(outcome.accepted, 2);
        assert_eq!(source.document_count().await.unwrap(), 2);

        let outcome = source.bulk_upsert(vec![doc("a"), doc("b")]).await.unwrap();
        assert_eq!(outcome.accepted, 2);
        assert_eq!(source.document_count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_rejected_ids_do_not_fail_batch() {
        let source = MemoryDocumentSource::new();
        source
            .reject_upserts_for(DocumentId::new("bad").unwrap())
            .await;

        let outcome = source.bulk_upsert(vec![doc("good"), doc("bad")]).await.unwrap();
        assert_eq!(outcome.accepted, 1);
        assert_eq!(outcome.rejections.len(), 1);
        assert_eq!(outcome.rejections[0].id.as_str(), "bad");
    }

    #[tokio::test]
    async fn test_outage_fails_all_calls() {
        let source = MemoryDocumentSource::new();
        source.set_available(false);

        assert!(matches!(
            source.ping().await,
            Err(CoursePackError::Connection(_))
        ));
        assert!(source.list_document_ids(10, 0).await.is_err());
        assert!(source.bulk_upsert(vec![doc("a")]).await.is_err());
    }

    #[tokio::test]
    async fn test_destroy_clears_everything() {
        let source = MemoryDocumentSource::new();
        source.insert_document(doc("a")).await;

        source.destroy().await.unwrap();
        assert_eq!(source.document_count().await.unwrap(), 0);
    }
}
