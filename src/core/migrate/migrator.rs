//! Migrator - static snapshot to live target
//!
//! The Migrator replays a validated snapshot directory into a live
//! [`DocumentSource`]: design documents first, then every chunk in manifest
//! order, rehydrating attachment stubs back into inline bytes and
//! submitting documents in bounded batches.
//!
//! The run is best-effort forward progress, not all-or-nothing: a
//! per-document rejection inside a batch becomes a warning and the run
//! continues; only whole-batch connectivity loss is fatal. Because the
//! upsert contract reuses existing revisions, re-running a migration
//! against an already-partially-populated target converges instead of
//! conflicting.

use crate::adapters::fs::FileSystemAdapter;
use crate::adapters::source::DocumentSource;
use crate::core::pack::layout;
use crate::core::progress::{ProgressCallback, ProgressReporter};
use crate::core::validate::Validator;
use crate::domain::{
    AttachmentData, CoursePackError, DesignDocument, Document, Manifest, PackedDocument, Result,
    MANIFEST_FILE,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Configuration for a migration run
#[derive(Debug, Clone)]
pub struct MigrateConfig {
    /// Maximum documents per bulk upsert. Must be at least 1.
    pub chunk_batch_size: usize,

    /// After replay, diff the target's document count against the manifest
    pub validate_round_trip: bool,

    /// On a fatal failure, attempt to destroy the partially populated
    /// target before returning
    pub cleanup_on_failure: bool,
}

impl MigrateConfig {
    /// Validates the configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.chunk_batch_size < 1 {
            return Err("chunk_batch_size must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            chunk_batch_size: 100,
            validate_round_trip: false,
            cleanup_on_failure: false,
        }
    }
}

/// Result of a migration run
///
/// Per-document and per-batch problems accumulate into `warnings`; run
/// fatals that occurred after writes began accumulate into `errors` and
/// clear `success`, preserving the partial-progress counters.
#[derive(Debug, Clone, Default)]
pub struct MigrationSummary {
    /// True iff the run completed with no errors
    pub success: bool,

    /// Documents accepted by the target
    pub documents_restored: usize,

    /// Design documents upserted into the target
    pub design_docs_restored: usize,

    /// Attachments rehydrated onto restored documents
    pub attachments_restored: usize,

    /// Duration of the run
    pub migration_time: Duration,

    /// Non-fatal problems (rejected documents, missing attachments, ...)
    pub warnings: Vec<String>,

    /// Fatal problems that ended or failed the run
    pub errors: Vec<String>,
}

impl MigrationSummary {
    /// Logs the summary
    pub fn log_summary(&self) {
        tracing::info!(
            success = self.success,
            documents_restored = self.documents_restored,
            design_docs_restored = self.design_docs_restored,
            attachments_restored = self.attachments_restored,
            migration_time_ms = self.migration_time.as_millis() as u64,
            warnings = self.warnings.len(),
            errors = self.errors.len(),
            "Migration completed"
        );
        for warning in &self.warnings {
            tracing::warn!(warning = %warning, "Migration warning");
        }
        for error in &self.errors {
            tracing::error!(error = %error, "Migration error");
        }
    }
}

/// Migrates a static snapshot into a live target
///
/// # Examples
///
/// ```no_run
/// use coursepack::adapters::fs::LocalFileSystem;
/// use coursepack::adapters::source::MemoryDocumentSource;
/// use coursepack::core::migrate::{MigrateConfig, Migrator};
/// use std::sync::Arc;
///
/// # async fn example() -> coursepack::domain::Result<()> {
/// let fs = Arc::new(LocalFileSystem::new("/srv/courses"));
/// let target = MemoryDocumentSource::new();
///
/// let migrator = Migrator::new(fs, MigrateConfig::default())?;
/// let summary = migrator.migrate("anatomy-101", &target).await?;
/// println!("restored {} documents", summary.documents_restored);
/// # Ok(())
/// # }
/// ```
pub struct Migrator {
    fs: Arc<dyn FileSystemAdapter>,
    config: MigrateConfig,
    progress: ProgressReporter,
}

impl Migrator {
    /// Creates a migrator reading through the given filesystem adapter
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the config is invalid.
    pub fn new(fs: Arc<dyn FileSystemAdapter>, config: MigrateConfig) -> Result<Self> {
        config.validate().map_err(CoursePackError::Configuration)?;
        Ok(Self {
            fs,
            config,
            progress: ProgressReporter::disabled(),
        })
    }

    /// Attaches a progress callback
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = ProgressReporter::new(callback);
        self
    }

    /// Migrates the snapshot at `static_dir` into `target`
    ///
    /// The snapshot directory is never mutated; this run owns writes to the
    /// target only.
    ///
    /// # Errors
    ///
    /// Returns `Err` only when nothing was written: the validation gate
    /// failed ([`CoursePackError::Validation`]) or the target is
    /// unreachable ([`CoursePackError::Connection`]). Fatal failures after
    /// writes began are reported through the summary with `success =
    /// false`.
    pub async fn migrate(
        &self,
        static_dir: &str,
        target: &dyn DocumentSource,
    ) -> Result<MigrationSummary> {
        let start = Instant::now();
        let mut summary = MigrationSummary::default();

        // Pre-flight gate: fail fast with no writes to the target.
        let report = Validator::new(self.fs.clone()).validate(static_dir).await;
        if !report.valid {
            report.log_report();
            return Err(CoursePackError::Validation(format!(
                "snapshot {static_dir} failed validation: {}",
                report.errors.join("; ")
            )));
        }
        for warning in report.warnings {
            summary.warnings.push(warning);
        }

        target.ping().await?;

        let manifest = self.read_manifest(static_dir).await?;
        tracing::info!(
            course_id = %manifest.course_id,
            document_count = manifest.document_count,
            chunks = manifest.chunks.len(),
            "Starting migration"
        );

        self.restore_design_docs(static_dir, &manifest, target, &mut summary)
            .await;

        for descriptor in &manifest.chunks {
            let documents = match self.read_chunk(static_dir, &descriptor.path).await {
                Ok(documents) => documents,
                Err(e) => {
                    // The gate saw this file; losing it mid-run means the
                    // snapshot moved underneath us.
                    return self
                        .fail_run(summary, target, format!("chunk {} unreadable: {e}", descriptor.id), start)
                        .await;
                }
            };

            for batch in documents.chunks(self.config.chunk_batch_size) {
                let mut rehydrated = Vec::with_capacity(batch.len());
                let mut batch_attachments = 0usize;
                for packed in batch {
                    let (document, count) = self
                        .rehydrate(static_dir, packed.clone(), &mut summary)
                        .await;
                    batch_attachments += count;
                    rehydrated.push(document);
                }

                let submitted = rehydrated.len();
                match target.bulk_upsert(rehydrated).await {
                    Ok(outcome) => {
                        summary.documents_restored += outcome.accepted;
                        summary.attachments_restored += batch_attachments;
                        if !outcome.is_complete() {
                            let partial = CoursePackError::PartialWrite {
                                rejected: outcome.rejections.len(),
                                total: submitted,
                            };
                            tracing::warn!(
                                chunk_id = %descriptor.id,
                                rejected = outcome.rejections.len(),
                                "Batch partially rejected"
                            );
                            summary.warnings.push(partial.to_string());
                            for rejection in outcome.rejections {
                                summary
                                    .warnings
                                    .push(format!("rejected {}: {}", rejection.id, rejection.reason));
                            }
                        }
                    }
                    Err(e) => {
                        return self
                            .fail_run(
                                summary,
                                target,
                                format!("batch failed in chunk {}: {e}", descriptor.id),
                                start,
                            )
                            .await;
                    }
                }

                self.progress.emit(
                    "migrate",
                    format!("restored batch in {}", descriptor.id),
                    summary.documents_restored,
                    manifest.document_count,
                );
            }
        }

        if self.config.validate_round_trip {
            self.verify_round_trip(&manifest, target, &mut summary).await;
        }

        summary.success = summary.errors.is_empty();
        if !summary.success && self.config.cleanup_on_failure {
            self.cleanup(target).await;
        }
        summary.migration_time = start.elapsed();
        summary.log_summary();
        Ok(summary)
    }

    async fn read_manifest(&self, static_dir: &str) -> Result<Manifest> {
        let raw = self
            .fs
            .read_file(&self.fs.join_path(static_dir, MANIFEST_FILE))
            .await?;
        Ok(serde_json::from_str(&raw)?)
    }

    async fn read_chunk(&self, static_dir: &str, path: &str) -> Result<Vec<PackedDocument>> {
        let raw = self.fs.read_file(&self.fs.join_path(static_dir, path)).await?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Upserts design documents verbatim; failures degrade to warnings
    /// because the target remains usable without them
    async fn restore_design_docs(
        &self,
        static_dir: &str,
        manifest: &Manifest,
        target: &dyn DocumentSource,
        summary: &mut MigrationSummary,
    ) {
        let total = manifest.design_docs.len();
        for descriptor in &manifest.design_docs {
            let path = layout::design_doc_path(&descriptor.id);
            let restored = self.restore_one_design_doc(static_dir, &path, target).await;
            match restored {
                Ok(()) => summary.design_docs_restored += 1,
                Err(e) => {
                    tracing::warn!(
                        design_doc = %descriptor.id,
                        error = %e,
                        "Failed to restore design document"
                    );
                    summary
                        .warnings
                        .push(format!("design doc {} not restored: {e}", descriptor.id));
                }
            }
            self.progress.emit(
                "design",
                format!("restored design doc {}", descriptor.id),
                summary.design_docs_restored,
                total,
            );
        }
    }

    async fn restore_one_design_doc(
        &self,
        static_dir: &str,
        path: &str,
        target: &dyn DocumentSource,
    ) -> Result<()> {
        let raw = self.fs.read_file(&self.fs.join_path(static_dir, path)).await?;
        let doc: DesignDocument = serde_json::from_str(&raw)?;
        target.put_design_document(&doc).await
    }

    /// Rehydrates one document's attachment stubs into inline bytes
    ///
    /// A missing attachment file degrades the document (warning) rather
    /// than failing the run; the document is still migrated without it.
    async fn rehydrate(
        &self,
        static_dir: &str,
        packed: PackedDocument,
        summary: &mut MigrationSummary,
    ) -> (Document, usize) {
        let mut attachments = BTreeMap::new();
        for stub in &packed.attachments {
            let path = self.fs.join_path(static_dir, &stub.path);
            match self.fs.read_binary(&path).await {
                Ok(data) => {
                    attachments.insert(
                        stub.name.clone(),
                        AttachmentData::new(stub.content_type.clone(), data),
                    );
                }
                Err(_) => {
                    summary.warnings.push(format!(
                        "attachment {} of {} could not be read, document migrated without it",
                        stub.name, packed.id
                    ));
                }
            }
        }
        let count = attachments.len();
        (packed.into_document(attachments), count)
    }

    /// Diffs the target's count against the manifest after replay
    async fn verify_round_trip(
        &self,
        manifest: &Manifest,
        target: &dyn DocumentSource,
        summary: &mut MigrationSummary,
    ) {
        let found = match target.document_count().await {
            Ok(found) => found,
            Err(e) => {
                summary
                    .errors
                    .push(format!("round-trip validation failed to count target: {e}"));
                return;
            }
        };

        if found != manifest.document_count {
            let per_chunk: Vec<String> = manifest
                .chunks
                .iter()
                .map(|c| format!("{}={}", c.id, c.document_count))
                .collect();
            let detail = CoursePackError::Validation(format!(
                "target holds {found} documents, manifest declares {} ({})",
                manifest.document_count,
                per_chunk.join(", ")
            ));
            summary.errors.push(detail.to_string());
        }
        self.progress.emit(
            "verify",
            "round-trip count check complete",
            found,
            manifest.document_count,
        );
    }

    /// Records a fatal mid-run failure, optionally cleaning up the target
    async fn fail_run(
        &self,
        mut summary: MigrationSummary,
        target: &dyn DocumentSource,
        error: String,
        start: Instant,
    ) -> Result<MigrationSummary> {
        tracing::error!(error = %error, "Migration failed");
        summary.errors.push(error);
        summary.success = false;
        if self.config.cleanup_on_failure {
            self.cleanup(target).await;
        }
        summary.migration_time = start.elapsed();
        summary.log_summary();
        Ok(summary)
    }

    /// Best-effort destroy of the partially populated target
    async fn cleanup(&self, target: &dyn DocumentSource) {
        tracing::info!("Cleaning up partially populated target");
        if let Err(e) = target.destroy().await {
            tracing::error!(error = %e, "Failed to destroy target during cleanup");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::fs::MemoryFileSystem;
    use crate::adapters::source::MemoryDocumentSource;
    use crate::core::pack::{PackConfig, Packer};
    use crate::domain::{AttachmentData, CourseId, DocumentId};
    use serde_json::json;

    fn doc(id: &str) -> Document {
        let fields = match json!({"front": format!("q {id}")}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        Document::new(DocumentId::new(id).unwrap(), fields)
    }

    async fn snapshot(fs: Arc<MemoryFileSystem>, count: usize, chunk_size: usize) {
        let source = MemoryDocumentSource::new();
        for i in 0..count {
            source.insert_document(doc(&format!("card-{i:03}"))).await;
        }
        Packer::new(
            fs,
            PackConfig {
                chunk_size,
                ..Default::default()
            },
        )
        .unwrap()
        .pack(&source, &CourseId::new("course").unwrap(), "course", Vec::new())
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_migrate_restores_all_documents() {
        let fs = Arc::new(MemoryFileSystem::new());
        snapshot(fs.clone(), 10, 4).await;
        let target = MemoryDocumentSource::new();

        let summary = Migrator::new(fs, MigrateConfig::default())
            .unwrap()
            .migrate("course", &target)
            .await
            .unwrap();

        assert!(summary.success);
        assert_eq!(summary.documents_restored, 10);
        assert_eq!(target.document_count().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let fs = Arc::new(MemoryFileSystem::new());
        snapshot(fs.clone(), 3, 1).await;
        let target = MemoryDocumentSource::new();
        let migrator = Migrator::new(fs, MigrateConfig::default()).unwrap();

        let first = migrator.migrate("course", &target).await.unwrap();
        assert_eq!(first.documents_restored, 3);

        let second = migrator.migrate("course", &target).await.unwrap();
        assert_eq!(second.documents_restored, 3);
        assert_eq!(target.document_count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_invalid_snapshot_fails_fast_with_no_writes() {
        let fs = Arc::new(MemoryFileSystem::new());
        let target = MemoryDocumentSource::new();

        let result = Migrator::new(fs, MigrateConfig::default())
            .unwrap()
            .migrate("missing", &target)
            .await;

        assert!(matches!(result, Err(CoursePackError::Validation(_))));
        assert_eq!(target.document_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_target_fails_fast() {
        let fs = Arc::new(MemoryFileSystem::new());
        snapshot(fs.clone(), 2, 10).await;
        let target = MemoryDocumentSource::new();
        target.set_available(false);

        let result = Migrator::new(fs, MigrateConfig::default())
            .unwrap()
            .migrate("course", &target)
            .await;

        assert!(matches!(result, Err(CoursePackError::Connection(_))));
    }

    #[tokio::test]
    async fn test_rejected_document_is_warning_and_run_continues() {
        let fs = Arc::new(MemoryFileSystem::new());
        snapshot(fs.clone(), 5, 2).await;
        let target = MemoryDocumentSource::new();
        target
            .reject_upserts_for(DocumentId::new("card-002").unwrap())
            .await;

        let summary = Migrator::new(fs, MigrateConfig::default())
            .unwrap()
            .migrate("course", &target)
            .await
            .unwrap();

        assert!(summary.success);
        assert_eq!(summary.documents_restored, 4);
        assert!(summary.warnings.iter().any(|w| w.contains("card-002")));
        assert!(summary
            .warnings
            .iter()
            .any(|w| w.contains("Partial write")));
    }

    #[tokio::test]
    async fn test_batch_connectivity_loss_is_fatal_but_returns_summary() {
        let fs = Arc::new(MemoryFileSystem::new());
        snapshot(fs.clone(), 10, 2).await;
        let target = MemoryDocumentSource::new();
        target.fail_bulk_upserts_after(2).await;

        let summary = Migrator::new(
            fs,
            MigrateConfig {
                chunk_batch_size: 2,
                ..Default::default()
            },
        )
        .unwrap()
        .migrate("course", &target)
        .await
        .unwrap();

        assert!(!summary.success);
        assert_eq!(summary.documents_restored, 4);
        assert_eq!(summary.errors.len(), 1);
        // Without cleanup, the partial target is left for inspection.
        assert_eq!(target.document_count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_cleanup_on_failure_destroys_partial_target() {
        let fs = Arc::new(MemoryFileSystem::new());
        snapshot(fs.clone(), 10, 2).await;
        let target = MemoryDocumentSource::new();
        target.fail_bulk_upserts_after(2).await;

        let summary = Migrator::new(
            fs,
            MigrateConfig {
                chunk_batch_size: 2,
                cleanup_on_failure: true,
                ..Default::default()
            },
        )
        .unwrap()
        .migrate("course", &target)
        .await
        .unwrap();

        assert!(!summary.success);
        assert_eq!(target.document_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_round_trip_validation_passes_on_complete_run() {
        let fs = Arc::new(MemoryFileSystem::new());
        snapshot(fs.clone(), 6, 3).await;
        let target = MemoryDocumentSource::new();

        let summary = Migrator::new(
            fs,
            MigrateConfig {
                validate_round_trip: true,
                ..Default::default()
            },
        )
        .unwrap()
        .migrate("course", &target)
        .await
        .unwrap();

        assert!(summary.success);
    }

    #[tokio::test]
    async fn test_round_trip_mismatch_reported_without_rollback() {
        let fs = Arc::new(MemoryFileSystem::new());
        snapshot(fs.clone(), 4, 2).await;
        let target = MemoryDocumentSource::new();
        // Pre-existing stranger document makes the target count diverge.
        target.insert_document(doc("stranger")).await;

        let summary = Migrator::new(
            fs,
            MigrateConfig {
                validate_round_trip: true,
                ..Default::default()
            },
        )
        .unwrap()
        .migrate("course", &target)
        .await
        .unwrap();

        assert!(!summary.success);
        assert!(summary.errors[0].contains("chunk-0000=2"));
        // No automatic rollback without cleanup_on_failure.
        assert_eq!(target.document_count().await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_design_docs_restored_before_chunks() {
        use crate::domain::DesignDocument;

        let fs = Arc::new(MemoryFileSystem::new());
        let source = MemoryDocumentSource::new();
        source.insert_document(doc("card-000")).await;
        let fields = match json!({"views": {"by_tag": {}}}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        source
            .insert_design_document(
                DesignDocument::new(DocumentId::new("_design/views").unwrap(), fields).unwrap(),
            )
            .await;
        Packer::new(fs.clone(), PackConfig::default())
            .unwrap()
            .pack(&source, &CourseId::new("course").unwrap(), "course", Vec::new())
            .await
            .unwrap();

        let target = MemoryDocumentSource::new();
        let summary = Migrator::new(fs, MigrateConfig::default())
            .unwrap()
            .migrate("course", &target)
            .await
            .unwrap();

        assert_eq!(summary.design_docs_restored, 1);
        let restored = target
            .get_design(&DocumentId::new("_design/views").unwrap())
            .await
            .expect("design doc restored");
        assert_eq!(restored.fields["views"]["by_tag"], json!({}));
    }

    #[tokio::test]
    async fn test_attachments_rehydrated_inline() {
        let fs = Arc::new(MemoryFileSystem::new());
        let source = MemoryDocumentSource::new();
        source
            .insert_document(doc("card-000").with_attachment(
                "clip.mp3",
                AttachmentData::new("audio/mpeg", vec![5u8; 512]),
            ))
            .await;
        Packer::new(fs.clone(), PackConfig::default())
            .unwrap()
            .pack(&source, &CourseId::new("course").unwrap(), "course", Vec::new())
            .await
            .unwrap();

        let target = MemoryDocumentSource::new();
        let summary = Migrator::new(fs, MigrateConfig::default())
            .unwrap()
            .migrate("course", &target)
            .await
            .unwrap();

        assert_eq!(summary.attachments_restored, 1);
        let restored = target
            .get(&DocumentId::new("card-000").unwrap())
            .await
            .unwrap();
        assert_eq!(restored.attachments["clip.mp3"].data.len(), 512);
        assert_eq!(restored.attachments["clip.mp3"].content_type, "audio/mpeg");
    }

    #[tokio::test]
    async fn test_zero_batch_size_rejected() {
        let fs = Arc::new(MemoryFileSystem::new());
        let result = Migrator::new(
            fs,
            MigrateConfig {
                chunk_batch_size: 0,
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(CoursePackError::Configuration(_))));
    }
}
