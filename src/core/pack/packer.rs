//! Packer - live source to static snapshot
//!
//! The Packer reads a course out of a [`DocumentSource`] once and produces
//! an immutable snapshot directory through a [`FileSystemAdapter`]: chunk
//! files, index files, extracted attachments, verbatim design documents, and
//! finally the manifest.
//!
//! The manifest is written **last**. Its presence is the sole commit marker
//! for a complete snapshot, so an aborted or cancelled run leaves a
//! directory that is correctly invalid no matter which partial files exist.

use crate::adapters::fs::FileSystemAdapter;
use crate::adapters::source::DocumentSource;
use crate::core::pack::index::IndexBuilder;
use crate::core::pack::layout;
use crate::core::progress::{ProgressCallback, ProgressReporter};
use crate::domain::{
    AttachmentStub, ChunkDescriptor, ChunkId, CourseId, CoursePackError, DesignDocDescriptor,
    Document, DocumentId, IndexDescriptor, Manifest, PackedDocument, Result, ATTACHMENTS_DIR,
    CHUNKS_DIR, DESIGN_DOCS_DIR, INDICES_DIR, MANIFEST_FILE, MANIFEST_SCHEMA_VERSION,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Configuration for a pack run
///
/// Threaded explicitly into [`Packer::new`]; there is no ambient shared
/// state, so two packs against different sources can run concurrently
/// without interference.
#[derive(Debug, Clone)]
pub struct PackConfig {
    /// Maximum documents per chunk, and the page size used when listing the
    /// source (bounds peak memory). Must be at least 1.
    pub chunk_size: usize,

    /// Extract binary attachments to files and record stubs. When false,
    /// attachment entries are dropped entirely rather than emitting empty
    /// stubs.
    pub include_attachments: bool,

    /// Skip documents that fail to serialize and record a warning, instead
    /// of aborting the whole run.
    pub best_effort: bool,

    /// Human-readable course name for the manifest; falls back to the
    /// course id.
    pub course_name: Option<String>,
}

impl PackConfig {
    /// Validates the configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.chunk_size < 1 {
            return Err("chunk_size must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            include_attachments: true,
            best_effort: false,
            course_name: None,
        }
    }
}

/// Summary of a pack run
#[derive(Debug, Clone, Default)]
pub struct PackSummary {
    /// Documents persisted into chunks
    pub documents_packed: usize,

    /// Attachment files extracted
    pub attachments_extracted: usize,

    /// Design documents copied
    pub design_docs_copied: usize,

    /// Chunk files written
    pub chunks_written: usize,

    /// Documents skipped in best-effort mode
    pub documents_skipped: usize,

    /// Duration of the run
    pub duration: Duration,

    /// Per-document problems recorded in best-effort mode
    pub warnings: Vec<String>,
}

impl PackSummary {
    /// Records a warning
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Logs the summary
    pub fn log_summary(&self) {
        tracing::info!(
            documents_packed = self.documents_packed,
            attachments_extracted = self.attachments_extracted,
            design_docs_copied = self.design_docs_copied,
            chunks_written = self.chunks_written,
            documents_skipped = self.documents_skipped,
            duration_ms = self.duration.as_millis() as u64,
            "Pack completed"
        );
        for warning in &self.warnings {
            tracing::warn!(warning = %warning, "Pack warning");
        }
    }
}

/// Result of a pack run: the manifest plus run accounting
#[derive(Debug, Clone)]
pub struct PackOutcome {
    /// The manifest as written to the snapshot
    pub manifest: Manifest,

    /// Run accounting
    pub summary: PackSummary,
}

/// Packs a course from a live source into a static snapshot directory
///
/// # Examples
///
/// ```no_run
/// use coursepack::adapters::fs::LocalFileSystem;
/// use coursepack::adapters::source::MemoryDocumentSource;
/// use coursepack::core::pack::{PackConfig, Packer};
/// use coursepack::domain::CourseId;
/// use std::sync::Arc;
///
/// # async fn example() -> coursepack::domain::Result<()> {
/// let fs = Arc::new(LocalFileSystem::new("/srv/courses"));
/// let source = MemoryDocumentSource::new();
///
/// let packer = Packer::new(fs, PackConfig::default())?;
/// let outcome = packer
///     .pack(&source, &CourseId::new("anatomy-101").unwrap(), "anatomy-101", Vec::new())
///     .await?;
/// println!("packed {} documents", outcome.manifest.document_count);
/// # Ok(())
/// # }
/// ```
pub struct Packer {
    fs: Arc<dyn FileSystemAdapter>,
    config: PackConfig,
    progress: ProgressReporter,
}

impl Packer {
    /// Creates a packer writing through the given filesystem adapter
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the config is invalid.
    pub fn new(fs: Arc<dyn FileSystemAdapter>, config: PackConfig) -> Result<Self> {
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

    /// Packs one course into `snapshot_dir`
    ///
    /// Reads the source exactly once, in pages of `chunk_size`. The full
    /// identifier set is sorted ascending before chunking, fixing a
    /// deterministic global document order: re-packing an unchanged course
    /// yields identical chunk membership.
    ///
    /// # Errors
    ///
    /// - [`CoursePackError::Connection`] if the source is unreachable;
    ///   nothing is written.
    /// - [`CoursePackError::Document`] if a document fails to serialize and
    ///   best-effort mode is off; no manifest is written.
    pub async fn pack(
        &self,
        source: &dyn DocumentSource,
        course_id: &CourseId,
        snapshot_dir: &str,
        mut index_builders: Vec<Box<dyn IndexBuilder>>,
    ) -> Result<PackOutcome> {
        let start = Instant::now();
        let mut summary = PackSummary::default();

        // Fatal before any write: a directory is only created for a
        // reachable source.
        source.ping().await?;

        tracing::info!(
            course_id = %course_id,
            snapshot_dir = %snapshot_dir,
            chunk_size = self.config.chunk_size,
            include_attachments = self.config.include_attachments,
            "Starting pack"
        );

        let ids = self.collect_document_ids(source).await?;
        let total_documents = ids.len();
        self.progress.emit(
            "collect",
            format!("collected {total_documents} document ids"),
            total_documents,
            total_documents,
        );

        self.prepare_directories(snapshot_dir).await?;

        // Chunks are processed strictly sequentially; only attachment
        // writes within one chunk run concurrently.
        let mut chunks = Vec::new();
        for (ordinal, chunk_ids) in ids.chunks(self.config.chunk_size).enumerate() {
            let chunk_id = ChunkId::new(ordinal as u32);
            let documents = self
                .pack_chunk(source, snapshot_dir, chunk_id, chunk_ids, &mut summary)
                .await?;

            for document in &documents {
                for builder in index_builders.iter_mut() {
                    builder.observe(document);
                }
            }

            let path = layout::chunk_path(chunk_id);
            let value = serde_json::to_value(&documents)?;
            self.fs
                .write_json(&self.fs.join_path(snapshot_dir, &path), &value)
                .await?;

            summary.chunks_written += 1;
            summary.documents_packed += documents.len();
            chunks.push(ChunkDescriptor {
                id: chunk_id,
                path,
                document_count: documents.len(),
            });

            self.progress.emit(
                "pack",
                format!("wrote {chunk_id}"),
                summary.documents_packed,
                total_documents,
            );
        }

        let indices = self.write_indices(snapshot_dir, &mut index_builders).await?;
        let design_docs = self.write_design_docs(source, snapshot_dir, &mut summary).await?;

        let manifest = Manifest {
            schema_version: MANIFEST_SCHEMA_VERSION,
            course_id: course_id.clone(),
            course_name: self
                .config
                .course_name
                .clone()
                .unwrap_or_else(|| course_id.as_str().to_string()),
            last_updated: Utc::now(),
            document_count: summary.documents_packed,
            chunks,
            indices,
            design_docs,
        };

        // Manifest last: the commit marker for the whole directory.
        self.fs
            .write_json(
                &self.fs.join_path(snapshot_dir, MANIFEST_FILE),
                &serde_json::to_value(&manifest)?,
            )
            .await?;
        self.progress
            .emit("manifest", "manifest written", total_documents, total_documents);

        summary.duration = start.elapsed();
        summary.log_summary();

        Ok(PackOutcome { manifest, summary })
    }

    /// Pages through the source and returns the sorted identifier set
    async fn collect_document_ids(&self, source: &dyn DocumentSource) -> Result<Vec<DocumentId>> {
        let mut ids = Vec::new();
        let mut skip = 0;
        loop {
            let page = source.list_document_ids(self.config.chunk_size, skip).await?;
            let page_len = page.len();
            // The source contract excludes design documents; guard anyway so
            // a loose adapter cannot leak them into chunks.
            ids.extend(page.into_iter().filter(|id| !id.is_design()));
            if page_len < self.config.chunk_size {
                break;
            }
            skip += page_len;
        }
        ids.sort();
        Ok(ids)
    }

    async fn prepare_directories(&self, snapshot_dir: &str) -> Result<()> {
        self.fs.ensure_dir(snapshot_dir).await?;
        self.fs
            .ensure_dir(&self.fs.join_path(snapshot_dir, CHUNKS_DIR))
            .await?;
        self.fs
            .ensure_dir(&self.fs.join_path(snapshot_dir, INDICES_DIR))
            .await?;
        self.fs
            .ensure_dir(&self.fs.join_path(snapshot_dir, DESIGN_DOCS_DIR))
            .await?;
        if self.config.include_attachments {
            self.fs
                .ensure_dir(&self.fs.join_path(snapshot_dir, ATTACHMENTS_DIR))
                .await?;
        }
        Ok(())
    }

    /// Fetches and converts the documents of one chunk
    async fn pack_chunk(
        &self,
        source: &dyn DocumentSource,
        snapshot_dir: &str,
        chunk_id: ChunkId,
        chunk_ids: &[DocumentId],
        summary: &mut PackSummary,
    ) -> Result<Vec<PackedDocument>> {
        let mut documents = Vec::with_capacity(chunk_ids.len());

        for id in chunk_ids {
            let fetched = source
                .fetch_document(id, self.config.include_attachments)
                .await;
            let document = match fetched {
                Ok(document) => document,
                // Connectivity loss is fatal regardless of mode.
                Err(err @ CoursePackError::Connection(_)) => return Err(err),
                Err(err) => {
                    if self.config.best_effort {
                        tracing::warn!(
                            document_id = %id,
                            chunk_id = %chunk_id,
                            error = %err,
                            "Skipping document"
                        );
                        summary.documents_skipped += 1;
                        summary.add_warning(format!("skipped {id}: {err}"));
                        continue;
                    }
                    return Err(err);
                }
            };

            let stubs = if self.config.include_attachments {
                self.extract_attachments(snapshot_dir, &document, summary)
                    .await?
            } else {
                Vec::new()
            };

            documents.push(document.into_packed(stubs));
        }

        Ok(documents)
    }

    /// Writes one document's attachments and returns their stubs
    ///
    /// Attachment files carry no ordering dependency on each other or on
    /// the chunk's JSON file, so the writes run concurrently.
    async fn extract_attachments(
        &self,
        snapshot_dir: &str,
        document: &Document,
        summary: &mut PackSummary,
    ) -> Result<Vec<AttachmentStub>> {
        if !document.has_attachments() {
            return Ok(Vec::new());
        }

        self.fs
            .ensure_dir(&self.fs.join_path(snapshot_dir, &layout::attachment_dir(&document.id)))
            .await?;

        let mut stubs = Vec::with_capacity(document.attachments.len());
        let mut writes = Vec::with_capacity(document.attachments.len());
        for (name, data) in &document.attachments {
            let path = layout::attachment_path(&document.id, name);
            stubs.push(AttachmentStub {
                name: name.clone(),
                content_type: data.content_type.clone(),
                length: data.length(),
                path: path.clone(),
            });
            let full_path = self.fs.join_path(snapshot_dir, &path);
            let fs = self.fs.clone();
            writes.push(async move { fs.write_file(&full_path, &data.data).await });
        }

        futures::future::try_join_all(writes).await?;
        summary.attachments_extracted += stubs.len();
        Ok(stubs)
    }

    /// Finalizes each index builder to its own file
    async fn write_indices(
        &self,
        snapshot_dir: &str,
        index_builders: &mut [Box<dyn IndexBuilder>],
    ) -> Result<Vec<IndexDescriptor>> {
        let mut descriptors = Vec::with_capacity(index_builders.len());
        for builder in index_builders.iter_mut() {
            let path = layout::index_path(builder.name());
            let payload = builder.finish();
            self.fs
                .write_json(&self.fs.join_path(snapshot_dir, &path), &payload)
                .await?;
            tracing::debug!(index = %builder.name(), path = %path, "Wrote index");
            descriptors.push(IndexDescriptor {
                name: builder.name().to_string(),
                path,
            });
        }
        Ok(descriptors)
    }

    /// Copies design documents verbatim, one file each
    async fn write_design_docs(
        &self,
        source: &dyn DocumentSource,
        snapshot_dir: &str,
        summary: &mut PackSummary,
    ) -> Result<Vec<DesignDocDescriptor>> {
        let design_docs = source.design_documents().await?;
        let mut descriptors = Vec::with_capacity(design_docs.len());

        for doc in &design_docs {
            let path = layout::design_doc_path(doc.id.as_str());
            self.fs
                .write_json(
                    &self.fs.join_path(snapshot_dir, &path),
                    &serde_json::to_value(doc)?,
                )
                .await?;
            descriptors.push(DesignDocDescriptor {
                id: doc.id.as_str().to_string(),
            });
        }

        summary.design_docs_copied = descriptors.len();
        self.progress.emit(
            "design",
            format!("copied {} design documents", descriptors.len()),
            descriptors.len(),
            descriptors.len(),
        );
        Ok(descriptors)
    }
}
