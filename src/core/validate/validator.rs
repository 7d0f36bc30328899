//! Snapshot validator
//!
//! Structural integrity checks over a static course directory. The
//! Migrator runs these as its pre-flight gate; callers can also run them
//! standalone, in which case a failed validation is merely reported, not
//! raised.
//!
//! A missing or unparseable manifest is fatal and short-circuits: the
//! manifest is the commit marker, so without it the directory is invalid
//! regardless of what partial files exist. Every later check accumulates
//! into the report without short-circuiting.

use crate::adapters::fs::FileSystemAdapter;
use crate::domain::{Manifest, PackedDocument, MANIFEST_FILE};
use std::sync::Arc;

/// Result of validating a snapshot directory
///
/// `valid` is true iff `errors` is empty; warnings degrade but never
/// invalidate. Course identity is surfaced whenever the manifest is
/// readable, independent of later failures, so callers can report which
/// course failed.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// True iff no errors were recorded
    pub valid: bool,

    /// Structural defects; any entry makes the snapshot invalid
    pub errors: Vec<String>,

    /// Degradations that do not invalidate the snapshot
    pub warnings: Vec<String>,

    /// Course id from the manifest, when readable
    pub course_id: Option<String>,

    /// Course name from the manifest, when readable
    pub course_name: Option<String>,
}

impl ValidationReport {
    fn finalize(mut self) -> Self {
        self.valid = self.errors.is_empty();
        self
    }

    /// Logs the report
    pub fn log_report(&self) {
        tracing::info!(
            valid = self.valid,
            errors = self.errors.len(),
            warnings = self.warnings.len(),
            course_id = self.course_id.as_deref().unwrap_or("<unknown>"),
            "Validation completed"
        );
        for error in &self.errors {
            tracing::error!(error = %error, "Validation error");
        }
        for warning in &self.warnings {
            tracing::warn!(warning = %warning, "Validation warning");
        }
    }
}

/// Validates static course directories through a filesystem adapter
pub struct Validator {
    fs: Arc<dyn FileSystemAdapter>,
}

impl Validator {
    /// Creates a validator reading through the given adapter
    pub fn new(fs: Arc<dyn FileSystemAdapter>) -> Self {
        Self { fs }
    }

    /// Validates the snapshot at `static_dir`
    ///
    /// Checks, in order: manifest exists and parses with a schema version
    /// and a non-negative document count (fatal, short-circuits); every
    /// chunk file exists, parses, and matches its declared count (error per
    /// miss); chunk ids are contiguous from zero (error); the chunk counts
    /// sum to the manifest's document count (error); every index file
    /// exists (warning per miss - indices are advisory); every attachment
    /// stub resolves to a file of the recorded length (warning per miss or
    /// mismatch).
    pub async fn validate(&self, static_dir: &str) -> ValidationReport {
        let mut report = ValidationReport::default();

        let manifest_path = self.fs.join_path(static_dir, MANIFEST_FILE);
        let raw = match self.fs.read_file(&manifest_path).await {
            Ok(raw) => raw,
            Err(_) => {
                report
                    .errors
                    .push(format!("manifest not readable: {manifest_path}"));
                return report.finalize();
            }
        };

        let value: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                report.errors.push(format!("manifest is not valid JSON: {e}"));
                return report.finalize();
            }
        };

        // Course identity is reported even when later checks fail.
        report.course_id = value
            .get("courseId")
            .and_then(|v| v.as_str())
            .map(String::from);
        report.course_name = value
            .get("courseName")
            .and_then(|v| v.as_str())
            .map(String::from);

        if value.get("schemaVersion").and_then(|v| v.as_u64()).is_none() {
            report
                .errors
                .push("manifest is missing a schemaVersion".to_string());
            return report.finalize();
        }
        match value.get("documentCount").and_then(|v| v.as_i64()) {
            Some(count) if count >= 0 => {}
            _ => {
                report
                    .errors
                    .push("manifest documentCount is missing or negative".to_string());
                return report.finalize();
            }
        }

        let manifest: Manifest = match serde_json::from_value(value) {
            Ok(manifest) => manifest,
            Err(e) => {
                report
                    .errors
                    .push(format!("manifest does not match the schema: {e}"));
                return report.finalize();
            }
        };

        self.check_chunks(static_dir, &manifest, &mut report).await;
        self.check_indices(static_dir, &manifest, &mut report).await;

        report.finalize()
    }

    async fn check_chunks(
        &self,
        static_dir: &str,
        manifest: &Manifest,
        report: &mut ValidationReport,
    ) {
        if !manifest.chunk_ids_contiguous() {
            report
                .errors
                .push("chunk ids are not a contiguous zero-based sequence".to_string());
        }

        let mut counted = 0usize;
        for descriptor in &manifest.chunks {
            let path = self.fs.join_path(static_dir, &descriptor.path);
            let raw = match self.fs.read_file(&path).await {
                Ok(raw) => raw,
                Err(_) => {
                    report
                        .errors
                        .push(format!("chunk file missing: {}", descriptor.path));
                    continue;
                }
            };

            let documents: Vec<PackedDocument> = match serde_json::from_str(&raw) {
                Ok(documents) => documents,
                Err(e) => {
                    report
                        .errors
                        .push(format!("chunk file unparseable: {}: {e}", descriptor.path));
                    continue;
                }
            };

            if documents.len() != descriptor.document_count {
                report.errors.push(format!(
                    "chunk {} declares {} documents but contains {}",
                    descriptor.id,
                    descriptor.document_count,
                    documents.len()
                ));
            }
            counted += documents.len();

            self.check_attachments(static_dir, &documents, report).await;
        }

        if counted != manifest.document_count {
            report.errors.push(format!(
                "chunk counts sum to {counted} but manifest declares {}",
                manifest.document_count
            ));
        }
    }

    async fn check_attachments(
        &self,
        static_dir: &str,
        documents: &[PackedDocument],
        report: &mut ValidationReport,
    ) {
        for document in documents {
            for stub in &document.attachments {
                let path = self.fs.join_path(static_dir, &stub.path);
                match self.fs.stat(&path).await {
                    Ok(stat) if stat.length == stub.length => {}
                    Ok(stat) => {
                        report.warnings.push(format!(
                            "attachment {} of {} is {} bytes, stub records {}",
                            stub.name, document.id, stat.length, stub.length
                        ));
                    }
                    Err(_) => {
                        report.warnings.push(format!(
                            "attachment file missing: {} (document {})",
                            stub.path, document.id
                        ));
                    }
                }
            }
        }
    }

    async fn check_indices(
        &self,
        static_dir: &str,
        manifest: &Manifest,
        report: &mut ValidationReport,
    ) {
        for descriptor in &manifest.indices {
            let path = self.fs.join_path(static_dir, &descriptor.path);
            match self.fs.exists(&path).await {
                Ok(true) => {}
                _ => {
                    report
                        .warnings
                        .push(format!("index file missing: {}", descriptor.path));
                }
            }
        }
    }
}
