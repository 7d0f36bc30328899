//! Snapshot directory layout
//!
//! Path derivation for every file a snapshot contains. All paths are
//! relative to the snapshot root and use `/` separators; the same functions
//! are used when packing (to place files) and when migrating (to re-derive
//! the design-doc paths the manifest does not record).

use crate::domain::ids::{ChunkId, DocumentId};
use crate::domain::manifest::{ATTACHMENTS_DIR, CHUNKS_DIR, DESIGN_DOCS_DIR, INDICES_DIR};

/// Replaces path-hostile characters in one path component
///
/// Characters outside `[A-Za-z0-9._-]` become `_`, so document ids like
/// `_design/validation` or ids containing spaces map to stable, portable
/// file names. An empty component maps to a single `_`.
pub fn sanitize_component(raw: &str) -> String {
    if raw.is_empty() {
        return "_".to_string();
    }
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Path of a chunk file
pub fn chunk_path(id: ChunkId) -> String {
    format!("{CHUNKS_DIR}/{}", id.file_name())
}

/// Path of an index file
pub fn index_path(name: &str) -> String {
    format!("{INDICES_DIR}/{}.json", sanitize_component(name))
}

/// Path of an extracted attachment
///
/// One directory per document keeps sibling attachments together and
/// minimizes cross-document name collisions after sanitizing.
pub fn attachment_path(doc_id: &DocumentId, attachment_name: &str) -> String {
    format!(
        "{ATTACHMENTS_DIR}/{}/{}",
        sanitize_component(doc_id.as_str()),
        sanitize_component(attachment_name)
    )
}

/// Directory holding one document's attachments
pub fn attachment_dir(doc_id: &DocumentId) -> String {
    format!("{ATTACHMENTS_DIR}/{}", sanitize_component(doc_id.as_str()))
}

/// Path of a design document file
///
/// The manifest records only the design doc id; this derivation must stay
/// stable so the Migrator can re-derive the path from the id alone.
pub fn design_doc_path(id: &str) -> String {
    format!("{DESIGN_DOCS_DIR}/{}.json", sanitize_component(id))
}
