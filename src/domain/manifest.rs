//! Manifest model
//!
//! The manifest is the single authoritative descriptor of a packed course and
//! the shared data contract between the Packer, Validator, and Migrator. Its
//! presence as a readable `manifest.json` is the sole commit marker for a
//! complete snapshot: every other file is written first, and a directory
//! without a manifest is invalid regardless of what partial files exist.

use super::ids::{ChunkId, CourseId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current manifest schema version, stamped into every new snapshot
pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

/// File name of the manifest within the snapshot root
pub const MANIFEST_FILE: &str = "manifest.json";

/// Directory holding chunk files, relative to the snapshot root
pub const CHUNKS_DIR: &str = "chunks";

/// Directory holding index files, relative to the snapshot root
pub const INDICES_DIR: &str = "indices";

/// Directory holding extracted attachment files, relative to the snapshot root
pub const ATTACHMENTS_DIR: &str = "attachments";

/// Directory holding design document files, relative to the snapshot root
pub const DESIGN_DOCS_DIR: &str = "design";

/// Descriptor for one chunk file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkDescriptor {
    /// Chunk id; ids form a contiguous zero-based sequence
    pub id: ChunkId,

    /// Path of the chunk file, relative to the snapshot root
    pub path: String,

    /// Number of documents persisted in this chunk
    pub document_count: usize,
}

/// Descriptor for one advisory index file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexDescriptor {
    /// Index name
    pub name: String,

    /// Path of the index file, relative to the snapshot root
    pub path: String,
}

/// Descriptor for one design document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignDocDescriptor {
    /// Reserved design document id (`_design/...`)
    pub id: String,
}

/// The authoritative descriptor of a packed course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Snapshot schema version
    pub schema_version: u32,

    /// Course identifier
    pub course_id: CourseId,

    /// Human-readable course name
    pub course_name: String,

    /// Timestamp the snapshot was assembled
    pub last_updated: DateTime<Utc>,

    /// Total number of non-design documents across all chunks
    pub document_count: usize,

    /// Chunk descriptors, in chunk id order
    pub chunks: Vec<ChunkDescriptor>,

    /// Advisory index descriptors
    pub indices: Vec<IndexDescriptor>,

    /// Design document descriptors
    pub design_docs: Vec<DesignDocDescriptor>,
}

impl Manifest {
    /// Sum of the per-chunk document counts
    ///
    /// For a well-formed manifest this equals [`Manifest::document_count`].
    pub fn chunked_document_count(&self) -> usize {
        self.chunks.iter().map(|c| c.document_count).sum()
    }

    /// Returns true if chunk ids form a contiguous zero-based sequence
    pub fn chunk_ids_contiguous(&self) -> bool {
        self.chunks
            .iter()
            .enumerate()
            .all(|(position, chunk)| chunk.id.ordinal() as usize == position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_manifest() -> Manifest {
        Manifest {
            schema_version: MANIFEST_SCHEMA_VERSION,
            course_id: CourseId::new("anatomy-101").unwrap(),
            course_name: "Anatomy 101".to_string(),
            last_updated: Utc::now(),
            document_count: 5,
            chunks: vec![
                ChunkDescriptor {
                    id: ChunkId::new(0),
                    path: "chunks/chunk-0000.json".to_string(),
                    document_count: 3,
                },
                ChunkDescriptor {
                    id: ChunkId::new(1),
                    path: "chunks/chunk-0001.json".to_string(),
                    document_count: 2,
                },
            ],
            indices: vec![IndexDescriptor {
                name: "tags".to_string(),
                path: "indices/tags.json".to_string(),
            }],
            design_docs: vec![DesignDocDescriptor {
                id: "_design/validation".to_string(),
            }],
        }
    }

    #[test]
    fn test_chunked_document_count() {
        let manifest = sample_manifest();
        assert_eq!(manifest.chunked_document_count(), 5);
        assert_eq!(manifest.chunked_document_count(), manifest.document_count);
    }

    #[test]
    fn test_chunk_ids_contiguous() {
        let mut manifest = sample_manifest();
        assert!(manifest.chunk_ids_contiguous());

        manifest.chunks[1].id = ChunkId::new(2);
        assert!(!manifest.chunk_ids_contiguous());
    }

    #[test]
    fn test_manifest_serialization_field_names() {
        let manifest = sample_manifest();
        let value = serde_json::to_value(&manifest).unwrap();

        assert_eq!(value["schemaVersion"], MANIFEST_SCHEMA_VERSION);
        assert_eq!(value["courseId"], "anatomy-101");
        assert_eq!(value["courseName"], "Anatomy 101");
        assert_eq!(value["documentCount"], 5);
        assert_eq!(value["chunks"][0]["id"], "chunk-0000");
        assert_eq!(value["chunks"][0]["documentCount"], 3);
        assert_eq!(value["indices"][0]["name"], "tags");
        assert_eq!(value["designDocs"][0]["id"], "_design/validation");
        assert!(value.get("lastUpdated").is_some());
    }

    #[test]
    fn test_manifest_round_trip() {
        let manifest = sample_manifest();
        let json = serde_json::to_string_pretty(&manifest).unwrap();
        let back: Manifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, manifest);
    }

    #[test]
    fn test_manifest_rejects_missing_schema_version() {
        let raw = r#"{
            "courseId": "c",
            "courseName": "c",
            "lastUpdated": "2025-01-01T00:00:00Z",
            "documentCount": 0,
            "chunks": [],
            "indices": [],
            "designDocs": []
        }"#;
        assert!(serde_json::from_str::<Manifest>(raw).is_err());
    }
}
