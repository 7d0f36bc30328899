//! Validator integration tests over a real on-disk snapshot
//!
//! These tests exercise the Validator through the local-disk adapter: a
//! course is packed into a temporary directory, the directory is damaged in
//! controlled ways, and the report is checked for the expected errors and
//! warnings.

use coursepack::adapters::fs::LocalFileSystem;
use coursepack::adapters::source::MemoryDocumentSource;
use coursepack::core::pack::{FieldIndexBuilder, PackConfig, Packer};
use coursepack::core::validate::Validator;
use coursepack::domain::{AttachmentData, CourseId, Document, DocumentId};
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

fn fields(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

/// Packs a five-document course (chunk size 2, one attachment, one index)
/// into `root/course` and returns the adapter.
async fn packed_course(root: &TempDir) -> Arc<LocalFileSystem> {
    let source = MemoryDocumentSource::new();
    for i in 0..5 {
        let mut doc = Document::new(
            DocumentId::new(format!("card-{i}")).unwrap(),
            fields(json!({"front": "q", "tags": ["anatomy"]})),
        );
        if i == 0 {
            doc = doc.with_attachment(
                "diagram.png",
                AttachmentData::new("image/png", vec![1u8; 256]),
            );
        }
        source.insert_document(doc).await;
    }

    let fs = Arc::new(LocalFileSystem::new(root.path()));
    Packer::new(
        fs.clone(),
        PackConfig {
            chunk_size: 2,
            ..Default::default()
        },
    )
    .unwrap()
    .pack(
        &source,
        &CourseId::new("course").unwrap(),
        "course",
        vec![Box::new(FieldIndexBuilder::new("tags", "tags"))],
    )
    .await
    .unwrap();

    fs
}

#[tokio::test]
async fn intact_snapshot_validates_clean() {
    let root = TempDir::new().unwrap();
    let fs = packed_course(&root).await;

    let report = Validator::new(fs).validate("course").await;
    assert!(report.valid, "unexpected errors: {:?}", report.errors);
    assert!(report.warnings.is_empty());
    assert_eq!(report.course_id.as_deref(), Some("course"));
    assert_eq!(report.course_name.as_deref(), Some("course"));
}

#[tokio::test]
async fn deleted_chunk_invalidates_and_names_the_path() {
    let root = TempDir::new().unwrap();
    let fs = packed_course(&root).await;

    std::fs::remove_file(root.path().join("course/chunks/chunk-0001.json")).unwrap();

    let report = Validator::new(fs).validate("course").await;
    assert!(!report.valid);
    assert!(
        report
            .errors
            .iter()
            .any(|e| e.contains("chunks/chunk-0001.json")),
        "errors should name the missing chunk: {:?}",
        report.errors
    );
    // Later chunks are still checked; the count-sum error is also present.
    assert!(report.errors.iter().any(|e| e.contains("sum")));
    // Identity survives a failed validation.
    assert_eq!(report.course_id.as_deref(), Some("course"));
}

#[tokio::test]
async fn missing_manifest_is_the_only_error() {
    let root = TempDir::new().unwrap();
    let fs = packed_course(&root).await;

    std::fs::remove_file(root.path().join("course/manifest.json")).unwrap();

    let report = Validator::new(fs).validate("course").await;
    assert!(!report.valid);
    assert_eq!(report.errors.len(), 1);
    assert!(report.course_id.is_none());
}

#[tokio::test]
async fn corrupt_chunk_json_is_an_error() {
    let root = TempDir::new().unwrap();
    let fs = packed_course(&root).await;

    std::fs::write(
        root.path().join("course/chunks/chunk-0000.json"),
        b"this is not json",
    )
    .unwrap();

    let report = Validator::new(fs).validate("course").await;
    assert!(!report.valid);
    assert!(report.errors.iter().any(|e| e.contains("unparseable")));
}

#[tokio::test]
async fn deleted_index_is_a_warning_not_an_error() {
    let root = TempDir::new().unwrap();
    let fs = packed_course(&root).await;

    std::fs::remove_file(root.path().join("course/indices/tags.json")).unwrap();

    let report = Validator::new(fs).validate("course").await;
    assert!(report.valid);
    assert!(report
        .warnings
        .iter()
        .any(|w| w.contains("indices/tags.json")));
}

#[tokio::test]
async fn deleted_attachment_is_a_warning_not_an_error() {
    let root = TempDir::new().unwrap();
    let fs = packed_course(&root).await;

    std::fs::remove_file(root.path().join("course/attachments/card-0/diagram.png")).unwrap();

    let report = Validator::new(fs).validate("course").await;
    assert!(report.valid);
    assert!(report.warnings.iter().any(|w| w.contains("diagram.png")));
}

#[tokio::test]
async fn truncated_attachment_is_a_warning() {
    let root = TempDir::new().unwrap();
    let fs = packed_course(&root).await;

    std::fs::write(
        root.path().join("course/attachments/card-0/diagram.png"),
        &[1u8; 10],
    )
    .unwrap();

    let report = Validator::new(fs).validate("course").await;
    assert!(report.valid);
    assert!(
        report.warnings.iter().any(|w| w.contains("256")),
        "warning should mention the recorded length: {:?}",
        report.warnings
    );
}

#[tokio::test]
async fn tampered_document_count_is_an_error() {
    let root = TempDir::new().unwrap();
    let fs = packed_course(&root).await;

    let manifest_path = root.path().join("course/manifest.json");
    let mut manifest: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&manifest_path).unwrap()).unwrap();
    manifest["documentCount"] = json!(42);
    std::fs::write(&manifest_path, serde_json::to_vec_pretty(&manifest).unwrap()).unwrap();

    let report = Validator::new(fs).validate("course").await;
    assert!(!report.valid);
    assert!(report.errors.iter().any(|e| e.contains("42")));
}
