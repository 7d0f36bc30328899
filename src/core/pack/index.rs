//! Index builders
//!
//! Indices are derived, named mappings from a secondary key to document
//! identifiers, built in the same pass as chunking but partitioned
//! independently of chunk boundaries. They are advisory: a snapshot round
//! trips without them, and the Migrator never replays them into a live
//! target.
//!
//! Because payload semantics are opaque to this crate, callers supply the
//! builders. [`FieldIndexBuilder`] covers the common case of grouping by one
//! top-level payload field.

use crate::domain::PackedDocument;
use serde_json::Value;
use std::collections::BTreeMap;

/// Accumulates one named index over the documents of a pack run
///
/// `observe` is called once per packed document, in the deterministic global
/// document order; `finish` is called once at the end of the run and
/// produces the index file's JSON payload (shape private to each index).
pub trait IndexBuilder: Send {
    /// Name of the index; also names the index file
    fn name(&self) -> &str;

    /// Feeds one document into the index
    fn observe(&mut self, document: &PackedDocument);

    /// Finalizes the index into its file payload
    fn finish(&mut self) -> Value;
}

/// Groups document ids by the value(s) of one top-level payload field
///
/// Scalar field values contribute the document to one bucket; array values
/// contribute it to one bucket per element (the natural shape for tag
/// lists). Documents without the field, or with non-scalar elements, are
/// skipped. Buckets and their id lists inherit the deterministic document
/// order.
///
/// # Examples
///
/// ```
/// use coursepack::core::pack::{FieldIndexBuilder, IndexBuilder};
///
/// let mut builder = FieldIndexBuilder::new("tags", "tags");
/// assert_eq!(builder.name(), "tags");
/// ```
pub struct FieldIndexBuilder {
    name: String,
    field: String,
    buckets: BTreeMap<String, Vec<String>>,
}

impl FieldIndexBuilder {
    /// Creates a builder indexing the given top-level field
    pub fn new(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            buckets: BTreeMap::new(),
        }
    }

    fn bucket_key(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn record(&mut self, key: String, doc_id: &str) {
        self.buckets.entry(key).or_default().push(doc_id.to_string());
    }
}

impl IndexBuilder for FieldIndexBuilder {
    fn name(&self) -> &str {
        &self.name
    }

    fn observe(&mut self, document: &PackedDocument) {
        let Some(value) = document.fields.get(&self.field) else {
            return;
        };
        let doc_id = document.id.as_str().to_string();
        match value {
            Value::Array(elements) => {
                for element in elements {
                    if let Some(key) = Self::bucket_key(element) {
                        self.record(key, &doc_id);
                    }
                }
            }
            other => {
                if let Some(key) = Self::bucket_key(other) {
                    self.record(key, &doc_id);
                }
            }
        }
    }

    fn finish(&mut self) -> Value {
        let buckets = std::mem::take(&mut self.buckets);
        Value::Object(
            buckets
                .into_iter()
                .map(|(key, ids)| (key, Value::Array(ids.into_iter().map(Value::String).collect())))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DocumentId;
    use serde_json::json;

    fn packed(id: &str, fields: Value) -> PackedDocument {
        let fields = match fields {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        };
        PackedDocument {
            id: DocumentId::new(id).unwrap(),
            fields,
            attachments: Vec::new(),
        }
    }

    #[test]
    fn test_scalar_field_grouping() {
        let mut builder = FieldIndexBuilder::new("difficulty", "elo");
        builder.observe(&packed("a", json!({"elo": 1200})));
        builder.observe(&packed("b", json!({"elo": 1500})));
        builder.observe(&packed("c", json!({"elo": 1200})));

        let index = builder.finish();
        assert_eq!(index["1200"], json!(["a", "c"]));
        assert_eq!(index["1500"], json!(["b"]));
    }

    #[test]
    fn test_array_field_fans_out() {
        let mut builder = FieldIndexBuilder::new("tags", "tags");
        builder.observe(&packed("a", json!({"tags": ["biology", "cells"]})));
        builder.observe(&packed("b", json!({"tags": ["biology"]})));

        let index = builder.finish();
        assert_eq!(index["biology"], json!(["a", "b"]));
        assert_eq!(index["cells"], json!(["a"]));
    }

    #[test]
    fn test_missing_field_is_skipped() {
        let mut builder = FieldIndexBuilder::new("tags", "tags");
        builder.observe(&packed("a", json!({"front": "no tags here"})));

        assert_eq!(builder.finish(), json!({}));
    }

    #[test]
    fn test_non_scalar_elements_are_skipped() {
        let mut builder = FieldIndexBuilder::new("tags", "tags");
        builder.observe(&packed("a", json!({"tags": [{"nested": true}, "ok"]})));

        let index = builder.finish();
        assert_eq!(index, json!({"ok": ["a"]}));
    }

    #[test]
    fn test_buckets_are_sorted() {
        let mut builder = FieldIndexBuilder::new("tags", "tags");
        builder.observe(&packed("a", json!({"tags": ["zebra", "ant"]})));

        let index = builder.finish();
        let keys: Vec<&String> = index.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["ant", "zebra"]);
    }
}
