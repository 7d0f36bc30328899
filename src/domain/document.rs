//! Document domain model
//!
//! Documents exist in two forms on either side of the format boundary. The
//! live form ([`Document`]) carries binary attachments inline as bytes, as
//! fetched from or submitted to a [`DocumentSource`]. The snapshot form
//! ([`PackedDocument`]) carries only attachment stubs referencing files
//! written out-of-line, and is what chunk files serialize.
//!
//! Payload fields are opaque to this crate: they are round-tripped as raw
//! JSON and never interpreted.
//!
//! [`DocumentSource`]: crate::adapters::source::DocumentSource

use super::ids::DocumentId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Binary attachment content in its live, inline form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentData {
    /// MIME content type of the attachment
    pub content_type: String,

    /// Raw attachment bytes
    pub data: Vec<u8>,
}

impl AttachmentData {
    /// Creates attachment data from a content type and raw bytes
    pub fn new(content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            content_type: content_type.into(),
            data,
        }
    }

    /// Byte length of the attachment
    pub fn length(&self) -> u64 {
        self.data.len() as u64
    }
}

/// A document in its live form
///
/// The payload is an opaque JSON object; attachments, when fetched, are held
/// inline as bytes keyed by attachment name. A `BTreeMap` keeps attachment
/// iteration order deterministic across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Stable identifier, unique within a course
    pub id: DocumentId,

    /// Opaque payload fields, never interpreted
    pub fields: Map<String, Value>,

    /// Inline binary attachments keyed by name
    pub attachments: BTreeMap<String, AttachmentData>,
}

impl Document {
    /// Creates a document with no attachments
    pub fn new(id: DocumentId, fields: Map<String, Value>) -> Self {
        Self {
            id,
            fields,
            attachments: BTreeMap::new(),
        }
    }

    /// Adds an inline attachment, replacing any existing one with the same name
    pub fn with_attachment(mut self, name: impl Into<String>, data: AttachmentData) -> Self {
        self.attachments.insert(name.into(), data);
        self
    }

    /// Returns true if the document carries any inline attachments
    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Converts to the snapshot form, replacing inline attachments with the
    /// given stubs
    ///
    /// The caller is responsible for having written the referenced files;
    /// passing an empty stub list drops attachment entries entirely.
    pub fn into_packed(self, attachments: Vec<AttachmentStub>) -> PackedDocument {
        PackedDocument {
            id: self.id,
            fields: self.fields,
            attachments,
        }
    }
}

/// Out-of-line attachment reference carried by a snapshot document
///
/// A stub never holds bytes; `path` is relative to the snapshot root and,
/// once the snapshot is complete, resolves to a file of exactly `length`
/// bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentStub {
    /// Attachment name, unique within its document
    pub name: String,

    /// MIME content type
    pub content_type: String,

    /// Byte length of the referenced file
    pub length: u64,

    /// Path of the extracted file, relative to the snapshot root
    pub path: String,
}

/// A document in its snapshot form
///
/// This is the JSON shape persisted inside chunk files: the opaque payload
/// flattened to top level, the id under the reserved `_id` key, and
/// attachments (if any) as stubs under the reserved `_attachments` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackedDocument {
    /// Stable identifier, unique within a course
    #[serde(rename = "_id")]
    pub id: DocumentId,

    /// Opaque payload fields
    #[serde(flatten)]
    pub fields: Map<String, Value>,

    /// Attachment stubs; absent from the JSON when empty
    #[serde(
        rename = "_attachments",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub attachments: Vec<AttachmentStub>,
}

impl PackedDocument {
    /// Rehydrates to the live form using the given inline attachments
    ///
    /// Attachment bytes are read by the caller from the stub paths; stubs
    /// whose files were missing are simply absent from `attachments`.
    pub fn into_document(self, attachments: BTreeMap<String, AttachmentData>) -> Document {
        Document {
            id: self.id,
            fields: self.fields,
            attachments,
        }
    }
}

/// Reserved-identifier record holding database-side logic
///
/// Design documents are copied verbatim between the live database and the
/// snapshot: never chunked, never interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignDocument {
    /// Reserved identifier (starts with `_design/`)
    #[serde(rename = "_id")]
    pub id: DocumentId,

    /// Opaque design document body (views, validation functions, ...)
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl DesignDocument {
    /// Creates a design document
    ///
    /// # Errors
    ///
    /// Returns an error if the id does not carry the reserved design prefix.
    pub fn new(id: DocumentId, fields: Map<String, Value>) -> Result<Self, String> {
        if !id.is_design() {
            return Err(format!(
                "Design document id must start with '_design/', got: {id}"
            ));
        }
        Ok(Self { id, fields })
    }
}
