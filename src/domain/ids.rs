//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers that cross the format boundary.
//! Each type enforces its format invariants at construction so the rest of
//! the crate can treat them as always-valid.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Reserved identifier prefix for design documents.
///
/// Documents whose id starts with this prefix carry database-side logic
/// (validation rules, views) and are never chunked.
pub const DESIGN_DOC_PREFIX: &str = "_design/";

/// Course identifier newtype wrapper
///
/// A course is the unit of content packed or migrated: a named document
/// collection scoped under one identifier.
///
/// # Examples
///
/// ```
/// use coursepack::domain::ids::CourseId;
/// use std::str::FromStr;
///
/// let course_id = CourseId::from_str("anatomy-101").unwrap();
/// assert_eq!(course_id.as_str(), "anatomy-101");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseId(String);

impl CourseId {
    /// Creates a new CourseId from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or whitespace-only.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Course ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the course ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CourseId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for CourseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Document identifier newtype wrapper
///
/// Unique within a course. Identifiers beginning with [`DESIGN_DOC_PREFIX`]
/// denote design documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates a new DocumentId from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or whitespace-only.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Document ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the document ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns true if this id denotes a design document
    pub fn is_design(&self) -> bool {
        self.0.starts_with(DESIGN_DOC_PREFIX)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Chunk identifier
///
/// Chunk ids form a zero-based, strictly contiguous sequence within a
/// snapshot and render as a zero-padded string (`chunk-0000`, `chunk-0001`,
/// ...). The rendered form is what the manifest records and what names the
/// chunk file on disk.
///
/// # Examples
///
/// ```
/// use coursepack::domain::ids::ChunkId;
/// use std::str::FromStr;
///
/// let id = ChunkId::new(7);
/// assert_eq!(id.to_string(), "chunk-0007");
/// assert_eq!(ChunkId::from_str("chunk-0007").unwrap(), id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkId(u32);

impl ChunkId {
    /// Creates a chunk id from its position in the sequence
    pub fn new(ordinal: u32) -> Self {
        Self(ordinal)
    }

    /// Returns the zero-based position of this chunk
    pub fn ordinal(&self) -> u32 {
        self.0
    }

    /// Returns the file name for this chunk within the chunks directory
    pub fn file_name(&self) -> String {
        format!("{self}.json")
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chunk-{:04}", self.0)
    }
}

impl FromStr for ChunkId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let ordinal = s
            .strip_prefix("chunk-")
            .ok_or_else(|| format!("Invalid chunk id '{s}': expected 'chunk-NNNN'"))?;
        let ordinal = ordinal
            .parse::<u32>()
            .map_err(|_| format!("Invalid chunk id '{s}': expected 'chunk-NNNN'"))?;
        Ok(Self(ordinal))
    }
}

// The manifest records chunk ids in their rendered, zero-padded form.
impl Serialize for ChunkId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ChunkId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ChunkId::from_str(&raw).map_err(serde::de::Error::custom)
    }
}
