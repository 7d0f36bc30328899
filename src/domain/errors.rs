//! Domain error types
//!
//! This module defines the error hierarchy for coursepack. All errors are
//! domain-specific and don't expose third-party types.
//!
//! Per-document and per-batch problems never surface through these types
//! during a run; they accumulate into the warnings/errors lists of the run's
//! returned summary. Only whole-run fatal conditions (source or target
//! unreachable, unreadable manifest, failed validation gate) are returned as
//! errors to the caller.

use thiserror::Error;

/// Main coursepack error type
///
/// This is the primary error type used throughout the crate. Variants map
/// onto the run-level failure taxonomy: connection failures abort with no
/// partial commit, validation failures gate the Migrator, document failures
/// are skippable in best-effort packing, and partial writes are recorded
/// without aborting.
#[derive(Debug, Error)]
pub enum CoursePackError {
    /// Source or target database unreachable
    #[error("Connection error: {0}")]
    Connection(String),

    /// Structural defect in a snapshot
    #[error("Validation error: {0}")]
    Validation(String),

    /// One document failed to (de)serialize or violates shape constraints
    #[error("Document error: {id}: {reason}")]
    Document {
        /// Identifier of the offending document
        id: String,
        /// What went wrong
        reason: String,
    },

    /// A batch was partially rejected by the target
    #[error("Partial write: {rejected} of {total} documents rejected")]
    PartialWrite {
        /// Documents the target rejected
        rejected: usize,
        /// Documents submitted in the batch
        total: usize,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl CoursePackError {
    /// Creates a document error for the given id
    pub fn document(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Document {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for CoursePackError {
    fn from(err: std::io::Error) -> Self {
        CoursePackError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for CoursePackError {
    fn from(err: serde_json::Error) -> Self {
        CoursePackError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for CoursePackError {
    fn from(err: toml::de::Error) -> Self {
        CoursePackError::Configuration(format!("TOML parse error: {err}"))
    }
}
