//! Filesystem abstraction trait
//!
//! The Packer, Validator, and Migrator never touch concrete storage APIs;
//! all side effects go through an injected [`FileSystemAdapter`]. Stock
//! implementations cover the local disk ([`LocalFileSystem`]) and an
//! in-memory capture ([`MemoryFileSystem`]); an object-store adapter slots in
//! behind the same trait.
//!
//! Paths handed to an adapter are snapshot-relative and use `/` separators
//! regardless of platform; each adapter maps them onto its own addressing.
//!
//! [`LocalFileSystem`]: super::local::LocalFileSystem
//! [`MemoryFileSystem`]: super::memory::MemoryFileSystem

use crate::domain::Result;
use async_trait::async_trait;

/// Metadata for a stored file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    /// Byte length of the file
    pub length: u64,

    /// True if the path names a regular file (not a directory)
    pub is_file: bool,
}

/// Abstract read/write/stat primitives over a byte-addressable store
///
/// Implementations must be safe to share across tasks (`Send + Sync`); the
/// engine consumes them as `Arc<dyn FileSystemAdapter>`.
#[async_trait]
pub trait FileSystemAdapter: Send + Sync {
    /// Reads a file as UTF-8 text
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or not valid UTF-8.
    async fn read_file(&self, path: &str) -> Result<String>;

    /// Reads a file as raw bytes
    async fn read_binary(&self, path: &str) -> Result<Vec<u8>>;

    /// Writes raw bytes, creating or truncating the file
    ///
    /// Parent directories must already exist (see [`ensure_dir`]).
    ///
    /// [`ensure_dir`]: FileSystemAdapter::ensure_dir
    async fn write_file(&self, path: &str, bytes: &[u8]) -> Result<()>;

    /// Serializes a JSON value and writes it
    ///
    /// The default implementation renders pretty-printed JSON through
    /// [`write_file`], so every adapter produces byte-identical JSON
    /// artifacts for the same value.
    ///
    /// [`write_file`]: FileSystemAdapter::write_file
    async fn write_json(&self, path: &str, value: &serde_json::Value) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_file(path, &bytes).await
    }

    /// Returns true if the path exists
    async fn exists(&self, path: &str) -> Result<bool>;

    /// Returns metadata for the path
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist.
    async fn stat(&self, path: &str) -> Result<FileStat>;

    /// Creates a directory and any missing parents
    async fn ensure_dir(&self, path: &str) -> Result<()>;

    /// Joins a relative segment onto a base path
    fn join_path(&self, base: &str, segment: &str) -> String {
        if base.is_empty() {
            segment.to_string()
        } else if base.ends_with('/') {
            format!("{base}{segment}")
        } else {
            format!("{base}/{segment}")
        }
    }

    /// Returns the parent directory of a path
    fn dirname(&self, path: &str) -> String {
        match path.rfind('/') {
            Some(0) => "/".to_string(),
            Some(idx) => path[..idx].to_string(),
            None => String::new(),
        }
    }

    /// Returns true if the path is absolute
    fn is_absolute(&self, path: &str) -> bool {
        path.starts_with('/')
    }
}
