//! In-memory filesystem adapter
//!
//! Backs the in-memory capture path of the Packer and the unit/integration
//! tests. Files live in an ordered map keyed by normalized path, so a
//! captured snapshot can be inspected or handed to a hosting layer without
//! touching the disk. Chunk content produced through this adapter is
//! byte-identical to the write-through path: both receive the same
//! serializer output.

use super::traits::{FileStat, FileSystemAdapter};
use crate::domain::{CoursePackError, Result};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

/// Filesystem adapter holding all files in memory
///
/// # Examples
///
/// ```
/// use coursepack::adapters::fs::{FileSystemAdapter, MemoryFileSystem};
///
/// # async fn example() -> coursepack::domain::Result<()> {
/// let fs = MemoryFileSystem::new();
/// fs.write_file("manifest.json", b"{}").await?;
/// assert!(fs.exists("manifest.json").await?);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct MemoryFileSystem {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
    dirs: Mutex<BTreeSet<String>>,
}

impl MemoryFileSystem {
    /// Creates an empty in-memory filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all stored file paths in lexicographic order
    pub fn file_paths(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }

    /// Returns a copy of the bytes stored at `path`, if any
    pub fn contents(&self, path: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(&normalize(path)).cloned()
    }

    /// Number of stored files
    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

fn normalize(path: &str) -> String {
    path.trim_matches('/').to_string()
}

#[async_trait]
impl FileSystemAdapter for MemoryFileSystem {
    async fn read_file(&self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path).await?;
        String::from_utf8(bytes)
            .map_err(|e| CoursePackError::Io(format!("read {path}: not valid UTF-8: {e}")))
    }

    async fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        self.files
            .lock()
            .unwrap()
            .get(&normalize(path))
            .cloned()
            .ok_or_else(|| CoursePackError::Io(format!("read {path}: no such file")))
    }

    async fn write_file(&self, path: &str, bytes: &[u8]) -> Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(normalize(path), bytes.to_vec());
        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        let key = normalize(path);
        if self.files.lock().unwrap().contains_key(&key) {
            return Ok(true);
        }
        Ok(self.dirs.lock().unwrap().contains(&key))
    }

    async fn stat(&self, path: &str) -> Result<FileStat> {
        let key = normalize(path);
        if let Some(bytes) = self.files.lock().unwrap().get(&key) {
            return Ok(FileStat {
                length: bytes.len() as u64,
                is_file: true,
            });
        }
        if self.dirs.lock().unwrap().contains(&key) {
            return Ok(FileStat {
                length: 0,
                is_file: false,
            });
        }
        Err(CoursePackError::Io(format!("stat {path}: no such file")))
    }

    async fn ensure_dir(&self, path: &str) -> Result<()> {
        self.dirs.lock().unwrap().insert(normalize(path));
        Ok(())
    }
}
