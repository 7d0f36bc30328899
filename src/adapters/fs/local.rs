//! Local disk filesystem adapter
//!
//! Write-through adapter over `tokio::fs`, rooted at a single asset-root
//! path resolved once at construction. All snapshot-relative paths are
//! resolved against that root; absolute paths are used as-is.

use super::traits::{FileStat, FileSystemAdapter};
use crate::domain::{CoursePackError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Filesystem adapter backed by the local disk
///
/// # Examples
///
/// ```no_run
/// use coursepack::adapters::fs::LocalFileSystem;
///
/// let fs = LocalFileSystem::new("/srv/courses");
/// ```
pub struct LocalFileSystem {
    root: PathBuf,
}

impl LocalFileSystem {
    /// Creates an adapter rooted at the given asset-root path
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the asset root this adapter resolves against
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

#[async_trait]
impl FileSystemAdapter for LocalFileSystem {
    async fn read_file(&self, path: &str) -> Result<String> {
        let resolved = self.resolve(path);
        tokio::fs::read_to_string(&resolved)
            .await
            .map_err(|e| CoursePackError::Io(format!("read {}: {e}", resolved.display())))
    }

    async fn read_binary(&self, path: &str) -> Result<Vec<u8>> {
        let resolved = self.resolve(path);
        tokio::fs::read(&resolved)
            .await
            .map_err(|e| CoursePackError::Io(format!("read {}: {e}", resolved.display())))
    }

    async fn write_file(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let resolved = self.resolve(path);
        tokio::fs::write(&resolved, bytes)
            .await
            .map_err(|e| CoursePackError::Io(format!("write {}: {e}", resolved.display())))
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(tokio::fs::try_exists(self.resolve(path)).await.unwrap_or(false))
    }

    async fn stat(&self, path: &str) -> Result<FileStat> {
        let resolved = self.resolve(path);
        let metadata = tokio::fs::metadata(&resolved)
            .await
            .map_err(|e| CoursePackError::Io(format!("stat {}: {e}", resolved.display())))?;
        Ok(FileStat {
            length: metadata.len(),
            is_file: metadata.is_file(),
        })
    }

    async fn ensure_dir(&self, path: &str) -> Result<()> {
        let resolved = self.resolve(path);
        tokio::fs::create_dir_all(&resolved)
            .await
            .map_err(|e| CoursePackError::Io(format!("mkdir {}: {e}", resolved.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFileSystem::new(dir.path());

        fs.ensure_dir("course/chunks").await.unwrap();
        fs.write_file("course/chunks/chunk-0000.json", b"[]")
            .await
            .unwrap();

        assert!(fs.exists("course/chunks/chunk-0000.json").await.unwrap());
        let contents = fs.read_file("course/chunks/chunk-0000.json").await.unwrap();
        assert_eq!(contents, "[]");
    }

    #[tokio::test]
    async fn test_stat_reports_length() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFileSystem::new(dir.path());

        fs.write_file("blob.bin", &[7u8; 1024]).await.unwrap();
        let stat = fs.stat("blob.bin").await.unwrap();
        assert_eq!(stat.length, 1024);
        assert!(stat.is_file);
    }

    #[tokio::test]
    async fn test_read_missing_file_errors() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFileSystem::new(dir.path());

        assert!(!fs.exists("nope.json").await.unwrap());
        assert!(fs.read_file("nope.json").await.is_err());
        assert!(fs.stat("nope.json").await.is_err());
    }

    #[tokio::test]
    async fn test_write_json_is_pretty_printed() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFileSystem::new(dir.path());

        fs.write_json("value.json", &serde_json::json!({"a": 1}))
            .await
            .unwrap();
        let contents = fs.read_file("value.json").await.unwrap();
        assert!(contents.contains("\n"));
        let back: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(back["a"], 1);
    }

    #[test]
    fn test_resolve_keeps_absolute_paths() {
        let fs = LocalFileSystem::new("/srv/courses");
        assert_eq!(fs.resolve("/etc/other"), PathBuf::from("/etc/other"));
        assert_eq!(
            fs.resolve("anatomy/manifest.json"),
            PathBuf::from("/srv/courses/anatomy/manifest.json")
        );
    }
}
