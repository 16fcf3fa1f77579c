//! Upload store
//!
//! Filesystem home for uploaded documents and the images generated from
//! them. The root directory is created once at startup and never cleaned;
//! everything under it is expected to be publicly servable.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::error::PagemillError;
use crate::job::{client_basename, stored_document_name};

/// Owns the storage root and the naming of documents stored under it.
pub struct UploadStore {
    root: PathBuf,
    last_timestamp: AtomicU64,
}

impl UploadStore {
    /// Open the store, creating the root directory (and parents) if absent.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, PagemillError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            last_timestamp: AtomicU64::new(0),
        })
    }

    /// Base directory uploads and generated images live under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist an uploaded document as `<timestamp>_<original>` under the
    /// root, returning the stored path.
    pub async fn save(&self, client_name: &str, bytes: &[u8]) -> Result<PathBuf, PagemillError> {
        let name = stored_document_name(self.next_timestamp(), client_basename(client_name));
        let path = self.root.join(name);
        tokio::fs::write(&path, bytes).await?;
        debug!("Stored uploaded document at {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    /// Millisecond epoch timestamp, strictly greater than any previously
    /// issued one so same-millisecond uploads cannot collide.
    fn next_timestamp(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0);

        // fetch_update returns the previous value; the closure already
        // stored max(now, previous + 1).
        match self
            .last_timestamp
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            }) {
            Ok(previous) => now.max(previous + 1),
            Err(current) => current,
        }
    }
}

/// Idempotently create a directory, parents included. Succeeds if the
/// directory already exists.
pub async fn ensure_dir(path: &Path) -> Result<(), PagemillError> {
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}

/// List a directory's entries, sorted by name.
pub async fn list_files_sorted(dir: &Path) -> Result<Vec<PathBuf>, PagemillError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn numeric_prefix(path: &Path) -> u64 {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.split('_').next())
            .and_then(|prefix| prefix.parse().ok())
            .expect("stored name carries a numeric prefix")
    }

    #[test]
    fn open_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("data").join("uploads");

        let store = UploadStore::open(&root).unwrap();

        assert!(root.is_dir());
        assert_eq!(store.root(), root);
    }

    #[test]
    fn open_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("uploads");

        UploadStore::open(&root).unwrap();
        UploadStore::open(&root).unwrap();

        assert!(root.is_dir());
    }

    #[tokio::test]
    async fn save_names_documents_with_timestamp_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::open(dir.path().join("uploads")).unwrap();

        let path = store.save("report.pdf", b"%PDF-").await.unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        let pattern = regex::Regex::new(r"^\d+_report\.pdf$").unwrap();
        assert!(pattern.is_match(name), "unexpected stored name: {}", name);
        assert!(path.starts_with(store.root()));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-");
    }

    #[tokio::test]
    async fn same_name_uploads_never_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::open(dir.path().join("uploads")).unwrap();

        let first = store.save("report.pdf", b"a").await.unwrap();
        let second = store.save("report.pdf", b"b").await.unwrap();

        assert_ne!(first, second);
        assert!(numeric_prefix(&second) > numeric_prefix(&first));
        assert_eq!(std::fs::read(&first).unwrap(), b"a");
        assert_eq!(std::fs::read(&second).unwrap(), b"b");
    }

    #[tokio::test]
    async fn client_path_components_cannot_escape_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::open(dir.path().join("uploads")).unwrap();

        let path = store.save("../../escape.pdf", b"x").await.unwrap();

        assert!(path.parent().unwrap() == store.root());
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with("_escape.pdf"), "unexpected name: {}", name);
    }

    #[tokio::test]
    async fn ensure_dir_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        ensure_dir(&nested).await.unwrap();
        ensure_dir(&nested).await.unwrap();

        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn list_files_sorted_orders_by_name() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.jpg", "a.jpg", "b.jpg"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }

        let listed = list_files_sorted(dir.path()).await.unwrap();

        let names: Vec<_> = listed
            .iter()
            .map(|path| path.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[tokio::test]
    async fn listing_a_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();

        let result = list_files_sorted(&dir.path().join("absent")).await;

        assert!(matches!(result, Err(PagemillError::Io(_))));
    }
}
