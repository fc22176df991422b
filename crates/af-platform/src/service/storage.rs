//! Document Storage
//!
//! Uploaded files live behind the [`DocumentStore`] trait so the local-disk
//! store can be swapped for an object store without touching the services.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{PortalError, Result};

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persist the bytes under the given key and return a serveable URL.
    async fn store(&self, key: &str, bytes: &[u8]) -> Result<String>;

    /// Fetch previously stored bytes.
    async fn load(&self, key: &str) -> Result<Vec<u8>>;
}

/// Stores documents on the local filesystem under a root directory.
pub struct LocalDocumentStore {
    root: PathBuf,
    public_base: String,
}

impl LocalDocumentStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into(),
        }
    }

    /// Keys are relative paths; reject anything that escapes the root.
    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let relative = Path::new(key);
        let escapes = relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir));
        if escapes {
            return Err(PortalError::storage(format!("Invalid storage key: {key}")));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn store(&self, key: &str, bytes: &[u8]) -> Result<String> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PortalError::storage(format!("Creating {}: {e}", parent.display())))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| PortalError::storage(format!("Writing {}: {e}", path.display())))?;

        Ok(format!("{}/{}", self.public_base.trim_end_matches('/'), key))
    }

    async fn load(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.resolve(key)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| PortalError::storage(format!("Reading {}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDocumentStore::new(dir.path(), "http://localhost:8080/files");

        let url = store.store("app1/dt1/marks.pdf", b"pdf bytes").await.unwrap();
        assert_eq!(url, "http://localhost:8080/files/app1/dt1/marks.pdf");

        let bytes = store.load("app1/dt1/marks.pdf").await.unwrap();
        assert_eq!(bytes, b"pdf bytes");
    }

    #[tokio::test]
    async fn rejects_traversal_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalDocumentStore::new(dir.path(), "http://localhost:8080/files");

        assert!(store.store("../outside.pdf", b"x").await.is_err());
        assert!(store.load("/etc/passwd").await.is_err());
    }
}
