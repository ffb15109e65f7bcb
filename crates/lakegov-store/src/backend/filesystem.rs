//! Filesystem object store.

use super::ObjectStore;
use crate::{StoreError, StoreResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Filesystem-backed object store; keys map to paths under a root directory.
pub struct FilesystemStore {
    root: PathBuf,
}

impl FilesystemStore {
    /// Creates a store rooted at the given directory, creating it if needed.
    pub async fn new(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.exists() {
            fs::create_dir_all(&root).await?;
        }
        Ok(Self { root })
    }

    /// Resolves a key to a path, rejecting traversal components.
    fn key_to_path(&self, key: &str) -> StoreResult<PathBuf> {
        if key.is_empty() || key.starts_with('/') || key.split('/').any(|seg| seg == "..") {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }

    fn path_to_key(&self, path: &Path) -> Option<String> {
        path.strip_prefix(&self.root)
            .ok()
            .map(|p| p.to_string_lossy().replace(std::path::MAIN_SEPARATOR, "/"))
    }

    async fn collect_keys(&self, dir: PathBuf, keys: &mut Vec<String>) -> StoreResult<()> {
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.is_dir() {
                Box::pin(self.collect_keys(path, keys)).await?;
            } else if let Some(key) = self.path_to_key(&path) {
                keys.push(key);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for FilesystemStore {
    fn name(&self) -> &str {
        "filesystem"
    }

    async fn put(&self, key: &str, data: Bytes) -> StoreResult<()> {
        let path = self.key_to_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write to a temp file, then rename, so readers never see a partial object.
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(&data).await?;
        file.sync_all().await?;
        fs::rename(&temp_path, &path).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Bytes> {
        let path = self.key_to_path(key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let path = self.key_to_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let path = self.key_to_path(key)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn list(&self, prefix: Option<&str>) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();
        if fs::try_exists(&self.root).await? {
            self.collect_keys(self.root.clone(), &mut keys).await?;
        }
        if let Some(p) = prefix {
            keys.retain(|k| k.starts_with(p));
        }
        Ok(keys)
    }
}
