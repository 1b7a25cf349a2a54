//! Durable key-value storage scoped per room
//!
//! The coordinator only ever needs `get` and `put`. `MemoryStore` backs tests,
//! `FileStore` keeps one directory per room with one file per key.

use async_trait::async_trait;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

use crate::error::Result;
use crate::storage::snapshot::{RoomSnapshot, SNAPSHOT_KEY};

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, scope: &str, key: &str) -> Result<Option<Vec<u8>>>;

    /// The value is durable once this returns `Ok`
    async fn put(&self, scope: &str, key: &str, value: Vec<u8>) -> Result<()>;
}

/// Process-local store, lost on exit
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<(String, String), Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, scope: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let entry = self.entries.get(&(scope.to_string(), key.to_string()));
        Ok(entry.map(|value| value.value().clone()))
    }

    async fn put(&self, scope: &str, key: &str, value: Vec<u8>) -> Result<()> {
        self.entries
            .insert((scope.to_string(), key.to_string()), value);
        Ok(())
    }
}

/// Files under `<root>/<scope>/<key>.json`
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, scope: &str, key: &str) -> PathBuf {
        self.root.join(scope).join(format!("{}.json", key))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, scope: &str, key: &str) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(self.path_for(scope, key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, scope: &str, key: &str, value: Vec<u8>) -> Result<()> {
        let path = self.path_for(scope, key);
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }

        // Write aside and rename so readers never see a torn value
        let tmp = path.with_extension("json.tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&value).await?;
        file.sync_all().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

/// A store bound to one room
#[derive(Clone)]
pub struct RoomStore {
    backend: Arc<dyn KeyValueStore>,
    scope: String,
}

impl RoomStore {
    pub fn new(backend: Arc<dyn KeyValueStore>, scope: impl Into<String>) -> Self {
        Self {
            backend,
            scope: scope.into(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub async fn load_snapshot(&self) -> Result<Option<RoomSnapshot>> {
        match self.backend.get(&self.scope, SNAPSHOT_KEY).await? {
            Some(bytes) => Ok(Some(RoomSnapshot::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    pub async fn save_snapshot(&self, snapshot: &RoomSnapshot) -> Result<()> {
        let bytes = snapshot.encode()?;
        self.backend.put(&self.scope, SNAPSHOT_KEY, bytes).await
    }
}
