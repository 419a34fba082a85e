//! Filesystem archive store.
//!
//! One JSON document per key, stored as `<dir>/<key>.json`. Writes go to a
//! sibling temp file first and are renamed into place, so a crash mid-write
//! leaves the previous document intact.

use std::path::{Path, PathBuf};

use futures::future::BoxFuture;
use multiverse_core::archive::{ArchiveStore, StoreError};
use tracing::debug;

use crate::error::DbError;

/// Archive store backed by a directory of JSON files.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first
    /// write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file holding the document for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if `key` is empty or would escape the
    /// store directory.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, DbError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(DbError::Config(format!("invalid archive key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    /// Read the document for `key`, if the file exists.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Io`] if the file exists but cannot be read.
    pub async fn read(&self, key: &str) -> Result<Option<String>, DbError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(DbError::Io {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    /// Atomically replace the document for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Io`] if the directory, temp file, or rename fails.
    pub async fn write(&self, key: &str, payload: &str) -> Result<(), DbError> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        let io_err = |p: &Path| {
            let path = p.display().to_string();
            move |source: std::io::Error| DbError::Io { path, source }
        };

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(io_err(&self.dir))?;
        tokio::fs::write(&tmp, payload).await.map_err(io_err(&tmp))?;
        tokio::fs::rename(&tmp, &path).await.map_err(io_err(&path))?;

        debug!(path = %path.display(), bytes = payload.len(), "archive document written");
        Ok(())
    }
}

impl ArchiveStore for FileStore {
    fn load<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, StoreError>> {
        Box::pin(async move { Ok(self.read(key).await?) })
    }

    fn save<'a>(&'a self, key: &'a str, payload: String) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move { Ok(self.write(key, &payload).await?) })
    }
}
