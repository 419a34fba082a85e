//! Archive backend selection.
//!
//! Uses enum dispatch over the concrete stores so the engine can pick one
//! from configuration and hand the core a single `Arc<dyn ArchiveStore>`.

use futures::future::BoxFuture;
use multiverse_core::archive::{ArchiveStore, MemoryStore, StoreError};
use multiverse_core::config::{ArchiveBackendKind, ArchiveConfig};
use tracing::info;

use crate::dragonfly::DragonflyStore;
use crate::error::DbError;
use crate::file::FileStore;

/// A configured archive store.
#[derive(Debug)]
pub enum ArchiveBackend {
    /// Process-local, lost on restart.
    Memory(MemoryStore),
    /// JSON files under a directory.
    File(FileStore),
    /// Shared `Dragonfly` instance.
    Dragonfly(DragonflyStore),
}

impl ArchiveBackend {
    /// Open the backend named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the `Dragonfly` connection cannot be made.
    pub async fn open(config: &ArchiveConfig) -> Result<Self, DbError> {
        let backend = match config.backend {
            ArchiveBackendKind::Memory => Self::Memory(MemoryStore::new()),
            ArchiveBackendKind::File => Self::File(FileStore::new(&config.path)),
            ArchiveBackendKind::Dragonfly => {
                Self::Dragonfly(DragonflyStore::connect(&config.dragonfly_url).await?)
            }
        };
        info!(backend = backend.name(), "archive backend opened");
        Ok(backend)
    }

    /// Human-readable name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::File(_) => "file",
            Self::Dragonfly(_) => "dragonfly",
        }
    }
}

impl ArchiveStore for ArchiveBackend {
    fn load<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, StoreError>> {
        match self {
            Self::Memory(store) => store.load(key),
            Self::File(store) => store.load(key),
            Self::Dragonfly(store) => store.load(key),
        }
    }

    fn save<'a>(&'a self, key: &'a str, payload: String) -> BoxFuture<'a, Result<(), StoreError>> {
        match self {
            Self::Memory(store) => store.save(key, payload),
            Self::File(store) => store.save(key, payload),
            Self::Dragonfly(store) => store.save(key, payload),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_backend_opens_without_io() {
        let config = ArchiveConfig {
            backend: ArchiveBackendKind::Memory,
            ..ArchiveConfig::default()
        };
        let backend = ArchiveBackend::open(&config).await.unwrap();
        assert_eq!(backend.name(), "memory");
        backend.save("k", "[]".to_owned()).await.unwrap();
        assert_eq!(backend.load("k").await.unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn file_backend_uses_configured_path() {
        let config = ArchiveConfig {
            backend: ArchiveBackendKind::File,
            path: "some/dir".to_owned(),
            ..ArchiveConfig::default()
        };
        let backend = ArchiveBackend::open(&config).await.unwrap();
        assert!(matches!(
            &backend,
            ArchiveBackend::File(store) if store.dir() == std::path::Path::new("some/dir")
        ));
    }
}
