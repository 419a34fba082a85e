//! The universe archive.
//!
//! An ordered list of [`ArchivedUniverse`] records, unique by id, persisted
//! as one JSON document under a fixed key in an [`ArchiveStore`]. The
//! document is read once when the archive is opened and rewritten in full
//! on every add and remove.
//!
//! Mutations hold one lock across the whole read-modify-write, including
//! the store write, so concurrent adds and removes never interleave. The
//! in-memory list only changes after the store write succeeds.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use futures::future::BoxFuture;
use multiverse_types::{ArchivedUniverse, CurrentUniverse};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Default storage key.
pub const DEFAULT_STORAGE_KEY: &str = "saved_universes";

/// Errors raised by an archive store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached.
    #[error("archive store unavailable: {0}")]
    Unavailable(String),

    /// The backend was reached but the read or write failed.
    #[error("archive store I/O failed: {0}")]
    Io(String),
}

/// Errors returned by archive mutations.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// Writing the archive document failed; nothing changed.
    #[error("failed to persist archive: {0}")]
    Store(#[from] StoreError),

    /// The archive could not be serialized.
    #[error("failed to serialize archive: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable key-value surface holding serialized archive documents.
pub trait ArchiveStore: Send + Sync + Debug {
    /// Read the document stored under `key`, if any.
    fn load<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, StoreError>>;

    /// Replace the document stored under `key`.
    fn save<'a>(&'a self, key: &'a str, payload: String) -> BoxFuture<'a, Result<(), StoreError>>;
}

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with one document.
    pub fn with_document(key: &str, payload: &str) -> Self {
        let mut documents = BTreeMap::new();
        documents.insert(key.to_owned(), payload.to_owned());
        Self {
            documents: Mutex::new(documents),
        }
    }
}

impl ArchiveStore for MemoryStore {
    fn load<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, StoreError>> {
        Box::pin(async move { Ok(self.documents.lock().await.get(key).cloned()) })
    }

    fn save<'a>(&'a self, key: &'a str, payload: String) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move {
            self.documents.lock().await.insert(key.to_owned(), payload);
            Ok(())
        })
    }
}

/// Result of [`Archive::add`].
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// The universe was appended.
    Added(ArchivedUniverse),
    /// An entry with this id already exists; nothing changed.
    AlreadyArchived,
}

/// Result of [`Archive::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The entry was removed.
    Removed,
    /// No entry had this id.
    NotFound,
}

/// The archive set.
#[derive(Debug)]
pub struct Archive {
    store: Arc<dyn ArchiveStore>,
    key: String,
    entries: Mutex<Vec<ArchivedUniverse>>,
}

impl Archive {
    /// Open the archive stored under `key`.
    ///
    /// An unreachable store or a corrupt document is logged and treated as
    /// an empty archive. Duplicate ids in a stored document keep their
    /// first occurrence.
    pub async fn open(store: Arc<dyn ArchiveStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let entries = match store.load(&key).await {
            Ok(Some(raw)) => decode(&key, &raw),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = %key, error = %e, "archive store unavailable, starting empty");
                Vec::new()
            }
        };
        info!(key = %key, entries = entries.len(), "archive loaded");
        Self {
            store,
            key,
            entries: Mutex::new(entries),
        }
    }

    /// The storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// All entries in save order.
    pub async fn list(&self) -> Vec<ArchivedUniverse> {
        self.entries.lock().await.clone()
    }

    /// Number of entries.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Whether the archive is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// The entry with `id`, if archived.
    pub async fn get(&self, id: &str) -> Option<ArchivedUniverse> {
        self.entries
            .lock()
            .await
            .iter()
            .find(|e| e.id() == id)
            .cloned()
    }

    /// Whether an entry with `id` exists.
    pub async fn contains(&self, id: &str) -> bool {
        self.entries.lock().await.iter().any(|e| e.id() == id)
    }

    /// Archive `current`, stamped with `saved_at` (ms since the Unix
    /// epoch). Saving an id that is already present changes nothing.
    pub async fn add(
        &self,
        current: &CurrentUniverse,
        saved_at: u64,
    ) -> Result<AddOutcome, ArchiveError> {
        let mut entries = self.entries.lock().await;
        if entries.iter().any(|e| e.id() == current.id()) {
            return Ok(AddOutcome::AlreadyArchived);
        }

        let entry = ArchivedUniverse {
            entry: current.clone(),
            saved_at,
        };
        let mut updated = entries.clone();
        updated.push(entry.clone());
        self.persist(&updated).await?;
        *entries = updated;

        info!(id = %entry.id(), total = entries.len(), "universe archived");
        Ok(AddOutcome::Added(entry))
    }

    /// Remove the entry with `id`.
    pub async fn remove(&self, id: &str) -> Result<RemoveOutcome, ArchiveError> {
        let mut entries = self.entries.lock().await;
        if !entries.iter().any(|e| e.id() == id) {
            return Ok(RemoveOutcome::NotFound);
        }

        let updated: Vec<ArchivedUniverse> =
            entries.iter().filter(|e| e.id() != id).cloned().collect();
        self.persist(&updated).await?;
        *entries = updated;

        info!(id = %id, total = entries.len(), "universe removed from archive");
        Ok(RemoveOutcome::Removed)
    }

    async fn persist(&self, entries: &[ArchivedUniverse]) -> Result<(), ArchiveError> {
        let payload = serde_json::to_string(entries)?;
        self.store.save(&self.key, payload).await?;
        Ok(())
    }
}

/// Parse a stored document, keeping the first entry per id.
fn decode(key: &str, raw: &str) -> Vec<ArchivedUniverse> {
    match serde_json::from_str::<Vec<ArchivedUniverse>>(raw) {
        Ok(parsed) => {
            let mut unique: Vec<ArchivedUniverse> = Vec::with_capacity(parsed.len());
            for entry in parsed {
                if !unique.iter().any(|e| e.id() == entry.id()) {
                    unique.push(entry);
                }
            }
            unique
        }
        Err(e) => {
            warn!(key = %key, error = %e, "archive document is corrupt, starting empty");
            Vec::new()
        }
    }
}
