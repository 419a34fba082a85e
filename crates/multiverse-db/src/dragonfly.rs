//! `Dragonfly` (Redis-compatible) archive store.
//!
//! Lets several engine instances share one archive. Each archive document
//! is a single string value.
//!
//! # Key Patterns
//!
//! | Pattern | Type | Description |
//! |---------|------|-------------|
//! | `multiverse:{key}` | JSON | Serialized archive list |

use fred::prelude::*;
use futures::future::BoxFuture;
use multiverse_core::archive::{ArchiveStore, StoreError};

use crate::error::DbError;

/// Namespace prefix for every key written by this store.
pub const KEY_PREFIX: &str = "multiverse:";

/// Connection handle to a `Dragonfly` (Redis-compatible) instance.
#[derive(Clone)]
pub struct DragonflyStore {
    client: Client,
}

impl std::fmt::Debug for DragonflyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragonflyStore").finish_non_exhaustive()
    }
}

impl DragonflyStore {
    /// Connect to `Dragonfly` at the given URL.
    ///
    /// The URL should follow the Redis URL scheme:
    /// `redis://host:port` or `redis://host:port/db`
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Config`] if the URL cannot be parsed.
    /// Returns [`DbError::Dragonfly`] if the connection fails.
    pub async fn connect(url: &str) -> Result<Self, DbError> {
        let config = Config::from_url(url)
            .map_err(|e| DbError::Config(format!("Invalid Dragonfly URL: {e}")))?;

        let client = Builder::from_config(config).build()?;
        client.init().await?;

        tracing::info!("Connected to Dragonfly");
        Ok(Self { client })
    }

    /// Read the document stored for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Dragonfly`] if the read fails.
    pub async fn get_document(&self, key: &str) -> Result<Option<String>, DbError> {
        let value: Option<String> = self.client.get(namespaced(key)).await?;
        Ok(value)
    }

    /// Replace the document stored for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Dragonfly`] if the write fails.
    pub async fn set_document(&self, key: &str, payload: &str) -> Result<(), DbError> {
        let _: () = self
            .client
            .set(namespaced(key), payload, None, None, false)
            .await?;
        Ok(())
    }
}

impl ArchiveStore for DragonflyStore {
    fn load<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, StoreError>> {
        Box::pin(async move { Ok(self.get_document(key).await?) })
    }

    fn save<'a>(&'a self, key: &'a str, payload: String) -> BoxFuture<'a, Result<(), StoreError>> {
        Box::pin(async move { Ok(self.set_document(key, &payload).await?) })
    }
}

/// Full `Dragonfly` key for an archive key.
pub fn namespaced(key: &str) -> String {
    format!("{KEY_PREFIX}{key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced() {
        assert_eq!(namespaced("saved_universes"), "multiverse:saved_universes");
    }
}
