//! Error types for the archive storage layer.
//!
//! All errors are propagated via [`DbError`] which wraps the underlying
//! [`fred`] and filesystem errors with context about which operation failed.
//! At the core boundary they collapse into a [`StoreError`].

use multiverse_core::archive::StoreError;

/// Errors that can occur in the storage layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `Dragonfly`/Redis operation failed.
    #[error("Dragonfly error: {0}")]
    Dragonfly(#[from] fred::error::Error),

    /// A filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// The file or directory involved.
        path: String,
        /// The underlying error.
        source: std::io::Error,
    },

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<DbError> for StoreError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Dragonfly(e) => Self::Unavailable(e.to_string()),
            DbError::Config(reason) => Self::Unavailable(reason),
            io @ DbError::Io { .. } => Self::Io(io.to_string()),
        }
    }
}
