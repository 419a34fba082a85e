//! Archive storage backends for the Chronos multiverse.
//!
//! The core owns archive semantics (ordering, uniqueness, serialization);
//! this crate only moves opaque JSON documents to and from durable storage.
//!
//! # Modules
//!
//! - [`backend`] -- [`ArchiveBackend`] selection from configuration
//! - [`dragonfly`] -- `Dragonfly` (Redis-compatible) store
//! - [`file`] -- Atomic JSON-file store
//! - [`error`] -- Shared error types

pub mod backend;
pub mod dragonfly;
pub mod error;
pub mod file;

// Re-export primary types for convenience.
pub use backend::ArchiveBackend;
pub use dragonfly::DragonflyStore;
pub use error::DbError;
pub use file::FileStore;
