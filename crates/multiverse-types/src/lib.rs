//! Shared type definitions for the Chronos multiverse engine.
//!
//! This crate is the single source of truth for the universe data model
//! used across the workspace. Types defined here flow downstream to
//! `TypeScript` via `ts-rs` for the display surface, and their serde form
//! (camelCase JSON) is the archive's persisted format.
//!
//! # Modules
//!
//! - [`seed`] -- The epoch seed newtype
//! - [`universe`] -- The deterministic base universe record
//! - [`overlay`] -- Optional enrichment fields layered onto a base universe
//! - [`archive`] -- Archived universe entries
//! - [`status`] -- Enrichment progress, change events, and share payloads

pub mod archive;
pub mod overlay;
pub mod seed;
pub mod status;
pub mod universe;

// Re-export all public types at crate root for convenience.
pub use archive::ArchivedUniverse;
pub use overlay::{EnrichmentOverlay, PhysicalLaws};
pub use seed::Seed;
pub use status::{EnrichmentPhase, EnrichmentStatus, SharePayload, UniverseEvent};
pub use universe::{CurrentUniverse, HistoryInfo, LastWar, PlanetInfo, SocietyInfo, Universe};
