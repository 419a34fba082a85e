//! LLM-backed enrichment for Chronos multiverse universes.
//!
//! Turns a freshly generated base universe into an [`EnrichmentOverlay`]:
//! a poetic description, a cosmic location, physics flavor text, local
//! anomalies, and a rendered portrait.
//!
//! # Architecture
//!
//! ```text
//! Universe --> Prompt Engine --> Text Backend --> Parser --> overlay
//!          \-> Prompt Engine --> Image Backend ----------/
//! ```
//!
//! The crate plugs into the core through [`LlmEnricher`], which implements
//! the core's `Enricher` trait.
//!
//! [`EnrichmentOverlay`]: multiverse_types::EnrichmentOverlay

pub mod config;
pub mod enricher;
pub mod error;
mod http;
pub mod image;
pub mod llm;
pub mod parse;
pub mod prompt;

pub use config::EnrichConfig;
pub use enricher::LlmEnricher;
pub use error::EnrichError;
