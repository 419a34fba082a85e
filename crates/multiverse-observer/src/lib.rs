//! Display surface for the Chronos multiverse.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/universe`) streaming universe events
//!   via [`tokio::sync::broadcast`]
//! - **REST endpoints** for the current universe, countdown, enrichment
//!   status, manual refresh, the archive, and share text
//! - **Minimal HTML page** (`GET /`) rendering the current universe
//!
//! # Architecture
//!
//! The surface owns no universe state. Every read goes through the
//! synchronization controller held in [`AppState`], so the surface always
//! shows exactly what the controller has published.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::{ObserverHandle, spawn_observer};
pub use state::AppState;
