//! Shared application state for the display surface.
//!
//! [`AppState`] holds handles to the synchronization controller (the
//! owner of the current universe) and the archive. Handlers never hold
//! their own copy of the universe; every request reads through the
//! controller.

use std::sync::Arc;

use multiverse_core::archive::Archive;
use multiverse_core::sync::SynchronizationController;
use multiverse_types::UniverseEvent;
use tokio::sync::broadcast;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// The controller publishing the current universe.
    pub controller: Arc<SynchronizationController>,
    /// The saved-universe archive.
    pub archive: Arc<Archive>,
    /// Public URL of this surface, used in share links.
    pub share_base_url: Option<String>,
}

impl AppState {
    /// Create application state over a controller and an archive.
    pub const fn new(controller: Arc<SynchronizationController>, archive: Arc<Archive>) -> Self {
        Self {
            controller,
            archive,
            share_base_url: None,
        }
    }

    /// Attach the public base URL used in share links.
    #[must_use]
    pub fn with_share_base_url(mut self, base_url: Option<String>) -> Self {
        self.share_base_url = base_url;
        self
    }

    /// Subscribe to the controller's universe event stream.
    ///
    /// Returns a receiver that will yield a [`UniverseEvent`] for every
    /// publication, phase change, and enrichment result.
    pub fn subscribe(&self) -> broadcast::Receiver<UniverseEvent> {
        self.controller.subscribe()
    }
}
