//! Enrichment source trait and null implementation.
//!
//! After a base universe is published, the controller asks an
//! [`Enricher`] for prose and imagery. The [`Enricher`] trait abstracts
//! the mechanism: an LLM backend, a canned fixture, or a test stub.
//! Failures never reach the display surface; they are logged and the base
//! universe stays on screen.

use std::fmt::Debug;
use std::time::Duration;

use futures::future::BoxFuture;
use multiverse_types::{EnrichmentOverlay, Seed, Universe};

use crate::sync::PhaseReporter;

/// Why an enrichment attempt produced nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnrichmentFailure {
    /// The request could not be delivered or the provider returned an
    /// error status.
    #[error("enrichment transport error: {0}")]
    Transport(String),

    /// The provider answered but no usable payload could be recovered.
    #[error("malformed enrichment payload: {0}")]
    MalformedPayload(String),

    /// No API credentials are configured.
    #[error("missing enrichment credentials: {0}")]
    MissingCredentials(String),

    /// No enrichment provider is available.
    #[error("enrichment unavailable: {0}")]
    Unavailable(String),

    /// The round trip exceeded the configured limit.
    #[error("enrichment timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
}

/// What the enricher is asked to describe.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentRequest {
    /// The freshly published base universe.
    pub universe: Universe,
    /// Determinism hint for providers that accept a sampling seed.
    pub seed: Seed,
}

impl EnrichmentRequest {
    /// Build a request for a base universe, hinting with its seed.
    pub fn new(universe: Universe) -> Self {
        let seed = universe.seed;
        Self { universe, seed }
    }
}

/// A source of enrichment overlays.
///
/// `enrich` is called once per issued request, synchronously inside
/// `refresh`, and the returned future is driven on a spawned task. The
/// `phase` reporter lets long-running implementations update the progress
/// label; updates from a superseded request are ignored.
pub trait Enricher: Send + Sync + Debug {
    /// Produce an overlay for `request.universe`.
    fn enrich(
        &self,
        request: EnrichmentRequest,
        phase: PhaseReporter,
    ) -> BoxFuture<'static, Result<EnrichmentOverlay, EnrichmentFailure>>;
}

/// An enricher that is never available.
///
/// Used when no provider credentials are configured. Every request fails
/// with [`EnrichmentFailure::Unavailable`] and the base universe is shown
/// on its own.
#[derive(Debug, Clone, Default)]
pub struct NullEnricher {
    reason: String,
}

impl NullEnricher {
    /// Create a null enricher that reports `reason` on every request.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Enricher for NullEnricher {
    fn enrich(
        &self,
        _request: EnrichmentRequest,
        _phase: PhaseReporter,
    ) -> BoxFuture<'static, Result<EnrichmentOverlay, EnrichmentFailure>> {
        let reason = if self.reason.is_empty() {
            "no enrichment provider configured".to_owned()
        } else {
            self.reason.clone()
        };
        Box::pin(async move { Err(EnrichmentFailure::Unavailable(reason)) })
    }
}
