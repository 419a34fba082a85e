//! Enrichment progress, change notifications, and share payloads.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::seed::Seed;

/// Coarse enrichment phase shown while an overlay is being produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EnrichmentPhase {
    /// No enrichment in flight.
    #[default]
    Idle,
    /// Request accepted, nothing produced yet.
    Calibrating,
    /// Text enrichment in progress.
    ScanningCoordinates,
    /// Image generation in progress.
    RenderingVisuals,
}

impl EnrichmentPhase {
    /// Human-readable progress label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "",
            Self::Calibrating => "Calibrating multiversal lens...",
            Self::ScanningCoordinates => "Scanning dimension coordinates...",
            Self::RenderingVisuals => "Rendering visual data...",
        }
    }
}

/// Enrichment progress for the current universe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct EnrichmentStatus {
    /// Whether an enrichment request for the current universe is in flight.
    pub in_progress: bool,
    /// Current phase.
    pub phase: EnrichmentPhase,
    /// Label for the current phase.
    pub label: String,
}

impl EnrichmentStatus {
    /// Nothing in flight.
    pub fn idle() -> Self {
        Self::default()
    }

    /// In flight at the given phase.
    pub fn running(phase: EnrichmentPhase) -> Self {
        Self {
            in_progress: true,
            phase,
            label: phase.label().to_owned(),
        }
    }
}

/// Change notification broadcast to display surfaces.
///
/// Events are deliberately lightweight. Subscribers that need the full
/// record fetch the current universe after receiving one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum UniverseEvent {
    /// A new base universe replaced the current one.
    Generated {
        /// Seed of the new universe.
        seed: Seed,
        /// Whether this came from a manual refresh.
        forced: bool,
    },
    /// Enrichment was merged onto the current universe.
    Enriched {
        /// Seed of the enriched universe.
        seed: Seed,
    },
    /// Enrichment failed. The base universe stays on display.
    EnrichmentFailed {
        /// Seed of the affected universe.
        seed: Seed,
        /// Failure description.
        reason: String,
    },
    /// The enrichment progress label changed.
    PhaseChanged {
        /// Seed of the affected universe.
        seed: Seed,
        /// New progress state.
        status: EnrichmentStatus,
    },
}

impl UniverseEvent {
    /// The seed this event refers to.
    pub const fn seed(&self) -> Seed {
        match self {
            Self::Generated { seed, .. }
            | Self::Enriched { seed }
            | Self::EnrichmentFailed { seed, .. }
            | Self::PhaseChanged { seed, .. } => *seed,
        }
    }
}

/// Shareable description of the current universe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SharePayload {
    /// Share title, `Dimension #<seed>`.
    pub title: String,
    /// Share body text.
    pub text: String,
    /// Link back to the display surface, when one is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub url: Option<String>,
}
