//! Staleness-guarded overlay merge.
//!
//! Enrichment is slow and asynchronous; the epoch may advance while it is
//! in flight. [`apply_enrichment`] is the only place an overlay reaches the
//! current universe, and it refuses any overlay issued for a seed other
//! than the one currently displayed.

use multiverse_types::{CurrentUniverse, EnrichmentOverlay, Seed};
use tracing::debug;

/// Result of routing an enrichment completion through the merger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The overlay was merged onto the current universe.
    Applied,
    /// The current universe has a different seed (or none); discarded.
    Stale,
    /// A newer request for the same seed was issued; discarded.
    Superseded,
    /// Enrichment failed, so there was nothing to merge.
    Skipped,
}

impl MergeOutcome {
    /// Whether the overlay reached the current universe.
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Shallow-merge `overlay` onto `current` if and only if `current` holds
/// the universe for `for_seed`.
///
/// Overlay fields that are present win; absent fields leave whatever is
/// already there. Base fields are never touched.
pub fn apply_enrichment(
    current: Option<&mut CurrentUniverse>,
    for_seed: Seed,
    overlay: EnrichmentOverlay,
) -> MergeOutcome {
    let Some(current) = current else {
        debug!(for_seed = for_seed.value(), "no current universe, enrichment discarded");
        return MergeOutcome::Stale;
    };

    if current.seed() != for_seed {
        debug!(
            for_seed = for_seed.value(),
            current_seed = current.seed().value(),
            "stale enrichment discarded"
        );
        return MergeOutcome::Stale;
    }

    current.overlay.layer(overlay);
    MergeOutcome::Applied
}
