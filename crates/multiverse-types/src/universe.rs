//! The universe record.
//!
//! A [`Universe`] is the fully deterministic, seed-derived base record. It
//! is produced by the generator in `multiverse-core` and never mutated after
//! publication. A [`CurrentUniverse`] pairs it with the optional enrichment
//! overlay, which is the only part that changes while an epoch is live.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::overlay::EnrichmentOverlay;
use crate::seed::Seed;

/// Number of headlines every universe carries.
pub const HEADLINE_COUNT: usize = 6;

/// Planetary parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PlanetInfo {
    /// Surface gravity multiplier in `[0.20, 2.40)`.
    pub gravity: f64,
    /// Number of natural moons (0 to 5).
    pub moons: u8,
    /// Climate regime.
    pub climate: String,
}

impl PlanetInfo {
    /// Gravity rendered for display with two decimals, e.g. `"1.23x"`.
    pub fn gravity_label(&self) -> String {
        format!("{:.2}x", self.gravity)
    }
}

/// Societal profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct SocietyInfo {
    /// Technological era.
    pub tech_level: String,
    /// Form of government.
    pub government: String,
    /// Descriptive population estimate.
    pub population: String,
    /// The nation that dominates this world.
    pub dominant_country: String,
}

/// The two belligerents of the most recent war. Never the same nation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct LastWar {
    /// First belligerent. May be the dominant country.
    pub first: String,
    /// Second belligerent. Never the dominant country, never `first`.
    pub second: String,
}

impl core::fmt::Display for LastWar {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} vs {}", self.first, self.second)
    }
}

/// Historical matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct HistoryInfo {
    /// The defining event of the epoch's history.
    pub major_event: String,
    /// The last conflict.
    pub last_war: LastWar,
    /// Key technological breakthrough.
    pub discovery: String,
}

/// A base universe, fully derived from its seed.
///
/// Every field is always present. Two universes generated from the same
/// seed and epoch duration compare equal field for field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct Universe {
    /// Stable identifier, `UNI-<seed>`.
    pub id: String,
    /// The originating epoch seed.
    pub seed: Seed,
    /// Epoch start in milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Epoch end (exclusive) in milliseconds since the Unix epoch.
    pub expires_at: u64,
    /// Planetary parameters.
    pub planet: PlanetInfo,
    /// Societal profile.
    pub society: SocietyInfo,
    /// Historical matrix.
    pub history: HistoryInfo,
    /// Generated news headlines in display order.
    pub headlines: Vec<String>,
}

/// The universe currently on display: a base record plus whatever
/// enrichment has been merged onto it so far.
///
/// Serialized flat, so the JSON shape is the base universe with the
/// optional overlay keys alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CurrentUniverse {
    /// The deterministic base record.
    #[serde(flatten)]
    pub universe: Universe,
    /// Enrichment fields merged so far.
    #[serde(flatten)]
    pub overlay: EnrichmentOverlay,
}

impl CurrentUniverse {
    /// Wrap a freshly generated base universe with an empty overlay.
    pub fn from_base(universe: Universe) -> Self {
        Self {
            universe,
            overlay: EnrichmentOverlay::default(),
        }
    }

    /// The universe identifier.
    pub fn id(&self) -> &str {
        &self.universe.id
    }

    /// The universe seed.
    pub const fn seed(&self) -> Seed {
        self.universe.seed
    }
}
