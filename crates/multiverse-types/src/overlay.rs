//! Enrichment overlay.
//!
//! Externally produced prose and imagery layered onto a base universe.
//! Every field is optional: a universe with an empty overlay is complete
//! and displayable on its own.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Flavor text describing the universe's physics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct PhysicalLaws {
    /// Speed-of-light flavor text.
    pub constant_speed_of_light: String,
    /// Gravity flavor text.
    pub gravity_strength: String,
    /// One strange local law of physics.
    pub unique_law: String,
}

/// Optional enrichment fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct EnrichmentOverlay {
    /// Short poetic summary of the world.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub description: Option<String>,
    /// Cosmic coordinate of the world.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub location: Option<String>,
    /// Physics flavor text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub physical_laws: Option<PhysicalLaws>,
    /// Strange local phenomena (at most three).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub anomalies: Option<Vec<String>>,
    /// Image reference (URL or `data:` URI).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub image_url: Option<String>,
}

impl EnrichmentOverlay {
    /// Whether no overlay field is present.
    pub const fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.location.is_none()
            && self.physical_laws.is_none()
            && self.anomalies.is_none()
            && self.image_url.is_none()
    }

    /// Shallow-merge `incoming` onto `self`: every field present in
    /// `incoming` replaces the corresponding field, absent fields are kept.
    pub fn layer(&mut self, incoming: Self) {
        if incoming.description.is_some() {
            self.description = incoming.description;
        }
        if incoming.location.is_some() {
            self.location = incoming.location;
        }
        if incoming.physical_laws.is_some() {
            self.physical_laws = incoming.physical_laws;
        }
        if incoming.anomalies.is_some() {
            self.anomalies = incoming.anomalies;
        }
        if incoming.image_url.is_some() {
            self.image_url = incoming.image_url;
        }
    }
}
