//! The epoch seed.
//!
//! A seed identifies one epoch: `floor(wall_clock_ms / epoch_duration_ms)`.
//! Every client that derives the same seed converges on the same base
//! universe, so the seed is also the universe's identity.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Prefix of every universe identifier.
pub const UNIVERSE_ID_PREFIX: &str = "UNI-";

/// Integer identity of one epoch.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct Seed(pub u64);

impl Seed {
    /// Wrap a raw seed value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Return the raw seed value.
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The seed of the following epoch, saturating at `u64::MAX`.
    pub const fn successor(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// The stable universe identifier derived from this seed (`UNI-<seed>`).
    pub fn universe_id(self) -> String {
        format!("{UNIVERSE_ID_PREFIX}{}", self.0)
    }
}

impl core::fmt::Display for Seed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Seed> for u64 {
    fn from(seed: Seed) -> Self {
        seed.0
    }
}
