//! Archived universe entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::universe::CurrentUniverse;

/// A universe saved to the archive, together with whatever overlay it had
/// at save time. The archive holds at most one entry per universe id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "bindings/")]
pub struct ArchivedUniverse {
    /// The saved universe and overlay.
    #[serde(flatten)]
    pub entry: CurrentUniverse,
    /// Save time in milliseconds since the Unix epoch.
    pub saved_at: u64,
}

impl ArchivedUniverse {
    /// The archived universe's identifier.
    pub fn id(&self) -> &str {
        self.entry.id()
    }

    /// Save time as a UTC timestamp, if representable.
    pub fn saved_at_utc(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.saved_at)
            .ok()
            .and_then(DateTime::from_timestamp_millis)
    }
}
