//! Share text for the current universe.

use multiverse_types::{CurrentUniverse, SharePayload};

/// Build the share payload for `current`.
///
/// The title is `Dimension #<seed>`. The body names the climate, the
/// dominant nation and the lead headline, followed by the enrichment
/// description when one has arrived. `base_url` becomes the link back to
/// the display surface.
pub fn share_payload(current: &CurrentUniverse, base_url: Option<&str>) -> SharePayload {
    let universe = &current.universe;
    let mut text = format!(
        "I found a {} world ruled by {} in {}.",
        universe.planet.climate.to_lowercase(),
        universe.society.dominant_country,
        share_title(current),
    );
    if let Some(headline) = universe.headlines.first() {
        text.push_str(" Breaking: ");
        text.push_str(headline);
        text.push('.');
    }
    if let Some(description) = current.overlay.description.as_deref() {
        let description = description.trim();
        if !description.is_empty() {
            text.push(' ');
            text.push_str(description);
        }
    }

    SharePayload {
        title: share_title(current),
        text,
        url: base_url.map(|base| format!("{}/?seed={}", base.trim_end_matches('/'), current.seed())),
    }
}

fn share_title(current: &CurrentUniverse) -> String {
    format!("Dimension #{}", current.seed())
}
