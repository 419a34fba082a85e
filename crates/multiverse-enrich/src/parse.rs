//! LLM response parsing into enrichment overlays.
//!
//! The text backend returns raw text (ideally a JSON object). This module
//! recovers the object and converts it into an [`EnrichmentOverlay`].
//! Blank strings count as absent, and anomalies are capped at
//! [`MAX_ANOMALIES`].

use multiverse_types::{EnrichmentOverlay, PhysicalLaws};
use tracing::{debug, warn};

use crate::error::EnrichError;

/// Maximum number of anomalies kept from a response.
pub const MAX_ANOMALIES: usize = 3;

/// Intermediate struct for deserializing the LLM's raw JSON response.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawProfile {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    physical_laws: Option<RawPhysicalLaws>,
    #[serde(default)]
    anomalies: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPhysicalLaws {
    #[serde(default)]
    constant_speed_of_light: Option<String>,
    #[serde(default)]
    gravity_strength: Option<String>,
    #[serde(default)]
    unique_law: Option<String>,
}

/// Parse an LLM response string into an [`EnrichmentOverlay`].
///
/// Attempts multiple recovery strategies if the raw text is not clean JSON:
/// 1. Direct `serde_json` deserialization
/// 2. Extract JSON from a markdown code block
/// 3. Take the largest well-formed `{...}` substring
/// 4. Strip trailing commas from each of the above and retry
///
/// The overlay never carries an image; that is filled in separately.
pub fn parse_profile(raw: &str) -> Result<EnrichmentOverlay, EnrichError> {
    let profile = try_parse(raw).inspect_err(|e| {
        warn!(error = %e, raw_len = raw.len(), "failed to recover enrichment payload");
    })?;

    let overlay = convert_raw_profile(profile);
    if overlay.is_empty() {
        return Err(EnrichError::Parse(
            "payload contained no usable enrichment fields".to_owned(),
        ));
    }
    Ok(overlay)
}

/// Attempt to parse the response through multiple recovery strategies.
fn try_parse(raw: &str) -> Result<RawProfile, EnrichError> {
    let trimmed = raw.trim();

    // Strategy 1: direct parse
    if let Ok(parsed) = serde_json::from_str::<RawProfile>(trimmed) {
        return Ok(parsed);
    }

    // Strategy 2: extract from markdown code block
    let codeblock = extract_json_from_codeblock(trimmed);
    if let Some(json_str) = codeblock
        && let Ok(parsed) = serde_json::from_str::<RawProfile>(json_str)
    {
        debug!("recovered enrichment payload from code block");
        return Ok(parsed);
    }

    // Strategy 3: largest well-formed object substring
    if let Some(parsed) = largest_object(trimmed, |candidate| {
        serde_json::from_str::<RawProfile>(candidate).ok()
    }) {
        debug!("recovered enrichment payload from embedded object");
        return Ok(parsed);
    }

    // Strategy 4: strip trailing commas and retry each source
    let cleaned = strip_trailing_commas(trimmed);
    if let Ok(parsed) = serde_json::from_str::<RawProfile>(&cleaned) {
        return Ok(parsed);
    }
    if let Some(json_str) = codeblock {
        let cleaned_inner = strip_trailing_commas(json_str);
        if let Ok(parsed) = serde_json::from_str::<RawProfile>(&cleaned_inner) {
            return Ok(parsed);
        }
    }
    if let Some(parsed) = largest_object(&cleaned, |candidate| {
        serde_json::from_str::<RawProfile>(candidate).ok()
    }) {
        return Ok(parsed);
    }

    Err(EnrichError::Parse(format!(
        "all parse strategies failed for {} bytes of response",
        trimmed.len()
    )))
}

/// Convert a deserialized raw response into an overlay.
fn convert_raw_profile(raw: RawProfile) -> EnrichmentOverlay {
    let physical_laws = raw.physical_laws.and_then(|laws| {
        Some(PhysicalLaws {
            constant_speed_of_light: non_blank(laws.constant_speed_of_light)?,
            gravity_strength: non_blank(laws.gravity_strength)?,
            unique_law: non_blank(laws.unique_law)?,
        })
    });

    let anomalies = raw
        .anomalies
        .map(|values| {
            values
                .into_iter()
                .filter_map(|v| non_blank(v.as_str().map(ToOwned::to_owned)))
                .take(MAX_ANOMALIES)
                .collect::<Vec<_>>()
        })
        .filter(|list| !list.is_empty());

    EnrichmentOverlay {
        description: non_blank(raw.description),
        location: non_blank(raw.location),
        physical_laws,
        anomalies,
        image_url: None,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// Extract JSON from a markdown code block.
fn extract_json_from_codeblock(text: &str) -> Option<&str> {
    // Look for ```json ... ``` or ``` ... ```
    let fence_end = |tag_len: usize, i: usize| {
        let after_tag = i.checked_add(tag_len).unwrap_or(i);
        text.get(after_tag..)
            .and_then(|s| s.find('\n'))
            .and_then(|nl| after_tag.checked_add(nl))
            .and_then(|pos| pos.checked_add(1))
            .unwrap_or(after_tag)
    };
    let start = text
        .find("```json")
        .map(|i| fence_end(7, i))
        .or_else(|| text.find("```").map(|i| fence_end(3, i)))?;

    let remaining = text.get(start..)?;
    let end = remaining.find("```")?;
    remaining.get(..end).map(str::trim)
}

/// Find the largest `{...}` substring that `accept` recognises.
///
/// Every `{` is a candidate start and every later `}` a candidate end.
/// Spans are tried longest first; among equal lengths the earlier start
/// wins.
fn largest_object<T>(text: &str, accept: impl Fn(&str) -> Option<T>) -> Option<T> {
    let closes: Vec<usize> = text.match_indices('}').map(|(i, _)| i).collect();
    let mut spans: Vec<(usize, usize)> = text
        .match_indices('{')
        .flat_map(|(start, _)| {
            closes
                .iter()
                .filter(move |&&end| end > start)
                .map(move |&end| (start, end))
        })
        .collect();
    spans.sort_by_key(|&(start, end)| std::cmp::Reverse(end.saturating_sub(start)));

    spans
        .into_iter()
        .find_map(|(start, end)| accept(text.get(start..=end)?))
}

/// Strip trailing commas before closing braces and brackets (common LLM error).
fn strip_trailing_commas(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    let mut i = 0;
    while i < len {
        let c = chars.get(i).copied().unwrap_or(' ');
        if c == ',' {
            // Look ahead past whitespace for } or ]
            let mut j = i.checked_add(1).unwrap_or(i);
            while j < len && chars.get(j).copied().unwrap_or(' ').is_whitespace() {
                j = j.checked_add(1).unwrap_or(j);
            }
            let next = chars.get(j).copied().unwrap_or(' ');
            if next == '}' || next == ']' {
                i = i.checked_add(1).unwrap_or(i);
                continue;
            }
        }
        result.push(c);
        i = i.checked_add(1).unwrap_or(len);
    }

    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CLEAN: &str = r#"{
        "description": "A world of drifting islands. Storms sing lullabies.",
        "location": "Sector-9 Delta, near the Pillar of Creation",
        "physicalLaws": {
            "constantSpeedOfLight": "Slows at dusk",
            "gravityStrength": "Feather-light",
            "uniqueLaw": "Shadows weigh more than objects"
        },
        "anomalies": ["Upward rain", "Singing stones", "Clocks run backward"]
    }"#;

    #[test]
    fn parse_clean_object() {
        let overlay = parse_profile(CLEAN).unwrap();
        assert_eq!(
            overlay.location.as_deref(),
            Some("Sector-9 Delta, near the Pillar of Creation")
        );
        assert_eq!(
            overlay.physical_laws.unwrap().unique_law,
            "Shadows weigh more than objects"
        );
        assert_eq!(overlay.anomalies.unwrap().len(), 3);
        assert!(overlay.image_url.is_none());
    }

    #[test]
    fn parse_from_codeblock() {
        let raw = format!("Here is your universe:\n```json\n{CLEAN}\n```\nEnjoy!");
        assert!(parse_profile(&raw).unwrap().description.is_some());
    }

    #[test]
    fn parse_from_surrounding_prose() {
        let raw = format!("Sure! {CLEAN} Let me know if you need more.");
        assert!(parse_profile(&raw).unwrap().description.is_some());
    }

    #[test]
    fn parse_object_followed_by_stray_brace() {
        let raw = r#"{"description": "Quiet stars."} and then } more"#;
        assert_eq!(
            parse_profile(raw).unwrap().description.as_deref(),
            Some("Quiet stars.")
        );
    }

    #[test]
    fn parse_object_after_braced_prose() {
        let raw = r#"Keys used: {description, location}. Result: {"description": "Quiet stars.", "location": "Sector-9"}"#;
        let overlay = parse_profile(raw).unwrap();
        assert_eq!(overlay.description.as_deref(), Some("Quiet stars."));
        assert_eq!(overlay.location.as_deref(), Some("Sector-9"));
    }

    #[test]
    fn largest_object_prefers_the_longest_span() {
        let text = r#"{"a": 1} then {"a": 1, "b": 2}"#;
        let got = largest_object(text, |c| serde_json::from_str::<serde_json::Value>(c).ok());
        assert_eq!(got.unwrap()["b"], 2);
    }

    #[test]
    fn parse_trailing_comma() {
        let raw = r#"{"description": "Dense fog.", "anomalies": ["Echoes",],}"#;
        let overlay = parse_profile(raw).unwrap();
        assert_eq!(overlay.anomalies.unwrap(), vec!["Echoes".to_owned()]);
    }

    #[test]
    fn anomalies_capped_and_blanks_dropped() {
        let raw = r#"{"anomalies": ["a", "  ", "b", 7, "c", "d"]}"#;
        let overlay = parse_profile(raw).unwrap();
        assert_eq!(
            overlay.anomalies.unwrap(),
            vec!["a".to_owned(), "b".to_owned(), "c".to_owned()]
        );
    }

    #[test]
    fn incomplete_physical_laws_are_absent() {
        let raw = r#"{"description": "x", "physicalLaws": {"uniqueLaw": "Only this"}}"#;
        let overlay = parse_profile(raw).unwrap();
        assert!(overlay.physical_laws.is_none());
    }

    #[test]
    fn empty_object_is_malformed() {
        assert!(matches!(parse_profile("{}"), Err(EnrichError::Parse(_))));
        assert!(matches!(
            parse_profile(r#"{"description": "   "}"#),
            Err(EnrichError::Parse(_))
        ));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(parse_profile("the void stares back").is_err());
        assert!(parse_profile("").is_err());
    }

    #[test]
    fn extract_json_from_plain_codeblock() {
        let text = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json_from_codeblock(text), Some("{\"a\": 1}"));
    }

    #[test]
    fn strip_trailing_commas_basic() {
        assert_eq!(strip_trailing_commas("{\"a\": 1,}"), "{\"a\": 1}");
        assert_eq!(strip_trailing_commas("[1, 2, ]"), "[1, 2 ]");
    }
}
