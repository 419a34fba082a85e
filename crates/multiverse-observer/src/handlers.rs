//! REST API endpoint handlers for the display surface.
//!
//! All handlers read through the shared [`AppState`]: universe state comes
//! from the synchronization controller, saved universes from the archive.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | HTML status page |
//! | `GET` | `/api/universe` | Current universe with overlay |
//! | `GET` | `/api/status` | Seed, countdown, enrichment status |
//! | `POST` | `/api/refresh` | Force a refresh |
//! | `GET` | `/api/archive` | List archived universes |
//! | `POST` | `/api/archive` | Archive the current universe |
//! | `GET` | `/api/archive/{id}` | One archived universe |
//! | `DELETE` | `/api/archive/{id}` | Remove from the archive |
//! | `GET` | `/api/share` | Share payload for the current universe |

use std::fmt::Write as _;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use multiverse_core::archive::{AddOutcome, RemoveOutcome};
use multiverse_core::share::share_payload;
use multiverse_types::{CurrentUniverse, EnrichmentStatus, Seed};
use serde::Serialize;

use crate::error::ObserverError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

/// Body of `GET /api/status`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Seed derived from the clock right now.
    pub seed: Seed,
    /// Seed of the displayed universe, if any.
    pub current_seed: Option<Seed>,
    /// `MM:SS` until the next epoch.
    pub countdown: String,
    /// Milliseconds until the next epoch.
    pub remaining_ms: u64,
    /// Enrichment progress.
    pub enrichment: EnrichmentStatus,
    /// Whether the displayed universe is in the archive.
    pub archived: bool,
}

/// Body of `POST /api/refresh`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// Seed of the published universe.
    pub seed: Seed,
    /// Whether a new universe was generated.
    pub generated: bool,
    /// The universe now on display.
    pub universe: Option<CurrentUniverse>,
}

// ---------------------------------------------------------------------------
// GET / -- HTML status page
// ---------------------------------------------------------------------------

/// Serve an HTML page describing the current universe.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let countdown = state.controller.countdown();
    let status = state.controller.status().await;
    let archived = state.archive.len().await;

    let body = match state.controller.current().await {
        Some(current) => universe_html(&current, &status),
        None => String::from("<p class=\"subtitle\">Calibrating multiversal lens...</p>"),
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Chronos Multiverse</title>
    <style>
        body {{
            background: #0d1117;
            color: #c9d1d9;
            font-family: 'Cascadia Code', 'Fira Code', 'Consolas', monospace;
            padding: 2rem;
            max-width: 800px;
            margin: 0 auto;
        }}
        h1 {{ color: #58a6ff; margin-bottom: 0.25rem; }}
        .subtitle {{ color: #8b949e; margin-top: 0; }}
        .metric {{
            display: inline-block;
            background: #161b22;
            border: 1px solid #30363d;
            border-radius: 6px;
            padding: 1rem 1.5rem;
            margin: 0.5rem 0.5rem 0.5rem 0;
            min-width: 120px;
        }}
        .metric .label {{ color: #8b949e; font-size: 0.85rem; }}
        .metric .value {{ color: #58a6ff; font-size: 1.2rem; font-weight: bold; }}
        a {{ color: #58a6ff; text-decoration: none; }}
        ul {{ list-style: none; padding: 0; }}
        li {{ padding: 0.3rem 0; }}
        img {{ max-width: 100%; border-radius: 6px; }}
        hr {{ border: none; border-top: 1px solid #30363d; margin: 1.5rem 0; }}
    </style>
</head>
<body>
    <h1>Chronos Multiverse</h1>
    <p class="subtitle">Next shift in <strong>{countdown}</strong> -- {archived} universes archived</p>
    {body}
    <hr>
    <h2>API Endpoints</h2>
    <ul>
        <li><a href="/api/universe">/api/universe</a> -- Current universe</li>
        <li><a href="/api/status">/api/status</a> -- Countdown and enrichment status</li>
        <li><a href="/api/archive">/api/archive</a> -- Archived universes</li>
        <li><a href="/api/share">/api/share</a> -- Share payload</li>
        <li><code>ws://host:port/ws/universe</code> -- Live universe events</li>
    </ul>
</body>
</html>"#
    ))
}

fn universe_html(current: &CurrentUniverse, status: &EnrichmentStatus) -> String {
    let u = &current.universe;
    let mut html = format!(
        r#"<h2>Dimension #{seed}</h2>
    <div>
        <div class="metric"><div class="label">Climate</div><div class="value">{climate}</div></div>
        <div class="metric"><div class="label">Gravity</div><div class="value">{gravity}</div></div>
        <div class="metric"><div class="label">Moons</div><div class="value">{moons}</div></div>
        <div class="metric"><div class="label">Tech</div><div class="value">{tech}</div></div>
        <div class="metric"><div class="label">Government</div><div class="value">{gov}</div></div>
        <div class="metric"><div class="label">Dominant</div><div class="value">{dominant}</div></div>
        <div class="metric"><div class="label">Last War</div><div class="value">{war}</div></div>
    </div>"#,
        seed = u.seed,
        climate = escape_html(&u.planet.climate),
        gravity = u.planet.gravity_label(),
        moons = u.planet.moons,
        tech = escape_html(&u.society.tech_level),
        gov = escape_html(&u.society.government),
        dominant = escape_html(&u.society.dominant_country),
        war = escape_html(&u.history.last_war.to_string()),
    );

    if status.in_progress {
        let _ = write!(html, "\n    <p class=\"subtitle\">{}</p>", escape_html(&status.label));
    }
    if let Some(image) = current.overlay.image_url.as_deref() {
        let _ = write!(html, "\n    <img src=\"{}\" alt=\"Universe portrait\">", escape_html(image));
    }
    if let Some(description) = current.overlay.description.as_deref() {
        let _ = write!(html, "\n    <p>{}</p>", escape_html(description));
    }

    html.push_str("\n    <h3>Headlines</h3>\n    <ul>");
    for headline in &u.headlines {
        let _ = write!(html, "\n        <li>{}</li>", escape_html(headline));
    }
    html.push_str("\n    </ul>");
    html
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// GET /api/universe -- current universe
// ---------------------------------------------------------------------------

/// Return the current universe, base fields and overlay flattened together.
pub async fn get_universe(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let current = state
        .controller
        .current()
        .await
        .ok_or_else(|| ObserverError::NotFound("no universe generated yet".to_owned()))?;
    Ok(Json(current))
}

// ---------------------------------------------------------------------------
// GET /api/status -- countdown and enrichment status
// ---------------------------------------------------------------------------

/// Return the clock seed, countdown, and enrichment progress.
pub async fn get_status(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let controller = &state.controller;
    let current_seed = controller.current().await.map(|c| c.seed());
    let archived = match current_seed {
        Some(seed) => state.archive.contains(&seed.universe_id()).await,
        None => false,
    };
    let remaining_ms = u64::try_from(controller.time_remaining().as_millis()).unwrap_or(u64::MAX);

    Json(StatusResponse {
        seed: controller.current_seed(),
        current_seed,
        countdown: controller.countdown(),
        remaining_ms,
        enrichment: controller.status().await,
        archived,
    })
}

// ---------------------------------------------------------------------------
// POST /api/refresh -- manual refresh
// ---------------------------------------------------------------------------

/// Force a refresh: regenerate the current epoch's universe and re-issue
/// enrichment.
pub async fn refresh(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (outcome, universe) = state.controller.refresh_snapshot(true).await;
    Json(RefreshResponse {
        seed: outcome.seed(),
        generated: outcome.generated(),
        universe,
    })
}

// ---------------------------------------------------------------------------
// /api/archive -- saved universes
// ---------------------------------------------------------------------------

/// List all archived universes in save order.
pub async fn list_archive(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let universes = state.archive.list().await;
    Json(serde_json::json!({
        "count": universes.len(),
        "universes": universes,
    }))
}

/// Archive the universe currently on display.
///
/// Responds `201 Created` with the new entry, or `200 OK` with the existing
/// entry when that universe was already archived.
pub async fn archive_current(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let current = state
        .controller
        .current()
        .await
        .ok_or_else(|| ObserverError::NotFound("no universe generated yet".to_owned()))?;

    let saved_at = state.controller.now_ms();
    match state.archive.add(&current, saved_at).await? {
        AddOutcome::Added(entry) => Ok((
            StatusCode::CREATED,
            Json(serde_json::json!({ "added": true, "universe": entry })),
        )),
        AddOutcome::AlreadyArchived => {
            let existing = state.archive.get(current.id()).await;
            Ok((
                StatusCode::OK,
                Json(serde_json::json!({ "added": false, "universe": existing })),
            ))
        }
    }
}

/// Return one archived universe.
pub async fn get_archived(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ObserverError> {
    let entry = state
        .archive
        .get(&id)
        .await
        .ok_or_else(|| ObserverError::NotFound(format!("archived universe {id}")))?;
    Ok(Json(entry))
}

/// Remove one universe from the archive.
pub async fn delete_archived(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ObserverError> {
    match state.archive.remove(&id).await? {
        RemoveOutcome::Removed => Ok(StatusCode::NO_CONTENT),
        RemoveOutcome::NotFound => Err(ObserverError::NotFound(format!("archived universe {id}"))),
    }
}

// ---------------------------------------------------------------------------
// GET /api/share -- share payload
// ---------------------------------------------------------------------------

/// Return the title, text, and link for sharing the current universe.
pub async fn share(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ObserverError> {
    let current = state
        .controller
        .current()
        .await
        .ok_or_else(|| ObserverError::NotFound("no universe generated yet".to_owned()))?;
    Ok(Json(share_payload(&current, state.share_base_url.as_deref())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html("<b>\"Tom\" & 'Jerry'</b>"),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }
}
