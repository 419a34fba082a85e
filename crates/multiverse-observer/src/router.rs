//! Axum router construction for the display surface.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin frontends.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- HTML status page
/// - `GET /ws/universe` -- `WebSocket` universe event stream
/// - `GET /api/universe` -- current universe
/// - `GET /api/status` -- countdown and enrichment status
/// - `POST /api/refresh` -- force refresh
/// - `GET|POST /api/archive` -- list or add to the archive
/// - `GET|DELETE /api/archive/{id}` -- read or remove one entry
/// - `GET /api/share` -- share payload
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Status page
        .route("/", get(handlers::index))
        // WebSocket
        .route("/ws/universe", get(ws::ws_universe))
        // REST API
        .route("/api/universe", get(handlers::get_universe))
        .route("/api/status", get(handlers::get_status))
        .route("/api/refresh", axum::routing::post(handlers::refresh))
        .route(
            "/api/archive",
            get(handlers::list_archive).post(handlers::archive_current),
        )
        .route(
            "/api/archive/{id}",
            get(handlers::get_archived).delete(handlers::delete_archived),
        )
        .route("/api/share", get(handlers::share))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
