//! Axum router construction for the session API.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS and request tracing middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /health` -- liveness probe
/// - `POST /api/v1/sessions` -- create a session
/// - `GET /api/v1/sessions/{session_id}` -- session snapshot
/// - `POST /api/v1/sessions/{session_id}/players` -- register a player
/// - `GET /api/v1/sessions/{session_id}/players/{player_id}` -- player `WebSocket`
/// - `GET /api/v1/sessions/{session_id}/players/{player_id}/collection` -- shared collection
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/v1/sessions", post(handlers::create_session))
        .route("/api/v1/sessions/{session_id}", get(handlers::get_session))
        .route(
            "/api/v1/sessions/{session_id}/players",
            post(handlers::add_player),
        )
        .route(
            "/api/v1/sessions/{session_id}/players/{player_id}",
            get(ws::player_socket),
        )
        .route(
            "/api/v1/sessions/{session_id}/players/{player_id}/collection",
            get(handlers::get_session_collection),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
