use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde_json::{Value, json};

use crate::server::AppState;

/// Every route the service answers, as listed in 404 responses.
pub const AVAILABLE_ENDPOINTS: [&str; 13] = [
    "GET /",
    "GET /health",
    "POST /api/auth/test",
    "GET /api/search?q={query}",
    "GET /api/audio-features?ids={track_ids}",
    "GET /api/recommendations?seed_tracks={track_id}",
    "GET /api/search-with-features?q={query}",
    "GET /api/search-simple?q={query}",
    "GET /api/recommendations-with-features?seed_tracks={track_id}",
    "GET /api/debug/search?q={query}",
    "GET /api/debug/audio-features?ids={track_ids}",
    "GET /api/test/audio-features/{track_id}",
    "GET /api/test/audio-features-multiple?ids={track_ids}",
];

pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Spotify Research API",
        "status": "running",
        "timestamp": Utc::now().to_rfc3339(),
        "endpoints": {
            "health": "/health",
            "auth": "/api/auth/test",
            "search": "/api/search?q={query}",
            "audioFeatures": "/api/audio-features?ids={track_ids}",
            "recommendations": "/api/recommendations?seed_tracks={track_id}",
            "searchWithFeatures": "/api/search-with-features?q={query}",
            "searchSimple": "/api/search-simple?q={query}",
            "recommendationsWithFeatures":
                "/api/recommendations-with-features?seed_tracks={track_id}",
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": {
            "port": state.config.port,
            "spotify_configured": state.config.spotify_configured(),
            "mode": state.config.app_env,
            "version": env!("CARGO_PKG_VERSION"),
        }
    }))
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "Endpoint not found",
            "available_endpoints": AVAILABLE_ENDPOINTS,
        })),
    )
}
