//! Single-purpose probes for checking what Spotify actually answers.
//!
//! These routes exist for troubleshooting a deployment (expired app access,
//! missing audio-features permission, market restrictions). They reshape as
//! little as possible and put everything Spotify said into the response.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use crate::{
    errors::AppError,
    info,
    server::AppState,
    utils::{param, split_ids, summarize_track, token_prefix},
    warning,
};

use super::guard::{BearerToken, FromQuery, Params};

/// Track ids used when a probe is called without `ids`.
pub const PROBE_TRACK_IDS: [&str; 3] = [
    "7ouMYWpwJ422jRcDASZB7P",
    "4VqPOruhp5EdPBeR92t6lQ",
    "2takcwOaAZWiXQijPHIx7B",
];

/// [`AppError`] rendered with `"debug": true` in its envelope.
pub struct DebugFailure(AppError);

impl From<AppError> for DebugFailure {
    fn from(err: AppError) -> Self {
        DebugFailure(err)
    }
}

impl IntoResponse for DebugFailure {
    fn into_response(self) -> Response {
        let mut body = self.0.body();
        body["debug"] = Value::Bool(true);
        (self.0.status_code(), Json(body)).into_response()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeSearchQuery {
    pub q: String,
}

impl FromQuery for ProbeSearchQuery {
    fn from_query(params: &HashMap<String, String>) -> Result<Self, AppError> {
        Ok(Self {
            q: param(params, "q").unwrap_or("test").to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeIdsQuery {
    pub ids: Vec<String>,
}

impl FromQuery for ProbeIdsQuery {
    fn from_query(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let ids = param(params, "ids").map(split_ids).unwrap_or_default();
        let ids = if ids.is_empty() {
            PROBE_TRACK_IDS.iter().map(|id| id.to_string()).collect()
        } else {
            ids
        };
        Ok(Self { ids })
    }
}

/// GET /api/debug/search
///
/// One-result search showing the shape of Spotify's answer.
pub async fn debug_search(
    State(state): State<AppState>,
    Params(query): Params<ProbeSearchQuery>,
    BearerToken(token): BearerToken,
) -> Result<Json<Value>, DebugFailure> {
    let prefix = token_prefix(&token, 10);
    info!("DEBUG: searching \"{}\" with token {}...", query.q, prefix);

    let res = state
        .api
        .search_tracks(&token, &query.q, 1)
        .await
        .map_err(|e| {
            warning!("DEBUG: search failed: {:?}", e);
            AppError::upstream("Debug search failed", e)
        })?;

    let first_track = res.tracks.items.first().map(|t| {
        json!({
            "id": t.id,
            "name": t.name,
            "artist": t.artists.first().map(|a| a.name.clone()),
        })
    });

    Ok(Json(json!({
        "success": true,
        "debug": true,
        "query": query.q,
        "token_prefix": prefix,
        "total_found": res.tracks.total,
        "first_track": first_track,
        "raw_response_keys": res.top_level_keys(),
    })))
}

/// GET /api/debug/audio-features
pub async fn debug_audio_features(
    State(state): State<AppState>,
    Params(query): Params<ProbeIdsQuery>,
    BearerToken(token): BearerToken,
) -> Result<Json<Value>, DebugFailure> {
    info!("DEBUG: audio features for {}", query.ids.join(","));

    let features = state
        .api
        .audio_features(&token, &query.ids)
        .await
        .map_err(|e| {
            warning!("DEBUG: audio features failed: {:?}", e);
            AppError::upstream("Debug audio features failed", e)
        })?;

    Ok(Json(json!({
        "success": true,
        "debug": true,
        "ids": query.ids,
        "returned": features.iter().flatten().count(),
        "audio_features": features,
    })))
}

/// GET /api/test/audio-features/{track_id}
///
/// Looks the track up first so a bad id and a missing feature set can be
/// told apart. Spotify's status code is forwarded on failure.
pub async fn test_track_audio_features(
    State(state): State<AppState>,
    Path(track_id): Path<String>,
    BearerToken(token): BearerToken,
) -> Result<Json<Value>, AppError> {
    info!("TEST: audio features for track {}", track_id);

    let track = state
        .api
        .track(&token, &track_id)
        .await
        .map_err(|e| AppError::upstream_forwarded("Track lookup failed", e))?;

    let features = state
        .api
        .track_audio_features(&token, &track_id)
        .await
        .map_err(|e| AppError::upstream_forwarded("Audio features lookup failed", e))?;

    Ok(Json(json!({
        "success": true,
        "track_id": track_id,
        "track": summarize_track(&track),
        "audio_features": features,
    })))
}

/// GET /api/test/audio-features-multiple
///
/// Reports which of the requested ids came back without features.
pub async fn test_multiple_audio_features(
    State(state): State<AppState>,
    Params(query): Params<ProbeIdsQuery>,
    BearerToken(token): BearerToken,
) -> Result<Json<Value>, AppError> {
    info!("TEST: audio features for {} tracks", query.ids.len());

    let features = state
        .api
        .audio_features(&token, &query.ids)
        .await
        .map_err(|e| AppError::upstream_forwarded("Audio features lookup failed", e))?;

    let missing: Vec<&String> = query
        .ids
        .iter()
        .enumerate()
        .filter(|(i, _)| !matches!(features.get(*i), Some(Some(_))))
        .map(|(_, id)| id)
        .collect();

    Ok(Json(json!({
        "success": true,
        "requested": query.ids.len(),
        "returned": features.iter().flatten().count(),
        "missing": missing,
        "audio_features": features,
    })))
}
