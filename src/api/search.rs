use std::collections::HashMap;

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{
    errors::AppError,
    info,
    server::AppState,
    similarity::simulate_features,
    types::{SimulatedTrack, TrackWithFeatures},
    utils::{align_features, parse_limit, required_param, summarize_track},
    warning,
};

use super::guard::{BearerToken, FromQuery, Params};

/// `q` plus a `limit` defaulting to `DEFAULT_LIMIT`.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery<const DEFAULT_LIMIT: u32> {
    pub q: String,
    pub limit: u32,
}

impl<const DEFAULT_LIMIT: u32> FromQuery for SearchQuery<DEFAULT_LIMIT> {
    fn from_query(params: &HashMap<String, String>) -> Result<Self, AppError> {
        Ok(Self {
            q: required_param(params, "q")?.to_string(),
            limit: parse_limit(params, DEFAULT_LIMIT)?,
        })
    }
}

/// GET /api/search
pub async fn search(
    State(state): State<AppState>,
    Params(query): Params<SearchQuery<10>>,
    BearerToken(token): BearerToken,
) -> Result<Json<Value>, AppError> {
    info!("Searching: \"{}\"", query.q);

    let res = state
        .api
        .search_tracks(&token, &query.q, query.limit)
        .await
        .map_err(|e| {
            warning!("Search failed: {}", e);
            AppError::upstream("Search failed", e)
        })?;

    let tracks: Vec<_> = res.tracks.items.iter().map(summarize_track).collect();

    Ok(Json(json!({
        "success": true,
        "query": query.q,
        "total": res.tracks.total,
        "tracks": tracks,
    })))
}

/// GET /api/search-with-features
///
/// Search followed by one audio-features call for all result ids. An empty
/// search answers right away without the second call.
pub async fn search_with_features(
    State(state): State<AppState>,
    Params(query): Params<SearchQuery<5>>,
    BearerToken(token): BearerToken,
) -> Result<Json<Value>, AppError> {
    const CONTEXT: &str = "Search with features failed";

    info!("Searching with features: \"{}\"", query.q);

    let res = state
        .api
        .search_tracks(&token, &query.q, query.limit)
        .await
        .map_err(|e| {
            warning!("{}: {}", CONTEXT, e);
            AppError::upstream(CONTEXT, e)
        })?;

    let tracks = res.tracks.items;
    if tracks.is_empty() {
        return Ok(Json(json!({
            "success": true,
            "query": query.q,
            "total": 0,
            "tracks": [],
        })));
    }

    let ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();
    let features = state
        .api
        .audio_features(&token, &ids)
        .await
        .map_err(|e| {
            warning!("{}: {}", CONTEXT, e);
            AppError::upstream(CONTEXT, e)
        })?;

    let combined: Vec<TrackWithFeatures> = tracks
        .iter()
        .zip(align_features(&tracks, &features))
        .map(|(track, audio_features)| TrackWithFeatures {
            track: summarize_track(track),
            audio_features,
        })
        .collect();

    Ok(Json(json!({
        "success": true,
        "query": query.q,
        "total": res.tracks.total,
        "tracks": combined,
    })))
}

/// GET /api/search-simple
///
/// Search only. The audio features in this response are simulated from
/// popularity, never fetched, and the envelope says so.
pub async fn search_simple(
    State(state): State<AppState>,
    Params(query): Params<SearchQuery<10>>,
    BearerToken(token): BearerToken,
) -> Result<Json<Value>, AppError> {
    info!("Simple search: \"{}\"", query.q);

    let res = state
        .api
        .search_tracks(&token, &query.q, query.limit)
        .await
        .map_err(|e| {
            warning!("Simple search failed: {}", e);
            AppError::upstream("Simple search failed", e)
        })?;

    let tracks: Vec<SimulatedTrack> = {
        let mut rng = rand::rng();
        res.tracks
            .items
            .iter()
            .map(|track| SimulatedTrack {
                track: summarize_track(track),
                audio_features: simulate_features(track.popularity, &mut rng),
            })
            .collect()
    };

    Ok(Json(json!({
        "success": true,
        "query": query.q,
        "total": res.tracks.total,
        "simulated_features": true,
        "note": "audio_features are simulated from track popularity and are not measured data",
        "tracks": tracks,
    })))
}
