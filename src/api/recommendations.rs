use std::collections::HashMap;

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{
    errors::AppError,
    info,
    server::AppState,
    similarity::rank_by_similarity,
    utils::{TARGET_PARAMS, align_features, param, parse_limit, split_ids, summarize_track},
    warning,
};

use super::guard::{BearerToken, FromQuery, Params};

pub const DEFAULT_MARKET: &str = "BR";
pub const DEFAULT_LIMIT: u32 = 15;

/// Query accepted by both recommendation endpoints.
///
/// Seeds and `target_*` overrides are kept as strings and handed to Spotify
/// untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationQuery {
    pub seed_tracks: Option<String>,
    pub seed_artists: Option<String>,
    pub seed_genres: Option<String>,
    pub limit: u32,
    pub market: String,
    pub targets: Vec<(String, String)>,
}

impl RecommendationQuery {
    fn parse(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let owned = |name: &str| param(params, name).map(str::to_string);

        Ok(Self {
            seed_tracks: owned("seed_tracks"),
            seed_artists: owned("seed_artists"),
            seed_genres: owned("seed_genres"),
            limit: parse_limit(params, DEFAULT_LIMIT)?,
            market: owned("market").unwrap_or_else(|| DEFAULT_MARKET.to_string()),
            targets: TARGET_PARAMS
                .into_iter()
                .filter_map(|name| owned(name).map(|v| (name.to_string(), v)))
                .collect(),
        })
    }

    /// Query parameters for Spotify's `/recommendations`.
    pub fn upstream_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("limit".to_string(), self.limit.to_string()),
            ("market".to_string(), self.market.clone()),
        ];

        let seeds = [
            ("seed_tracks", &self.seed_tracks),
            ("seed_artists", &self.seed_artists),
            ("seed_genres", &self.seed_genres),
        ];
        for (name, value) in seeds {
            if let Some(v) = value {
                params.push((name.to_string(), v.clone()));
            }
        }

        params.extend(self.targets.iter().cloned());
        params
    }
}

impl FromQuery for RecommendationQuery {
    fn from_query(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let query = Self::parse(params)?;
        let seeded = [&query.seed_tracks, &query.seed_artists, &query.seed_genres]
            .iter()
            .any(|seed| seed.is_some());
        if !seeded {
            return Err(AppError::validation(
                "At least one seed (seed_tracks, seed_artists or seed_genres) is required",
            ));
        }
        Ok(query)
    }
}

/// [`RecommendationQuery`] that must be seeded with tracks.
///
/// Artist and genre seeds are not forwarded by the scored endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSeededQuery(pub RecommendationQuery);

impl TrackSeededQuery {
    /// The seed track whose features anchor the similarity score.
    pub fn primary_seed(&self) -> Option<String> {
        self.0
            .seed_tracks
            .as_deref()
            .and_then(|s| split_ids(s).into_iter().next())
    }
}

impl FromQuery for TrackSeededQuery {
    fn from_query(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let mut query = RecommendationQuery::parse(params)?;
        if query.seed_tracks.is_none() {
            return Err(AppError::validation(
                "Query parameter \"seed_tracks\" is required",
            ));
        }
        query.seed_artists = None;
        query.seed_genres = None;
        Ok(TrackSeededQuery(query))
    }
}

/// GET /api/recommendations
pub async fn recommendations(
    State(state): State<AppState>,
    Params(query): Params<RecommendationQuery>,
    BearerToken(token): BearerToken,
) -> Result<Json<Value>, AppError> {
    info!(
        "Generating recommendations for seed_tracks: {}",
        query.seed_tracks.as_deref().unwrap_or("-")
    );

    let res = state
        .api
        .recommendations(&token, &query.upstream_params())
        .await
        .map_err(|e| {
            warning!("Recommendations failed: {}", e);
            AppError::upstream("Failed to generate recommendations", e)
        })?;

    let tracks: Vec<_> = res.tracks.iter().map(summarize_track).collect();

    Ok(Json(json!({
        "success": true,
        "total": tracks.len(),
        "seeds": res.seeds,
        "recommendations": tracks,
    })))
}

/// GET /api/recommendations-with-features
///
/// Recommendations, then their audio features, then the seed track's
/// features. The seed lookup is optional: when it fails the response still
/// succeeds, just without similarity scores.
pub async fn recommendations_with_features(
    State(state): State<AppState>,
    Params(query): Params<TrackSeededQuery>,
    BearerToken(token): BearerToken,
) -> Result<Json<Value>, AppError> {
    const CONTEXT: &str = "Failed to generate recommendations with features";

    let seed = query.primary_seed();
    info!(
        "Generating scored recommendations for: {}",
        query.0.seed_tracks.as_deref().unwrap_or("-")
    );

    let res = state
        .api
        .recommendations(&token, &query.0.upstream_params())
        .await
        .map_err(|e| {
            warning!("{}: {}", CONTEXT, e);
            AppError::upstream(CONTEXT, e)
        })?;

    if res.tracks.is_empty() {
        return Ok(Json(json!({
            "success": true,
            "total": 0,
            "recommendations": [],
        })));
    }

    let ids: Vec<String> = res.tracks.iter().map(|t| t.id.clone()).collect();
    let features = state
        .api
        .audio_features(&token, &ids)
        .await
        .map_err(|e| {
            warning!("{}: {}", CONTEXT, e);
            AppError::upstream(CONTEXT, e)
        })?;

    let seed_features = match seed {
        Some(id) => match state.api.track_audio_features(&token, &id).await {
            Ok(f) => Some(f),
            Err(e) => {
                warning!("Could not fetch seed track features for {}: {}", id, e);
                None
            }
        },
        None => None,
    };

    let aligned = align_features(&res.tracks, &features);
    let summaries = res.tracks.iter().map(summarize_track).collect();
    let ranked = rank_by_similarity(summaries, aligned, seed_features.as_ref());

    Ok(Json(json!({
        "success": true,
        "total": ranked.len(),
        "seed_features": seed_features,
        "recommendations": ranked,
    })))
}
