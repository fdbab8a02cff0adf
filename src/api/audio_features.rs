use std::collections::HashMap;

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{
    errors::AppError,
    info,
    server::AppState,
    utils::{required_param, split_ids},
    warning,
};

use super::guard::{BearerToken, FromQuery, Params};

#[derive(Debug, Clone, PartialEq)]
pub struct IdsQuery {
    pub ids: Vec<String>,
}

impl FromQuery for IdsQuery {
    fn from_query(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let ids = split_ids(required_param(params, "ids")?);
        if ids.is_empty() {
            return Err(AppError::validation(
                "Query parameter \"ids\" must contain at least one track id",
            ));
        }
        Ok(Self { ids })
    }
}

/// GET /api/audio-features
///
/// Spotify's array is returned as is: same order as `ids`, `null` for tracks
/// without features.
pub async fn audio_features(
    State(state): State<AppState>,
    Params(query): Params<IdsQuery>,
    BearerToken(token): BearerToken,
) -> Result<Json<Value>, AppError> {
    info!("Fetching audio features for: {}", query.ids.join(","));

    let features = state
        .api
        .audio_features(&token, &query.ids)
        .await
        .map_err(|e| {
            warning!("Audio features lookup failed: {}", e);
            AppError::upstream("Failed to fetch audio features", e)
        })?;

    Ok(Json(json!({
        "success": true,
        "audio_features": features,
    })))
}
