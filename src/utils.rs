use std::collections::HashMap;

use crate::{
    errors::AppError,
    types::{AudioFeatures, Track, TrackSummary},
};

/// Target overrides accepted by the recommendation endpoints, forwarded verbatim.
pub const TARGET_PARAMS: [&str; 6] = [
    "target_energy",
    "target_danceability",
    "target_valence",
    "target_acousticness",
    "target_instrumentalness",
    "target_tempo",
];

/// Returns the trimmed value of a query parameter, treating blanks as absent.
pub fn param<'a>(params: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    params
        .get(name)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

/// Returns a required query parameter or a 400 naming it.
pub fn required_param<'a>(
    params: &'a HashMap<String, String>,
    name: &str,
) -> Result<&'a str, AppError> {
    param(params, name).ok_or_else(|| {
        AppError::validation(format!("Query parameter \"{}\" is required", name))
    })
}

/// Parses `limit`, falling back to `default` when absent.
///
/// The value is not clamped: Spotify rejects out-of-range limits itself.
pub fn parse_limit(params: &HashMap<String, String>, default: u32) -> Result<u32, AppError> {
    match param(params, "limit") {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| {
            AppError::validation(format!(
                "Query parameter \"limit\" must be a positive integer, got \"{}\"",
                raw
            ))
        }),
    }
}

/// Splits a comma-joined id list, dropping empty entries.
pub fn split_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn summarize_track(track: &Track) -> TrackSummary {
    TrackSummary {
        id: track.id.clone(),
        name: track.name.clone(),
        artist: track
            .artists
            .first()
            .map(|a| a.name.clone())
            .unwrap_or_default(),
        album: track.album.name.clone(),
        image: track.album.images.first().map(|i| i.url.clone()),
        preview_url: track.preview_url.clone(),
        external_urls: track.external_urls.clone(),
        popularity: track.popularity,
    }
}

/// Pairs every track with its audio features.
///
/// Spotify returns features in the order the ids were requested, so the
/// entry at the same position is used whenever its id matches. A mismatched
/// entry falls back to a lookup by id; tracks without features get `None`.
pub fn align_features(
    tracks: &[Track],
    features: &[Option<AudioFeatures>],
) -> Vec<Option<AudioFeatures>> {
    tracks
        .iter()
        .enumerate()
        .map(|(index, track)| match features.get(index) {
            Some(Some(f)) if f.id == track.id => Some(f.clone()),
            Some(None) => None,
            _ => features
                .iter()
                .flatten()
                .find(|f| f.id == track.id)
                .cloned(),
        })
        .collect()
}

/// First `len` characters of a token, for logs and debug output.
pub fn token_prefix(token: &str, len: usize) -> String {
    token.chars().take(len).collect()
}
