use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Upstream payloads

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackArtist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackAlbum {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
    pub album: TrackAlbum,
    pub preview_url: Option<String>,
    #[serde(default)]
    pub external_urls: Map<String, Value>,
    #[serde(default)]
    pub popularity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackPage {
    #[serde(default)]
    pub items: Vec<Track>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: TrackPage,
    /// Any other top-level sections Spotify included.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchResponse {
    /// Top-level keys of the payload as Spotify sent it.
    pub fn top_level_keys(&self) -> Vec<String> {
        std::iter::once("tracks".to_string())
            .chain(self.extra.keys().cloned())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub seeds: Value,
}

/// Audio features as returned by Spotify.
///
/// The six fields used for scoring are typed; every other field (key, mode,
/// loudness, uri, ...) is carried through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub id: String,
    #[serde(default)]
    pub energy: f64,
    #[serde(default)]
    pub danceability: f64,
    #[serde(default)]
    pub valence: f64,
    #[serde(default)]
    pub acousticness: f64,
    #[serde(default)]
    pub instrumentalness: f64,
    #[serde(default)]
    pub tempo: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeaturesResponse {
    #[serde(default)]
    pub audio_features: Vec<Option<AudioFeatures>>,
}

// Client-facing payloads

/// Reduced view of a Spotify track handed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackSummary {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub album: String,
    pub image: Option<String>,
    pub preview_url: Option<String>,
    pub external_urls: Map<String, Value>,
    pub popularity: u32,
}

/// The subset of audio features this service reasons about.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub energy: f64,
    pub danceability: f64,
    pub valence: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub tempo: f64,
}

impl From<&AudioFeatures> for FeatureVector {
    fn from(f: &AudioFeatures) -> Self {
        Self {
            energy: f.energy,
            danceability: f.danceability,
            valence: f.valence,
            acousticness: f.acousticness,
            instrumentalness: f.instrumentalness,
            tempo: f.tempo,
        }
    }
}

/// A feature vector made up from popularity and noise, never measured.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulatedFeatures {
    #[serde(flatten)]
    pub features: FeatureVector,
    pub simulated: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackWithFeatures {
    #[serde(flatten)]
    pub track: TrackSummary,
    pub audio_features: Option<AudioFeatures>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredTrack {
    #[serde(flatten)]
    pub track: TrackSummary,
    pub audio_features: Option<AudioFeatures>,
    pub similarity: Option<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulatedTrack {
    #[serde(flatten)]
    pub track: TrackSummary,
    pub audio_features: SimulatedFeatures,
}
