#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::{Duration, Instant},
};

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use sporlapi::{
    config::Config,
    errors::UpstreamError,
    server::{AppState, router},
    spotify::{CatalogApi, Clock, TokenCache},
    types::{
        AudioFeatures, Image, RecommendationsResponse, SearchResponse, TokenGrant, Track,
        TrackAlbum, TrackArtist, TrackPage,
    },
};

/// In-memory stand-in for the Spotify Web API that counts every call.
pub struct FakeSpotify {
    pub token_calls: AtomicUsize,
    pub search_calls: AtomicUsize,
    pub features_calls: AtomicUsize,
    pub seed_calls: AtomicUsize,
    pub recommendation_calls: AtomicUsize,
    pub fail_token: AtomicBool,
    pub expires_in: u64,
    pub search_results: Vec<Track>,
    pub search_error: Option<UpstreamError>,
    pub search_extra: Map<String, Value>,
    pub panic_on_search: bool,
    pub recommended: Vec<Track>,
    pub features: HashMap<String, AudioFeatures>,
    pub seed_error: Option<UpstreamError>,
    pub track_error: Option<UpstreamError>,
    pub last_recommendation_params: Mutex<Vec<(String, String)>>,
}

impl FakeSpotify {
    pub fn new() -> Self {
        Self {
            token_calls: AtomicUsize::new(0),
            search_calls: AtomicUsize::new(0),
            features_calls: AtomicUsize::new(0),
            seed_calls: AtomicUsize::new(0),
            recommendation_calls: AtomicUsize::new(0),
            fail_token: AtomicBool::new(false),
            expires_in: 3600,
            search_results: Vec::new(),
            search_error: None,
            search_extra: Map::new(),
            panic_on_search: false,
            recommended: Vec::new(),
            features: HashMap::new(),
            seed_error: None,
            track_error: None,
            last_recommendation_params: Mutex::new(Vec::new()),
        }
    }

    pub fn with_features(mut self, features: Vec<AudioFeatures>) -> Self {
        for f in features {
            self.features.insert(f.id.clone(), f);
        }
        self
    }

    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn features_calls(&self) -> usize {
        self.features_calls.load(Ordering::SeqCst)
    }

    pub fn seed_calls(&self) -> usize {
        self.seed_calls.load(Ordering::SeqCst)
    }

    pub fn recommendation_calls(&self) -> usize {
        self.recommendation_calls.load(Ordering::SeqCst)
    }

    pub fn set_fail_token(&self, fail: bool) {
        self.fail_token.store(fail, Ordering::SeqCst);
    }

    pub fn recommendation_params(&self) -> Vec<(String, String)> {
        self.last_recommendation_params.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogApi for FakeSpotify {
    async fn request_token(&self) -> Result<TokenGrant, UpstreamError> {
        let n = self.token_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_token.load(Ordering::SeqCst) {
            return Err(status_error(400, json!({ "error": "invalid_client" })));
        }
        Ok(TokenGrant {
            access_token: format!("token-{}", n),
            token_type: "Bearer".to_string(),
            expires_in: self.expires_in,
        })
    }

    async fn search_tracks(
        &self,
        _token: &str,
        _query: &str,
        limit: u32,
    ) -> Result<SearchResponse, UpstreamError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_on_search {
            panic!("search exploded");
        }
        if let Some(e) = &self.search_error {
            return Err(e.clone());
        }
        Ok(SearchResponse {
            tracks: TrackPage {
                items: self
                    .search_results
                    .iter()
                    .take(limit as usize)
                    .cloned()
                    .collect(),
                total: self.search_results.len() as u64,
            },
            extra: self.search_extra.clone(),
        })
    }

    async fn audio_features(
        &self,
        _token: &str,
        ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, UpstreamError> {
        self.features_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ids.iter().map(|id| self.features.get(id).cloned()).collect())
    }

    async fn track_audio_features(
        &self,
        _token: &str,
        id: &str,
    ) -> Result<AudioFeatures, UpstreamError> {
        self.seed_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = &self.seed_error {
            return Err(e.clone());
        }
        self.features
            .get(id)
            .cloned()
            .ok_or_else(|| status_error(404, json!({ "error": "not found" })))
    }

    async fn recommendations(
        &self,
        _token: &str,
        params: &[(String, String)],
    ) -> Result<RecommendationsResponse, UpstreamError> {
        self.recommendation_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_recommendation_params.lock().unwrap() = params.to_vec();
        Ok(RecommendationsResponse {
            tracks: self.recommended.clone(),
            seeds: json!([{ "type": "TRACK" }]),
        })
    }

    async fn track(&self, _token: &str, id: &str) -> Result<Track, UpstreamError> {
        if let Some(e) = &self.track_error {
            return Err(e.clone());
        }
        self.search_results
            .iter()
            .chain(self.recommended.iter())
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| status_error(404, json!({ "error": "not found" })))
    }

    async fn browse_categories(&self, _token: &str, _limit: u32) -> Result<Value, UpstreamError> {
        Ok(json!({ "categories": { "items": [{ "id": "pop" }] } }))
    }
}

/// Clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }
}

pub fn status_error(status: u16, body: Value) -> UpstreamError {
    UpstreamError::from_status(status, Some("Error".to_string()), body)
}

pub fn track(id: &str, artist: &str, popularity: u32) -> Track {
    let mut external_urls = Map::new();
    external_urls.insert(
        "spotify".to_string(),
        json!(format!("https://open.spotify.com/track/{}", id)),
    );

    Track {
        id: id.to_string(),
        name: format!("Track {}", id),
        artists: vec![TrackArtist {
            id: Some(format!("{}_artist", id)),
            name: artist.to_string(),
        }],
        album: TrackAlbum {
            id: Some(format!("{}_album", id)),
            name: format!("Album {}", id),
            images: vec![Image {
                url: format!("https://i.scdn.co/image/{}", id),
                height: Some(640),
                width: Some(640),
            }],
        },
        preview_url: None,
        external_urls,
        popularity,
    }
}

pub fn features(
    id: &str,
    energy: f64,
    danceability: f64,
    valence: f64,
    acousticness: f64,
) -> AudioFeatures {
    AudioFeatures {
        id: id.to_string(),
        energy,
        danceability,
        valence,
        acousticness,
        instrumentalness: 0.0,
        tempo: 120.0,
        extra: Map::new(),
    }
}

/// Router over `fake`, plus a handle to inspect its counters.
pub fn app(fake: FakeSpotify) -> (axum::Router, Arc<FakeSpotify>) {
    app_with_config(fake, Config::default())
}

pub fn app_with_config(fake: FakeSpotify, config: Config) -> (axum::Router, Arc<FakeSpotify>) {
    let fake = Arc::new(fake);
    let api: Arc<dyn CatalogApi> = fake.clone();
    (router(AppState::new(config, api)), fake)
}

/// Router whose token cache runs on `clock`.
pub fn app_with_clock(
    fake: FakeSpotify,
    clock: Arc<ManualClock>,
) -> (axum::Router, Arc<FakeSpotify>) {
    let fake = Arc::new(fake);
    let api: Arc<dyn CatalogApi> = fake.clone();
    let tokens = Arc::new(TokenCache::with_clock(Arc::clone(&api), clock));
    let state = AppState::with_token_cache(Config::default(), api, tokens);
    (router(state), fake)
}

pub fn cache(fake: FakeSpotify) -> (TokenCache, Arc<FakeSpotify>, Arc<ManualClock>) {
    let fake = Arc::new(fake);
    let clock = Arc::new(ManualClock::new());
    let api: Arc<dyn CatalogApi> = fake.clone();
    let tokens = TokenCache::with_clock(api, clock.clone());
    (tokens, fake, clock)
}
