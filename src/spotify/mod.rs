//! # Spotify Integration Module
//!
//! This module is the only place that talks to Spotify. It is split in two:
//!
//! - [`client`] - [`SpotifyClient`], a thin reqwest wrapper with one method per
//!   Web API endpoint the relay needs. It holds no token state: every call
//!   takes the bearer token as an argument.
//! - [`auth`] - [`TokenCache`], the single-slot, in-memory cache for the
//!   client-credentials token shared by every request.
//!
//! ## Architecture
//!
//! ```text
//! Route handlers
//!      ↓            (bearer token from the auth guard)
//! CatalogApi  ←──── TokenCache (token exchange only)
//!      ↓
//! Spotify Web API
//! ```
//!
//! Both halves meet at the [`CatalogApi`] trait so tests can swap the real
//! client for an in-memory fake and count how often each endpoint was hit.
//!
//! ## API Coverage
//!
//! - `POST /api/token` - client-credentials token exchange
//! - `GET /search` - track search
//! - `GET /audio-features` - features for a list of track ids
//! - `GET /audio-features/{id}` - features for a single track
//! - `GET /recommendations` - seed-based recommendations
//! - `GET /tracks/{id}` - single track lookup
//! - `GET /browse/categories` - used only to smoke-test a fresh token
//!
//! ## Error Handling
//!
//! Nothing here retries. Every non-2xx answer or transport failure becomes an
//! [`UpstreamError`] carrying Spotify's status, status text and body so the
//! handler can put them into the response as they are.

use async_trait::async_trait;
use serde_json::Value;

use crate::{
    errors::UpstreamError,
    types::{AudioFeatures, RecommendationsResponse, SearchResponse, TokenGrant, Track},
};

pub mod auth;
pub mod client;

pub use auth::{Clock, SystemClock, TokenCache};
pub use client::SpotifyClient;

/// The Spotify Web API operations the relay depends on.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Exchanges the configured client credentials for a bearer token.
    async fn request_token(&self) -> Result<TokenGrant, UpstreamError>;

    async fn search_tracks(
        &self,
        token: &str,
        query: &str,
        limit: u32,
    ) -> Result<SearchResponse, UpstreamError>;

    /// Features for several tracks, in request order, `None` where Spotify has none.
    async fn audio_features(
        &self,
        token: &str,
        ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, UpstreamError>;

    async fn track_audio_features(
        &self,
        token: &str,
        id: &str,
    ) -> Result<AudioFeatures, UpstreamError>;

    /// `params` are passed as query parameters without interpretation.
    async fn recommendations(
        &self,
        token: &str,
        params: &[(String, String)],
    ) -> Result<RecommendationsResponse, UpstreamError>;

    async fn track(&self, token: &str, id: &str) -> Result<Track, UpstreamError>;

    async fn browse_categories(&self, token: &str, limit: u32) -> Result<Value, UpstreamError>;
}
