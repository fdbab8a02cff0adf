use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    config::Config,
    errors::UpstreamError,
    types::{
        AudioFeatures, AudioFeaturesResponse, RecommendationsResponse, SearchResponse, TokenGrant,
        Track,
    },
};

use super::CatalogApi;

/// reqwest-backed implementation of [`CatalogApi`].
///
/// One `reqwest::Client` is shared for the lifetime of the process so
/// connections to Spotify are pooled. No timeouts are set beyond reqwest's
/// defaults.
#[derive(Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    token_url: String,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl SpotifyClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        }
    }

    fn get(&self, path: &str, token: &str) -> RequestBuilder {
        self.http
            .get(format!("{}{}", self.api_url, path))
            .bearer_auth(token)
    }

    /// `Basic base64(client_id:client_secret)` header value.
    fn basic_credentials(&self) -> Option<String> {
        let id = self.client_id.as_deref()?;
        let secret = self.client_secret.as_deref()?;
        Some(format!(
            "Basic {}",
            STANDARD.encode(format!("{}:{}", id, secret))
        ))
    }
}

/// Sends the request and decodes a 2xx body as `T`.
///
/// Non-2xx answers keep Spotify's body (as JSON when it parses, as a string
/// otherwise) so callers can show it to the client.
async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, UpstreamError> {
    let response = request.send().await?;
    let status = response.status();

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        return Err(UpstreamError::from_status(
            status.as_u16(),
            status.canonical_reason().map(str::to_string),
            body,
        ));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| UpstreamError::transport(format!("Failed to decode Spotify response: {}", e)))
}

#[async_trait]
impl CatalogApi for SpotifyClient {
    async fn request_token(&self) -> Result<TokenGrant, UpstreamError> {
        let Some(credentials) = self.basic_credentials() else {
            return Err(UpstreamError::transport(
                "SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET must be set",
            ));
        };

        let request = self
            .http
            .post(&self.token_url)
            .header(reqwest::header::AUTHORIZATION, credentials)
            .form(&[("grant_type", "client_credentials")]);

        send_json(request).await
    }

    async fn search_tracks(
        &self,
        token: &str,
        query: &str,
        limit: u32,
    ) -> Result<SearchResponse, UpstreamError> {
        // no market parameter: it makes Spotify answer 403 for some apps
        let limit = limit.to_string();
        let request = self.get("/search", token).query(&[
            ("q", query),
            ("type", "track"),
            ("limit", limit.as_str()),
        ]);

        send_json(request).await
    }

    async fn audio_features(
        &self,
        token: &str,
        ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>, UpstreamError> {
        let request = self
            .get("/audio-features", token)
            .query(&[("ids", ids.join(","))]);

        let res: AudioFeaturesResponse = send_json(request).await?;
        Ok(res.audio_features)
    }

    async fn track_audio_features(
        &self,
        token: &str,
        id: &str,
    ) -> Result<AudioFeatures, UpstreamError> {
        send_json(self.get(&format!("/audio-features/{}", id), token)).await
    }

    async fn recommendations(
        &self,
        token: &str,
        params: &[(String, String)],
    ) -> Result<RecommendationsResponse, UpstreamError> {
        send_json(self.get("/recommendations", token).query(params)).await
    }

    async fn track(&self, token: &str, id: &str) -> Result<Track, UpstreamError> {
        send_json(self.get(&format!("/tracks/{}", id), token)).await
    }

    async fn browse_categories(&self, token: &str, limit: u32) -> Result<Value, UpstreamError> {
        let request = self
            .get("/browse/categories", token)
            .query(&[("limit", limit)]);

        send_json(request).await
    }
}
