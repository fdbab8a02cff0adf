use std::collections::HashMap;

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};

use crate::{errors::AppError, server::AppState};

/// A Spotify bearer token that was valid when the request came in.
///
/// Taking this as a handler argument is what makes a route authenticated:
/// extraction asks the [`TokenCache`](crate::spotify::TokenCache) for a token
/// and rejects the request with a 500 envelope when none can be obtained, so
/// none of the handler's own logic runs.
///
/// Extractors run in argument order. Handlers list their [`Params`] before
/// `BearerToken` so an invalid request is refused before any call to Spotify,
/// token exchange included.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

impl FromRequestParts<AppState> for BearerToken {
    type Rejection = AppError;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = state.tokens.get_valid_token().await?;
        Ok(BearerToken(token))
    }
}

/// Typed, validated view of a request's query string.
pub trait FromQuery: Sized {
    fn from_query(params: &HashMap<String, String>) -> Result<Self, AppError>;
}

/// Extractor running [`FromQuery`] validation, rejecting with a 400 envelope.
#[derive(Debug, Clone)]
pub struct Params<T>(pub T);

impl<S, T> FromRequestParts<S> for Params<T>
where
    S: Send + Sync,
    T: FromQuery,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(raw) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::validation(e.body_text()))?;

        T::from_query(&raw).map(Params)
    }
}
