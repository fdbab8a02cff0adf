//! Error types shared by the Spotify client and the HTTP handlers.
//!
//! Every failure a client can observe is rendered as the same JSON envelope:
//!
//! ```text
//! { "success": false, "error": "<what failed>", "details": { ... } }
//! ```
//!
//! - [`AppError::Validation`] - missing or malformed query parameter, 400
//! - [`AppError::Auth`] - the token exchange failed, 500
//! - [`AppError::Upstream`] - a Spotify call failed, 500 unless the handler
//!   explicitly forwards Spotify's own status code

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

/// A failed call to the Spotify Web API.
///
/// `status`, `status_text` and `body` are only present when Spotify answered;
/// transport failures carry just a message.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct UpstreamError {
    pub status: Option<u16>,
    pub status_text: Option<String>,
    pub body: Option<Value>,
    pub message: String,
}

impl UpstreamError {
    /// Spotify answered with a non-2xx status.
    pub fn from_status(status: u16, status_text: Option<String>, body: Value) -> Self {
        Self {
            message: format!("Request failed with status code {}", status),
            status: Some(status),
            status_text,
            body: Some(body),
        }
    }

    /// Anything where no usable response came back.
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            status_text: None,
            body: None,
            message: message.into(),
        }
    }

    pub fn details(&self) -> Value {
        json!({
            "status": self.status,
            "statusText": self.status_text,
            "body": self.body,
            "message": self.message,
        })
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            status: err.status().map(|s| s.as_u16()),
            status_text: err
                .status()
                .and_then(|s| s.canonical_reason())
                .map(str::to_string),
            body: None,
            message: err.to_string(),
        }
    }
}

/// The token exchange with Spotify failed.
#[derive(Debug, Clone, Error)]
#[error("Spotify authentication failed: {0}")]
pub struct AuthError(#[from] pub UpstreamError);

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        source: UpstreamError,
        forward_status: bool,
    },
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    /// Upstream failure reported as a 500.
    pub fn upstream(context: &'static str, source: UpstreamError) -> Self {
        AppError::Upstream {
            context,
            source,
            forward_status: false,
        }
    }

    /// Upstream failure reported with Spotify's own status code when it has one.
    pub fn upstream_forwarded(context: &'static str, source: UpstreamError) -> Self {
        AppError::Upstream {
            context,
            source,
            forward_status: true,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream {
                source,
                forward_status: true,
                ..
            } => source
                .status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            AppError::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> Value {
        match self {
            AppError::Validation(message) => json!({
                "success": false,
                "error": message,
            }),
            AppError::Auth(AuthError(source)) => json!({
                "success": false,
                "error": "Spotify authentication failed",
                "details": source.details(),
            }),
            AppError::Upstream {
                context, source, ..
            } => json!({
                "success": false,
                "error": context,
                "details": source.details(),
            }),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.body())).into_response()
    }
}
