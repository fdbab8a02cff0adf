use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{errors::AppError, server::AppState, success, warning};

const CONTEXT: &str = "Authentication test failed";

/// POST /api/auth/test
///
/// Not behind the auth guard: it obtains the token itself (through the
/// cache, like every other route) and proves it works with a one-item
/// category listing.
pub async fn auth_test(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let token = state.tokens.get_valid_token().await.map_err(|e| {
        warning!("{}: {}", CONTEXT, e);
        AppError::upstream(CONTEXT, e.0)
    })?;

    let test_data = state.api.browse_categories(&token, 1).await.map_err(|e| {
        warning!("{}: {}", CONTEXT, e);
        AppError::upstream(CONTEXT, e)
    })?;

    success!("Spotify authentication test passed");

    Ok(Json(json!({
        "success": true,
        "message": "Spotify authentication is working",
        "token_valid": true,
        "test_data": test_data,
    })))
}
