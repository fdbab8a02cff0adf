use std::{any::Any, future::IntoFuture, net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::Request,
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde_json::json;
use tokio::{net::TcpListener, signal};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};

use crate::{
    Res, api,
    config::{Config, DEFAULT_FRONTEND_URL},
    info,
    spotify::{CatalogApi, SpotifyClient, TokenCache},
    success, warning,
};

/// Shared by every handler. Cloning is cheap: everything sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub api: Arc<dyn CatalogApi>,
    pub tokens: Arc<TokenCache>,
}

impl AppState {
    pub fn new(config: Config, api: Arc<dyn CatalogApi>) -> Self {
        let tokens = Arc::new(TokenCache::new(Arc::clone(&api)));
        Self::with_token_cache(config, api, tokens)
    }

    /// State around an existing token cache, e.g. one built with a custom clock.
    pub fn with_token_cache(
        config: Config,
        api: Arc<dyn CatalogApi>,
        tokens: Arc<TokenCache>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            api,
            tokens,
        }
    }
}

/// Builds the complete application: routes, 404 fallback and middleware.
///
/// Unknown paths and known paths hit with the wrong method both get the
/// 404 endpoint directory.
pub fn router(state: AppState) -> Router {
    let expose_errors = state.config.is_development();
    let cors = cors_layer(&state.config.frontend_url);

    Router::new()
        .route("/", get(api::index))
        .route("/health", get(api::health))
        .route("/api/auth/test", post(api::auth_test))
        .route("/api/search", get(api::search))
        .route("/api/audio-features", get(api::audio_features))
        .route("/api/recommendations", get(api::recommendations))
        .route("/api/search-with-features", get(api::search_with_features))
        .route("/api/search-simple", get(api::search_simple))
        .route(
            "/api/recommendations-with-features",
            get(api::recommendations_with_features),
        )
        .route("/api/debug/search", get(api::debug_search))
        .route("/api/debug/audio-features", get(api::debug_audio_features))
        .route(
            "/api/test/audio-features/{track_id}",
            get(api::test_track_audio_features),
        )
        .route(
            "/api/test/audio-features-multiple",
            get(api::test_multiple_audio_features),
        )
        .fallback(api::not_found)
        .method_not_allowed_fallback(api::not_found)
        .layer(middleware::from_fn(log_requests))
        .layer(CatchPanicLayer::custom(
            move |err: Box<dyn Any + Send + 'static>| panic_response(err, expose_errors),
        ))
        .layer(cors)
        .with_state(state)
}

/// Binds the listener and serves until SIGINT or SIGTERM.
///
/// Shutdown is immediate: in-flight requests are dropped rather than drained.
pub async fn start_api_server(config: Config) -> Res<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let api: Arc<dyn CatalogApi> = Arc::new(SpotifyClient::new(&config));

    info!("Environment: {}", config.app_env);
    info!("Spotify configured: {}", config.spotify_configured());
    if !config.spotify_configured() {
        warning!("SPOTIFY_CLIENT_ID/SPOTIFY_CLIENT_SECRET missing, authenticated routes will fail");
    }

    let app = router(AppState::new(config, api));
    let listener = TcpListener::bind(addr).await?;
    success!("Server listening on http://{}", listener.local_addr()?);

    tokio::select! {
        res = axum::serve(listener, app).into_future() => res?,
        name = shutdown_signal() => info!("Received {}, shutting down...", name),
    }

    Ok(())
}

async fn log_requests(request: Request, next: Next) -> Response {
    info!(
        "{} - {} {}",
        Utc::now().to_rfc3339(),
        request.method(),
        request.uri().path()
    );
    next.run(request).await
}

fn cors_layer(frontend_url: &str) -> CorsLayer {
    let origin = HeaderValue::from_str(frontend_url.trim_end_matches('/')).unwrap_or_else(|_| {
        warning!(
            "FRONTEND_URL {:?} is not a valid origin, using {}",
            frontend_url,
            DEFAULT_FRONTEND_URL
        );
        HeaderValue::from_static(DEFAULT_FRONTEND_URL)
    });

    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Renders a handler panic. The panic message only leaves the process in
/// development mode.
fn panic_response(err: Box<dyn Any + Send + 'static>, expose_errors: bool) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    warning!("Handler panicked: {}", detail);

    let mut body = json!({
        "success": false,
        "error": "Internal server error",
    });
    if expose_errors {
        body["details"] = json!(detail);
    }

    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    }
}
