use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

use crate::{
    errors::{AuthError, UpstreamError},
    info, success, warning,
};

use super::CatalogApi;

/// Tokens are treated as expired this long before Spotify says they are.
pub const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Source of the current instant, swappable in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug, Clone)]
pub struct CachedToken {
    pub value: String,
    pub expires_at: Instant,
}

impl CachedToken {
    pub fn is_valid_at(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Single-slot, in-memory cache for the client-credentials bearer token.
///
/// One instance is shared by every request. A hit costs a short lock and a
/// clone; a miss exchanges the client credentials through the [`CatalogApi`]
/// and overwrites the slot.
///
/// The slot lock is never held while the token request is in flight. Callers
/// that find the slot empty or expired at the same moment each fetch their own
/// token and the last successful write wins. That costs at most a few extra
/// token requests and never hands out an invalid token.
///
/// A failed exchange leaves the slot exactly as it was. So does a grant whose
/// lifetime cannot be represented as an `Instant`.
pub struct TokenCache {
    api: Arc<dyn CatalogApi>,
    clock: Arc<dyn Clock>,
    slot: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self::with_clock(api, Arc::new(SystemClock))
    }

    pub fn with_clock(api: Arc<dyn CatalogApi>, clock: Arc<dyn Clock>) -> Self {
        Self {
            api,
            clock,
            slot: Mutex::new(None),
        }
    }

    /// Returns a token that is valid right now, fetching a new one if needed.
    pub async fn get_valid_token(&self) -> Result<String, AuthError> {
        if let Some(token) = self.cached().await {
            return Ok(token);
        }

        info!("Requesting a new Spotify access token...");

        let grant = match self.api.request_token().await {
            Ok(grant) => grant,
            Err(e) => {
                warning!("Failed to obtain Spotify token: {}", e);
                return Err(AuthError(e));
            }
        };

        let lifetime = Duration::from_secs(grant.expires_in).saturating_sub(EXPIRY_MARGIN);
        let Some(expires_at) = self.clock.now().checked_add(lifetime) else {
            warning!("Spotify token lifetime out of range: {}s", grant.expires_in);
            return Err(AuthError(UpstreamError::transport(format!(
                "Token lifetime of {} seconds is out of range",
                grant.expires_in
            ))));
        };

        *self.slot.lock().await = Some(CachedToken {
            value: grant.access_token.clone(),
            expires_at,
        });

        success!(
            "Spotify token obtained, valid for {} seconds",
            grant.expires_in
        );
        Ok(grant.access_token)
    }

    /// Current slot contents, valid or not.
    pub async fn snapshot(&self) -> Option<CachedToken> {
        self.slot.lock().await.clone()
    }

    async fn cached(&self) -> Option<String> {
        let now = self.clock.now();
        self.slot
            .lock()
            .await
            .as_ref()
            .filter(|t| t.is_valid_at(now))
            .map(|t| t.value.clone())
    }
}
