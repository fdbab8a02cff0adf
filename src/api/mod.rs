//! # API Module
//!
//! HTTP endpoints of the relay. Every handler answers with a JSON envelope
//! carrying at least a `success` boolean.
//!
//! ## Endpoints
//!
//! ### Service
//!
//! - [`index`] - service banner and endpoint directory
//! - [`health`] - liveness plus whether Spotify credentials are configured
//! - [`not_found`] - fallback for unmatched routes, lists valid endpoints
//!
//! ### Authentication
//!
//! - [`auth_test`] - obtains a token and proves it with a single catalog call
//!
//! ### Catalog
//!
//! - [`search`] - track search reshaped into track summaries
//! - [`audio_features`] - raw audio features for a list of track ids
//! - [`recommendations`] - seed-based recommendations with target overrides
//! - [`search_with_features`] - search plus audio features per result
//! - [`recommendations_with_features`] - recommendations scored against the
//!   seed track and sorted by similarity
//! - [`search_simple`] - search with *simulated* audio features
//!
//! ### Diagnostics
//!
//! - [`debug_search`], [`debug_audio_features`],
//!   [`test_track_audio_features`], [`test_multiple_audio_features`]
//!
//! ## Request Pipeline
//!
//! Handlers declare their inputs as extractors, in this order:
//!
//! ```text
//! State → Params<T> (400, bad query) → BearerToken (500, auth failure) → handler body
//! ```
//!
//! so a malformed request never reaches Spotify, and a request that cannot be
//! authenticated never reaches the handler body.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use sporlapi::server::{router, AppState};
//!
//! let app = router(AppState::new(config, api));
//! ```

mod audio_features;
mod auth;
mod debug;
pub mod guard;
mod health;
mod recommendations;
mod search;

pub use audio_features::{IdsQuery, audio_features};
pub use auth::auth_test;
pub use debug::{
    PROBE_TRACK_IDS, ProbeIdsQuery, ProbeSearchQuery, debug_audio_features, debug_search,
    test_multiple_audio_features, test_track_audio_features,
};
pub use guard::{BearerToken, FromQuery, Params};
pub use health::{AVAILABLE_ENDPOINTS, health, index, not_found};
pub use recommendations::{
    RecommendationQuery, TrackSeededQuery, recommendations, recommendations_with_features,
};
pub use search::{SearchQuery, search, search_simple, search_with_features};
