//! Configuration management for the Spotify Research API.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage application
//! configuration including Spotify API credentials, server settings, and the
//! environment mode that decides how much error detail reaches clients.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the current working directory
//! 3. `.env` file in the local data directory
//! 4. Application defaults

use std::{env, path::PathBuf};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:3000";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_API_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Environment modes that echo internal error messages back to clients.
const DEVELOPMENT_MODES: [&str; 3] = ["development", "dev", "local"];

/// Loads environment variables from `.env` files.
///
/// Looks for a `.env` file in the current working directory first and then in
/// the platform-specific local data directory under `sporlapi/.env`. Values
/// already present in the process environment are never overwritten, so a
/// hosting platform's configuration always wins.
///
/// Missing files are not an error: a deployed instance usually gets its whole
/// configuration from the process environment.
///
/// # Directory Structure
///
/// The fallback file is looked up in:
/// - Linux: `~/.local/share/sporlapi/.env`
/// - macOS: `~/Library/Application Support/sporlapi/.env`
/// - Windows: `%LOCALAPPDATA%/sporlapi/.env`
///
/// # Returns
///
/// Returns the paths of the files that were loaded.
pub fn load_env() -> Vec<PathBuf> {
    let mut loaded = Vec::new();

    if let Ok(path) = dotenv::dotenv() {
        loaded.push(path);
    }

    let path = data_env_path();
    if path.is_file() && dotenv::from_path(&path).is_ok() {
        loaded.push(path);
    }

    loaded
}

fn data_env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sporlapi/.env");
    path
}

/// Returns the Spotify API client ID, if configured.
///
/// Retrieves the `SPOTIFY_CLIENT_ID` environment variable which contains the
/// client ID obtained when registering the application with Spotify's
/// developer platform. Empty values are treated as unset.
pub fn spotify_client_id() -> Option<String> {
    non_empty_var("SPOTIFY_CLIENT_ID")
}

/// Returns the Spotify API client secret, if configured.
///
/// Retrieves the `SPOTIFY_CLIENT_SECRET` environment variable. Used only for
/// the client-credentials token exchange.
///
/// # Security Note
///
/// The client secret should be kept confidential and never exposed in logs,
/// responses or version control.
pub fn spotify_client_secret() -> Option<String> {
    non_empty_var("SPOTIFY_CLIENT_SECRET")
}

/// Returns the origin allowed to call the API from a browser.
///
/// Reads `FRONTEND_URL`, defaulting to `http://localhost:3000`.
pub fn frontend_url() -> String {
    non_empty_var("FRONTEND_URL").unwrap_or_else(|| DEFAULT_FRONTEND_URL.to_string())
}

/// Returns the port the HTTP server listens on.
///
/// Reads `PORT`, defaulting to `3001` when unset or not a valid port number.
pub fn port() -> u16 {
    non_empty_var("PORT")
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Returns the environment mode, e.g. `development` or `production`.
///
/// Reads `APP_ENV`, defaulting to `production`.
pub fn app_env() -> String {
    non_empty_var("APP_ENV").unwrap_or_else(|| "production".to_string())
}

/// Returns the Spotify Web API base URL.
///
/// Reads `SPOTIFY_API_URL`, defaulting to `https://api.spotify.com/v1`.
pub fn spotify_apiurl() -> String {
    non_empty_var("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_SPOTIFY_API_URL.to_string())
}

/// Returns the Spotify OAuth token exchange URL.
///
/// Reads `SPOTIFY_API_TOKEN_URL`, defaulting to
/// `https://accounts.spotify.com/api/token`.
pub fn spotify_apitoken_url() -> String {
    non_empty_var("SPOTIFY_API_TOKEN_URL")
        .unwrap_or_else(|| DEFAULT_SPOTIFY_API_TOKEN_URL.to_string())
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Snapshot of all runtime settings, taken once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub frontend_url: String,
    pub port: u16,
    pub app_env: String,
    pub api_url: String,
    pub token_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            client_id: spotify_client_id(),
            client_secret: spotify_client_secret(),
            frontend_url: frontend_url(),
            port: port(),
            app_env: app_env(),
            api_url: spotify_apiurl(),
            token_url: spotify_apitoken_url(),
        }
    }

    /// Both halves of the client credentials are present.
    pub fn spotify_configured(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }

    /// Whether internal error messages may be echoed to clients.
    pub fn is_development(&self) -> bool {
        DEVELOPMENT_MODES
            .iter()
            .any(|mode| self.app_env.eq_ignore_ascii_case(mode))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            frontend_url: DEFAULT_FRONTEND_URL.to_string(),
            port: DEFAULT_PORT,
            app_env: "production".to_string(),
            api_url: DEFAULT_SPOTIFY_API_URL.to_string(),
            token_url: DEFAULT_SPOTIFY_API_TOKEN_URL.to_string(),
        }
    }
}
