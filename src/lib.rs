//! Spotify Research API Library
//!
//! This library provides a small HTTP relay in front of the Spotify Web API.
//! It authenticates with the client-credentials flow, keeps the bearer token
//! in memory until shortly before it expires, and exposes track search, audio
//! feature and recommendation endpoints that reshape Spotify's payloads into a
//! simpler schema for browser clients.
//!
//! # Modules
//!
//! - `api` - HTTP route handlers and the authentication guard
//! - `config` - Configuration management and environment variables
//! - `errors` - Error types and their JSON envelopes
//! - `server` - Router assembly and the HTTP listener
//! - `similarity` - Audio feature similarity scoring and simulated features
//! - `spotify` - Spotify Web API client and token cache
//! - `types` - Data structures and type definitions
//! - `utils` - Parameter parsing and payload reshaping helpers
//!
//! # Example
//!
//! ```
//! use sporlapi::{config, server};
//!
//! #[tokio::main]
//! async fn main() -> sporlapi::Res<()> {
//!     config::load_env();
//!     let config = config::Config::from_env();
//!     server::start_api_server(config).await
//! }
//! ```

pub mod api;
pub mod config;
pub mod errors;
pub mod server;
pub mod similarity;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the binary and the server bootstrap where any error is fatal and
/// only needs to be reported. Request handling uses the typed errors from
/// [`errors`] instead.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Listening on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Token obtained, valid for {} seconds", expires_in);
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for unrecoverable startup failures. Request handlers never call
/// it; they report through [`warning!`] and answer with an error envelope.
///
/// # Example
///
/// ```
/// error!("Failed to bind {}: {}", addr, e);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for failed upstream calls and other recoverable issues that end up
/// in an error response rather than a crash.
///
/// # Example
///
/// ```
/// warning!("Search failed: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
