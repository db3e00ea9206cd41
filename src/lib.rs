//! sfilt: viral chart curation library
//!
//! This library collects tracks from Spotify's viral charts, removes the ones that
//! already appear on the global charts, optionally widens the set through the
//! recommendation endpoint, orders the result by audio-feature similarity and writes
//! it back to Spotify as a new playlist.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local OAuth callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Environment loading and the explicit [`config::Config`] object
//! - `curate` - Chart collection, filtering, recommendations and playlist write-back
//! - `error` - The [`SfiltError`] taxonomy
//! - `export` - Diagnostic CSV side file
//! - `features` - Feature vectors and distance
//! - `management` - Persisted OAuth token
//! - `orderer` - Similarity and popularity ordering
//! - `server` - Local HTTP server for OAuth callbacks
//! - `sources` - Collaborator traits implemented by the Spotify client
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Wire types and table rows
//! - `utils` - PKCE, de-duplication and date helpers
//!
//! # Example
//!
//! ```rust,ignore
//! use sfilt::{config, spotify::SpotifyClient};
//!
//! #[tokio::main]
//! async fn main() -> sfilt::Res<()> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env()?;
//!     let client = SpotifyClient::connect(config).await?;
//!     // Hand the client to the orderer and curate functions...
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod curate;
pub mod error;
pub mod export;
pub mod features;
pub mod management;
pub mod orderer;
pub mod server;
pub mod sources;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::SfiltError;

/// Result alias used throughout the crate.
///
/// Every fallible library operation reports an [`SfiltError`], so callers can tell
/// provider failures apart from an empty feature set.
pub type Res<T> = std::result::Result<T, SfiltError>;

/// Prints an informational message with a blue bullet point.
///
/// Accepts the same arguments as `println!`.
///
/// # Example
///
/// ```rust,ignore
/// info!("Fetching chart {}", playlist_id);
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
/// ```rust,ignore
/// success!("Saved {} tracks to {}", count, playlist_name);
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
/// Only the binary uses this; library code returns [`SfiltError`] instead.
///
/// # Example
///
/// ```rust,ignore
/// error!("Cannot load configuration: {}", e);
/// // Program exits here
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
/// Used for recoverable conditions such as a dropped audio-feature record.
///
/// # Example
///
/// ```rust,ignore
/// warning!("Skipping track {}: {}", id, reason);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
