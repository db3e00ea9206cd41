//! Configuration management for sfilt.
//!
//! Configuration values come from environment variables, optionally seeded from a
//! `.env` file in the local data directory. Unlike a process-wide API client, every
//! value ends up in a [`Config`] object that is built once per run and handed to the
//! Spotify client and the authorization flow explicitly.
//!
//! Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use crate::{Res, SfiltError};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_SCOPE: &str = "playlist-modify-public user-top-read";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Returns the sfilt directory inside the platform-specific local data directory.
///
/// - Linux: `~/.local/share/sfilt`
/// - macOS: `~/Library/Application Support/sfilt`
/// - Windows: `%LOCALAPPDATA%/sfilt`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sfilt");
    path
}

/// Loads environment variables from `sfilt/.env` in the local data directory.
///
/// Creates the directory when it does not exist yet. A missing `.env` file is not an
/// error since every variable can also be supplied through the real environment,
/// which always takes precedence.
///
/// # Errors
///
/// Returns [`SfiltError::Io`] if the directory cannot be created and
/// [`SfiltError::Config`] if the file exists but cannot be parsed.
///
/// # Example
///
/// ```
/// use sfilt::config;
///
/// #[tokio::main]
/// async fn main() {
///     if let Err(e) = config::load_env().await {
///         eprintln!("Configuration error: {}", e);
///     }
/// }
/// ```
pub async fn load_env() -> Res<()> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir).await?;

    let path = dir.join(".env");
    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path)
        .map(|_| ())
        .map_err(|e| SfiltError::Config(format!("cannot read {}: {}", path.display(), e)))
}

/// Explicit runtime configuration.
///
/// Built once per run with [`Config::from_env`] and passed by value to the
/// [`SpotifyClient`](crate::spotify::SpotifyClient) and the authorization flow.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Spotify Web API, e.g. `https://api.spotify.com/v1`.
    pub api_url: String,
    /// OAuth authorization endpoint.
    pub auth_url: String,
    /// OAuth token exchange endpoint.
    pub token_url: String,
    /// Client id registered with Spotify's developer platform.
    pub client_id: String,
    /// Callback URL; must match the one registered with the application.
    pub redirect_uri: String,
    /// Space separated OAuth scopes.
    pub scope: String,
    /// Address the local callback server binds to.
    pub server_address: String,
    /// Playlist owner. Resolved through `GET /me` when not configured.
    pub user_id: Option<String>,
    /// Per-request timeout applied by the HTTP transport.
    pub http_timeout: Duration,
}

impl Config {
    /// Reads the configuration from the environment.
    ///
    /// `SPOTIFY_API_AUTH_CLIENT_ID` is the only required variable.
    ///
    /// # Errors
    ///
    /// Returns [`SfiltError::Config`] when the client id is missing or the timeout is
    /// not a number.
    pub fn from_env() -> Res<Self> {
        let client_id = env::var("SPOTIFY_API_AUTH_CLIENT_ID").map_err(|_| {
            SfiltError::Config("SPOTIFY_API_AUTH_CLIENT_ID must be set".to_string())
        })?;

        let http_timeout = match env::var("SFILT_HTTP_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
                SfiltError::Config(format!("SFILT_HTTP_TIMEOUT_SECS is not a number: {}", raw))
            })?,
            Err(_) => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url: var_or("SPOTIFY_API_URL", DEFAULT_API_URL),
            auth_url: var_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL),
            token_url: var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL),
            client_id,
            redirect_uri: var_or("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            scope: var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE),
            server_address: var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            user_id: env::var("SPOTIFY_USER_ID").ok().filter(|u| !u.is_empty()),
            http_timeout: Duration::from_secs(http_timeout),
        })
    }

    /// Configuration with default endpoints, mostly useful in tests.
    pub fn with_client_id(client_id: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            client_id: client_id.into(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            user_id: None,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
