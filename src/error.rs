//! Error taxonomy shared by the library and the command-line front end.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while curating a playlist.
#[derive(Debug, Error)]
pub enum SfiltError {
    /// Network or transport failure talking to the Spotify Web API.
    #[error("Provider error: {0}")]
    Provider(#[from] reqwest::Error),

    /// The Spotify Web API answered with a non-success status.
    #[error("Provider returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The Spotify Web API rejected the request with 429 Too Many Requests.
    #[error("Rate limited by provider (retry after {retry_after:?} seconds)")]
    RateLimited { retry_after: Option<u64> },

    /// Not a single track had usable audio features.
    #[error("No track with resolvable audio features")]
    InsufficientData,

    /// An audio-feature record was present but lacked a field.
    #[error("Audio features for track {id} are missing field `{field}`")]
    MalformedRecord { id: String, field: &'static str },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SfiltError {
    /// Whether the error came from the remote API rather than local processing.
    pub fn is_provider(&self) -> bool {
        matches!(
            self,
            SfiltError::Provider(_) | SfiltError::Status { .. } | SfiltError::RateLimited { .. }
        )
    }
}
