use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::{Res, SfiltError, config::Config, management::TokenManager};

/// Authenticated handle to the Spotify Web API.
///
/// Holds the run's configuration and an access token acquired once at construction.
pub struct SpotifyClient {
    pub(super) http: Client,
    pub(super) config: Config,
    pub(super) access_token: String,
}

impl SpotifyClient {
    /// Builds a client for an access token the caller already holds.
    ///
    /// # Errors
    ///
    /// Returns [`SfiltError::Provider`] if the HTTP client cannot be constructed.
    pub fn new(config: Config, access_token: impl Into<String>) -> Res<Self> {
        let http = Client::builder().timeout(config.http_timeout).build()?;
        Ok(Self {
            http,
            config,
            access_token: access_token.into(),
        })
    }

    /// Loads the persisted token, refreshing it when close to expiry, and builds a
    /// client around it.
    ///
    /// # Errors
    ///
    /// Returns [`SfiltError::Auth`] when no token has been stored yet (run
    /// `sfilt auth` first) and provider errors when the refresh fails.
    pub async fn connect(config: Config) -> Res<Self> {
        let mut token_mgr = TokenManager::load().await?;
        let token = token_mgr.get_valid_token(&config).await?;
        Self::new(config, token)
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!(
            "{base}/{path}",
            base = self.config.api_url.trim_end_matches('/'),
            path = path.trim_start_matches('/')
        )
    }

    pub(super) async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Res<T> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        parse_response(response).await
    }

    pub(super) async fn post_json<B, T>(&self, url: &str, body: &B) -> Res<T>
    where
        B: serde::Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;
        parse_response(response).await
    }
}

/// Turns an HTTP response into a decoded body or the matching [`SfiltError`].
pub(super) async fn parse_response<T: DeserializeOwned>(response: Response) -> Res<T> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        return Err(SfiltError::RateLimited { retry_after });
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SfiltError::Status { status, body });
    }

    Ok(response.json::<T>().await?)
}
