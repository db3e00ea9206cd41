use std::path::PathBuf;

use chrono::Utc;

use crate::{Res, SfiltError, config::Config, config::data_dir, spotify, types::Token};

/// Seconds before expiry at which a token is already treated as stale.
const EXPIRY_MARGIN_SECS: u64 = 240;

/// Owns the OAuth token persisted by `sfilt auth`.
pub struct TokenManager {
    token: Token,
}

impl TokenManager {
    pub fn new(token: Token) -> Self {
        TokenManager { token }
    }

    pub async fn load() -> Res<Self> {
        let path = Self::token_path();
        let content = async_fs::read_to_string(&path).await.map_err(|e| {
            SfiltError::Auth(format!(
                "cannot read token from {}: {}. Please run sfilt auth",
                path.display(),
                e
            ))
        })?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self { token })
    }

    pub async fn persist(&self) -> Res<()> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(path, json).await?;
        Ok(())
    }

    /// Returns an access token that is valid for at least a few more minutes,
    /// refreshing and persisting it first when necessary.
    pub async fn get_valid_token(&mut self, config: &Config) -> Res<String> {
        if self.is_expired(Utc::now().timestamp() as u64) {
            let new_token = spotify::auth::refresh_token(config, &self.token.refresh_token).await?;
            self.token = new_token;
            self.persist().await?;
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired(&self, now: u64) -> bool {
        let expires_at = self.token.obtained_at + self.token.expires_in;
        now >= expires_at.saturating_sub(EXPIRY_MARGIN_SECS)
    }

    fn token_path() -> PathBuf {
        let mut path = data_dir();
        path.push("cache/token.json");
        path
    }
}
