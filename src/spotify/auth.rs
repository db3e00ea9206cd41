use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Client, Url};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    Res, SfiltError,
    config::Config,
    management::TokenManager,
    server, success,
    types::{PkceToken, Token},
    utils, warning,
};

/// Longest time the flow waits for the browser to hit the callback.
const AUTH_TIMEOUT: Duration = Duration::from_secs(120);

/// Runs the complete OAuth 2.0 PKCE authorization flow and persists the token.
///
/// 1. Generates the code verifier and its SHA256 challenge
/// 2. Binds the local callback server
/// 3. Opens the authorization URL in the default browser
/// 4. Waits for the callback to exchange the code for a token
/// 5. Stores the token through [`TokenManager`]
///
/// # Errors
///
/// Returns [`SfiltError::Auth`] when no token arrives within two minutes and I/O
/// errors when the server cannot bind or the token cannot be stored.
pub async fn auth(config: Config, shared_state: Arc<Mutex<Option<PkceToken>>>) -> Res<()> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier,
            token: None,
        });
    }

    let config = Arc::new(config);
    let listener = server::bind(&config).await?;
    let server_state = Arc::clone(&shared_state);
    let server_config = Arc::clone(&config);
    let server = tokio::spawn(async move {
        server::serve(listener, server_state, server_config).await
    });

    let auth_url = authorization_url(&config, &code_challenge)?;
    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let token = wait_for_token(shared_state).await;
    server.abort();

    match token {
        Some(t) => {
            TokenManager::new(t).persist().await?;
            success!("Authentication successful!");
            Ok(())
        }
        None => Err(SfiltError::Auth(
            "authentication failed or timed out".to_string(),
        )),
    }
}

/// Builds the URL the user opens to grant access.
pub fn authorization_url(config: &Config, code_challenge: &str) -> Res<Url> {
    Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "S256"),
            ("scope", config.scope.as_str()),
        ],
    )
    .map_err(|e| SfiltError::Config(format!("invalid SPOTIFY_API_AUTH_URL: {}", e)))
}

async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < AUTH_TIMEOUT {
        let lock = shared_state.lock().await;
        if let Some(token) = lock.as_ref().and_then(|pkce| pkce.token.as_ref()) {
            return Some(token.clone());
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges a refresh token for a fresh access token.
///
/// Spotify may omit the refresh token from the answer, in which case the previous
/// one stays in use.
pub async fn refresh_token(config: &Config, refresh_token: &str) -> Res<Token> {
    let client = Client::new();
    let res = client
        .post(&config.token_url)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", config.client_id.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let json: Value = res.json().await?;
    let mut token = token_from_json(&json)?;
    if token.refresh_token.is_empty() {
        token.refresh_token = refresh_token.to_string();
    }
    Ok(token)
}

/// Exchanges the authorization code received by the callback for a token.
pub async fn exchange_code_pkce(config: &Config, code: &str, verifier: &str) -> Res<Token> {
    let client = Client::new();
    let res = client
        .post(&config.token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", config.client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .send()
        .await?
        .error_for_status()?;

    let json: Value = res.json().await?;
    token_from_json(&json)
}

/// Reads a token endpoint answer.
pub fn token_from_json(json: &Value) -> Res<Token> {
    let access_token = json["access_token"]
        .as_str()
        .ok_or_else(|| SfiltError::Auth("token response without access_token".to_string()))?;

    Ok(Token {
        access_token: access_token.to_string(),
        refresh_token: json["refresh_token"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        scope: json["scope"].as_str().unwrap_or_default().to_string(),
        expires_in: json["expires_in"].as_u64().unwrap_or(3600),
        obtained_at: Utc::now().timestamp() as u64,
    })
}
