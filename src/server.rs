use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{net::TcpListener, sync::Mutex};

use crate::{Res, SfiltError, api, config::Config, types::PkceToken};

/// Binds the callback server's listener on `SERVER_ADDRESS`.
pub async fn bind(config: &Config) -> Res<TcpListener> {
    let addr = SocketAddr::from_str(&config.server_address).map_err(|e| {
        SfiltError::Config(format!(
            "cannot parse server address {}: {}",
            config.server_address, e
        ))
    })?;

    Ok(TcpListener::bind(&addr).await?)
}

/// Routes `/health` and `/callback`; the callback reads the PKCE state and config
/// from request extensions.
pub fn router(state: Arc<Mutex<Option<PkceToken>>>, config: Arc<Config>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state))
        .layer(Extension(config))
}

/// Serves [`router`] until the task is aborted.
pub async fn serve(
    listener: TcpListener,
    state: Arc<Mutex<Option<PkceToken>>>,
    config: Arc<Config>,
) -> Res<()> {
    axum::serve(listener, router(state, config)).await?;
    Ok(())
}
