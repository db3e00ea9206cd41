//! # API Module
//!
//! HTTP endpoints served by the short-lived local server that `sfilt auth` starts.
//!
//! - [`callback`] - Receives the authorization code from Spotify and exchanges it,
//!   together with the PKCE verifier, for an access token.
//! - [`health`] - Reports that the server is up, with name and version.
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use sfilt::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
