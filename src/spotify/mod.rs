//! # Spotify Integration Module
//!
//! This module is the only place that talks HTTP. It provides [`SpotifyClient`],
//! which implements every collaborator trait from [`crate::sources`], and the OAuth
//! 2.0 PKCE authorization flow in [`auth`].
//!
//! ## Architecture
//!
//! ```text
//! Curation Layer (curate, orderer)
//!          ↓  sources::{FeatureProvider, ChartSource, RecommendationSource, PlaylistSink}
//! SpotifyClient
//!     ├── Tracks (audio features, metadata, chart items, recommendations)
//!     └── Playlists (owner lookup, listing, creation, appending)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Client Lifecycle
//!
//! A client is built from an explicit [`Config`](crate::config::Config) and an access
//! token obtained once per run through the
//! [`TokenManager`](crate::management::TokenManager). Nothing is shared through
//! process-wide state, so two clients with different credentials can coexist.
//!
//! ## Error Handling
//!
//! Requests are sent exactly once. Transport failures surface as
//! [`SfiltError::Provider`](crate::SfiltError::Provider), non-success statuses as
//! [`SfiltError::Status`](crate::SfiltError::Status) and 429 responses as
//! [`SfiltError::RateLimited`](crate::SfiltError::RateLimited) carrying the
//! `Retry-After` hint. Retrying is left to the caller. The only timeout policy is the
//! per-request timeout configured on the underlying `reqwest::Client`.
//!
//! ## API Coverage
//!
//! - `GET /me` - Playlist owner when `SPOTIFY_USER_ID` is not configured
//! - `GET /users/{user_id}/playlists` - Chart discovery
//! - `GET /playlists/{playlist_id}/tracks` - Chart contents, paginated
//! - `GET /tracks` - Track metadata in batches of 50
//! - `GET /audio-features` - Audio features in batches of 50
//! - `GET /recommendations` - Up to 5 seed tracks per call
//! - `POST /users/{user_id}/playlists` - Create the curated playlist
//! - `POST /playlists/{playlist_id}/tracks` - Append tracks in batches of 50
//! - `POST /api/token` - Token exchange and refresh

pub mod auth;
mod client;
mod playlist;
mod tracks;

pub use client::SpotifyClient;
