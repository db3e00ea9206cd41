//! Collaborator seams between the curation logic and the Spotify Web API.
//!
//! [`SpotifyClient`](crate::spotify::SpotifyClient) implements all four traits; tests
//! supply in-memory fakes.

use async_trait::async_trait;

use crate::{
    Res,
    types::{RawAudioFeatures, TrackId, TrackObject},
};

/// Largest number of ids the feature and track endpoints accept per request.
pub const FEATURE_BATCH_SIZE: usize = 50;
/// Largest number of seed tracks the recommendation endpoint accepts.
pub const SEED_BATCH_SIZE: usize = 5;
/// Largest number of tracks appended to a playlist per request.
pub const APPEND_BATCH_SIZE: usize = 50;

/// Source of audio features and track metadata.
///
/// Both methods take at most [`FEATURE_BATCH_SIZE`] ids and answer positionally: the
/// n-th element of the result belongs to the n-th requested id, `None` marking an id
/// the provider could not resolve.
#[async_trait]
pub trait FeatureProvider {
    async fn audio_features(&self, ids: &[TrackId]) -> Res<Vec<Option<RawAudioFeatures>>>;

    async fn tracks(&self, ids: &[TrackId]) -> Res<Vec<Option<TrackObject>>>;
}

/// A chart playlist reader.
#[async_trait]
pub trait ChartSource {
    /// Every track of the playlist as `(id, popularity)`, across all pages.
    async fn list_tracks(&self, playlist_id: &str) -> Res<Vec<(TrackId, u32)>>;
}

#[async_trait]
pub trait RecommendationSource {
    /// Recommendations for up to [`SEED_BATCH_SIZE`] seed tracks.
    async fn recommend(&self, seed_ids: &[TrackId], limit: usize) -> Res<Vec<TrackId>>;
}

/// Destination of the curated list.
#[async_trait]
pub trait PlaylistSink {
    async fn create_playlist(&self, owner: &str, name: &str) -> Res<String>;

    /// Appends up to [`APPEND_BATCH_SIZE`] tracks to the end of the playlist.
    async fn append_tracks(&self, owner: &str, playlist_id: &str, track_ids: &[TrackId])
    -> Res<()>;
}
