use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Opaque Spotify track identifier.
pub type TrackId = String;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArtistRef {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlbumRef {
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

/// Track object as returned by `/tracks`, playlist items and recommendations.
///
/// Local files in playlists come back without an id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackObject {
    #[serde(default)]
    pub id: Option<TrackId>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub album: AlbumRef,
}

impl TrackObject {
    /// Name of the first album artist, empty when the album lists none.
    pub fn primary_artist(&self) -> String {
        self.album
            .artists
            .first()
            .map(|a| a.name.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistItem {
    #[serde(default)]
    pub track: Option<TrackObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksResponse {
    pub items: Vec<PlaylistItem>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeveralTracksResponse {
    pub tracks: Vec<Option<TrackObject>>,
}

/// Audio-feature record exactly as the API sends it.
///
/// Every field is optional so that a record with a missing field can be told apart
/// from a missing record; see [`AudioFeatures::try_from`](crate::features::AudioFeatures).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAudioFeatures {
    pub id: Option<TrackId>,
    pub danceability: Option<f64>,
    pub energy: Option<f64>,
    pub key: Option<f64>,
    pub loudness: Option<f64>,
    pub mode: Option<f64>,
    pub speechiness: Option<f64>,
    pub acousticness: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub liveness: Option<f64>,
    pub valence: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioFeaturesResponse {
    pub audio_features: Vec<Option<RawAudioFeatures>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    pub tracks: Vec<TrackObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub tracks: Option<PlaylistTracksRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPlaylistsResponse {
    pub items: Vec<Option<PlaylistSummary>>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

#[derive(Tabled)]
pub struct ChartTableRow {
    pub name: String,
    pub id: String,
    pub tracks: u64,
}

#[derive(Tabled)]
pub struct RankedTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub name: String,
    pub artist: String,
    pub distance: String,
    pub id: String,
}
