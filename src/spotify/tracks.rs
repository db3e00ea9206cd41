use async_trait::async_trait;

use crate::{
    Res,
    sources::{ChartSource, FeatureProvider, RecommendationSource},
    types::{
        AudioFeaturesResponse, PlaylistTracksResponse, RawAudioFeatures, RecommendationsResponse,
        SeveralTracksResponse, TrackId, TrackObject,
    },
};

use super::SpotifyClient;

/// Items requested per page when reading a playlist.
const PLAYLIST_PAGE_SIZE: u32 = 100;

#[async_trait]
impl FeatureProvider for SpotifyClient {
    /// Fetches audio features for up to 50 tracks through `GET /audio-features`.
    ///
    /// The response keeps request order and holds `null` for ids without analysis.
    async fn audio_features(&self, ids: &[TrackId]) -> Res<Vec<Option<RawAudioFeatures>>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.url(&format!("audio-features?ids={}", ids.join(",")));
        let res = self.get_json::<AudioFeaturesResponse>(&url).await?;
        Ok(res.audio_features)
    }

    /// Fetches track metadata for up to 50 tracks through `GET /tracks`.
    async fn tracks(&self, ids: &[TrackId]) -> Res<Vec<Option<TrackObject>>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.url(&format!("tracks?ids={}", ids.join(",")));
        let res = self.get_json::<SeveralTracksResponse>(&url).await?;
        Ok(res.tracks)
    }
}

#[async_trait]
impl ChartSource for SpotifyClient {
    /// Reads every page of a playlist, following the `next` links.
    ///
    /// Local files and removed tracks carry no id and are skipped.
    async fn list_tracks(&self, playlist_id: &str) -> Res<Vec<(TrackId, u32)>> {
        let mut tracks = Vec::new();
        let mut next = Some(self.url(&format!(
            "playlists/{id}/tracks?limit={limit}",
            id = playlist_id,
            limit = PLAYLIST_PAGE_SIZE
        )));

        while let Some(url) = next {
            let page = self.get_json::<PlaylistTracksResponse>(&url).await?;
            tracks.extend(
                page.items
                    .into_iter()
                    .filter_map(|item| item.track)
                    .filter_map(|track| track.id.map(|id| (id, track.popularity))),
            );
            next = page.next;
        }

        Ok(tracks)
    }
}

#[async_trait]
impl RecommendationSource for SpotifyClient {
    async fn recommend(&self, seed_ids: &[TrackId], limit: usize) -> Res<Vec<TrackId>> {
        if seed_ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.url(&format!(
            "recommendations?seed_tracks={seeds}&limit={limit}",
            seeds = seed_ids.join(","),
            limit = limit
        ));
        let res = self.get_json::<RecommendationsResponse>(&url).await?;
        Ok(res.tracks.into_iter().filter_map(|t| t.id).collect())
    }
}
