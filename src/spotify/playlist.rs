use async_trait::async_trait;

use crate::{
    Res,
    sources::PlaylistSink,
    types::{
        AddTracksRequest, CreatePlaylistRequest, CreatePlaylistResponse, PlaylistSummary,
        SnapshotResponse, TrackId, UserPlaylistsResponse, UserProfile,
    },
    utils,
};

use super::SpotifyClient;

impl SpotifyClient {
    /// The account playlists are created for.
    ///
    /// Uses `SPOTIFY_USER_ID` when configured, otherwise asks `GET /me`.
    pub async fn owner_id(&self) -> Res<String> {
        if let Some(user_id) = &self.config.user_id {
            return Ok(user_id.clone());
        }

        let profile = self.get_json::<UserProfile>(&self.url("me")).await?;
        Ok(profile.id)
    }

    /// Lists all public playlists of `user_id`, following pagination.
    pub async fn user_playlists(&self, user_id: &str) -> Res<Vec<PlaylistSummary>> {
        let mut playlists = Vec::new();
        let mut next = Some(self.url(&format!("users/{}/playlists?limit=50", user_id)));

        while let Some(url) = next {
            let page = self.get_json::<UserPlaylistsResponse>(&url).await?;
            playlists.extend(page.items.into_iter().flatten());
            next = page.next;
        }

        Ok(playlists)
    }
}

#[async_trait]
impl PlaylistSink for SpotifyClient {
    async fn create_playlist(&self, owner: &str, name: &str) -> Res<String> {
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: "Viral tracks ordered by audio-feature similarity.".to_string(),
            public: true,
        };

        let url = self.url(&format!("users/{}/playlists", owner));
        let res: CreatePlaylistResponse = self.post_json(&url, &body).await?;
        Ok(res.id)
    }

    async fn append_tracks(
        &self,
        _owner: &str,
        playlist_id: &str,
        track_ids: &[TrackId],
    ) -> Res<()> {
        if track_ids.is_empty() {
            return Ok(());
        }

        let body = AddTracksRequest {
            uris: track_ids.iter().map(|id| utils::track_uri(id)).collect(),
        };

        let url = self.url(&format!("playlists/{}/tracks", playlist_id));
        let _: SnapshotResponse = self.post_json(&url, &body).await?;
        Ok(())
    }
}
