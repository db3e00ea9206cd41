#![allow(dead_code)]

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;
use sfilt::{
    Res, SfiltError,
    sources::{ChartSource, FeatureProvider, PlaylistSink, RecommendationSource},
    types::{AlbumRef, ArtistRef, RawAudioFeatures, TrackId, TrackObject},
};

pub fn raw_features(id: &str, danceability: f64) -> RawAudioFeatures {
    RawAudioFeatures {
        id: Some(id.to_string()),
        danceability: Some(danceability),
        energy: Some(0.5),
        key: Some(0.0),
        loudness: Some(-60.0),
        mode: Some(1.0),
        speechiness: Some(0.1),
        acousticness: Some(0.2),
        instrumentalness: Some(0.0),
        liveness: Some(0.1),
        valence: Some(0.5),
    }
}

pub fn track_object(id: &str, name: &str, artist: &str, popularity: u32) -> TrackObject {
    TrackObject {
        id: Some(id.to_string()),
        name: name.to_string(),
        popularity,
        album: AlbumRef {
            artists: vec![ArtistRef {
                id: None,
                name: artist.to_string(),
            }],
        },
    }
}

pub fn ids(prefix: &str, count: usize) -> Vec<TrackId> {
    (0..count).map(|i| format!("{}{}", prefix, i)).collect()
}

/// In-memory feature provider that answers positionally and records batch sizes.
#[derive(Default)]
pub struct FakeProvider {
    pub features: HashMap<TrackId, RawAudioFeatures>,
    pub tracks: HashMap<TrackId, TrackObject>,
    pub feature_batches: Mutex<Vec<usize>>,
    pub track_batches: Mutex<Vec<usize>>,
    pub fail: bool,
}

impl FakeProvider {
    /// Every id resolves; danceability grows with the position.
    pub fn resolving(track_ids: &[TrackId]) -> Self {
        let mut provider = Self::default();
        for (i, id) in track_ids.iter().enumerate() {
            provider.add(id, i as f64 / track_ids.len().max(1) as f64, 50);
        }
        provider
    }

    pub fn add(&mut self, id: &str, danceability: f64, popularity: u32) {
        self.features
            .insert(id.to_string(), raw_features(id, danceability));
        self.tracks.insert(
            id.to_string(),
            track_object(id, &format!("Song {}", id), &format!("Artist {}", id), popularity),
        );
    }

    pub fn feature_batches(&self) -> Vec<usize> {
        self.feature_batches.lock().unwrap().clone()
    }

    pub fn track_batches(&self) -> Vec<usize> {
        self.track_batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeatureProvider for FakeProvider {
    async fn audio_features(&self, ids: &[TrackId]) -> Res<Vec<Option<RawAudioFeatures>>> {
        if self.fail {
            return Err(SfiltError::Status {
                status: StatusCode::UNAUTHORIZED,
                body: "The access token expired".to_string(),
            });
        }
        self.feature_batches.lock().unwrap().push(ids.len());
        Ok(ids.iter().map(|id| self.features.get(id).cloned()).collect())
    }

    async fn tracks(&self, ids: &[TrackId]) -> Res<Vec<Option<TrackObject>>> {
        if self.fail {
            return Err(SfiltError::RateLimited {
                retry_after: Some(3),
            });
        }
        self.track_batches.lock().unwrap().push(ids.len());
        Ok(ids.iter().map(|id| self.tracks.get(id).cloned()).collect())
    }
}

#[derive(Default)]
pub struct FakeCharts {
    pub playlists: HashMap<String, Vec<(TrackId, u32)>>,
}

#[async_trait]
impl ChartSource for FakeCharts {
    async fn list_tracks(&self, playlist_id: &str) -> Res<Vec<(TrackId, u32)>> {
        self.playlists
            .get(playlist_id)
            .cloned()
            .ok_or_else(|| SfiltError::Status {
                status: StatusCode::NOT_FOUND,
                body: format!("playlist {} not found", playlist_id),
            })
    }
}

/// Recommends `per_call` fresh ids derived from the first seed of each call.
#[derive(Default)]
pub struct FakeRecommender {
    pub per_call: usize,
    pub calls: Mutex<Vec<Vec<TrackId>>>,
    pub fixed: Option<Vec<TrackId>>,
}

#[async_trait]
impl RecommendationSource for FakeRecommender {
    async fn recommend(&self, seed_ids: &[TrackId], limit: usize) -> Res<Vec<TrackId>> {
        self.calls.lock().unwrap().push(seed_ids.to_vec());
        if let Some(fixed) = &self.fixed {
            return Ok(fixed.iter().take(limit).cloned().collect());
        }
        Ok((0..self.per_call.min(limit))
            .map(|i| format!("rec-{}-{}", seed_ids[0], i))
            .collect())
    }
}

#[derive(Default)]
pub struct FakeSink {
    pub created: Mutex<Vec<(String, String)>>,
    pub appended: Mutex<Vec<(String, Vec<TrackId>)>>,
}

#[async_trait]
impl PlaylistSink for FakeSink {
    async fn create_playlist(&self, owner: &str, name: &str) -> Res<String> {
        self.created
            .lock()
            .unwrap()
            .push((owner.to_string(), name.to_string()));
        Ok("playlist-1".to_string())
    }

    async fn append_tracks(
        &self,
        _owner: &str,
        playlist_id: &str,
        track_ids: &[TrackId],
    ) -> Res<()> {
        self.appended
            .lock()
            .unwrap()
            .push((playlist_id.to_string(), track_ids.to_vec()));
        Ok(())
    }
}
