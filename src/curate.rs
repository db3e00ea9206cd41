//! Upstream orchestration around the orderer.
//!
//! Collects chart tracks, removes the ones on the stop list, widens the set through
//! recommendations and finally writes the ordered ids back as a playlist.

use chrono::NaiveDate;
use indicatif::ProgressBar;

use crate::{
    Res,
    sources::{APPEND_BATCH_SIZE, ChartSource, PlaylistSink, RecommendationSource, SEED_BATCH_SIZE},
    types::TrackId,
    utils,
};

/// Tracks at this popularity are established hits rather than viral ones.
pub const MAX_VIRAL_POPULARITY: u32 = 100;
/// Recommendations requested per group of seeds.
pub const RECOMMENDATIONS_PER_CALL: usize = 25;
/// Default cap on seeds plus recommendations.
pub const DEFAULT_TRACK_LIMIT: usize = 500;

/// Spotify's global viral charts, used as the default stop list.
pub const GLOBAL_VIRAL_CHARTS: [&str; 2] = ["37i9dQZEVXbKuaTI1Z1Afx", "37i9dQZEVXbMDoHDwVN2tF"];

/// Collects track ids from every chart, in chart order.
///
/// Tracks with popularity of [`MAX_VIRAL_POPULARITY`] or more are skipped.
/// Duplicates across charts are kept; [`filter_tracks`] removes them.
pub async fn get_viral_tracks<S>(
    source: &S,
    playlist_ids: &[String],
    progress: &ProgressBar,
) -> Res<Vec<TrackId>>
where
    S: ChartSource + ?Sized,
{
    let mut viral = Vec::new();

    for playlist_id in playlist_ids {
        let tracks = source.list_tracks(playlist_id).await?;
        viral.extend(
            tracks
                .into_iter()
                .filter(|(_, popularity)| *popularity < MAX_VIRAL_POPULARITY)
                .map(|(id, _)| id),
        );
        progress.set_message(format!("Found {:>3} viral tracks.", viral.len()));
    }

    Ok(viral)
}

/// Keeps the first occurrence of each id that is not in `stop_tracks`.
pub fn filter_tracks(input_tracks: &[TrackId], stop_tracks: &[TrackId]) -> Vec<TrackId> {
    let mut unique: Vec<TrackId> = input_tracks
        .iter()
        .filter(|id| !stop_tracks.contains(id))
        .cloned()
        .collect();
    utils::dedup_preserving_order(&mut unique);
    unique
}

/// Asks for recommendations seeded by consecutive groups of up to five tracks.
///
/// Only ids that are neither seeds nor already collected are kept. Stops as soon
/// as seeds plus recommendations exceed `limit`. The trailing short group of seeds
/// is used like any other.
pub async fn get_recommendations<S>(
    source: &S,
    seed_track_ids: &[TrackId],
    limit: usize,
    progress: &ProgressBar,
) -> Res<Vec<TrackId>>
where
    S: RecommendationSource + ?Sized,
{
    let mut recommended: Vec<TrackId> = Vec::new();

    for seeds in seed_track_ids.chunks(SEED_BATCH_SIZE) {
        let track_ids = source.recommend(seeds, RECOMMENDATIONS_PER_CALL).await?;
        for id in track_ids {
            if !recommended.contains(&id) && !seed_track_ids.contains(&id) {
                recommended.push(id);
            }
        }

        progress.set_message(format!(
            "Added {} new and unique recommended tracks...",
            recommended.len()
        ));

        if recommended.len() + seed_track_ids.len() > limit {
            break;
        }
    }

    Ok(recommended)
}

/// Name of the playlist created on `date`.
pub fn playlist_name(date: NaiveDate) -> String {
    format!("sfilt: Top 50 Viral {}", utils::long_date(date))
}

/// Creates a playlist and appends `track_ids` in batches of [`APPEND_BATCH_SIZE`].
///
/// Returns the new playlist's id.
pub async fn add_tracks_to_playlist<S>(
    sink: &S,
    owner: &str,
    playlist_name: &str,
    track_ids: &[TrackId],
) -> Res<String>
where
    S: PlaylistSink + ?Sized,
{
    let playlist_id = sink.create_playlist(owner, playlist_name).await?;
    for batch in track_ids.chunks(APPEND_BATCH_SIZE) {
        sink.append_tracks(owner, &playlist_id, batch).await?;
    }
    Ok(playlist_id)
}
