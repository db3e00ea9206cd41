//! Track ordering.
//!
//! [`SimilarityOrderer`] fetches audio features for a list of tracks, picks a random
//! anchor among the tracks that have features and sorts all of them by Euclidean
//! distance to that anchor. [`order_by_popularity`] is the simpler alternative that
//! sorts by Spotify's popularity score.
//!
//! Both walk the input in consecutive batches of at most
//! [`FEATURE_BATCH_SIZE`] ids; the last batch may be shorter and is always sent.

use indicatif::ProgressBar;
use rand::Rng;

use crate::{
    Res, SfiltError,
    export::{self, ExportOptions},
    features::{AudioFeatures, FeatureVector},
    sources::{FEATURE_BATCH_SIZE, FeatureProvider},
    types::TrackId,
    warning,
};

/// A track whose audio features were resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTrack {
    pub id: TrackId,
    pub name: String,
    pub artist: String,
    pub vector: FeatureVector,
}

/// A track annotated with its distance to the anchor.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTrack {
    pub id: TrackId,
    pub name: String,
    pub artist: String,
    pub distance: f64,
}

/// Distances of every scored track to one anchor, in input order.
#[derive(Debug, Clone)]
pub struct RankedResult {
    anchor: usize,
    rows: Vec<RankedTrack>,
}

impl RankedResult {
    pub fn anchor(&self) -> &RankedTrack {
        &self.rows[self.anchor]
    }

    /// Rows as computed, i.e. in input order and not sorted.
    pub fn rows(&self) -> &[RankedTrack] {
        &self.rows
    }

    /// Rows by ascending distance; ties keep input order.
    pub fn sorted_rows(&self) -> Vec<&RankedTrack> {
        let mut sorted: Vec<&RankedTrack> = self.rows.iter().collect();
        sorted.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        sorted
    }

    /// Track ids by ascending distance; ties keep input order.
    pub fn ordered_ids(&self) -> Vec<TrackId> {
        self.sorted_rows().into_iter().map(|r| r.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Fetches features and metadata batch by batch and keeps the tracks with features.
///
/// Both requests of a batch are matched by position. A position without a feature
/// record, or with a record missing a field, is dropped together with its metadata.
/// Missing metadata alone only leaves name and artist empty.
///
/// # Errors
///
/// Provider failures are returned as they are; nothing is retried.
pub async fn collect_features<P>(
    track_ids: &[TrackId],
    provider: &P,
    progress: &ProgressBar,
) -> Res<Vec<ScoredTrack>>
where
    P: FeatureProvider + ?Sized,
{
    let mut scored = Vec::with_capacity(track_ids.len());

    for batch in track_ids.chunks(FEATURE_BATCH_SIZE) {
        let features = provider.audio_features(batch).await?;
        let metadata = provider.tracks(batch).await?;

        for (pos, id) in batch.iter().enumerate() {
            let Some(raw) = features.get(pos).cloned().flatten() else {
                continue;
            };

            let af = match AudioFeatures::try_from(raw) {
                Ok(af) => af,
                Err(e) => {
                    progress.suspend(|| warning!("Dropping track {}: {}", id, e));
                    continue;
                }
            };

            let meta = metadata.get(pos).and_then(|m| m.as_ref());
            scored.push(ScoredTrack {
                id: id.clone(),
                name: meta.map(|m| m.name.clone()).unwrap_or_default(),
                artist: meta.map(|m| m.primary_artist()).unwrap_or_default(),
                vector: FeatureVector::from(&af),
            });

            progress.set_message(format!(
                "Found audio features for {} tracks.",
                scored.len()
            ));
        }
    }

    Ok(scored)
}

/// Uniformly picks an anchor position among `len` tracks.
///
/// # Errors
///
/// Returns [`SfiltError::InsufficientData`] when `len` is zero.
pub fn pick_anchor<R: Rng + ?Sized>(rng: &mut R, len: usize) -> Res<usize> {
    if len == 0 {
        return Err(SfiltError::InsufficientData);
    }
    Ok(rng.random_range(0..len))
}

/// Computes every track's distance to the track at `anchor`, the anchor included.
///
/// # Errors
///
/// Returns [`SfiltError::InsufficientData`] when `tracks` is empty.
///
/// # Panics
///
/// Panics if `anchor` is out of bounds for a non-empty `tracks`.
pub fn rank_from_anchor(tracks: Vec<ScoredTrack>, anchor: usize) -> Res<RankedResult> {
    if tracks.is_empty() {
        return Err(SfiltError::InsufficientData);
    }

    let origin = tracks[anchor].vector;
    let rows = tracks
        .into_iter()
        .map(|t| RankedTrack {
            distance: origin.distance(&t.vector),
            id: t.id,
            name: t.name,
            artist: t.artist,
        })
        .collect();

    Ok(RankedResult { anchor, rows })
}

/// Orders tracks by similarity to a randomly chosen anchor.
///
/// The randomness source is injected so runs can be reproduced with a seeded RNG.
///
/// # Example
///
/// ```rust,ignore
/// use rand::{SeedableRng, rngs::StdRng};
/// use sfilt::orderer::SimilarityOrderer;
///
/// let mut orderer = SimilarityOrderer::new(StdRng::seed_from_u64(7));
/// let ordered = orderer.order_by_similarity(&track_ids, &client).await?;
/// ```
pub struct SimilarityOrderer<R> {
    rng: R,
    export: Option<ExportOptions>,
    progress: ProgressBar,
}

impl<R: Rng> SimilarityOrderer<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            export: None,
            progress: ProgressBar::hidden(),
        }
    }

    /// Writes the diagnostic side file after every successful ranking.
    pub fn with_export(mut self, export: ExportOptions) -> Self {
        self.export = Some(export);
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Fetches features, picks the anchor and computes all distances.
    ///
    /// Does not touch the side file.
    ///
    /// # Errors
    ///
    /// [`SfiltError::InsufficientData`] when no track has features, provider errors
    /// otherwise.
    pub async fn rank<P>(&mut self, track_ids: &[TrackId], provider: &P) -> Res<RankedResult>
    where
        P: FeatureProvider + ?Sized,
    {
        let scored = collect_features(track_ids, provider, &self.progress).await?;
        let anchor = pick_anchor(&mut self.rng, scored.len())?;
        rank_from_anchor(scored, anchor)
    }

    /// Returns the ids of all tracks with features by ascending distance to the
    /// anchor, input order breaking ties.
    ///
    /// When an export is configured the side file is written before returning; an
    /// empty feature set fails before anything is written.
    pub async fn order_by_similarity<P>(
        &mut self,
        track_ids: &[TrackId],
        provider: &P,
    ) -> Res<Vec<TrackId>>
    where
        P: FeatureProvider + ?Sized,
    {
        let ranked = self.rank(track_ids, provider).await?;

        if let Some(options) = &self.export {
            export::write_side_file(&ranked, options).await?;
        }

        Ok(ranked.ordered_ids())
    }
}

/// Orders tracks by ascending popularity, input order breaking ties.
///
/// Ids the provider cannot resolve are dropped.
pub async fn order_by_popularity<P>(
    track_ids: &[TrackId],
    provider: &P,
    progress: &ProgressBar,
) -> Res<Vec<TrackId>>
where
    P: FeatureProvider + ?Sized,
{
    let mut rated: Vec<(u32, TrackId)> = Vec::with_capacity(track_ids.len());

    for batch in track_ids.chunks(FEATURE_BATCH_SIZE) {
        let metadata = provider.tracks(batch).await?;
        for (id, track) in batch.iter().zip(metadata) {
            if let Some(track) = track {
                rated.push((track.popularity, id.clone()));
            }
        }
        progress.set_message(format!("Found popularity for {} tracks.", rated.len()));
    }

    rated.sort_by_key(|(popularity, _)| *popularity);
    Ok(rated.into_iter().map(|(_, id)| id).collect())
}
