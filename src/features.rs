//! Audio-feature vectors and the distance between them.
//!
//! A track is summarised by ten components derived from Spotify's audio analysis.
//! All of them lie roughly in `[0, 1]`: most fields already arrive normalised, `key`
//! is divided by 11 and `loudness` (dB, about `[-60, 0]`) is turned into a linear
//! amplitude with `10^(dB / 20)`.

use crate::{SfiltError, types::RawAudioFeatures};

/// Number of components in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = 10;

/// Audio-feature record with every field the vector needs.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFeatures {
    pub id: String,
    pub danceability: f64,
    pub energy: f64,
    pub key: f64,
    pub loudness: f64,
    pub mode: f64,
    pub speechiness: f64,
    pub acousticness: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    pub valence: f64,
}

impl TryFrom<RawAudioFeatures> for AudioFeatures {
    type Error = SfiltError;

    fn try_from(raw: RawAudioFeatures) -> Result<Self, Self::Error> {
        let id = raw.id.ok_or_else(|| SfiltError::MalformedRecord {
            id: "<unknown>".to_string(),
            field: "id",
        })?;

        let field = |value: Option<f64>, name: &'static str| {
            value.ok_or_else(|| SfiltError::MalformedRecord {
                id: id.clone(),
                field: name,
            })
        };

        Ok(Self {
            danceability: field(raw.danceability, "danceability")?,
            energy: field(raw.energy, "energy")?,
            key: field(raw.key, "key")?,
            loudness: field(raw.loudness, "loudness")?,
            mode: field(raw.mode, "mode")?,
            speechiness: field(raw.speechiness, "speechiness")?,
            acousticness: field(raw.acousticness, "acousticness")?,
            instrumentalness: field(raw.instrumentalness, "instrumentalness")?,
            liveness: field(raw.liveness, "liveness")?,
            valence: field(raw.valence, "valence")?,
            id,
        })
    }
}

/// Ordered ten-component summary of a track's audio characteristics.
///
/// Component order: danceability, energy, key/11, 10^(loudness/20), mode,
/// speechiness, acousticness, instrumentalness, liveness, valence.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn new(components: [f64; FEATURE_COUNT]) -> Self {
        Self(components)
    }

    pub fn components(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Euclidean (L2) distance to `other`.
    pub fn distance(&self, other: &FeatureVector) -> f64 {
        euclidean_distance(self, other)
    }
}

impl From<&AudioFeatures> for FeatureVector {
    fn from(af: &AudioFeatures) -> Self {
        Self([
            af.danceability,
            af.energy,
            af.key / 11.0,
            10f64.powf(af.loudness / 20.0),
            af.mode,
            af.speechiness,
            af.acousticness,
            af.instrumentalness,
            af.liveness,
            af.valence,
        ])
    }
}

/// Return the [euclidean
/// distance](https://en.wikipedia.org/wiki/Euclidean_distance#Higher_dimensions)
/// between two feature vectors.
pub fn euclidean_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    a.0.iter()
        .zip(b.0.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
