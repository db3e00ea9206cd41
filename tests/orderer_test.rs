mod common;

use indicatif::ProgressBar;
use rand::{SeedableRng, rngs::StdRng};
use sfilt::{
    SfiltError,
    export::{ExportOptions, ExportOrder},
    features::{FEATURE_COUNT, FeatureVector},
    orderer::{
        RankedResult, ScoredTrack, SimilarityOrderer, collect_features, order_by_popularity,
        pick_anchor, rank_from_anchor,
    },
    types::RawAudioFeatures,
};

use common::{FakeProvider, ids};

fn scored(id: &str, vector: [f64; FEATURE_COUNT]) -> ScoredTrack {
    ScoredTrack {
        id: id.to_string(),
        name: format!("Song {}", id),
        artist: format!("Artist {}", id),
        vector: FeatureVector::new(vector),
    }
}

fn sorted(mut v: Vec<String>) -> Vec<String> {
    v.sort();
    v
}

#[test]
fn test_rank_from_anchor_keeps_ties_in_input_order() {
    let mut v2 = [0.0; FEATURE_COUNT];
    v2[3] = 1.0;
    let tracks = vec![
        scored("v1", [0.0; FEATURE_COUNT]),
        scored("v2", v2),
        scored("v3", [0.0; FEATURE_COUNT]),
    ];

    let ranked = rank_from_anchor(tracks, 0).unwrap();

    assert!(!ranked.is_empty());
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked.anchor().id, "v1");
    assert_eq!(ranked.ordered_ids(), vec!["v1", "v3", "v2"]);

    let distances: Vec<f64> = ranked.rows().iter().map(|r| r.distance).collect();
    assert_eq!(distances, vec![0.0, 1.0, 0.0]);
}

#[test]
fn test_anchor_is_not_first_when_an_earlier_track_ties() {
    let tracks = vec![
        scored("a", [0.2; FEATURE_COUNT]),
        scored("b", [0.9; FEATURE_COUNT]),
        scored("c", [0.2; FEATURE_COUNT]),
    ];

    let ranked = rank_from_anchor(tracks, 2).unwrap();

    assert_eq!(ranked.anchor().id, "c");
    assert_eq!(ranked.anchor().distance, 0.0);
    assert_eq!(ranked.ordered_ids(), vec!["a", "c", "b"]);
}

#[test]
fn test_rank_from_anchor_rejects_empty_input() {
    let result = rank_from_anchor(Vec::new(), 0);
    assert!(matches!(result, Err(SfiltError::InsufficientData)));
}

#[test]
fn test_distances_do_not_depend_on_anchor_side() {
    let tracks = vec![
        scored("a", [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0]),
        scored("b", [0.9, 0.1, 0.0, 0.3, 1.0, 0.2, 0.4, 0.0, 0.5, 0.7]),
    ];

    let from_a = rank_from_anchor(tracks.clone(), 0).unwrap();
    let from_b = rank_from_anchor(tracks, 1).unwrap();

    assert_eq!(from_a.rows()[1].distance, from_b.rows()[0].distance);
}

#[test]
fn test_pick_anchor_is_reproducible_with_a_seed() {
    let first = pick_anchor(&mut StdRng::seed_from_u64(42), 17).unwrap();
    let second = pick_anchor(&mut StdRng::seed_from_u64(42), 17).unwrap();

    assert_eq!(first, second);
    assert!(first < 17);
    assert!(matches!(
        pick_anchor(&mut StdRng::seed_from_u64(42), 0),
        Err(SfiltError::InsufficientData)
    ));
}

#[tokio::test]
async fn test_order_is_a_permutation_when_all_tracks_resolve() {
    let track_ids = ids("t", 7);
    let provider = FakeProvider::resolving(&track_ids);

    let mut orderer = SimilarityOrderer::new(StdRng::seed_from_u64(7));
    let ordered = orderer
        .order_by_similarity(&track_ids, &provider)
        .await
        .unwrap();

    assert_eq!(ordered.len(), track_ids.len());
    assert_eq!(sorted(ordered), sorted(track_ids));
}

#[tokio::test]
async fn test_anchor_has_zero_distance_and_leads_unique_vectors() {
    let track_ids = ids("t", 12);
    let provider = FakeProvider::resolving(&track_ids);

    let mut orderer = SimilarityOrderer::new(StdRng::seed_from_u64(3));
    let ranked: RankedResult = orderer.rank(&track_ids, &provider).await.unwrap();

    assert_eq!(ranked.anchor().distance, 0.0);
    // every vector is distinct, so the anchor must come first
    assert_eq!(ranked.ordered_ids()[0], ranked.anchor().id);

    let distances: Vec<f64> = ranked.sorted_rows().iter().map(|r| r.distance).collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_trailing_partial_batch_is_processed() {
    for (count, batches) in [
        (49, vec![49]),
        (50, vec![50]),
        (51, vec![50, 1]),
        (120, vec![50, 50, 20]),
    ] {
        let track_ids = ids("t", count);
        let provider = FakeProvider::resolving(&track_ids);

        let mut orderer = SimilarityOrderer::new(StdRng::seed_from_u64(1));
        let ordered = orderer
            .order_by_similarity(&track_ids, &provider)
            .await
            .unwrap();

        assert_eq!(ordered.len(), count, "{} ids", count);
        assert_eq!(provider.feature_batches(), batches);
        assert_eq!(provider.track_batches(), batches);
    }
}

#[tokio::test]
async fn test_track_without_features_is_dropped_everywhere() {
    let track_ids = ids("t", 3);
    let mut provider = FakeProvider::resolving(&track_ids);
    provider.features.remove("t1");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sfilt.csv");
    let mut orderer = SimilarityOrderer::new(StdRng::seed_from_u64(5)).with_export(ExportOptions {
        path: path.clone(),
        order: ExportOrder::AsComputed,
    });

    let ordered = orderer
        .order_by_similarity(&track_ids, &provider)
        .await
        .unwrap();

    assert_eq!(ordered.len(), 2);
    assert!(!ordered.contains(&"t1".to_string()));

    let csv = std::fs::read_to_string(&path).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(!csv.contains("t1"));
}

#[tokio::test]
async fn test_missing_metadata_keeps_track_with_empty_name() {
    let track_ids = ids("t", 2);
    let mut provider = FakeProvider::resolving(&track_ids);
    provider.tracks.remove("t0");

    let scored = collect_features(&track_ids, &provider, &ProgressBar::hidden())
        .await
        .unwrap();

    assert_eq!(scored.len(), 2);
    assert_eq!(scored[0].id, "t0");
    assert_eq!(scored[0].name, "");
    assert_eq!(scored[1].artist, "Artist t1");
}

#[tokio::test]
async fn test_malformed_record_is_dropped_not_fatal() {
    let track_ids = ids("t", 3);
    let mut provider = FakeProvider::resolving(&track_ids);
    provider.features.insert(
        "t2".to_string(),
        RawAudioFeatures {
            loudness: None,
            ..common::raw_features("t2", 0.3)
        },
    );

    let scored = collect_features(&track_ids, &provider, &ProgressBar::hidden())
        .await
        .unwrap();

    let kept: Vec<&str> = scored.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(kept, vec!["t0", "t1"]);
}

#[tokio::test]
async fn test_no_features_fails_without_writing_side_file() {
    let track_ids = ids("t", 4);
    let mut provider = FakeProvider::resolving(&track_ids);
    provider.features.clear();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sfilt.csv");
    let mut orderer = SimilarityOrderer::new(StdRng::seed_from_u64(9)).with_export(ExportOptions {
        path: path.clone(),
        order: ExportOrder::AsComputed,
    });

    let result = orderer.order_by_similarity(&track_ids, &provider).await;

    assert!(matches!(result, Err(SfiltError::InsufficientData)));
    assert!(!path.exists());
}

#[tokio::test]
async fn test_provider_errors_propagate() {
    let track_ids = ids("t", 2);
    let provider = FakeProvider {
        fail: true,
        ..FakeProvider::resolving(&track_ids)
    };

    let mut orderer = SimilarityOrderer::new(StdRng::seed_from_u64(9));
    let err = orderer
        .order_by_similarity(&track_ids, &provider)
        .await
        .unwrap_err();

    assert!(err.is_provider());
}

#[tokio::test]
async fn test_order_by_popularity_is_ascending_and_stable() {
    let track_ids = ids("t", 4);
    let mut provider = FakeProvider::default();
    provider.add("t0", 0.1, 70);
    provider.add("t1", 0.1, 20);
    provider.add("t2", 0.1, 70);
    // t3 cannot be resolved

    let ordered = order_by_popularity(&track_ids, &provider, &ProgressBar::hidden())
        .await
        .unwrap();

    assert_eq!(ordered, vec!["t1", "t0", "t2"]);
}
