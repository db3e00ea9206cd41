mod common;

use chrono::NaiveDate;
use indicatif::ProgressBar;
use sfilt::curate::{
    add_tracks_to_playlist, filter_tracks, get_recommendations, get_viral_tracks, playlist_name,
};

use common::{FakeCharts, FakeRecommender, FakeSink, ids};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_filter_tracks_removes_stop_tracks_and_duplicates() {
    let input = strings(&["a", "b", "c", "a", "d", "b", "e"]);
    let stop = strings(&["c", "e"]);

    assert_eq!(filter_tracks(&input, &stop), strings(&["a", "b", "d"]));
}

#[test]
fn test_filter_tracks_with_empty_stop_list() {
    let input = strings(&["x", "y", "x"]);
    assert_eq!(filter_tracks(&input, &[]), strings(&["x", "y"]));
}

#[tokio::test]
async fn test_get_viral_tracks_skips_established_hits() {
    let mut charts = FakeCharts::default();
    charts.playlists.insert(
        "de".to_string(),
        vec![("a".to_string(), 40), ("b".to_string(), 100), ("c".to_string(), 99)],
    );
    charts
        .playlists
        .insert("fr".to_string(), vec![("a".to_string(), 40), ("d".to_string(), 0)]);

    let viral = get_viral_tracks(&charts, &strings(&["de", "fr"]), &ProgressBar::hidden())
        .await
        .unwrap();

    assert_eq!(viral, strings(&["a", "c", "a", "d"]));
}

#[tokio::test]
async fn test_get_viral_tracks_propagates_missing_chart() {
    let charts = FakeCharts::default();
    let result = get_viral_tracks(&charts, &strings(&["nope"]), &ProgressBar::hidden()).await;

    assert!(result.unwrap_err().is_provider());
}

#[tokio::test]
async fn test_recommendations_use_every_seed_group() {
    let seeds = ids("s", 7);
    let recommender = FakeRecommender {
        per_call: 3,
        ..Default::default()
    };

    let recommended = get_recommendations(&recommender, &seeds, 500, &ProgressBar::hidden())
        .await
        .unwrap();

    let calls = recommender.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].len(), 5);
    assert_eq!(calls[1], strings(&["s5", "s6"]));
    assert_eq!(recommended.len(), 6);
}

#[tokio::test]
async fn test_recommendations_skip_seeds_and_repeats() {
    let seeds = ids("s", 10);
    let recommender = FakeRecommender {
        fixed: Some(strings(&["s3", "new1", "new2", "new1"])),
        ..Default::default()
    };

    let recommended = get_recommendations(&recommender, &seeds, 500, &ProgressBar::hidden())
        .await
        .unwrap();

    assert_eq!(recommended, strings(&["new1", "new2"]));
}

#[tokio::test]
async fn test_recommendations_stop_at_limit() {
    let seeds = ids("s", 20);
    let recommender = FakeRecommender {
        per_call: 25,
        ..Default::default()
    };

    let recommended = get_recommendations(&recommender, &seeds, 40, &ProgressBar::hidden())
        .await
        .unwrap();

    // 20 seeds + 25 recommendations already exceed 40
    assert_eq!(recommender.calls.lock().unwrap().len(), 1);
    assert_eq!(recommended.len(), 25);
}

#[tokio::test]
async fn test_add_tracks_to_playlist_appends_in_batches() {
    for (count, batches) in [
        (0, vec![]),
        (50, vec![50]),
        (51, vec![50, 1]),
        (120, vec![50, 50, 20]),
    ] {
        let sink = FakeSink::default();
        let track_ids = ids("t", count);

        let playlist_id = add_tracks_to_playlist(&sink, "me", "Viral", &track_ids)
            .await
            .unwrap();

        assert_eq!(playlist_id, "playlist-1");
        assert_eq!(
            sink.created.lock().unwrap().clone(),
            vec![("me".to_string(), "Viral".to_string())]
        );

        let appended = sink.appended.lock().unwrap().clone();
        let sizes: Vec<usize> = appended.iter().map(|(_, ids)| ids.len()).collect();
        assert_eq!(sizes, batches, "{} tracks", count);

        let flat: Vec<String> = appended.into_iter().flat_map(|(_, ids)| ids).collect();
        assert_eq!(flat, track_ids);
    }
}

#[test]
fn test_playlist_name() {
    let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
    assert_eq!(playlist_name(date), "sfilt: Top 50 Viral March 7 2024");
}
