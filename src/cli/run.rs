use std::path::{Path, PathBuf};

use chrono::Local;
use rand::{SeedableRng, rngs::StdRng};
use serde_json::{Map, Value};
use tabled::Table;

use crate::{
    Res, SfiltError,
    config::Config,
    curate::{self, GLOBAL_VIRAL_CHARTS},
    export::{ExportOptions, ExportOrder},
    info,
    orderer::{self, RankedResult, SimilarityOrderer},
    spotify::SpotifyClient,
    success,
    types::{RankedTableRow, TrackId},
};

/// How the curated list is ordered before it is written back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderBy {
    #[default]
    Features,
    Popularity,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// JSON object mapping chart names to playlist ids.
    pub charts_file: Option<PathBuf>,
    /// Chart playlist ids given on the command line.
    pub charts: Vec<String>,
    /// Stop-list charts; their tracks are removed from the result.
    pub global_charts: Vec<String>,
    pub recommend: bool,
    pub limit: usize,
    pub order: OrderBy,
    pub seed: Option<u64>,
    pub export: ExportOptions,
    pub name: Option<String>,
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            charts_file: None,
            charts: Vec::new(),
            global_charts: GLOBAL_VIRAL_CHARTS.iter().map(|c| c.to_string()).collect(),
            recommend: false,
            limit: curate::DEFAULT_TRACK_LIMIT,
            order: OrderBy::Features,
            seed: None,
            export: ExportOptions::default(),
            name: None,
            dry_run: false,
        }
    }
}

/// Reads a chart list such as `{"Viral 50 - Germany": "37i9dQZEVXbKuaTI1Z1Afx"}`.
///
/// Ids come back in file order, which decides which chart wins a duplicate track.
pub async fn load_chart_file(path: &Path) -> Res<Vec<String>> {
    let content = async_fs::read_to_string(path).await?;
    parse_chart_list(&content)
}

pub fn parse_chart_list(content: &str) -> Res<Vec<String>> {
    let charts: Map<String, Value> = serde_json::from_str(content)?;
    charts
        .into_iter()
        .map(|(name, id)| match id {
            Value::String(id) => Ok(id),
            _ => Err(SfiltError::Config(format!(
                "chart \"{}\" must map to a playlist id",
                name
            ))),
        })
        .collect()
}

pub(super) fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

pub(super) fn ranked_table(ranked: &RankedResult) -> Table {
    let rows: Vec<RankedTableRow> = ranked
        .sorted_rows()
        .into_iter()
        .enumerate()
        .map(|(i, r)| RankedTableRow {
            position: i + 1,
            name: r.name.clone(),
            artist: r.artist.clone(),
            distance: format!("{:.4}", r.distance),
            id: r.id.clone(),
        })
        .collect();
    Table::new(rows)
}

/// Runs the whole job: charts, stop list, recommendations, ordering, playlist.
pub async fn run(config: Config, options: RunOptions) -> Res<()> {
    let mut chart_ids = match &options.charts_file {
        Some(path) => load_chart_file(path).await?,
        None => Vec::new(),
    };
    chart_ids.extend(options.charts.iter().cloned());
    if chart_ids.is_empty() {
        return Err(SfiltError::Config(
            "no chart playlists given, use --charts or --chart".to_string(),
        ));
    }

    let client = SpotifyClient::connect(config).await?;

    let pb = super::spinner("Collecting viral tracks...");
    let viral = curate::get_viral_tracks(&client, &chart_ids, &pb).await;
    let global = match &viral {
        Ok(_) => curate::get_viral_tracks(&client, &options.global_charts, &pb).await,
        Err(_) => Ok(Vec::new()),
    };
    pb.finish_and_clear();
    let (viral, global) = (viral?, global?);

    let unique = curate::filter_tracks(&viral, &global);
    info!(
        "Found {} unique tracks in {} charts.",
        unique.len(),
        chart_ids.len()
    );

    let candidates = if options.recommend {
        let pb = super::spinner("Fetching recommendations...");
        let recommended = curate::get_recommendations(&client, &unique, options.limit, &pb).await;
        pb.finish_and_clear();
        let recommended = recommended?;

        let mut candidates = unique.clone();
        candidates.extend(recommended);
        let candidates = curate::filter_tracks(&candidates, &global);
        info!(
            "Found total of {} new and unique recommended tracks.",
            candidates.len()
        );
        candidates
    } else {
        unique
    };

    let ordered = order_candidates(&client, &candidates, &options).await?;

    if options.dry_run {
        for (i, id) in ordered.iter().enumerate() {
            println!("{:>4} {}", i + 1, id);
        }
        success!("Dry run: {} tracks ordered, no playlist created.", ordered.len());
        return Ok(());
    }

    let owner = client.owner_id().await?;
    let name = options
        .name
        .clone()
        .unwrap_or_else(|| curate::playlist_name(Local::now().date_naive()));
    curate::add_tracks_to_playlist(&client, &owner, &name, &ordered).await?;
    success!(
        "Saved {} new tracks to the playlist \"{}\".",
        ordered.len(),
        name
    );
    Ok(())
}

async fn order_candidates(
    client: &SpotifyClient,
    candidates: &[TrackId],
    options: &RunOptions,
) -> Res<Vec<TrackId>> {
    match options.order {
        OrderBy::Features => {
            let pb = super::spinner("Fetching audio features...");
            let mut orderer = SimilarityOrderer::new(rng_for(options.seed))
                .with_export(options.export.clone())
                .with_progress(pb.clone());
            let ordered = orderer.order_by_similarity(candidates, client).await;
            pb.finish_and_clear();
            let ordered = ordered?;
            info!(
                "Ordered {} tracks by audio features, details in {}{}.",
                ordered.len(),
                options.export.path.display(),
                match options.export.order {
                    ExportOrder::AsComputed => "",
                    ExportOrder::ByDistance => " (sorted)",
                }
            );
            Ok(ordered)
        }
        OrderBy::Popularity => {
            let pb = super::spinner("Fetching popularity...");
            let ordered = orderer::order_by_popularity(candidates, client, &pb).await;
            pb.finish_and_clear();
            ordered
        }
    }
}
