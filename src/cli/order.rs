use std::path::{Path, PathBuf};

use crate::{
    Res, SfiltError,
    config::Config,
    export::{self, ExportOptions},
    orderer::SimilarityOrderer,
    spotify::SpotifyClient,
    success,
    types::TrackId,
    utils, warning,
};

/// Reads track ids, one per line; blank lines and `#` comments are ignored.
pub async fn load_id_file(path: &Path) -> Res<Vec<TrackId>> {
    let content = async_fs::read_to_string(path).await?;
    Ok(parse_ids(&content))
}

pub fn parse_ids(content: &str) -> Vec<TrackId> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| l.trim_start_matches("spotify:track:").to_string())
        .collect()
}

/// Orders explicit track ids by similarity and prints them as a table.
pub async fn order(
    config: Config,
    mut ids: Vec<TrackId>,
    ids_file: Option<PathBuf>,
    seed: Option<u64>,
    export: Option<ExportOptions>,
) -> Res<()> {
    if let Some(path) = ids_file {
        ids.extend(load_id_file(&path).await?);
    }
    let before = ids.len();
    utils::dedup_preserving_order(&mut ids);
    if ids.len() < before {
        warning!("Ignoring {} duplicate ids.", before - ids.len());
    }
    if ids.is_empty() {
        return Err(SfiltError::Config("no track ids given".to_string()));
    }

    let client = SpotifyClient::connect(config).await?;

    let pb = super::spinner("Fetching audio features...");
    let mut orderer =
        SimilarityOrderer::new(super::run::rng_for(seed)).with_progress(pb.clone());
    let ranked = orderer.rank(&ids, &client).await;
    pb.finish_and_clear();
    let ranked = ranked?;

    if let Some(options) = &export {
        export::write_side_file(&ranked, options).await?;
    }

    println!("{}", super::run::ranked_table(&ranked));
    success!(
        "Ordered {} of {} tracks around \"{}\".",
        ranked.len(),
        ids.len(),
        ranked.anchor().name
    );
    Ok(())
}
