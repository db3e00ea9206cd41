use tabled::Table;

use crate::{
    Res, config::Config, info, spotify::SpotifyClient, success, types::ChartTableRow,
};

/// Account that publishes Spotify's official charts.
pub const CHARTS_USER: &str = "spotifycharts";

/// Prints the playlists published by `user` (the chart account by default).
pub async fn charts(config: Config, user: Option<String>) -> Res<()> {
    let user = user.unwrap_or_else(|| CHARTS_USER.to_string());
    let client = SpotifyClient::connect(config).await?;

    info!("Fetching playlists of {}", user);
    let pb = super::spinner("Fetching playlists...");
    let playlists = client.user_playlists(&user).await;
    pb.finish_and_clear();
    let playlists = playlists?;

    let rows: Vec<ChartTableRow> = playlists
        .into_iter()
        .map(|p| ChartTableRow {
            name: p.name,
            id: p.id,
            tracks: p.tracks.map(|t| t.total).unwrap_or(0),
        })
        .collect();

    let count = rows.len();
    println!("{}", Table::new(rows));
    success!("Found {} playlists.", count);
    Ok(())
}
