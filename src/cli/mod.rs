//! # CLI Module
//!
//! Command implementations behind the `sfilt` binary. Each command builds its own
//! [`SpotifyClient`](crate::spotify::SpotifyClient) from the explicit configuration
//! it is handed, reports progress on a spinner and returns an
//! [`SfiltError`](crate::SfiltError) that `main` turns into an error message.
//!
//! ## Commands
//!
//! - [`auth`] - OAuth 2.0 PKCE authorization, stores the token locally
//! - [`charts`] - Lists the playlists of the chart account
//! - [`run`] - Viral charts → stop list → recommendations → ordering → playlist
//! - [`order`] - Orders explicit track ids and prints the ranking
//!
//! ## Usage
//!
//! ```bash
//! sfilt auth
//! sfilt charts
//! sfilt run --charts viral_50.json
//! sfilt run --chart 37i9dQZEVXbL3J0k32lWnN --recommend --limit 200 --dry-run
//! sfilt order 4uLU6hMCjMI75M1A2tKUQC 7ouMYWpwJ422jRcDASZB7P --seed 3
//! ```

mod auth;
mod charts;
mod order;
mod run;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

pub use auth::auth;
pub use charts::{CHARTS_USER, charts};
pub use order::{load_id_file, order, parse_ids};
pub use run::{OrderBy, RunOptions, load_chart_file, parse_chart_list, run};

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
