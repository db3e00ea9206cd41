use std::path::PathBuf;

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand, ValueEnum,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use sfilt::{
    cli, config,
    curate::{DEFAULT_TRACK_LIMIT, GLOBAL_VIRAL_CHARTS},
    error,
    export::{DEFAULT_EXPORT_FILE, ExportOptions, ExportOrder},
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// List the chart playlists
    Charts(ChartsOptions),

    /// Build a playlist from viral charts
    Run(RunArgs),

    /// Order track ids by audio-feature similarity
    Order(OrderArgs),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ChartsOptions {
    /// Account whose playlists are listed
    #[clap(long)]
    pub user: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OrderArg {
    Features,
    Popularity,
}

#[derive(Parser, Debug, Clone)]
pub struct ExportArgs {
    /// Where the diagnostic CSV is written
    #[clap(long, default_value = DEFAULT_EXPORT_FILE)]
    pub export: PathBuf,

    /// Sort the diagnostic CSV by distance instead of input order
    #[clap(long)]
    pub sort_export: bool,
}

impl ExportArgs {
    fn options(&self) -> ExportOptions {
        ExportOptions {
            path: self.export.clone(),
            order: if self.sort_export {
                ExportOrder::ByDistance
            } else {
                ExportOrder::AsComputed
            },
        }
    }
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// JSON file mapping chart names to playlist ids
    #[clap(long)]
    pub charts: Option<PathBuf>,

    /// Chart playlist id; can be repeated
    #[clap(long = "chart", action = ArgAction::Append, num_args = 1)]
    pub chart: Vec<String>,

    /// Chart whose tracks are excluded; can be repeated
    #[clap(long = "global", action = ArgAction::Append, num_args = 1)]
    pub global: Vec<String>,

    /// Widen the set through Spotify recommendations
    #[clap(long)]
    pub recommend: bool,

    /// Upper bound for seeds plus recommendations
    #[clap(long, default_value_t = DEFAULT_TRACK_LIMIT)]
    pub limit: usize,

    /// Ordering of the final list
    #[clap(long, value_enum, default_value = "features")]
    pub order: OrderArg,

    /// Seed for the anchor choice, for reproducible runs
    #[clap(long)]
    pub seed: Option<u64>,

    #[clap(flatten)]
    pub export: ExportArgs,

    /// Playlist name (default: "sfilt: Top 50 Viral <date>")
    #[clap(long)]
    pub name: Option<String>,

    /// Print the ordered ids instead of creating a playlist
    #[clap(long)]
    pub dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct OrderArgs {
    /// Track ids to order
    pub ids: Vec<String>,

    /// File with one track id per line
    #[clap(long)]
    pub ids_file: Option<PathBuf>,

    /// Seed for the anchor choice
    #[clap(long)]
    pub seed: Option<u64>,

    #[clap(flatten)]
    pub export: ExportArgs,

    /// Skip writing the diagnostic CSV
    #[clap(long)]
    pub no_export: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("{}", e),
    };

    let result = match cli.command {
        Command::Auth => cli::auth(config).await,
        Command::Charts(opt) => cli::charts(config, opt.user).await,
        Command::Run(opt) => {
            let global_charts = if opt.global.is_empty() {
                GLOBAL_VIRAL_CHARTS.iter().map(|c| c.to_string()).collect()
            } else {
                opt.global
            };

            let options = cli::RunOptions {
                charts_file: opt.charts,
                charts: opt.chart,
                global_charts,
                recommend: opt.recommend,
                limit: opt.limit,
                order: match opt.order {
                    OrderArg::Features => cli::OrderBy::Features,
                    OrderArg::Popularity => cli::OrderBy::Popularity,
                },
                seed: opt.seed,
                export: opt.export.options(),
                name: opt.name,
                dry_run: opt.dry_run,
            };
            cli::run(config, options).await
        }
        Command::Order(opt) => {
            let export = (!opt.no_export).then(|| opt.export.options());
            cli::order(config, opt.ids, opt.ids_file, opt.seed, export).await
        }
        Command::Completions(_) => Ok(()),
    };

    if let Err(e) = result {
        error!("{}", e);
    }
}
