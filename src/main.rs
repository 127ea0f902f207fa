//! tracker: sample channel statistics and show their trends.
//!
//! Run with:  `RUST_LOG=info tracker report --period 30`

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracker_core::{Anchor, Window};

#[derive(Parser)]
#[command(name = "tracker")]
#[command(about = "Track channel subscriber, view and video counts over time")]
#[command(version)]
struct Cli {
    /// Config file (default: $TRACKER_CONFIG, else $XDG_CONFIG_HOME/tracker/tracker.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch current statistics for every configured channel and append one
    /// sample per channel
    Collect {
        /// Keep running and collect every `collect.interval_secs`
        #[arg(long)]
        daemon: bool,
    },

    /// Print the trend dashboard for stored channels
    Report {
        /// Display period: "all" or a day count (7, 30, 90, ...)
        #[arg(long)]
        period: Option<Window>,

        /// Only report this channel ID
        #[arg(long)]
        channel: Option<String>,

        /// Period anchor: wall-clock or latest-sample
        #[arg(long)]
        anchor: Option<Anchor>,

        /// Also write chart series as JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,

        /// Disable ANSI colours
        #[arg(long)]
        no_color: bool,
    },

    /// Re-render a channel's dashboard whenever its data file changes
    Watch {
        /// Display period: "all" or a day count
        #[arg(long)]
        period: Option<Window>,

        /// Period anchor: wall-clock or latest-sample
        #[arg(long)]
        anchor: Option<Anchor>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for dashboards. RUST_LOG overrides.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(tracker_config::default_path);
    let config = tracker_config::load(&config_path)?;

    tracing::debug!("tracker v{} using '{}'", env!("CARGO_PKG_VERSION"), config_path.display());

    match cli.command {
        Commands::Collect { daemon } => commands::collect::run(&config, daemon).await,
        Commands::Report { period, channel, anchor, json, no_color } => {
            let view = commands::View::new(&config, period, anchor, !no_color);
            commands::report::run(&config, &view, channel, json)
        }
        Commands::Watch { period, anchor } => {
            let view = commands::View::new(&config, period, anchor, true);
            commands::watch::run(&config, &view).await
        }
    }
}
