use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

mod config;

use vpi::analytics::query::{
    self, channel_detail, channel_overview, OverviewSort, QueryParams, VideoSort,
};
use vpi::data::cache::DatasetCache;
use vpi::data::loader;

/// VPI: growth analytics for video channels.
///
/// Computes windowed subscriber metrics, expected-view trajectories by
/// video age, and per-video gain attribution from periodic snapshots of
/// public channel/video stats.
#[derive(Parser)]
#[command(name = "vpi", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all channels with growth stats
    Overview {
        /// Sort order for the channel list
        #[arg(long, value_enum, default_value = "subscribers")]
        sort: OverviewSort,

        /// Only show channels in this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Full detail view for one channel
    Channel {
        /// The channel ID to analyze
        channel_id: String,

        /// Trailing window for subscriber metrics, in days
        #[arg(long, default_value = "30")]
        window_days: i64,

        /// Trailing window for gain attribution, in days
        #[arg(long, default_value = "10")]
        gain_days: i64,

        /// Trajectory length in days-since-publish
        #[arg(long, default_value = "30")]
        max_days: u32,

        /// Sort order for the video list
        #[arg(long, value_enum, default_value = "recency")]
        sort: VideoSort,
    },

    /// Show dataset status (row counts, channels, time range, load warnings)
    Status,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("vpi=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = config::Config::load()?;

    match cli.command {
        Commands::Overview { sort, category } => {
            let mut cache = DatasetCache::new(config.local_offset);
            let dataset = cache.get_or_load(&config.snapshot_path)?;
            let meta = loader::load_channel_meta(&config.channel_meta_path)?;

            let mut rows = channel_overview(&dataset, &meta);
            if let Some(category) = category {
                rows.retain(|row| row.category == category);
            }
            query::sort_overview(&mut rows, sort);

            vpi::output::terminal::display_overview(&rows);
        }

        Commands::Channel {
            channel_id,
            window_days,
            gain_days,
            max_days,
            sort,
        } => {
            let mut cache = DatasetCache::new(config.local_offset);
            let dataset = cache.get_or_load(&config.snapshot_path)?;
            let meta = loader::load_channel_meta(&config.channel_meta_path)?;

            let params = QueryParams {
                window_days,
                gain_days,
                max_days,
            };
            let mut detail = channel_detail(&dataset, &meta, &channel_id, params)?;
            query::sort_videos(&mut detail.videos, sort);

            vpi::output::terminal::display_channel_detail(&detail, meta.channel(&channel_id));
        }

        Commands::Status => {
            info!("Loading snapshot feed for status check...");
            let report = loader::load_snapshots(&config.snapshot_path, config.local_offset)?;
            let dataset = &report.dataset;

            println!("\n{}", "=== Dataset Status ===".bold());
            println!("  Feed: {}", config.snapshot_path.display());
            println!("  Snapshot rows: {}", dataset.len());
            println!("  Channels: {}", dataset.channel_ids().len());
            println!("  Rows skipped at load: {}", report.skipped);

            if !report.unparsable_timestamps.is_empty() {
                println!(
                    "  {} {} distinct unparsable timestamp value(s):",
                    "!".yellow(),
                    report.unparsable_timestamps.len()
                );
                for value in &report.unparsable_timestamps {
                    println!("    - {value:?}");
                }
            }

            let range = dataset
                .snapshots()
                .iter()
                .map(|s| s.timestamp)
                .fold(None::<(chrono::NaiveDateTime, chrono::NaiveDateTime)>, |acc, t| {
                    Some(match acc {
                        None => (t, t),
                        Some((lo, hi)) => (lo.min(t), hi.max(t)),
                    })
                });
            if let Some((lo, hi)) = range {
                println!("  Observed range: {lo} .. {hi}");
            }

            match loader::load_channel_meta(&config.channel_meta_path) {
                Ok(meta) => println!("  Channel metadata entries: {}", meta.channels.len()),
                Err(err) => println!("  {} metadata store unavailable: {err:#}", "!".yellow()),
            }
            println!();
        }
    }

    Ok(())
}
