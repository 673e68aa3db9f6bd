// Central configuration loaded from environment variables.
//
// The .env file is loaded automatically at startup via dotenvy. Everything
// has a default so `vpi status` works out of the box against the standard
// data directory.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::FixedOffset;

pub struct Config {
    /// CSV snapshot feed produced by the external collector.
    pub snapshot_path: PathBuf,
    /// JSON channel metadata store (keyed by channel_id).
    pub channel_meta_path: PathBuf,
    /// The target local zone. Local-shaped feed timestamps are assumed to
    /// already be in this zone; UTC-marked ones are shifted into it.
    /// Default +9 (Asia/Seoul, no DST).
    pub local_offset: FixedOffset,
}

impl Config {
    /// Load configuration from environment variables, with defaults.
    pub fn load() -> Result<Self> {
        let offset_hours = match env::var("VPI_UTC_OFFSET_HOURS") {
            Ok(raw) => raw
                .parse::<i32>()
                .context("VPI_UTC_OFFSET_HOURS must be an integer number of hours")?,
            Err(_) => 9,
        };
        let local_offset = FixedOffset::east_opt(offset_hours * 3600)
            .with_context(|| format!("VPI_UTC_OFFSET_HOURS out of range: {offset_hours}"))?;

        Ok(Self {
            snapshot_path: env::var("VPI_SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/processed_data.csv")),
            channel_meta_path: env::var("VPI_CHANNEL_META_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/channel_meta.json")),
            local_offset,
        })
    }
}
