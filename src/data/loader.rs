// Flat-file loading — snapshot feed (CSV) and channel metadata (JSON).
//
// Structural problems (unreadable file, a required column missing from the
// header) fail the load. Row-level problems (unparsable numbers, bad
// timestamp shapes, a snapshot observed before its video existed) skip the
// row and are counted; the distinct unparsable timestamp strings are
// carried in the report so the caller can surface one warning.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::FixedOffset;
use serde::Deserialize;
use tracing::warn;

use crate::analytics::temporal::parse_mixed_timestamp;
use crate::data::models::{ChannelMeta, Snapshot};
use crate::data::{Dataset, MetaStore};

/// Column names the snapshot feed must carry.
const REQUIRED_COLUMNS: [&str; 8] = [
    "video_id",
    "channel_id",
    "timestamp",
    "published_at",
    "view_count",
    "subscriber_count",
    "is_short",
    "category",
];

/// Outcome of one snapshot-feed load.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub dataset: Dataset,
    /// Rows dropped for any row-level reason.
    pub skipped: usize,
    /// Distinct timestamp strings that matched neither admissible shape.
    pub unparsable_timestamps: BTreeSet<String>,
}

/// One raw feed row. Everything is read as text and parsed explicitly so a
/// single malformed cell skips one row instead of aborting the load.
#[derive(Debug, Deserialize)]
struct RawRow {
    video_id: String,
    channel_id: String,
    timestamp: String,
    published_at: String,
    view_count: String,
    subscriber_count: String,
    is_short: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    video_title: String,
    #[serde(default)]
    thumbnail_url: String,
}

/// Load the snapshot feed, normalizing timestamps into `local_offset`.
pub fn load_snapshots(path: &Path, local_offset: FixedOffset) -> Result<LoadReport> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open snapshot feed at {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("failed to read feed header at {}", path.display()))?;
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            bail!(
                "snapshot feed {} is missing required column '{}'",
                path.display(),
                column
            );
        }
    }

    let mut rows: Vec<Snapshot> = Vec::new();
    let mut skipped = 0usize;
    let mut unparsable = BTreeSet::new();

    for record in reader.deserialize::<RawRow>() {
        let raw = match record {
            Ok(raw) => raw,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };

        match parse_row(raw, local_offset, &mut unparsable) {
            Some(snapshot) => rows.push(snapshot),
            None => skipped += 1,
        }
    }

    // Duplicate (video, timestamp) observations: later ingestion wins.
    let mut last_seen: HashMap<(String, chrono::NaiveDateTime), usize> = HashMap::new();
    for (index, row) in rows.iter().enumerate() {
        last_seen.insert((row.video_id.clone(), row.timestamp), index);
    }
    let mut kept: Vec<Snapshot> = rows
        .iter()
        .enumerate()
        .filter(|(index, row)| last_seen[&(row.video_id.clone(), row.timestamp)] == *index)
        .map(|(_, row)| row.clone())
        .collect();

    backfill_thumbnails(&mut kept);

    if !unparsable.is_empty() {
        warn!(
            count = unparsable.len(),
            "unparsable timestamp values in feed: {:?}", unparsable
        );
    }
    if skipped > 0 {
        warn!(skipped, path = %path.display(), "skipped malformed feed rows");
    }

    Ok(LoadReport {
        dataset: Dataset::new(kept),
        skipped,
        unparsable_timestamps: unparsable,
    })
}

fn parse_row(
    raw: RawRow,
    local_offset: FixedOffset,
    unparsable: &mut BTreeSet<String>,
) -> Option<Snapshot> {
    if raw.video_id.is_empty() || raw.channel_id.is_empty() {
        return None;
    }

    let timestamp = match parse_mixed_timestamp(&raw.timestamp, local_offset) {
        Some(value) => value,
        None => {
            unparsable.insert(raw.timestamp.clone());
            return None;
        }
    };
    let published_at = match parse_mixed_timestamp(&raw.published_at, local_offset) {
        Some(value) => value,
        None => {
            unparsable.insert(raw.published_at.clone());
            return None;
        }
    };

    // A video cannot be observed before it exists. Data-quality error:
    // drop the row rather than reinterpreting it.
    if published_at > timestamp {
        warn!(
            video_id = %raw.video_id,
            "snapshot predates published_at, dropping row"
        );
        return None;
    }

    let view_count = parse_count(&raw.view_count)?;
    let subscriber_count = parse_count(&raw.subscriber_count)?;
    let is_short = parse_bool(&raw.is_short)?;

    Some(Snapshot {
        video_id: raw.video_id,
        channel_id: raw.channel_id,
        timestamp,
        published_at,
        view_count,
        subscriber_count,
        is_short,
        category: raw.category,
        video_title: raw.video_title,
        thumbnail_url: if raw.thumbnail_url.is_empty() {
            None
        } else {
            Some(raw.thumbnail_url)
        },
    })
}

/// Counts arrive as "1234" or "1234.0" depending on the collector run.
fn parse_count(raw: &str) -> Option<u64> {
    let value: f64 = raw.trim().parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value.round() as u64)
    } else {
        None
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

/// Fill a missing `thumbnail_url` from any other snapshot of the same video
/// that has one.
fn backfill_thumbnails(rows: &mut [Snapshot]) {
    let mut known: HashMap<String, String> = HashMap::new();
    for row in rows.iter() {
        if let Some(url) = &row.thumbnail_url {
            known.entry(row.video_id.clone()).or_insert_with(|| url.clone());
        }
    }
    for row in rows.iter_mut() {
        if row.thumbnail_url.is_none() {
            row.thumbnail_url = known.get(&row.video_id).cloned();
        }
    }
}

/// Load the channel metadata store (JSON object keyed by channel_id).
pub fn load_channel_meta(path: &Path) -> Result<MetaStore> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open channel metadata at {}", path.display()))?;
    let channels: HashMap<String, ChannelMeta> = serde_json::from_reader(file)
        .with_context(|| format!("invalid channel metadata JSON at {}", path.display()))?;
    Ok(MetaStore { channels })
}
