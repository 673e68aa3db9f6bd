// Data models — typed records for the snapshot feed and metadata store.
//
// These are the types that flow through the analytics engine. They're
// separate from the loader so other modules can use them without depending
// on csv or serde_json directly. The feed is produced by an external
// collector; snapshots are immutable facts that the engine only filters
// and aggregates.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One timestamped observation of a video's public stats.
///
/// `subscriber_count` is channel-level but attached here because it was
/// observed at the same instant. Both instants are local-naive (already
/// shifted to the configured zone by the temporal normalizer).
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub video_id: String,
    pub channel_id: String,
    pub timestamp: NaiveDateTime,
    /// When the video went live — constant across all snapshots of a video.
    pub published_at: NaiveDateTime,
    pub view_count: u64,
    pub subscriber_count: u64,
    pub is_short: bool,
    pub category: String,
    pub video_title: String,
    pub thumbnail_url: Option<String>,
}

impl Snapshot {
    /// Integer age of the video at this observation, 1-indexed
    /// (the publish day itself is day 1, never day 0).
    pub fn day_since_pub(&self) -> i64 {
        (self.timestamp - self.published_at).num_days() + 1
    }
}

/// Descriptive channel fields owned by the external metadata store.
/// Looked up by `channel_id`, never computed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelMeta {
    pub channel_title: String,
    #[serde(default)]
    pub handle: String,
    #[serde(default)]
    pub profile_image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub video_count: u64,
    #[serde(default)]
    pub total_view_count: u64,
}

/// Which videos participate in a cohort computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CohortFilter {
    All,
    Shorts,
    LongForm,
}

impl CohortFilter {
    pub fn matches(&self, snapshot: &Snapshot) -> bool {
        match self {
            CohortFilter::All => true,
            CohortFilter::Shorts => snapshot.is_short,
            CohortFilter::LongForm => !snapshot.is_short,
        }
    }
}
