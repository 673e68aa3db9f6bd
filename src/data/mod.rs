// Data layer — typed records, flat-file loading, and the dataset cache.
//
// The snapshot feed is a CSV produced by an external collector and the
// channel metadata store is a JSON map. Both are validated into typed
// records at the load boundary so the analytics engine never touches
// stringly-typed rows.

pub mod cache;
pub mod loader;
pub mod models;

use std::collections::HashMap;

use models::{ChannelMeta, Snapshot};

/// The full snapshot dataset, loaded once and treated as read-only input.
///
/// Snapshots are stored sorted by `(channel_id, timestamp)` — the canonical
/// ordering every window and aggregation step relies on.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    snapshots: Vec<Snapshot>,
}

impl Dataset {
    /// Build a dataset from loose rows, establishing the canonical order.
    pub fn new(mut snapshots: Vec<Snapshot>) -> Self {
        snapshots.sort_by(|a, b| {
            a.channel_id
                .cmp(&b.channel_id)
                .then(a.timestamp.cmp(&b.timestamp))
        });
        Self { snapshots }
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// All distinct channel IDs, in canonical order.
    pub fn channel_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for snapshot in &self.snapshots {
            if ids.last().map(String::as_str) != Some(snapshot.channel_id.as_str()) {
                ids.push(snapshot.channel_id.clone());
            }
        }
        ids
    }

    /// One channel's snapshot series, sorted by timestamp.
    ///
    /// Returns an independent copy: each query computes over its own
    /// filtered data and never writes back into the shared dataset.
    pub fn channel_series(&self, channel_id: &str) -> Vec<Snapshot> {
        self.snapshots
            .iter()
            .filter(|s| s.channel_id == channel_id)
            .cloned()
            .collect()
    }
}

/// Keyed channel metadata, owned by the external store.
#[derive(Debug, Clone, Default)]
pub struct MetaStore {
    pub channels: HashMap<String, ChannelMeta>,
}

impl MetaStore {
    pub fn channel(&self, channel_id: &str) -> Option<&ChannelMeta> {
        self.channels.get(channel_id)
    }
}
