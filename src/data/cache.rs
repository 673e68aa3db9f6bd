// Dataset cache — explicit read-through cache keyed by feed path.
//
// Loading and normalizing the feed is the expensive step, so it happens
// once per path and the parsed dataset is reused unchanged for the rest
// of the process (or until the owner invalidates the entry). The cache is
// injected into whatever composes queries rather than living as ambient
// global state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use chrono::FixedOffset;
use tracing::info;

use crate::data::loader::{self, LoadReport};
use crate::data::Dataset;

pub struct DatasetCache {
    local_offset: FixedOffset,
    entries: HashMap<PathBuf, Arc<Dataset>>,
}

impl DatasetCache {
    pub fn new(local_offset: FixedOffset) -> Self {
        Self {
            local_offset,
            entries: HashMap::new(),
        }
    }

    /// Return the cached dataset for `path`, loading it on first use.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Dataset>> {
        if let Some(dataset) = self.entries.get(path) {
            return Ok(Arc::clone(dataset));
        }

        let LoadReport {
            dataset,
            skipped,
            unparsable_timestamps,
        } = loader::load_snapshots(path, self.local_offset)?;

        info!(
            rows = dataset.len(),
            skipped,
            unparsable = unparsable_timestamps.len(),
            path = %path.display(),
            "snapshot feed loaded"
        );

        let dataset = Arc::new(dataset);
        self.entries.insert(path.to_path_buf(), Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drop one cached entry so the next access reloads from disk.
    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_cached(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }
}
