// Window selector — trailing-window filtering and subscriber metrics.
//
// Windows are anchored on the most recent *observed* timestamp in the
// series, not wall-clock now: the collector may lag, and "the last 30
// days of data" must mean the last 30 days that exist. The one exception
// is recency filtering of uploads ("published within N days"), which is
// explicitly wall-clock-relative and takes `now` as an argument.

use chrono::{Duration, NaiveDateTime};

use crate::data::models::{CohortFilter, Snapshot};

/// Windowed subscriber growth for one channel.
///
/// `growth` is lifetime-relative (window-end minus the very first snapshot
/// ever collected); `daily_avg` is window-relative. `degenerate` marks the
/// fewer-than-2-rows-in-window case so callers can warn without re-deriving
/// the condition — the zeros alone are indistinguishable from a flat series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubscriberMetrics {
    /// `end - first`: subscriber delta since data collection began.
    pub growth: i64,
    /// `(end - start) / actual_days`: mean daily gain inside the window.
    pub daily_avg: f64,
    /// Subscriber count at the last snapshot inside the window.
    pub end: u64,
    /// Subscriber count at the first snapshot inside the window.
    pub start: u64,
    pub degenerate: bool,
}

impl SubscriberMetrics {
    fn degenerate() -> Self {
        Self {
            growth: 0,
            daily_avg: 0.0,
            end: 0,
            start: 0,
            degenerate: true,
        }
    }
}

/// Filter `series` to snapshots within `days` of `reference`.
/// `series` must be sorted by timestamp.
pub fn select_window(series: &[Snapshot], reference: NaiveDateTime, days: i64) -> &[Snapshot] {
    let cutoff = reference - Duration::days(days);
    let from = series.partition_point(|s| s.timestamp < cutoff);
    &series[from..]
}

/// Subscriber growth over the trailing `days`-day window of observed data.
///
/// Returns the zero/degenerate metrics when fewer than 2 snapshots fall in
/// the window — never an error.
pub fn subscriber_metrics(series: &[Snapshot], days: i64) -> SubscriberMetrics {
    let Some(last) = series.last() else {
        return SubscriberMetrics::degenerate();
    };

    let recent = select_window(series, last.timestamp, days);
    if recent.len() < 2 {
        return SubscriberMetrics::degenerate();
    }

    let first = series[0].subscriber_count;
    let start = recent[0].subscriber_count;
    let end = recent[recent.len() - 1].subscriber_count;

    let actual_days = (recent[recent.len() - 1].timestamp - recent[0].timestamp).num_seconds()
        as f64
        / 86_400.0;

    let daily_avg = if actual_days > 0.0 {
        (end as f64 - start as f64) / actual_days
    } else {
        0.0
    };

    SubscriberMetrics {
        growth: end as i64 - first as i64,
        daily_avg,
        end,
        start,
        degenerate: false,
    }
}

/// Mean view count over videos published within `days` of the most recent
/// publish date observed in the series, optionally cohort-filtered.
/// Returns 0.0 for an empty selection.
pub fn recent_avg_views(series: &[Snapshot], days: i64, cohort: CohortFilter) -> f64 {
    let Some(latest_pub) = series.iter().map(|s| s.published_at).max() else {
        return 0.0;
    };
    let cutoff = latest_pub - Duration::days(days);

    let mut sum = 0.0;
    let mut count = 0usize;
    for snapshot in series {
        if snapshot.published_at >= cutoff && cohort.matches(snapshot) {
            sum += snapshot.view_count as f64;
            count += 1;
        }
    }

    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Snapshots of videos published within `days` of `now` (wall-clock-relative;
/// `now` is injected rather than read from the system clock).
pub fn published_within(series: &[Snapshot], days: i64, now: NaiveDateTime) -> Vec<Snapshot> {
    let cutoff = now - Duration::days(days);
    series
        .iter()
        .filter(|s| s.published_at >= cutoff)
        .cloned()
        .collect()
}
