// Contribution / gain engine — attributing subscriber growth to videos.
//
// The channel GainIndex compares the channel's actual views-to-subscribers
// conversion rate over a trailing window against a size-normalized
// expected rate, then distributes that index across long-form videos
// proportional to each video's share of cohort view growth.
//
// Two timelines are deliberately mixed: the subscriber delta is measured
// over a shared calendar window, while each video's view delta is measured
// relative to its *own* publish date (first `days` days of life). The
// age-relative view delta is what makes videos comparable regardless of
// when they were published; the formula is kept exactly as designed.

use std::collections::BTreeMap;

use chrono::Duration;

use crate::analytics::window::select_window;
use crate::data::models::{CohortFilter, Snapshot};

/// Tunables for the gain formula.
///
/// `expected_rate = (end_subs / total_views) / ln(end_subs + c)` — the
/// baseline conversion rate is discounted logarithmically by channel size,
/// modeling that large channels convert views to subscribers less
/// efficiently per view. `c` keeps the logarithm away from small-number
/// blowup for tiny channels.
#[derive(Debug, Clone, Copy)]
pub struct GainParams {
    /// Log stabilization constant (default 100.0).
    pub stabilization_c: f64,
    /// Trailing window length in days (default 10).
    pub days: i64,
}

impl Default for GainParams {
    fn default() -> Self {
        Self {
            stabilization_c: 100.0,
            days: 10,
        }
    }
}

/// Channel GainIndex plus the per-video attribution.
///
/// `by_video` covers the long-form cohort only: shorts and videos with no
/// qualifying snapshot are absent (null, not zero) so "not computed" stays
/// distinguishable from "computed as zero".
#[derive(Debug, Clone, Default)]
pub struct GainScores {
    pub channel_index: f64,
    pub by_video: BTreeMap<String, f64>,
}

/// Per-video view delta within `days` of each video's own publish date.
///
/// `view0` is the first snapshot at or after `published_at`. `view_end` is
/// the first snapshot at or after `published_at + days` for videos old
/// enough, else the latest available snapshot. One delta per video, each
/// measured at a consistent relative age rather than a shared wall-clock
/// instant.
pub fn views_within_days(series: &[Snapshot], days: i64) -> BTreeMap<String, i64> {
    let mut by_video: BTreeMap<&str, Vec<&Snapshot>> = BTreeMap::new();
    for snapshot in series {
        by_video
            .entry(snapshot.video_id.as_str())
            .or_default()
            .push(snapshot);
    }

    let mut deltas = BTreeMap::new();
    for (video_id, mut snaps) in by_video {
        snaps.sort_by_key(|s| s.timestamp);

        let Some(first) = snaps.iter().find(|s| s.timestamp >= s.published_at) else {
            // Observed only before it existed — data-quality noise, skip.
            continue;
        };

        let cutoff = first.published_at + Duration::days(days);
        let newest = snaps[snaps.len() - 1];
        let end = if newest.timestamp < cutoff {
            // Not `days` old yet: use the latest we have.
            newest
        } else {
            snaps
                .iter()
                .find(|s| s.timestamp >= cutoff)
                .copied()
                .unwrap_or(newest)
        };

        deltas.insert(
            video_id.to_string(),
            end.view_count as i64 - first.view_count as i64,
        );
    }

    deltas
}

/// Channel GainIndex: actual conversion rate over the window divided by the
/// externally supplied expected rate `r0`.
///
/// `ΔS` prefers a precomputed `daily_avg * days` when supplied, else is
/// recomputed from the windowed snapshot boundaries. Any zero or negative
/// denominator resolves to 0.0, never panics.
pub fn channel_gain_index(
    series: &[Snapshot],
    r0: f64,
    days: i64,
    daily_avg: Option<f64>,
) -> f64 {
    let total_views_in_days: i64 = views_within_days(series, days).values().sum();

    let delta_subs = match daily_avg {
        Some(avg) => avg * days as f64,
        None => {
            let Some(last) = series.last() else { return 0.0 };
            let recent = select_window(series, last.timestamp, days);
            if recent.len() < 2 {
                0.0
            } else {
                recent[recent.len() - 1].subscriber_count as f64
                    - recent[0].subscriber_count as f64
            }
        }
    };

    let actual_rate = if total_views_in_days > 0 {
        delta_subs / total_views_in_days as f64
    } else {
        0.0
    };

    if r0 > 0.0 {
        actual_rate / r0
    } else {
        0.0
    }
}

/// Compute per-video gain scores for one channel.
///
/// The cohort is restricted to long-form videos; the channel GainIndex is
/// distributed across them proportional to each video's share of the
/// cohort view-delta total, so the scores sum back to the index.
pub fn video_gain_scores(
    channel_series: &[Snapshot],
    end_subs: u64,
    total_views: u64,
    params: GainParams,
    daily_avg: Option<f64>,
) -> GainScores {
    let long_series: Vec<Snapshot> = channel_series
        .iter()
        .filter(|s| CohortFilter::LongForm.matches(s))
        .cloned()
        .collect();

    let r0 = if total_views > 0 {
        (end_subs as f64 / total_views as f64) / (end_subs as f64 + params.stabilization_c).ln()
    } else {
        0.0
    };

    let channel_index = channel_gain_index(&long_series, r0, params.days, daily_avg);

    let deltas = views_within_days(&long_series, params.days);
    let total_delta: i64 = deltas.values().sum();

    let by_video = deltas
        .into_iter()
        .map(|(video_id, delta)| {
            let weight = if total_delta > 0 {
                delta as f64 / total_delta as f64
            } else {
                0.0
            };
            (video_id, channel_index * weight)
        })
        .collect();

    GainScores {
        channel_index,
        by_video,
    }
}
