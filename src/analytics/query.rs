// Query facade — the entry points the presentation layer calls.
//
// Composes the normalizer, window selector, trajectory aggregator, and
// gain engine into per-channel answers. Each call computes fresh from the
// channel's snapshot subset; nothing is persisted.

use anyhow::{bail, Result};

use crate::analytics::gain::{video_gain_scores, GainParams};
use crate::analytics::trajectory::{avg_view_trajectory, Trajectory};
use crate::analytics::window::{recent_avg_views, subscriber_metrics, SubscriberMetrics};
use crate::data::models::{CohortFilter, Snapshot};
use crate::data::{Dataset, MetaStore};

/// Window sizes for one channel-detail query.
#[derive(Debug, Clone, Copy)]
pub struct QueryParams {
    /// Trailing window for subscriber metrics.
    pub window_days: i64,
    /// Trailing window for gain attribution.
    pub gain_days: i64,
    /// Trajectory length in days-since-publish.
    pub max_days: u32,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            window_days: 30,
            gain_days: 10,
            max_days: 30,
        }
    }
}

/// One video in the detail view, built from its latest snapshot.
#[derive(Debug, Clone)]
pub struct VideoRow {
    pub video_id: String,
    pub video_title: String,
    pub is_short: bool,
    pub published_at: chrono::NaiveDateTime,
    pub view_count: u64,
    pub day_since_pub: i64,
    /// `None` = not computed (shorts, no qualifying snapshot);
    /// `Some(0.0)` = computed as zero. The distinction is deliberate.
    pub gain_score: Option<f64>,
    /// Cohort-expected view count at this video's current age (0 beyond
    /// the computed trajectory range).
    pub expected_views: u64,
    pub thumbnail_url: Option<String>,
}

/// Everything the channel detail view needs, computed in one pass.
#[derive(Debug, Clone)]
pub struct ChannelDetail {
    pub channel_id: String,
    pub subscriber: SubscriberMetrics,
    pub long_trajectory: Trajectory,
    pub short_trajectory: Trajectory,
    pub long_recent_avg_views: f64,
    pub short_recent_avg_views: f64,
    pub gain_index: f64,
    pub videos: Vec<VideoRow>,
}

/// Ordering choices for the detail video list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum VideoSort {
    Recency,
    Views,
    Gain,
}

/// Per-channel stats for the overview listing.
#[derive(Debug, Clone)]
pub struct ChannelOverview {
    pub channel_id: String,
    pub channel_title: String,
    pub category: String,
    pub latest_subscribers: u64,
    /// Lifetime subscriber delta across the collected series.
    pub subs_diff: i64,
    pub avg_views: f64,
    /// Fraction of snapshot rows belonging to shorts.
    pub short_ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OverviewSort {
    Subscribers,
    SubsDiff,
    AvgViews,
    ShortRatio,
}

/// Compute the full detail view for one channel.
///
/// Unknown channel IDs are a caller error and fail the query; every
/// degenerate analytic condition inside a known channel still produces a
/// renderable all-zero result.
pub fn channel_detail(
    dataset: &Dataset,
    meta: &MetaStore,
    channel_id: &str,
    params: QueryParams,
) -> Result<ChannelDetail> {
    let series = dataset.channel_series(channel_id);
    if series.is_empty() {
        bail!("no snapshots for channel '{channel_id}'");
    }

    let subscriber = subscriber_metrics(&series, params.window_days);

    let long_trajectory = avg_view_trajectory(&series, params.max_days, CohortFilter::LongForm);
    let short_trajectory = avg_view_trajectory(&series, params.max_days, CohortFilter::Shorts);

    // Lifetime total views come from the metadata store, never the feed.
    let total_views = meta
        .channel(channel_id)
        .map(|m| m.total_view_count)
        .unwrap_or(0);

    let scores = video_gain_scores(
        &series,
        subscriber.end,
        total_views,
        GainParams {
            days: params.gain_days,
            ..GainParams::default()
        },
        None,
    );

    let videos = build_video_rows(&series, &scores.by_video, &long_trajectory, &short_trajectory);

    Ok(ChannelDetail {
        channel_id: channel_id.to_string(),
        subscriber,
        long_recent_avg_views: recent_avg_views(&series, params.gain_days, CohortFilter::LongForm),
        short_recent_avg_views: recent_avg_views(&series, params.gain_days, CohortFilter::Shorts),
        long_trajectory,
        short_trajectory,
        gain_index: scores.channel_index,
        videos,
    })
}

/// Latest snapshot per video, merged with gain scores and the matching
/// cohort's expected-view lookup.
fn build_video_rows(
    series: &[Snapshot],
    gain_by_video: &std::collections::BTreeMap<String, f64>,
    long_trajectory: &Trajectory,
    short_trajectory: &Trajectory,
) -> Vec<VideoRow> {
    let mut latest: std::collections::BTreeMap<&str, &Snapshot> = std::collections::BTreeMap::new();
    for snapshot in series {
        let entry = latest.entry(snapshot.video_id.as_str()).or_insert(snapshot);
        if snapshot.timestamp >= entry.timestamp {
            *entry = snapshot;
        }
    }

    latest
        .into_values()
        .map(|snapshot| {
            let day = snapshot.day_since_pub();
            let trajectory = if snapshot.is_short {
                short_trajectory
            } else {
                long_trajectory
            };
            // Shorts stay None (excluded from attribution); long-form
            // videos missing from the map merge as a computed zero.
            let gain_score = if snapshot.is_short {
                None
            } else {
                Some(gain_by_video.get(&snapshot.video_id).copied().unwrap_or(0.0))
            };

            VideoRow {
                video_id: snapshot.video_id.clone(),
                video_title: snapshot.video_title.clone(),
                is_short: snapshot.is_short,
                published_at: snapshot.published_at,
                view_count: snapshot.view_count,
                day_since_pub: day,
                gain_score,
                expected_views: trajectory.expected_views(day),
                thumbnail_url: snapshot.thumbnail_url.clone(),
            }
        })
        .collect()
}

/// Sort detail rows in place.
pub fn sort_videos(videos: &mut [VideoRow], sort: VideoSort) {
    match sort {
        VideoSort::Recency => videos.sort_by(|a, b| b.published_at.cmp(&a.published_at)),
        VideoSort::Views => videos.sort_by(|a, b| b.view_count.cmp(&a.view_count)),
        VideoSort::Gain => videos.sort_by(|a, b| {
            let ka = a.gain_score.unwrap_or(0.0);
            let kb = b.gain_score.unwrap_or(0.0);
            kb.partial_cmp(&ka).unwrap_or(std::cmp::Ordering::Equal)
        }),
    }
}

/// Per-channel stats across the whole dataset, for the overview listing.
///
/// Channels absent from the metadata store are listed with feed-derived
/// fields only.
pub fn channel_overview(dataset: &Dataset, meta: &MetaStore) -> Vec<ChannelOverview> {
    dataset
        .channel_ids()
        .into_iter()
        .filter_map(|channel_id| {
            let series = dataset.channel_series(&channel_id);
            let (first, last) = (series.first()?, series.last()?);

            let total_views: f64 = series.iter().map(|s| s.view_count as f64).sum();
            let shorts = series.iter().filter(|s| s.is_short).count();

            let channel_meta = meta.channel(&channel_id);
            Some(ChannelOverview {
                channel_title: channel_meta
                    .map(|m| m.channel_title.clone())
                    .unwrap_or_else(|| channel_id.clone()),
                category: last.category.clone(),
                latest_subscribers: last.subscriber_count,
                subs_diff: last.subscriber_count as i64 - first.subscriber_count as i64,
                avg_views: total_views / series.len() as f64,
                short_ratio: shorts as f64 / series.len() as f64,
                channel_id,
            })
        })
        .collect()
}

/// Sort overview rows in place.
pub fn sort_overview(rows: &mut [ChannelOverview], sort: OverviewSort) {
    match sort {
        OverviewSort::Subscribers => {
            rows.sort_by(|a, b| b.latest_subscribers.cmp(&a.latest_subscribers))
        }
        OverviewSort::SubsDiff => rows.sort_by(|a, b| b.subs_diff.cmp(&a.subs_diff)),
        OverviewSort::AvgViews => rows.sort_by(|a, b| {
            b.avg_views
                .partial_cmp(&a.avg_views)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        OverviewSort::ShortRatio => rows.sort_by(|a, b| {
            b.short_ratio
                .partial_cmp(&a.short_ratio)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
    }
}
