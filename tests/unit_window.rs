// Unit tests for the window selector and subscriber metrics.
//
// Covers window anchoring on the last observed timestamp, the
// growth/daily_avg decomposition, the degenerate (<2 rows) policy, and
// the publish-date-relative recency helpers.

use chrono::{NaiveDate, NaiveDateTime};
use vpi::analytics::window::{
    published_within, recent_avg_views, select_window, subscriber_metrics,
};
use vpi::data::models::{CohortFilter, Snapshot};

fn at(day: u32, hour: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, day)
        .unwrap()
        .and_hms_opt(hour, 0, 0)
        .unwrap()
}

fn snap(ts: NaiveDateTime, published: NaiveDateTime, views: u64, subs: u64) -> Snapshot {
    Snapshot {
        video_id: "v1".to_string(),
        channel_id: "ch".to_string(),
        timestamp: ts,
        published_at: published,
        view_count: views,
        subscriber_count: subs,
        is_short: false,
        category: "음악".to_string(),
        video_title: "테스트 영상".to_string(),
        thumbnail_url: None,
    }
}

/// Daily snapshots with a strictly increasing subscriber series.
fn daily_series(days: u32, start_subs: u64, per_day: u64) -> Vec<Snapshot> {
    (0..days)
        .map(|i| {
            snap(
                at(1 + i, 12),
                at(1, 0),
                1000 * (i as u64 + 1),
                start_subs + per_day * i as u64,
            )
        })
        .collect()
}

// ============================================================
// select_window — anchored on observed data
// ============================================================

#[test]
fn window_keeps_rows_at_or_after_the_cutoff() {
    let series = daily_series(10, 1000, 10);
    let last = series.last().unwrap().timestamp;
    let recent = select_window(&series, last, 3);
    // cutoff = day 10 12:00 - 3d = day 7 12:00 (inclusive)
    assert_eq!(recent.len(), 4);
    assert_eq!(recent[0].timestamp, at(7, 12));
}

#[test]
fn window_larger_than_series_keeps_everything() {
    let series = daily_series(5, 1000, 10);
    let last = series.last().unwrap().timestamp;
    assert_eq!(select_window(&series, last, 365).len(), 5);
}

// ============================================================
// subscriber_metrics — growth decomposition
// ============================================================

#[test]
fn growth_is_lifetime_relative_and_daily_avg_is_window_relative() {
    let series = daily_series(20, 1000, 10);
    let metrics = subscriber_metrics(&series, 5);

    // Window covers days 15..20 (6 rows): start 1140, end 1190.
    assert_eq!(metrics.start, 1140);
    assert_eq!(metrics.end, 1190);
    // growth = end - lifetime first, not window start.
    assert_eq!(metrics.growth, 190);
    assert!(!metrics.degenerate);

    // daily_avg * actual_days reconstructs the window delta.
    let actual_days = 5.0;
    assert!((metrics.daily_avg * actual_days - (1190.0 - 1140.0)).abs() < 1e-9);
}

#[test]
fn fractional_elapsed_days_divide_exactly() {
    let series = vec![
        snap(at(1, 0), at(1, 0), 10, 100),
        snap(at(2, 12), at(1, 0), 20, 130),
    ];
    let metrics = subscriber_metrics(&series, 10);
    // 36 hours = 1.5 days, +30 subs -> 20/day
    assert!((metrics.daily_avg - 20.0).abs() < 1e-9);
}

// ============================================================
// Degenerate windows — defined zeros, never an error
// ============================================================

#[test]
fn empty_series_is_degenerate() {
    let metrics = subscriber_metrics(&[], 10);
    assert!(metrics.degenerate);
    assert_eq!(
        (metrics.growth, metrics.daily_avg, metrics.end, metrics.start),
        (0, 0.0, 0, 0)
    );
}

#[test]
fn single_snapshot_window_is_degenerate() {
    let series = vec![snap(at(1, 12), at(1, 0), 10, 100)];
    let metrics = subscriber_metrics(&series, 10);
    assert!(metrics.degenerate);
    assert_eq!(metrics.end, 0);
}

#[test]
fn sparse_old_series_with_one_recent_row_is_degenerate() {
    // Only one row falls inside the trailing window.
    let series = vec![
        snap(at(1, 12), at(1, 0), 10, 100),
        snap(at(20, 12), at(1, 0), 500, 400),
    ];
    let metrics = subscriber_metrics(&series, 3);
    assert!(metrics.degenerate);
}

// ============================================================
// Publish-date-relative helpers
// ============================================================

#[test]
fn recent_avg_views_is_anchored_on_the_latest_publish_date() {
    let mut series = vec![
        snap(at(20, 12), at(1, 0), 100, 0),  // old upload
        snap(at(20, 12), at(18, 0), 40, 0),  // recent upload
        snap(at(20, 12), at(19, 0), 60, 0),  // recent upload
    ];
    series[0].video_id = "old".to_string();
    series[1].video_id = "a".to_string();
    series[2].video_id = "b".to_string();

    // Cutoff = day 19 - 5d = day 14; the day-1 upload is excluded.
    let avg = recent_avg_views(&series, 5, CohortFilter::All);
    assert!((avg - 50.0).abs() < 1e-9);
}

#[test]
fn recent_avg_views_empty_selection_is_zero() {
    assert_eq!(recent_avg_views(&[], 10, CohortFilter::All), 0.0);

    let mut shorts_only = vec![snap(at(5, 12), at(5, 0), 100, 0)];
    shorts_only[0].is_short = true;
    // Long-form cohort over a shorts-only series selects nothing.
    assert_eq!(
        recent_avg_views(&shorts_only, 10, CohortFilter::LongForm),
        0.0
    );
}

#[test]
fn published_within_uses_the_injected_now() {
    let series = vec![
        snap(at(10, 12), at(2, 0), 10, 0),
        snap(at(10, 12), at(9, 0), 20, 0),
    ];
    let now = at(10, 12);
    let recent = published_within(&series, 3, now);
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].published_at, at(9, 0));
}
