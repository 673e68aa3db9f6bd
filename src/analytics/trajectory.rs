// Trajectory aggregator — cohort-average view count by days-since-publish.
//
// Produces the "expected view" curve used as a baseline when judging
// individual videos: how many views does a video of this channel (and
// cohort) typically have on day N after publishing?
//
// Averaging happens in two stages so that a video snapshotted several
// times on one day doesn't outweigh videos snapshotted once: first
// per-(video, day), then across videos per day. The dense output table is
// gap-free on purpose — a cohort with sparse early data must not show a
// literal zero, which would corrupt trend visuals. Gaps are linearly
// interpolated, then the boundaries are filled from the nearest known
// value (backward fill, then forward fill), and anything still unknown
// becomes 0.

use std::collections::BTreeMap;

use crate::data::models::{CohortFilter, Snapshot};

/// Cohort-average view count at one integer day of video age.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBucket {
    /// Days since publish, 1-indexed.
    pub day: u32,
    pub avg_view_count: u64,
}

/// Dense expected-view curve for one cohort: exactly one bucket per integer
/// day in `[1, max_days]`, no gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trajectory {
    pub days: Vec<DayBucket>,
}

impl Trajectory {
    /// Expected view count at `day`, falling back to 0 outside the
    /// computed range.
    pub fn expected_views(&self, day: i64) -> u64 {
        if day < 1 || day > self.days.len() as i64 {
            return 0;
        }
        self.days[(day - 1) as usize].avg_view_count
    }

    /// Wide pivoted form for tabular display: one `"{day}일차"` label per
    /// column, one row of values.
    pub fn pivot(&self) -> Vec<(String, u64)> {
        self.days
            .iter()
            .map(|b| (format!("{}일차", b.day), b.avg_view_count))
            .collect()
    }
}

/// Compute the expected view curve for `series` restricted to `cohort`.
pub fn avg_view_trajectory(series: &[Snapshot], max_days: u32, cohort: CohortFilter) -> Trajectory {
    // Stage 1: per-(video, day) snapshot average. Multiple same-day
    // snapshots of one video collapse to their mean.
    let mut per_video_day: BTreeMap<(&str, u32), (f64, u32)> = BTreeMap::new();
    for snapshot in series {
        let day = snapshot.day_since_pub();
        if day < 1 || day > max_days as i64 || !cohort.matches(snapshot) {
            continue;
        }
        let entry = per_video_day
            .entry((snapshot.video_id.as_str(), day as u32))
            .or_insert((0.0, 0));
        entry.0 += snapshot.view_count as f64;
        entry.1 += 1;
    }

    // Stage 2: per-day average across videos present on that day.
    let mut per_day: BTreeMap<u32, (f64, u32)> = BTreeMap::new();
    for ((_video, day), (sum, count)) in &per_video_day {
        let video_avg = sum / *count as f64;
        let entry = per_day.entry(*day).or_insert((0.0, 0));
        entry.0 += video_avg;
        entry.1 += 1;
    }

    // Dense table with a hole per unobserved day.
    let mut values: Vec<Option<f64>> = (1..=max_days)
        .map(|day| per_day.get(&day).map(|(sum, count)| sum / *count as f64))
        .collect();

    interpolate_linear(&mut values);
    fill_backward(&mut values);
    fill_forward(&mut values);

    let days = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let filled = v.filter(|x| x.is_finite()).unwrap_or(0.0);
            DayBucket {
                day: i as u32 + 1,
                avg_view_count: filled.round().max(0.0) as u64,
            }
        })
        .collect();

    Trajectory { days }
}

/// Fill interior gaps by linear interpolation between the nearest known
/// neighbors. Leading/trailing gaps are left untouched.
fn interpolate_linear(values: &mut [Option<f64>]) {
    let mut prev_known: Option<usize> = None;

    for i in 0..values.len() {
        if values[i].is_none() {
            continue;
        }
        if let Some(p) = prev_known {
            if i - p > 1 {
                let v0 = values[p].unwrap_or(0.0);
                let v1 = values[i].unwrap_or(0.0);
                let span = (i - p) as f64;
                for k in (p + 1)..i {
                    values[k] = Some(v0 + (v1 - v0) * (k - p) as f64 / span);
                }
            }
        }
        prev_known = Some(i);
    }
}

/// Fill leading gaps from the first known value.
fn fill_backward(values: &mut [Option<f64>]) {
    if let Some(first_known) = values.iter().position(|v| v.is_some()) {
        let fill = values[first_known];
        for value in values[..first_known].iter_mut() {
            *value = fill;
        }
    }
}

/// Fill trailing gaps from the last known value.
fn fill_forward(values: &mut [Option<f64>]) {
    if let Some(last_known) = values.iter().rposition(|v| v.is_some()) {
        let fill = values[last_known];
        for value in values[last_known + 1..].iter_mut() {
            *value = fill;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolation_fills_interior_gap() {
        let mut values = vec![Some(100.0), None, Some(300.0)];
        interpolate_linear(&mut values);
        assert_eq!(values[1], Some(200.0));
    }

    #[test]
    fn boundary_fills_use_nearest_known() {
        let mut values = vec![None, Some(50.0), Some(60.0), None];
        interpolate_linear(&mut values);
        fill_backward(&mut values);
        fill_forward(&mut values);
        assert_eq!(values, vec![Some(50.0), Some(50.0), Some(60.0), Some(60.0)]);
    }

    #[test]
    fn all_unknown_stays_unknown_until_final_zero_fill() {
        let mut values: Vec<Option<f64>> = vec![None, None];
        interpolate_linear(&mut values);
        fill_backward(&mut values);
        fill_forward(&mut values);
        assert_eq!(values, vec![None, None]);
    }
}
