// Unit tests for the temporal normalizer.
//
// Covers the two admissible timestamp shapes (UTC-marked ISO-8601 and
// local wall-clock), the unparsable-value warning path, normalization
// idempotence, and the 1-indexed day bucketing rule.

use chrono::{FixedOffset, NaiveDate};
use vpi::analytics::temporal::{day_since_pub, parse_mixed_timestamp, parse_mixed_timestamps};

fn seoul() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap()
}

// ============================================================
// Mixed-shape parsing
// ============================================================

#[test]
fn utc_marked_value_shifts_and_drops_the_zone() {
    let dt = parse_mixed_timestamp("2025-06-21T10:00:50Z", seoul()).unwrap();
    assert_eq!(dt.to_string(), "2025-06-21 19:00:50");
}

#[test]
fn local_value_parses_literally() {
    let dt = parse_mixed_timestamp("2025-06-20 17:00", seoul()).unwrap();
    assert_eq!(dt.to_string(), "2025-06-20 17:00:00");
}

#[test]
fn mixed_batch_produces_the_documented_wall_clocks() {
    let parsed = parse_mixed_timestamps(&["2025-06-21T10:00:50Z", "2025-06-20 17:00"], seoul());
    assert_eq!(parsed.values[0].unwrap().to_string(), "2025-06-21 19:00:50");
    assert_eq!(parsed.values[1].unwrap().to_string(), "2025-06-20 17:00:00");
    assert!(!parsed.has_warnings());
}

#[test]
fn utc_shift_can_cross_a_date_boundary() {
    let dt = parse_mixed_timestamp("2025-06-21T20:30:00Z", seoul()).unwrap();
    assert_eq!(dt.to_string(), "2025-06-22 05:30:00");
}

#[test]
fn different_offset_shifts_differently() {
    let utc = FixedOffset::east_opt(0).unwrap();
    let dt = parse_mixed_timestamp("2025-06-21T10:00:50Z", utc).unwrap();
    assert_eq!(dt.to_string(), "2025-06-21 10:00:50");
}

// ============================================================
// Unparsable values — warning, not failure
// ============================================================

#[test]
fn unparsable_value_becomes_none_and_is_reported() {
    let parsed = parse_mixed_timestamps(&["2025/06/21", "2025-06-20 17:00"], seoul());
    assert_eq!(parsed.values[0], None);
    assert!(parsed.values[1].is_some());
    assert!(parsed.has_warnings());
    assert!(parsed.unparsable.contains("2025/06/21"));
}

#[test]
fn duplicate_unparsable_values_are_reported_once() {
    let parsed = parse_mixed_timestamps(&["junk", "junk", "junk"], seoul());
    assert_eq!(parsed.values.iter().filter(|v| v.is_none()).count(), 3);
    assert_eq!(parsed.unparsable.len(), 1);
}

#[test]
fn empty_string_is_unparsable() {
    assert_eq!(parse_mixed_timestamp("", seoul()), None);
}

// ============================================================
// Idempotence
// ============================================================

#[test]
fn normalizing_an_already_normalized_instant_is_a_noop() {
    let once = parse_mixed_timestamp("2025-06-21T10:00:50Z", seoul()).unwrap();
    // An already-normalized instant renders in the local shape; feeding it
    // back through the normalizer must not shift it again.
    let rendered = once.format("%Y-%m-%d %H:%M:%S").to_string();
    let twice = parse_mixed_timestamp(&rendered, seoul()).unwrap();
    assert_eq!(once, twice);
}

// ============================================================
// Day bucketing — publish day is day 1
// ============================================================

#[test]
fn publish_instant_is_day_one() {
    let published = NaiveDate::from_ymd_opt(2025, 6, 20)
        .unwrap()
        .and_hms_opt(17, 0, 0)
        .unwrap();
    assert_eq!(day_since_pub(published, published), 1);
}

#[test]
fn partial_days_floor_into_the_current_bucket() {
    let published = NaiveDate::from_ymd_opt(2025, 6, 20)
        .unwrap()
        .and_hms_opt(17, 0, 0)
        .unwrap();
    // 23h59m later is still day 1; 24h later starts day 2.
    let almost_a_day = published + chrono::Duration::minutes(24 * 60 - 1);
    let full_day = published + chrono::Duration::days(1);
    assert_eq!(day_since_pub(almost_a_day, published), 1);
    assert_eq!(day_since_pub(full_day, published), 2);
}
