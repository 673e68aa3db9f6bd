// Temporal normalizer — mixed-format timestamps to one local-naive shape.
//
// The feed mixes two timestamp shapes: ISO-8601 with an explicit UTC
// marker ("2025-06-21T10:00:50Z") and local wall-clock strings
// ("2025-06-20 17:00") that are already in the target zone. The first
// kind is converted (parse as UTC, shift into the local zone, drop the
// marker — the wall-clock value changes); the second is parsed literally.
// Double-converting the already-local values would silently skew every
// derived metric, which is why this lives in one place.

use std::collections::BTreeSet;

use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

/// Result of normalizing a batch of raw timestamp strings.
///
/// Unparsable entries become `None` and their distinct originals are
/// collected so the caller can surface one warning instead of failing
/// the whole computation.
#[derive(Debug, Clone, Default)]
pub struct ParsedTimestamps {
    pub values: Vec<Option<NaiveDateTime>>,
    pub unparsable: BTreeSet<String>,
}

impl ParsedTimestamps {
    pub fn has_warnings(&self) -> bool {
        !self.unparsable.is_empty()
    }
}

/// Parse one raw timestamp into a local-naive instant.
///
/// Returns `None` for anything matching neither admissible shape.
pub fn parse_mixed_timestamp(raw: &str, local_offset: FixedOffset) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();

    // Shape (a): ISO-8601 with a UTC marker. Parse as an absolute instant,
    // shift into the local zone, then strip the zone.
    if trimmed.ends_with('Z') {
        return DateTime::parse_from_rfc3339(trimmed)
            .ok()
            .map(|dt| dt.with_timezone(&Utc).with_timezone(&local_offset).naive_local());
    }

    // Shape (b): local wall-clock, already in the target zone. No shift.
    // Seconds are optional so re-normalizing an already-normalized value
    // is a no-op.
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M"))
        .ok()
}

/// Normalize a batch of raw timestamps, collecting unparsable originals.
pub fn parse_mixed_timestamps(raw: &[&str], local_offset: FixedOffset) -> ParsedTimestamps {
    let mut out = ParsedTimestamps {
        values: Vec::with_capacity(raw.len()),
        unparsable: BTreeSet::new(),
    };

    for &value in raw {
        match parse_mixed_timestamp(value, local_offset) {
            Some(dt) => out.values.push(Some(dt)),
            None => {
                out.unparsable.insert(value.to_string());
                out.values.push(None);
            }
        }
    }

    out
}

/// Integer days-since-publish for a (timestamp, published_at) pair.
/// The publish day is day 1.
pub fn day_since_pub(timestamp: NaiveDateTime, published_at: NaiveDateTime) -> i64 {
    (timestamp - published_at).num_days() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seoul() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    #[test]
    fn iso_utc_shifts_into_local_zone() {
        let dt = parse_mixed_timestamp("2025-06-21T10:00:50Z", seoul()).unwrap();
        assert_eq!(dt.to_string(), "2025-06-21 19:00:50");
    }

    #[test]
    fn local_shape_is_not_shifted() {
        let dt = parse_mixed_timestamp("2025-06-20 17:00", seoul()).unwrap();
        assert_eq!(dt.to_string(), "2025-06-20 17:00:00");
    }

    #[test]
    fn garbage_is_collected_not_dropped() {
        let parsed = parse_mixed_timestamps(&["not-a-date", "2025-06-20 17:00"], seoul());
        assert_eq!(parsed.values[0], None);
        assert!(parsed.values[1].is_some());
        assert!(parsed.unparsable.contains("not-a-date"));
    }
}
