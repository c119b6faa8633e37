//! Timestamp normalization for the feed's loosely formatted timestamps.
//!
//! Feed timestamps arrive in several shapes: `2025-12-18T19:11:09.123456+09:00`,
//! `2025-12-18T19:11:09Z`, or already-bare `2025-12-18 19:11:09`. Normalization
//! strips the fractional seconds and any zone suffix, then reads the remaining
//! wall-clock digits in the service's home zone (KST). The embedded offset is
//! discarded rather than converted; the service emits KST, so the digits are
//! already in the home zone.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Timelike, Utc};

/// The service's home zone, UTC+9. KST has no DST, so a fixed offset is exact.
const HOME_ZONE_SECS: i32 = 9 * 3600;

const PATTERN: &str = "%Y-%m-%d %H:%M:%S";
const PATTERN_LEN: usize = 19;

fn home_zone() -> FixedOffset {
    FixedOffset::east_opt(HOME_ZONE_SECS).expect("offset in range")
}

/// Sentinel instant for unparsable timestamps. Sorts last under the
/// newest-first ordering.
#[must_use]
pub const fn zero_instant() -> DateTime<Utc> {
    DateTime::UNIX_EPOCH
}

/// Whether `instant` is the unparsable-timestamp sentinel.
#[must_use]
pub fn is_zero(instant: DateTime<Utc>) -> bool {
    instant == zero_instant()
}

/// Normalize a raw feed timestamp to a UTC instant. Never fails; null-ish,
/// short, or malformed input maps to [`zero_instant`].
#[must_use]
pub fn normalize(raw: &str) -> DateTime<Utc> {
    if raw.len() < PATTERN_LEN {
        return zero_instant();
    }

    // Drop fractional seconds, then everything past the fixed-width prefix.
    // Zone suffixes (`+09:00`, `Z`, ...) start exactly there.
    let stripped = raw.split('.').next().unwrap_or(raw).replace('T', " ");
    let Some(prefix) = stripped.get(..PATTERN_LEN) else {
        return zero_instant();
    };

    NaiveDateTime::parse_from_str(prefix, PATTERN).map_or_else(
        |_| zero_instant(),
        |naive| match home_zone().from_local_datetime(&naive) {
            chrono::LocalResult::Single(instant) => instant.with_timezone(&Utc),
            _ => zero_instant(),
        },
    )
}

/// Render a feed timestamp as the 12-hour clock string shown on the dashboard,
/// e.g. `오전 07:05`. Empty when the timestamp is unparsable.
#[must_use]
pub fn clock_label(raw: &str) -> String {
    let instant = normalize(raw);
    if is_zero(instant) {
        return String::new();
    }

    let local = instant.with_timezone(&home_zone());
    let meridiem = if local.hour() < 12 { "오전" } else { "오후" };
    let hour12 = match local.hour() % 12 {
        0 => 12,
        hour => hour,
    };
    format!("{meridiem} {hour12:02}:{:02}", local.minute())
}
