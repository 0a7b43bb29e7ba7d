use chrono::{DateTime, Datelike, Local, TimeZone, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

/// Relative label such as `5m ago` for `then`, as seen from `now`.
///
/// Anything a week or older falls back to a local `M/D/YYYY` date.
/// Timestamps in the future count as `0s ago`.
#[must_use]
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    time_ago_in(then, now, &Local)
}

/// `time_ago` with the date fallback rendered in `tz`.
#[must_use]
pub fn time_ago_in<Tz: TimeZone>(then: DateTime<Utc>, now: DateTime<Utc>, tz: &Tz) -> String {
    let seconds = (now - then).num_seconds().max(0);
    if seconds < MINUTE {
        format!("{seconds}s ago")
    } else if seconds < HOUR {
        format!("{}m ago", seconds / MINUTE)
    } else if seconds < DAY {
        format!("{}h ago", seconds / HOUR)
    } else if seconds < WEEK {
        format!("{}d ago", seconds / DAY)
    } else {
        format_date_in(then, tz)
    }
}

/// Short numeric date, month first without padding.
#[must_use]
pub fn format_date_in<Tz: TimeZone>(value: DateTime<Utc>, tz: &Tz) -> String {
    let local = value.with_timezone(tz);
    format!("{}/{}/{}", local.month(), local.day(), local.year())
}
