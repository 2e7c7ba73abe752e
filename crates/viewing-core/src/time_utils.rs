use chrono::{NaiveDateTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use tracing::debug;

use crate::error::{Result, StatsError};

/// Calendar order used for weekday breakdowns.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

/// Resolve a user-supplied zone name into a [`Tz`].
///
/// `"auto"` (any case) means the system zone. Unknown names are an error,
/// never a UTC fallback.
pub fn resolve_timezone(name: &str) -> Result<Tz> {
    let name = if name.eq_ignore_ascii_case("auto") {
        let detected = get_system_timezone();
        debug!("Resolved automatic timezone to {}", detected);
        detected
    } else {
        name.to_string()
    };

    name.parse::<Tz>()
        .map_err(|_| StatsError::InvalidTimezone(name.clone()))
}

/// Convert a naive UTC timestamp to wall-clock time in `tz`.
pub fn utc_to_local(naive_utc: NaiveDateTime, tz: Tz) -> NaiveDateTime {
    Utc.from_utc_datetime(&naive_utc)
        .with_timezone(&tz)
        .naive_local()
}

/// Full English name of a weekday, e.g. `"Wednesday"`.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
