use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use regex::Regex;

use crate::error::{Result, StatsError};
use crate::models::RawStartTime;

// ── TitleNormalizer ───────────────────────────────────────────────────────────

/// Collapses episode titles onto their series.
pub struct TitleNormalizer;

impl TitleNormalizer {
    /// Keep everything before the first colon, trimmed.
    ///
    /// `"Show Name: Season 1: Pilot"` becomes `"Show Name"`; a title without a
    /// colon is returned trimmed but otherwise unchanged.
    pub fn series_title(raw: &str) -> String {
        raw.split(':').next().unwrap_or(raw).trim().to_string()
    }
}

// ── DeviceNormalizer ──────────────────────────────────────────────────────────

/// Reduces long device descriptions to a short device class.
pub struct DeviceNormalizer;

impl DeviceNormalizer {
    /// Keep the first two whitespace-separated tokens, joined by one space.
    ///
    /// `"Apple iPhone 13 Pro"` becomes `"Apple iPhone"`; `"Chromecast"` stays
    /// as it is.
    pub fn device_class(raw: &str) -> String {
        raw.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
    }
}

// ── TimestampParser ───────────────────────────────────────────────────────────

/// Parses the start-time column(s) of an export row.
pub struct TimestampParser;

impl TimestampParser {
    const DATE_FORMAT: &'static str = "%Y-%m-%d";
    const TIME_FORMAT: &'static str = "%H:%M:%S";

    /// Parse either a combined `YYYY-MM-DD HH:MM:SS` string or a date/time
    /// pair into a naive timestamp (the export records UTC).
    pub fn parse(start: &RawStartTime) -> Result<NaiveDateTime> {
        match start {
            RawStartTime::Combined(s) => Self::parse_combined(s),
            RawStartTime::Split { date, time } => {
                Ok(Self::parse_date(date)?.and_time(Self::parse_time(time)?))
            }
        }
    }

    fn parse_combined(s: &str) -> Result<NaiveDateTime> {
        let trimmed = s.trim();
        let Some((date, time)) = trimmed.split_once(char::is_whitespace) else {
            return Err(StatsError::malformed(
                "start time",
                s,
                "expected \"YYYY-MM-DD HH:MM:SS\"",
            ));
        };
        Ok(Self::parse_date(date)?.and_time(Self::parse_time(time.trim())?))
    }

    /// Decompose `YYYY-MM-DD` into a calendar date.
    pub fn parse_date(s: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(s.trim(), Self::DATE_FORMAT)
            .map_err(|e| StatsError::malformed("date", s, e.to_string()))
    }

    /// Parse `HH:MM:SS` into a clock time.
    pub fn parse_time(s: &str) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(s.trim(), Self::TIME_FORMAT)
            .map_err(|e| StatsError::malformed("time", s, e.to_string()))
    }
}

// ── DurationParser ────────────────────────────────────────────────────────────

/// The two duration encodings found across export variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationFormat {
    /// `HH:MM:SS`, hours unbounded.
    Clock,
    /// Bare integer count of whole minutes.
    Minutes,
}

/// Detects the duration encoding and normalises it to a [`TimeDelta`].
pub struct DurationParser;

impl DurationParser {
    /// Longest single session accepted, in hours.
    pub const MAX_HOURS: i64 = 1_000;

    fn clock_regex() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"^(\d+):(\d{1,2}):(\d{1,2})$").expect("regex is valid"))
    }

    fn minutes_regex() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(r"^\d+$").expect("regex is valid"))
    }

    /// Identify which encoding `s` uses, or `None` for anything else.
    pub fn detect(s: &str) -> Option<DurationFormat> {
        let s = s.trim();
        if Self::clock_regex().is_match(s) {
            Some(DurationFormat::Clock)
        } else if Self::minutes_regex().is_match(s) {
            Some(DurationFormat::Minutes)
        } else {
            None
        }
    }

    /// Parse a duration string into a [`TimeDelta`].
    ///
    /// Unrecognised encodings, minute/second fields of 60 or more, and
    /// sessions longer than [`DurationParser::MAX_HOURS`] are all reported as
    /// [`StatsError::MalformedRecord`].
    pub fn parse(s: &str) -> Result<TimeDelta> {
        let trimmed = s.trim();
        let malformed = |reason: &str| StatsError::malformed("duration", s, reason);

        let seconds: i64 = match Self::detect(trimmed) {
            Some(DurationFormat::Clock) => {
                let caps = Self::clock_regex()
                    .captures(trimmed)
                    .ok_or_else(|| malformed("expected HH:MM:SS"))?;
                let field = |i: usize| -> Result<i64> {
                    caps[i]
                        .parse::<i64>()
                        .map_err(|_| malformed("field out of range"))
                };
                let (hours, minutes, secs) = (field(1)?, field(2)?, field(3)?);
                if minutes >= 60 || secs >= 60 {
                    return Err(malformed("minutes and seconds must be below 60"));
                }
                hours
                    .checked_mul(3600)
                    .and_then(|h| h.checked_add(minutes * 60 + secs))
                    .ok_or_else(|| malformed("duration too large"))?
            }
            Some(DurationFormat::Minutes) => trimmed
                .parse::<i64>()
                .ok()
                .and_then(|m| m.checked_mul(60))
                .ok_or_else(|| malformed("duration too large"))?,
            None => return Err(malformed("expected HH:MM:SS or a whole number of minutes")),
        };

        if seconds > Self::MAX_HOURS * 3600 {
            return Err(malformed("duration exceeds 1000 hours"));
        }
        TimeDelta::try_seconds(seconds).ok_or_else(|| malformed("duration too large"))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
