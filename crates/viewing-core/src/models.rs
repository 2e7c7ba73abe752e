use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};

/// Start-time column(s) of a raw export row.
///
/// Newer exports carry a single `Start Time` column; some tools re-export the
/// history with the date and the clock time in separate columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawStartTime {
    /// `YYYY-MM-DD HH:MM:SS`.
    Combined(String),
    /// Date (`YYYY-MM-DD`) and clock time (`HH:MM:SS`) as separate strings.
    Split { date: String, time: String },
}

/// One playback session exactly as it appears in the export.
///
/// Only the columns the pipeline reads are kept; bookmarks, attributes,
/// supplemental video type and country are dropped at the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    /// Profile that played the title. Used only for driver-level filtering.
    pub profile_name: Option<String>,
    pub start: RawStartTime,
    /// Title as exported, often `"Show: Season 1: Episode"`.
    pub title: String,
    /// `HH:MM:SS` or a bare number of minutes.
    pub duration: String,
    /// Device description, e.g. `"Apple iPhone 13 Pro Max"`.
    pub device_type: String,
}

impl RawRecord {
    /// Build a record with a combined start-time string and no profile.
    pub fn new(
        start_time: impl Into<String>,
        title: impl Into<String>,
        duration: impl Into<String>,
        device_type: impl Into<String>,
    ) -> Self {
        Self {
            profile_name: None,
            start: RawStartTime::Combined(start_time.into()),
            title: title.into(),
            duration: duration.into(),
            device_type: device_type.into(),
        }
    }

    /// Attach a profile name.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile_name = Some(profile.into());
        self
    }
}

/// A normalised, retained playback session.
///
/// Invariant: `duration` is strictly greater than the noise threshold
/// (one minute by default).
///
/// `series_title` is the part of the raw title before the first colon, so
/// unrelated titles that share such a prefix collapse into one key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    pub series_title: String,
    /// Start of the session in the configured time zone.
    pub start: NaiveDateTime,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub weekday: Weekday,
    pub duration: TimeDelta,
    /// First two whitespace-separated tokens of the raw device string.
    pub device: String,
}

impl WatchEvent {
    /// Build an event from its start timestamp, deriving the calendar parts.
    pub fn new(
        series_title: impl Into<String>,
        start: NaiveDateTime,
        duration: TimeDelta,
        device: impl Into<String>,
    ) -> Self {
        Self {
            series_title: series_title.into(),
            start,
            year: start.year(),
            month: start.month(),
            day: start.day(),
            weekday: start.weekday(),
            duration,
            device: device.into(),
        }
    }

    /// Calendar date the session started on.
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn duration_seconds(&self) -> i64 {
        self.duration.num_seconds()
    }
}

/// Total watch time for one title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowWatchTime {
    pub title: String,
    pub hours_watched: f64,
}

/// One row of the binge ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BingeEntry {
    pub title: String,
    /// Every retained session of the title.
    pub total_episodes_watched: usize,
    /// Highest number of sessions of the title on a single calendar date.
    pub max_episodes_in_single_day: usize,
    /// Hours watched per calendar date on which the title was watched at all.
    pub avg_hours_per_day: f64,
}

/// Number of sessions played on one device class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceCount {
    pub device: String,
    pub count: usize,
}

/// Watch time on one weekday and its share of the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayShare {
    /// Full English weekday name, e.g. `"Monday"`.
    pub weekday: String,
    pub hours_watched: f64,
    pub percent_of_total: f64,
}

/// The bundle handed to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateResult {
    pub total_hours_watched: f64,
    pub unique_title_count: usize,
    pub total_event_count: usize,
    pub top_shows_by_duration: Vec<ShowWatchTime>,
    pub binge_ranking: Vec<BingeEntry>,
    pub device_distribution: Vec<DeviceCount>,
    pub weekday_distribution: Vec<WeekdayShare>,
}

impl AggregateResult {
    /// `true` when no events survived normalisation.
    pub fn is_empty(&self) -> bool {
        self.total_event_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_watch_event_derives_calendar_parts() {
        let event = WatchEvent::new(
            "Dark",
            ts("2023-03-05 21:15:00"),
            TimeDelta::minutes(50),
            "Sony PS5",
        );
        assert_eq!(event.year, 2023);
        assert_eq!(event.month, 3);
        assert_eq!(event.day, 5);
        assert_eq!(event.weekday, Weekday::Sun);
        assert_eq!(event.date(), NaiveDate::from_ymd_opt(2023, 3, 5).unwrap());
        assert_eq!(event.duration_seconds(), 3000);
    }

    #[test]
    fn test_raw_record_builder() {
        let record = RawRecord::new(
            "2023-01-01 10:00:00",
            "Dark: Secrets",
            "00:51:02",
            "Sony PS5",
        )
        .with_profile("Alex");
        assert_eq!(record.profile_name.as_deref(), Some("Alex"));
        assert_eq!(
            record.start,
            RawStartTime::Combined("2023-01-01 10:00:00".to_string())
        );
    }

    #[test]
    fn test_aggregate_result_serialises_camel_case() {
        let result = AggregateResult {
            total_hours_watched: 1.5,
            unique_title_count: 1,
            total_event_count: 2,
            top_shows_by_duration: vec![ShowWatchTime {
                title: "Dark".to_string(),
                hours_watched: 1.5,
            }],
            ..Default::default()
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["totalHoursWatched"], 1.5);
        assert_eq!(json["uniqueTitleCount"], 1);
        assert_eq!(json["totalEventCount"], 2);
        assert_eq!(json["topShowsByDuration"][0]["hoursWatched"], 1.5);
        assert!(json["bingeRanking"].as_array().unwrap().is_empty());
        assert!(json["weekdayDistribution"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_aggregate_result_default_is_empty() {
        assert!(AggregateResult::default().is_empty());
    }
}
