//! Summary statistics and per-title grouping over watch events.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{NaiveDate, TimeDelta};
use viewing_core::error::{Result, StatsError};
use viewing_core::formatting::hours;
use viewing_core::models::WatchEvent;

// ── WatchSummary ──────────────────────────────────────────────────────────────

/// Scalar totals over the whole event set.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchSummary {
    pub total_duration: TimeDelta,
    pub total_hours_watched: f64,
    /// Distinct series titles.
    pub unique_title_count: usize,
    pub total_event_count: usize,
}

// ── Per-title tables ──────────────────────────────────────────────────────────

/// Summed watch time for one title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleDuration {
    pub title: String,
    pub total_duration: TimeDelta,
}

impl TitleDuration {
    pub fn hours_watched(&self) -> f64 {
        hours(self.total_duration)
    }
}

/// Session counts for one title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EpisodeCounts {
    /// Every retained session of the title.
    pub total: usize,
    /// Most sessions of the title on any single calendar date.
    pub max_in_single_day: usize,
}

// ── WatchAggregator ───────────────────────────────────────────────────────────

/// Stateless helper computing totals and per-title groupings.
///
/// Every per-title table is keyed and ordered by title (ascending), which is
/// the group order the ranker falls back on for ties.
pub struct WatchAggregator;

impl WatchAggregator {
    /// Total watch time, distinct titles and event count.
    ///
    /// An empty slice yields zero for every field.
    pub fn summarize(events: &[WatchEvent]) -> Result<WatchSummary> {
        let total = total_duration(events, "all titles")?;
        let titles: BTreeSet<&str> = events.iter().map(|e| e.series_title.as_str()).collect();

        Ok(WatchSummary {
            total_duration: total,
            total_hours_watched: hours(total),
            unique_title_count: titles.len(),
            total_event_count: events.len(),
        })
    }

    /// Summed duration per title.
    pub fn duration_by_title(events: &[WatchEvent]) -> Result<Vec<TitleDuration>> {
        let mut map: BTreeMap<&str, TimeDelta> = BTreeMap::new();
        for event in events {
            let title = event.series_title.as_str();
            let total = map.entry(title).or_insert_with(TimeDelta::zero);
            *total = total
                .checked_add(&event.duration)
                .ok_or_else(|| StatsError::WatchTimeOverflow(title.to_string()))?;
        }

        Ok(map
            .into_iter()
            .map(|(title, total_duration)| TitleDuration {
                title: title.to_string(),
                total_duration,
            })
            .collect())
    }

    /// Total sessions and busiest-day sessions per title.
    pub fn episodes_by_title(events: &[WatchEvent]) -> BTreeMap<String, EpisodeCounts> {
        let mut per_day: HashMap<(&str, NaiveDate), usize> = HashMap::new();
        let mut counts: BTreeMap<String, EpisodeCounts> = BTreeMap::new();

        for event in events {
            let day_count = per_day
                .entry((event.series_title.as_str(), event.date()))
                .or_insert(0);
            *day_count += 1;

            let entry = counts.entry(event.series_title.clone()).or_default();
            entry.total += 1;
            entry.max_in_single_day = entry.max_in_single_day.max(*day_count);
        }

        counts
    }

    /// Hours watched per active day, per title.
    ///
    /// The divisor is the number of distinct calendar dates on which the
    /// title was watched, not the length of the whole history.
    pub fn pace_by_title(events: &[WatchEvent]) -> Result<BTreeMap<String, f64>> {
        let mut groups: BTreeMap<&str, (TimeDelta, BTreeSet<NaiveDate>)> = BTreeMap::new();
        for event in events {
            let title = event.series_title.as_str();
            let (total, days) = groups
                .entry(title)
                .or_insert_with(|| (TimeDelta::zero(), BTreeSet::new()));
            *total = total
                .checked_add(&event.duration)
                .ok_or_else(|| StatsError::WatchTimeOverflow(title.to_string()))?;
            days.insert(event.date());
        }

        Ok(groups
            .into_iter()
            .map(|(title, (total, days))| {
                // A group exists only once it holds an event, so `days` is never empty.
                let pace = hours(total) / days.len() as f64;
                (title.to_string(), pace)
            })
            .collect())
    }
}

fn total_duration(events: &[WatchEvent], scope: &str) -> Result<TimeDelta> {
    events.iter().try_fold(TimeDelta::zero(), |acc, event| {
        acc.checked_add(&event.duration)
            .ok_or_else(|| StatsError::WatchTimeOverflow(scope.to_string()))
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn event(ts: &str, title: &str, minutes: i64) -> WatchEvent {
        WatchEvent::new(
            title,
            NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
            TimeDelta::minutes(minutes),
            "Roku",
        )
    }

    fn max_length_events() -> Vec<WatchEvent> {
        ["2023-01-01 10:00:00", "2023-01-02 10:00:00"]
            .iter()
            .map(|ts| WatchEvent {
                duration: TimeDelta::MAX,
                ..event(ts, "A", 0)
            })
            .collect()
    }

    // ── summarize ─────────────────────────────────────────────────────────────

    #[test]
    fn test_summarize_scenario() {
        let events = vec![
            event("2023-01-01 10:00:00", "A", 5),
            event("2023-01-01 10:10:00", "A", 10),
        ];
        let summary = WatchAggregator::summarize(&events).unwrap();

        assert!((summary.total_hours_watched - 0.25).abs() < 1e-9);
        assert_eq!(summary.unique_title_count, 1);
        assert_eq!(summary.total_event_count, 2);
        assert_eq!(summary.total_duration, TimeDelta::minutes(15));
    }

    #[test]
    fn test_summarize_empty() {
        let summary = WatchAggregator::summarize(&[]).unwrap();
        assert_eq!(summary.total_hours_watched, 0.0);
        assert_eq!(summary.unique_title_count, 0);
        assert_eq!(summary.total_event_count, 0);
    }

    // ── duration_by_title ─────────────────────────────────────────────────────

    #[test]
    fn test_duration_by_title_sums_and_orders_by_title() {
        let events = vec![
            event("2023-01-01 10:00:00", "Ozark", 60),
            event("2023-01-01 12:00:00", "Dark", 30),
            event("2023-01-02 10:00:00", "Ozark", 30),
        ];
        let per_title = WatchAggregator::duration_by_title(&events).unwrap();

        assert_eq!(per_title.len(), 2);
        assert_eq!(per_title[0].title, "Dark");
        assert_eq!(per_title[0].total_duration, TimeDelta::minutes(30));
        assert_eq!(per_title[1].title, "Ozark");
        assert!((per_title[1].hours_watched() - 1.5).abs() < 1e-9);
    }

    // ── episodes_by_title ─────────────────────────────────────────────────────

    #[test]
    fn test_episodes_by_title_total_and_busiest_day() {
        let events = vec![
            event("2023-01-01 10:00:00", "Dark", 50),
            event("2023-01-01 11:00:00", "Dark", 50),
            event("2023-01-01 12:00:00", "Dark", 50),
            event("2023-01-05 20:00:00", "Dark", 50),
            event("2023-01-05 21:00:00", "Ozark", 50),
        ];
        let counts = WatchAggregator::episodes_by_title(&events);

        assert_eq!(
            counts["Dark"],
            EpisodeCounts {
                total: 4,
                max_in_single_day: 3
            }
        );
        assert_eq!(
            counts["Ozark"],
            EpisodeCounts {
                total: 1,
                max_in_single_day: 1
            }
        );
    }

    #[test]
    fn test_episodes_same_day_of_month_different_months_are_distinct() {
        let events = vec![
            event("2023-01-05 10:00:00", "Dark", 50),
            event("2023-02-05 10:00:00", "Dark", 50),
        ];
        let counts = WatchAggregator::episodes_by_title(&events);
        assert_eq!(counts["Dark"].max_in_single_day, 1);
    }

    // ── pace_by_title ─────────────────────────────────────────────────────────

    #[test]
    fn test_pace_divides_by_active_days() {
        let events = vec![
            event("2023-01-01 10:00:00", "Dark", 60),
            event("2023-01-01 11:00:00", "Dark", 60),
            event("2023-01-10 10:00:00", "Dark", 60),
        ];
        let pace = WatchAggregator::pace_by_title(&events).unwrap();
        // 3 hours over 2 active days, regardless of the 9-day gap.
        assert!((pace["Dark"] - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_pace_empty() {
        assert!(WatchAggregator::pace_by_title(&[]).unwrap().is_empty());
    }

    // ── Overflow ──────────────────────────────────────────────────────────────

    #[test]
    fn test_summarize_overflow_is_error() {
        let err = WatchAggregator::summarize(&max_length_events()).unwrap_err();
        assert!(matches!(err, StatsError::WatchTimeOverflow(_)));
    }

    #[test]
    fn test_duration_by_title_overflow_names_title() {
        let err = WatchAggregator::duration_by_title(&max_length_events()).unwrap_err();
        assert!(matches!(err, StatsError::WatchTimeOverflow(ref t) if t == "A"));
    }

    #[test]
    fn test_pace_overflow_is_error() {
        assert!(WatchAggregator::pace_by_title(&max_length_events()).is_err());
    }
}
