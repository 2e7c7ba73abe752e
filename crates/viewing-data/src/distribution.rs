//! Categorical breakdowns of the event set.

use std::collections::HashMap;

use viewing_core::formatting::{percent_of, SECONDS_PER_HOUR};
use viewing_core::models::{DeviceCount, WatchEvent, WeekdayShare};
use viewing_core::time_utils::{weekday_name, WEEKDAYS};

/// Computes device and weekday distributions.
pub struct DistributionCalculator;

impl DistributionCalculator {
    /// Sessions per device class, the `limit` most used first.
    ///
    /// Devices with equal counts keep the order in which they first appear
    /// in `events`.
    pub fn device_distribution(events: &[WatchEvent], limit: usize) -> Vec<DeviceCount> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut counts: Vec<DeviceCount> = Vec::new();

        for event in events {
            match index.get(event.device.as_str()) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(event.device.as_str(), counts.len());
                    counts.push(DeviceCount {
                        device: event.device.clone(),
                        count: 1,
                    });
                }
            }
        }

        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts.truncate(limit);
        counts
    }

    /// Watch time per weekday and its share of the total.
    ///
    /// Only weekdays that occur in `events` are listed, Monday first. The
    /// percentages sum to 100 whenever any time was watched; an empty event
    /// set yields an empty list.
    pub fn weekday_distribution(events: &[WatchEvent]) -> Vec<WeekdayShare> {
        let mut seconds = [0_i64; 7];
        let mut present = [false; 7];
        for event in events {
            let i = event.weekday.num_days_from_monday() as usize;
            seconds[i] += event.duration_seconds();
            present[i] = true;
        }

        let total: i64 = seconds.iter().sum();

        WEEKDAYS
            .iter()
            .enumerate()
            .filter(|(i, _)| present[*i])
            .map(|(i, day)| WeekdayShare {
                weekday: weekday_name(*day).to_string(),
                hours_watched: seconds[i] as f64 / SECONDS_PER_HOUR,
                percent_of_total: percent_of(seconds[i] as f64, total as f64),
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
