//! Ordered top-N views over the per-title tables.

use std::collections::BTreeMap;

use viewing_core::models::{BingeEntry, ShowWatchTime};

use crate::aggregator::{EpisodeCounts, TitleDuration};

/// Builds the watch-time and binge rankings.
pub struct WatchRanker;

impl WatchRanker {
    /// The `limit` titles with the most watch time, longest first.
    ///
    /// The sort is stable, so titles with equal watch time keep the order of
    /// `per_title` (ascending title when it comes from the aggregator).
    pub fn top_shows_by_duration(per_title: &[TitleDuration], limit: usize) -> Vec<ShowWatchTime> {
        let mut ranked: Vec<&TitleDuration> = per_title.iter().collect();
        ranked.sort_by(|a, b| b.total_duration.cmp(&a.total_duration));

        ranked
            .into_iter()
            .take(limit)
            .map(|t| ShowWatchTime {
                title: t.title.clone(),
                hours_watched: t.hours_watched(),
            })
            .collect()
    }

    /// Of the most-watched titles, which were binged hardest.
    ///
    /// Joins episode counts and pace onto `top_shows` by title (inner join: a
    /// title missing from either table is dropped), then stable-sorts by
    /// total episodes watched, most first. The result never contains a title
    /// that is not already in `top_shows`.
    pub fn binge_ranking(
        top_shows: &[ShowWatchTime],
        episodes: &BTreeMap<String, EpisodeCounts>,
        pace: &BTreeMap<String, f64>,
    ) -> Vec<BingeEntry> {
        let mut ranked: Vec<BingeEntry> = top_shows
            .iter()
            .filter_map(|show| {
                let counts = episodes.get(&show.title)?;
                let avg_hours_per_day = *pace.get(&show.title)?;
                Some(BingeEntry {
                    title: show.title.clone(),
                    total_episodes_watched: counts.total,
                    max_episodes_in_single_day: counts.max_in_single_day,
                    avg_hours_per_day,
                })
            })
            .collect();

        ranked.sort_by(|a, b| b.total_episodes_watched.cmp(&a.total_episodes_watched));
        ranked
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
