//! Plain-text and JSON rendering of the result bundle.

use std::fmt::Write as _;
use std::path::Path;

use viewing_core::error::{Result, StatsError};
use viewing_core::formatting::{format_hours, format_number, format_percent};
use viewing_core::models::AggregateResult;
use viewing_core::settings::OutputFormat;

/// Render `result` in the requested format.
pub fn render(result: &AggregateResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(result)?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Text => Ok(render_text(result)),
    }
}

/// Write the rendered report to `output`, or stdout when `None`.
pub fn write_report(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => std::fs::write(path, content).map_err(|source| StatsError::FileWrite {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            use std::io::Write;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

/// Summary cards followed by one table per ranking or distribution.
pub fn render_text(result: &AggregateResult) -> String {
    let mut out = String::new();

    // `write!` into a String cannot fail.
    let _ = writeln!(out, "Viewing Statistics");
    let _ = writeln!(out, "==================");
    let _ = writeln!(
        out,
        "Hours watched:        {}",
        format_hours(result.total_hours_watched)
    );
    let _ = writeln!(
        out,
        "Total content watched: {}",
        format_number(result.total_event_count as f64, 0)
    );
    let _ = writeln!(
        out,
        "Unique content:       {}",
        format_number(result.unique_title_count as f64, 0)
    );

    if result.is_empty() {
        let _ = writeln!(out, "\nNo viewing sessions longer than a minute were found.");
        return out;
    }

    section(&mut out, "Top shows by watch time");
    let width = title_width(result.top_shows_by_duration.iter().map(|s| s.title.as_str()));
    for (rank, show) in result.top_shows_by_duration.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {:<width$}  {:>10} h",
            rank + 1,
            show.title,
            format_hours(show.hours_watched),
        );
    }

    section(&mut out, "Top binged shows");
    let width = title_width(result.binge_ranking.iter().map(|b| b.title.as_str()));
    let _ = writeln!(
        out,
        "    {:<width$}  {:>8}  {:>11}  {:>9}",
        "Title", "Episodes", "Max per day", "Avg h/day",
    );
    for (rank, binge) in result.binge_ranking.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {:<width$}  {:>8}  {:>11}  {:>9}",
            rank + 1,
            binge.title,
            binge.total_episodes_watched,
            binge.max_episodes_in_single_day,
            format_hours(binge.avg_hours_per_day),
        );
    }

    section(&mut out, "Most used devices");
    let width = title_width(result.device_distribution.iter().map(|d| d.device.as_str()));
    for device in &result.device_distribution {
        let _ = writeln!(out, "    {:<width$}  {:>6}", device.device, device.count);
    }

    section(&mut out, "Watch time by weekday");
    for day in &result.weekday_distribution {
        let _ = writeln!(
            out,
            "    {:<9}  {:>10} h  {:>6}",
            day.weekday,
            format_hours(day.hours_watched),
            format_percent(day.percent_of_total),
        );
    }

    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}\n{}", title, "-".repeat(title.len()));
}

fn title_width<'a>(titles: impl Iterator<Item = &'a str>) -> usize {
    titles.map(|t| t.chars().count()).max().unwrap_or(0).max(5)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use viewing_core::models::{BingeEntry, DeviceCount, ShowWatchTime, WeekdayShare};

    fn sample() -> AggregateResult {
        AggregateResult {
            total_hours_watched: 1234.5,
            unique_title_count: 2,
            total_event_count: 1500,
            top_shows_by_duration: vec![
                ShowWatchTime {
                    title: "Dark".to_string(),
                    hours_watched: 20.5,
                },
                ShowWatchTime {
                    title: "Ozark".to_string(),
                    hours_watched: 10.25,
                },
            ],
            binge_ranking: vec![BingeEntry {
                title: "Dark".to_string(),
                total_episodes_watched: 26,
                max_episodes_in_single_day: 6,
                avg_hours_per_day: 2.5,
            }],
            device_distribution: vec![DeviceCount {
                device: "Apple iPhone".to_string(),
                count: 1500,
            }],
            weekday_distribution: vec![WeekdayShare {
                weekday: "Friday".to_string(),
                hours_watched: 1234.5,
                percent_of_total: 100.0,
            }],
        }
    }

    #[test]
    fn test_render_text_contains_sections() {
        let text = render_text(&sample());
        assert!(text.contains("Hours watched:        1,234.50"));
        assert!(text.contains("Total content watched: 1,500"));
        assert!(text.contains("Top shows by watch time"));
        assert!(text.contains(" 1. Dark"));
        assert!(text.contains("Apple iPhone"));
        assert!(text.contains("Friday"));
        assert!(text.contains("100.0%"));
    }

    #[test]
    fn test_render_text_empty() {
        let text = render_text(&AggregateResult::default());
        assert!(text.contains("Hours watched:        0.00"));
        assert!(text.contains("No viewing sessions"));
        assert!(!text.contains("Top shows"));
    }

    #[test]
    fn test_render_json_round_trips() {
        let json = render(&sample(), OutputFormat::Json).unwrap();
        let parsed: AggregateResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample());
        assert!(json.contains("\"bingeRanking\""));
    }

    #[test]
    fn test_write_report_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.txt");
        write_report("hello\n", Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_write_report_bad_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("report.txt");
        let err = write_report("x", Some(&path)).unwrap_err();
        assert!(matches!(err, StatsError::FileWrite { .. }));
        assert!(err.to_string().starts_with("Failed to write file"));
    }
}
