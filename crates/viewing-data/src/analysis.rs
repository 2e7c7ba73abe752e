//! Top-level viewing-history pipeline.
//!
//! Loads raw records, normalises them into watch events once, and fans the
//! immutable event set out to the aggregator, ranker and distribution
//! calculator to build an [`AggregateResult`].

use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use viewing_core::error::Result;
use viewing_core::models::{AggregateResult, RawRecord, WatchEvent};
use viewing_core::settings::PipelineConfig;

use crate::aggregator::WatchAggregator;
use crate::distribution::DistributionCalculator;
use crate::normalizer::{NormalizedEvents, RecordNormalizer};
use crate::ranker::WatchRanker;
use crate::reader::load_raw_records;

// ── Public types ──────────────────────────────────────────────────────────────

/// Bookkeeping for one run. Kept apart from [`AggregateResult`] so the
/// result bundle depends on the input alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// RFC 3339 timestamp when this result was generated.
    pub generated_at: String,
    pub files_read: usize,
    pub rows_read: usize,
    /// Rows dropped by the profile filter.
    pub rows_other_profiles: usize,
    /// Rows and records skipped as malformed (lenient mode only).
    pub rows_skipped: usize,
    /// Sessions dropped by the noise filter.
    pub noise_filtered: usize,
    pub events_retained: usize,
    pub load_time_seconds: f64,
    pub transform_time_seconds: f64,
}

/// The complete output of [`analyze_history`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub result: AggregateResult,
    pub metadata: AnalysisMetadata,
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Compute every aggregate from an already-normalised event set.
///
/// Each metric is a pure function of `events`; none of them mutates or
/// reorders the slice. Fails only when summed watch time overflows.
pub fn compute_aggregates(
    events: &[WatchEvent],
    config: &PipelineConfig,
) -> Result<AggregateResult> {
    // Checked first: once the grand total fits, every per-group sum does too.
    let summary = WatchAggregator::summarize(events)?;

    let per_title = WatchAggregator::duration_by_title(events)?;
    let top_shows_by_duration = WatchRanker::top_shows_by_duration(&per_title, config.top_shows);
    let binge_ranking = WatchRanker::binge_ranking(
        &top_shows_by_duration,
        &WatchAggregator::episodes_by_title(events),
        &WatchAggregator::pace_by_title(events)?,
    );

    Ok(AggregateResult {
        total_hours_watched: summary.total_hours_watched,
        unique_title_count: summary.unique_title_count,
        total_event_count: summary.total_event_count,
        top_shows_by_duration,
        binge_ranking,
        device_distribution: DistributionCalculator::device_distribution(
            events,
            config.top_devices,
        ),
        weekday_distribution: DistributionCalculator::weekday_distribution(events),
    })
}

/// Normalise `records` and compute the result bundle.
pub fn run_pipeline(records: &[RawRecord], config: &PipelineConfig) -> Result<AggregateResult> {
    let normalized = normalize(records, config)?;
    compute_aggregates(&normalized.events, config)
}

/// Keep only the rows played by `profile`. Rows without a profile column
/// are dropped as well.
pub fn filter_by_profile(records: Vec<RawRecord>, profile: &str) -> Vec<RawRecord> {
    records
        .into_iter()
        .filter(|r| r.profile_name.as_deref() == Some(profile))
        .collect()
}

/// Run the full pipeline against an export file or directory.
///
/// 1. Load raw rows from `path`.
/// 2. Apply the optional profile filter.
/// 3. Normalise into watch events.
/// 4. Compute the result bundle.
pub fn analyze_history(
    path: &Path,
    profile: Option<&str>,
    config: &PipelineConfig,
) -> Result<AnalysisResult> {
    config.validate()?;

    // ── Step 1: Load ──────────────────────────────────────────────────────────
    let load_start = std::time::Instant::now();
    let loaded = load_raw_records(path, config.parse_mode)?;
    let load_time = load_start.elapsed().as_secs_f64();

    // ── Step 2: Profile filter ────────────────────────────────────────────────
    let before = loaded.records.len();
    let records = match profile {
        Some(p) => filter_by_profile(loaded.records, p),
        None => loaded.records,
    };
    let rows_other_profiles = before - records.len();

    // ── Step 3 + 4: Normalise and aggregate ───────────────────────────────────
    let transform_start = std::time::Instant::now();
    let normalized = normalize(&records, config)?;
    let result = compute_aggregates(&normalized.events, config)?;
    let transform_time = transform_start.elapsed().as_secs_f64();

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        files_read: loaded.files_read,
        rows_read: loaded.rows_read,
        rows_other_profiles,
        rows_skipped: loaded.rows_skipped + normalized.skipped,
        noise_filtered: normalized.filtered,
        events_retained: normalized.events.len(),
        load_time_seconds: load_time,
        transform_time_seconds: transform_time,
    };

    info!(
        "Analysed {} rows from {} file(s): {} events retained, {} noise, {} skipped",
        metadata.rows_read,
        metadata.files_read,
        metadata.events_retained,
        metadata.noise_filtered,
        metadata.rows_skipped,
    );

    Ok(AnalysisResult { result, metadata })
}

// ── Private helpers ───────────────────────────────────────────────────────────

fn normalize(records: &[RawRecord], config: &PipelineConfig) -> Result<NormalizedEvents> {
    RecordNormalizer::from_config(config).normalize_all(records, config.parse_mode)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
