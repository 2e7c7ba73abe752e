//! Export discovery and CSV loading.
//!
//! Locates viewing-history CSV files (a single file, or every matching file
//! inside an unpacked export archive) and decodes their rows into
//! [`RawRecord`]s for the normaliser.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};
use viewing_core::error::{Result, StatsError};
use viewing_core::models::{RawRecord, RawStartTime};
use viewing_core::settings::ParseMode;

// ── Public types ──────────────────────────────────────────────────────────────

/// Rows read from one or more export files.
#[derive(Debug, Clone, Default)]
pub struct LoadedRecords {
    pub records: Vec<RawRecord>,
    /// Number of files the rows came from.
    pub files_read: usize,
    /// Data rows seen, including skipped ones.
    pub rows_read: usize,
    /// Rows dropped because they could not be decoded (lenient mode only).
    pub rows_skipped: usize,
}

impl LoadedRecords {
    fn extend(&mut self, other: LoadedRecords) {
        self.records.extend(other.records);
        self.files_read += other.files_read;
        self.rows_read += other.rows_read;
        self.rows_skipped += other.rows_skipped;
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// `true` when `file_name` looks like a viewing-history export.
///
/// Matches `ViewingActivity.csv`, `NetflixViewingHistory.csv` and similar,
/// case-insensitively.
pub fn is_history_file_name(file_name: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)viewing[ _-]?(activity|history).*\.csv$").expect("regex is valid")
    })
    .is_match(file_name)
}

/// Find all viewing-history CSV files recursively under `dir`, sorted by path.
pub fn find_history_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Data path does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry.file_type().is_file()
                && entry
                    .file_name()
                    .to_str()
                    .map(is_history_file_name)
                    .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Resolve `path` into the list of export files to read.
///
/// A file is used as-is regardless of its name; a directory is searched
/// with [`find_history_files`].
pub fn resolve_input_files(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        return Err(StatsError::DataPathNotFound(path.to_path_buf()));
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let files = find_history_files(path);
    if files.is_empty() {
        return Err(StatsError::NoDataFiles(path.to_path_buf()));
    }
    Ok(files)
}

/// Load every export file reachable from `path`.
pub fn load_raw_records(path: &Path, mode: ParseMode) -> Result<LoadedRecords> {
    let files = resolve_input_files(path)?;
    let mut loaded = LoadedRecords::default();

    for file_path in &files {
        let file = std::fs::File::open(file_path).map_err(|source| StatsError::FileRead {
            path: file_path.clone(),
            source,
        })?;
        let from_file = read_records(file, mode)?;
        debug!(
            "File {}: {} rows read, {} skipped",
            file_path.display(),
            from_file.rows_read,
            from_file.rows_skipped,
        );
        loaded.extend(from_file);
    }

    Ok(loaded)
}

/// Decode CSV rows from any reader.
///
/// The first line must be a header row. Columns are matched by name, so
/// their order does not matter and unknown columns are ignored.
pub fn read_records<R: std::io::Read>(reader: R, mode: ParseMode) -> Result<LoadedRecords> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);

    let mut loaded = LoadedRecords {
        files_read: 1,
        ..Default::default()
    };

    for (index, row) in csv_reader.deserialize::<CsvRow>().enumerate() {
        loaded.rows_read += 1;
        let record = row.map_err(StatsError::from).and_then(CsvRow::into_raw_record);
        match record {
            Ok(r) => loaded.records.push(r),
            Err(e) if mode == ParseMode::Lenient && e.is_record_level() => {
                // Header is line 1, so data row `index` sits on line index + 2.
                warn!("Skipping row on line {}: {}", index + 2, e);
                loaded.rows_skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(loaded)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// One export row. Columns the pipeline never reads are not declared.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Profile Name", default)]
    profile_name: Option<String>,
    #[serde(rename = "Start Time", default)]
    start_time: Option<String>,
    #[serde(rename = "Date", default)]
    date: Option<String>,
    #[serde(rename = "Time", default)]
    time: Option<String>,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Duration")]
    duration: String,
    #[serde(rename = "Device Type", default)]
    device_type: Option<String>,
}

impl CsvRow {
    fn into_raw_record(self) -> Result<RawRecord> {
        let start = match (self.start_time, self.date, self.time) {
            (Some(combined), _, _) if !combined.trim().is_empty() => {
                RawStartTime::Combined(combined)
            }
            (_, Some(date), Some(time)) => RawStartTime::Split { date, time },
            _ => {
                return Err(StatsError::malformed(
                    "start time",
                    "",
                    "row has neither a Start Time nor a Date and Time column",
                ))
            }
        };

        Ok(RawRecord {
            profile_name: self.profile_name,
            start,
            title: self.title,
            duration: self.duration,
            device_type: self.device_type.unwrap_or_default(),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
