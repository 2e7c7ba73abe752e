use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the viewing-stats pipeline.
#[derive(Error, Debug)]
pub enum StatsError {
    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The report could not be written to disk.
    #[error("Failed to write file {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV layer could not decode a row or header.
    #[error("Failed to decode CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The result bundle could not be serialised.
    #[error("Failed to serialise JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// A record's date, time or duration could not be parsed.
    #[error("Malformed record: invalid {field} \"{value}\": {reason}")]
    MalformedRecord {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// Summed watch time does not fit in a duration.
    #[error("Watch time overflow while totalling {0}")]
    WatchTimeOverflow(String),

    /// A time zone name is not a recognised IANA identifier.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// The given input path does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// No viewing-history CSV files were found under the given directory.
    #[error("No viewing history files found in {0}")]
    NoDataFiles(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StatsError {
    /// Shorthand for building a [`StatsError::MalformedRecord`].
    pub fn malformed(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        StatsError::MalformedRecord {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error describes a single bad record (as opposed to an
    /// I/O or configuration failure that affects the whole run).
    ///
    /// CSV errors count unless they wrap an I/O failure of the underlying
    /// reader.
    pub fn is_record_level(&self) -> bool {
        match self {
            StatsError::MalformedRecord { .. } => true,
            StatsError::Csv(e) => !matches!(e.kind(), csv::ErrorKind::Io(_)),
            _ => false,
        }
    }
}

/// Convenience alias used throughout the viewing crates.
pub type Result<T> = std::result::Result<T, StatsError>;
