use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// File names the export has shipped under, newest first.
const EXPORT_FILE_NAMES: &[&str] = &["ViewingActivity.csv", "NetflixViewingHistory.csv"];

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a Python-style level name onto a `tracing` filter directive.
fn filter_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        other => other.to_lowercase(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Output goes to stderr so that a JSON report on stdout stays parseable.
/// Falls back to `"info"` if the level string is not recognised.
pub fn setup_logging(log_level: &str) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(filter_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()?;

    Ok(())
}

// ── Input discovery ────────────────────────────────────────────────────────────

/// Locate an export when no input path was given.
///
/// Checks the working directory, then `~/Downloads`, for each known export
/// file name and returns the first that exists.
pub fn discover_input_path() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok();
    let downloads = dirs::home_dir().map(|h| h.join("Downloads"));
    discover_input_path_in(cwd.as_deref(), downloads.as_deref())
}

fn discover_input_path_in(cwd: Option<&Path>, downloads: Option<&Path>) -> Option<PathBuf> {
    [cwd, downloads]
        .into_iter()
        .flatten()
        .flat_map(|dir| EXPORT_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|p| p.is_file())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_filter_directive_maps_python_levels() {
        assert_eq!(filter_directive("WARNING"), "warn");
        assert_eq!(filter_directive("CRITICAL"), "error");
        assert_eq!(filter_directive("info"), "info");
        assert_eq!(filter_directive("TRACE"), "trace");
    }

    #[test]
    fn test_discover_input_none_when_absent() {
        let cwd = TempDir::new().expect("tempdir");
        let downloads = TempDir::new().expect("tempdir");
        assert!(discover_input_path_in(Some(cwd.path()), Some(downloads.path())).is_none());
    }

    #[test]
    fn test_discover_input_prefers_working_directory() {
        let cwd = TempDir::new().expect("tempdir");
        let downloads = TempDir::new().expect("tempdir");
        std::fs::write(cwd.path().join("NetflixViewingHistory.csv"), "").unwrap();
        std::fs::write(downloads.path().join("ViewingActivity.csv"), "").unwrap();

        let found = discover_input_path_in(Some(cwd.path()), Some(downloads.path()));
        assert_eq!(found, Some(cwd.path().join("NetflixViewingHistory.csv")));
    }

    #[test]
    fn test_discover_input_falls_back_to_downloads() {
        let cwd = TempDir::new().expect("tempdir");
        let downloads = TempDir::new().expect("tempdir");
        std::fs::write(downloads.path().join("ViewingActivity.csv"), "").unwrap();

        let found = discover_input_path_in(Some(cwd.path()), Some(downloads.path()));
        assert_eq!(found, Some(downloads.path().join("ViewingActivity.csv")));
    }

    #[test]
    fn test_discover_input_ignores_directories() {
        let cwd = TempDir::new().expect("tempdir");
        std::fs::create_dir(cwd.path().join("ViewingActivity.csv")).unwrap();
        assert!(discover_input_path_in(Some(cwd.path()), None).is_none());
    }
}
