use chrono::TimeDelta;
use chrono_tz::Tz;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::error::{Result, StatsError};
use crate::time_utils::resolve_timezone;

// ── Enums ──────────────────────────────────────────────────────────────────────

/// How the report is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain-text summary cards and tables.
    Text,
    /// The result bundle as pretty-printed JSON.
    Json,
}

/// What to do with a record that cannot be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Abort the run on the first malformed record.
    #[default]
    Strict,
    /// Skip malformed records with a warning.
    Lenient,
}

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Summary statistics for a streaming-service viewing-history export
#[derive(Parser, Debug, Clone)]
#[command(
    name = "viewing-stats",
    about = "Summary statistics for a streaming-service viewing-history export",
    version
)]
pub struct Settings {
    /// Export CSV file, or a directory containing the unpacked export
    pub input: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the report to this file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Number of titles in the watch-time and binge rankings
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u16).range(1..=100))]
    pub top_shows: u16,

    /// Number of device classes in the device breakdown
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u16).range(1..=50))]
    pub top_devices: u16,

    /// Time zone for weekday and calendar-day grouping ("auto" for the system zone)
    #[arg(long, default_value = "UTC", env = "VIEWING_STATS_TZ")]
    pub timezone: String,

    /// Only include sessions played by this profile
    #[arg(long)]
    pub profile: Option<String>,

    /// Skip malformed rows with a warning instead of aborting
    #[arg(long)]
    pub lenient: bool,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments, applying `--debug`.
    pub fn load() -> Self {
        Self::resolve(Self::parse())
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn load_from_args<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::resolve(Self::parse_from(args))
    }

    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }

    /// Build the validated pipeline configuration.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        let config = PipelineConfig {
            top_shows: usize::from(self.top_shows),
            top_devices: usize::from(self.top_devices),
            min_duration: PipelineConfig::noise_threshold(),
            timezone: resolve_timezone(&self.timezone)?,
            parse_mode: if self.lenient {
                ParseMode::Lenient
            } else {
                ParseMode::Strict
            },
        };
        config.validate()?;
        Ok(config)
    }
}

// ── PipelineConfig ─────────────────────────────────────────────────────────────

/// Knobs for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Length of the duration ranking (and therefore the binge ranking).
    pub top_shows: usize,
    /// Length of the device breakdown.
    pub top_devices: usize,
    /// Sessions of this length or shorter are dropped as noise.
    pub min_duration: TimeDelta,
    /// Zone the UTC start times are converted into before calendar grouping.
    pub timezone: Tz,
    pub parse_mode: ParseMode,
}

impl PipelineConfig {
    /// Autoplay previews and ads show up as sessions of a minute or less.
    pub fn noise_threshold() -> TimeDelta {
        TimeDelta::minutes(1)
    }

    /// Reject configurations that cannot produce a meaningful result.
    pub fn validate(&self) -> Result<()> {
        if self.top_shows == 0 {
            return Err(StatsError::Config("top_shows must be at least 1".to_string()));
        }
        if self.top_devices == 0 {
            return Err(StatsError::Config(
                "top_devices must be at least 1".to_string(),
            ));
        }
        if self.min_duration < TimeDelta::zero() {
            return Err(StatsError::Config(
                "min_duration must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = mode;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_shows: 10,
            top_devices: 5,
            min_duration: Self::noise_threshold(),
            timezone: Tz::UTC,
            parse_mode: ParseMode::Strict,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::load_from_args(["viewing-stats"]);

        assert!(settings.input.is_none());
        assert_eq!(settings.format, OutputFormat::Text);
        assert!(settings.output.is_none());
        assert_eq!(settings.top_shows, 10);
        assert_eq!(settings.top_devices, 5);
        assert!(settings.profile.is_none());
        assert!(!settings.lenient);
        assert_eq!(settings.log_level, "INFO");
        assert!(!settings.debug);
    }

    #[test]
    fn test_settings_explicit_flags() {
        let settings = Settings::load_from_args([
            "viewing-stats",
            "export/ViewingActivity.csv",
            "--format",
            "json",
            "--top-shows",
            "3",
            "--top-devices",
            "2",
            "--timezone",
            "Europe/Berlin",
            "--profile",
            "Kids",
            "--lenient",
        ]);

        assert_eq!(
            settings.input,
            Some(PathBuf::from("export/ViewingActivity.csv"))
        );
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.top_shows, 3);
        assert_eq!(settings.top_devices, 2);
        assert_eq!(settings.timezone, "Europe/Berlin");
        assert_eq!(settings.profile.as_deref(), Some("Kids"));
        assert!(settings.lenient);
    }

    #[test]
    fn test_settings_rejects_zero_top_shows() {
        let result = Settings::try_parse_from(["viewing-stats", "--top-shows", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_flag_overrides_log_level() {
        let settings = Settings::load_from_args(["viewing-stats", "--debug"]);
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_pipeline_config_from_settings() {
        let settings = Settings::load_from_args([
            "viewing-stats",
            "--top-shows",
            "7",
            "--timezone",
            "Asia/Tokyo",
            "--lenient",
        ]);
        let config = settings.pipeline_config().unwrap();

        assert_eq!(config.top_shows, 7);
        assert_eq!(config.top_devices, 5);
        assert_eq!(config.timezone, Tz::Asia__Tokyo);
        assert_eq!(config.parse_mode, ParseMode::Lenient);
        assert_eq!(config.min_duration, TimeDelta::minutes(1));
    }

    #[test]
    fn test_pipeline_config_invalid_timezone() {
        let settings = Settings::load_from_args(["viewing-stats", "--timezone", "Moon/Base"]);
        assert!(matches!(
            settings.pipeline_config(),
            Err(StatsError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_pipeline_config_default_matches_cli_defaults() {
        let settings = Settings::load_from_args(["viewing-stats"]);
        assert_eq!(settings.pipeline_config().unwrap(), PipelineConfig::default());
    }

    #[test]
    fn test_pipeline_config_validate() {
        let mut config = PipelineConfig::default();
        assert!(config.validate().is_ok());

        config.top_devices = 0;
        assert!(matches!(config.validate(), Err(StatsError::Config(_))));
    }
}
