//! Raw export rows to typed watch events.

use chrono::TimeDelta;
use chrono_tz::Tz;
use tracing::{debug, warn};
use viewing_core::data_processors::{
    DeviceNormalizer, DurationParser, TimestampParser, TitleNormalizer,
};
use viewing_core::error::Result;
use viewing_core::models::{RawRecord, WatchEvent};
use viewing_core::settings::{ParseMode, PipelineConfig};
use viewing_core::time_utils::utc_to_local;

/// Outcome of normalising a whole export.
#[derive(Debug, Clone, Default)]
pub struct NormalizedEvents {
    /// Retained events, in input order.
    pub events: Vec<WatchEvent>,
    /// Sessions dropped by the noise filter.
    pub filtered: usize,
    /// Malformed records skipped (lenient mode only).
    pub skipped: usize,
}

/// Turns [`RawRecord`]s into [`WatchEvent`]s and drops noise sessions.
#[derive(Debug, Clone)]
pub struct RecordNormalizer {
    timezone: Tz,
    min_duration: TimeDelta,
}

impl RecordNormalizer {
    pub fn new(timezone: Tz, min_duration: TimeDelta) -> Self {
        Self {
            timezone,
            min_duration,
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.timezone, config.min_duration)
    }

    /// Normalise one record.
    ///
    /// Returns `Ok(None)` when the session is no longer than the noise
    /// threshold. Every field is parsed before the filter runs, so a
    /// malformed short session is still reported as malformed.
    pub fn normalize(&self, record: &RawRecord) -> Result<Option<WatchEvent>> {
        let start_utc = TimestampParser::parse(&record.start)?;
        let duration = DurationParser::parse(&record.duration)?;

        if duration <= self.min_duration {
            return Ok(None);
        }

        Ok(Some(WatchEvent::new(
            TitleNormalizer::series_title(&record.title),
            utc_to_local(start_utc, self.timezone),
            duration,
            DeviceNormalizer::device_class(&record.device_type),
        )))
    }

    /// Normalise a full record sequence.
    ///
    /// In [`ParseMode::Strict`] the first malformed record aborts with its
    /// error; in [`ParseMode::Lenient`] it is logged and counted instead.
    pub fn normalize_all(
        &self,
        records: &[RawRecord],
        mode: ParseMode,
    ) -> Result<NormalizedEvents> {
        let mut out = NormalizedEvents {
            events: Vec::with_capacity(records.len()),
            ..Default::default()
        };

        for (index, record) in records.iter().enumerate() {
            match self.normalize(record) {
                Ok(Some(event)) => out.events.push(event),
                Ok(None) => out.filtered += 1,
                Err(e) if mode == ParseMode::Lenient => {
                    warn!("Skipping record {} (\"{}\"): {}", index, record.title, e);
                    out.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        debug!(
            "Normalised {} records: {} retained, {} filtered as noise, {} skipped",
            records.len(),
            out.events.len(),
            out.filtered,
            out.skipped,
        );

        Ok(out)
    }
}

impl Default for RecordNormalizer {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
