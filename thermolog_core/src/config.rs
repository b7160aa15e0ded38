//! Runtime parameters for the cleaning pipeline.
//!
//! These are separate from the TOML-deserialized config in `thermolog_config`;
//! see `conversions` for the mapping.

use std::time::Duration;

use chrono::NaiveDateTime;

/// Parameters of the row filters and time mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct CleaningParams {
    /// Threshold for the timestamp repair filter's deletion test.
    pub max_difference: i64,
    /// Readings `<=` this are treated as a shorted input.
    pub adc_min_exclusive: f64,
    /// Readings `>` this are treated as a disconnected input.
    pub adc_max: f64,
    /// Fixed timezone shift added to each timestamp (seconds).
    pub tz_offset_s: i64,
    /// Zero point of the device timestamps.
    pub epoch: NaiveDateTime,
}

impl Default for CleaningParams {
    fn default() -> Self {
        Self {
            max_difference: 60,
            adc_min_exclusive: 20.0,
            adc_max: 4095.0,
            tz_offset_s: 0,
            epoch: thermolog_config::device_epoch(),
        }
    }
}

impl CleaningParams {
    /// True when every channel lies in `(adc_min_exclusive, adc_max]`.
    #[inline]
    pub fn is_plausible(&self, adc: &[f64]) -> bool {
        adc.iter()
            .all(|&v| v > self.adc_min_exclusive && v <= self.adc_max)
    }
}

/// Sampling parameters of a logging session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggerParams {
    /// Conversions averaged per channel for one row.
    pub n_reads: u32,
    /// Pause between two rows.
    pub interval: Duration,
}

impl Default for LoggerParams {
    fn default() -> Self {
        Self {
            n_reads: 100,
            interval: Duration::from_secs(10),
        }
    }
}
