//! Record cleaning: raw log rows to a calibrated two-channel temperature series.
//!
//! Stages, in order:
//! 1. timestamp repair over the parsed rows, dropping the marked ones
//! 2. plausibility filter on the raw ADC counts
//! 3. timezone shift and mapping onto wall-clock time
//! 4. ADC → voltage → resistance → temperature for both channels
//!
//! Rows whose temperature comes out non-finite are dropped after stage 4, so
//! the series never carries NaN.

use std::io::Write;

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;

use crate::calibration::CalibrationCurve;
use crate::config::CleaningParams;
use crate::error::{BuildError, Result};
use crate::records::ParsedLog;
use crate::thermistor::{Thermistor, VoltageDivider};
use crate::timestamps::repair_with_report;

/// One cleaned, converted sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CleanRecord {
    /// Wall-clock time after the timezone shift.
    pub time: NaiveDateTime,
    /// Repaired and shifted seconds since the device epoch.
    pub timestamp: i64,
    pub voltage: [f64; 2],
    pub resistance: [f64; 2],
    pub temperature_c: [f64; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DropReason {
    /// Marked by the timestamp repair filter, or unmappable to a date.
    ImplausibleTimestamp,
    /// A channel read `<= adc_min_exclusive` (short) or `> adc_max` (open).
    OutOfRange,
    /// The physical model produced NaN or infinity.
    NonFinite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DroppedRow {
    pub line: u64,
    pub reason: DropReason,
}

/// Per-run accounting of everything that did not make it into the series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    pub malformed: usize,
    pub implausible_timestamp: usize,
    pub out_of_range: usize,
    pub non_finite: usize,
    pub corrected_too_small: usize,
    pub corrected_too_large: usize,
    pub dropped: Vec<DroppedRow>,
}

impl Diagnostics {
    fn drop_row(&mut self, line: u64, reason: DropReason) {
        match reason {
            DropReason::ImplausibleTimestamp => self.implausible_timestamp += 1,
            DropReason::OutOfRange => self.out_of_range += 1,
            DropReason::NonFinite => self.non_finite += 1,
        }
        self.dropped.push(DroppedRow { line, reason });
    }

    /// Rows removed at any stage, parser included.
    pub fn total_dropped(&self) -> usize {
        self.malformed + self.implausible_timestamp + self.out_of_range + self.non_finite
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanSeries {
    pub records: Vec<CleanRecord>,
    pub diagnostics: Diagnostics,
}

/// Voltage, resistance and temperature derived from one ADC reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub voltage: f64,
    pub resistance: f64,
    pub temperature_c: f64,
}

impl Conversion {
    fn is_finite(&self) -> bool {
        self.voltage.is_finite() && self.resistance.is_finite() && self.temperature_c.is_finite()
    }
}

/// The cleaning pipeline, parameterised once per run.
#[derive(Debug, Clone)]
pub struct Pipeline {
    curve: CalibrationCurve,
    divider: VoltageDivider,
    thermistor: Thermistor,
    params: CleaningParams,
}

impl Pipeline {
    /// Pipeline with the default divider, thermistor and cleaning parameters.
    pub fn new(curve: CalibrationCurve) -> Self {
        Self {
            curve,
            divider: VoltageDivider::default(),
            thermistor: Thermistor::default(),
            params: CleaningParams::default(),
        }
    }

    /// Build from a loaded config, rejecting parameters the model cannot use.
    pub fn from_config(cfg: &thermolog_config::Config, curve: CalibrationCurve) -> eyre::Result<Self> {
        let invalid = |msg| Err(eyre::Report::new(BuildError::InvalidConfig(msg)));
        if !(curve.gradient().is_finite() && curve.offset().is_finite()) {
            return invalid("calibration curve must be finite");
        }
        if !(cfg.divider.vref.is_finite() && cfg.divider.vref > 0.0) {
            return invalid("divider vref must be > 0");
        }
        if !(cfg.divider.resistor_ohm.is_finite() && cfg.divider.resistor_ohm > 0.0) {
            return invalid("divider resistor must be > 0");
        }
        if !(cfg.thermistor.rref_ohm.is_finite() && cfg.thermistor.rref_ohm > 0.0) {
            return invalid("thermistor rref must be > 0");
        }
        if cfg.cleaning.adc_max.partial_cmp(&cfg.cleaning.adc_min_exclusive)
            != Some(std::cmp::Ordering::Greater)
        {
            return invalid("adc_max must be > adc_min_exclusive");
        }

        Ok(Self::new(curve)
            .with_divider((&cfg.divider).into())
            .with_thermistor((&cfg.thermistor).into())
            .with_params((&cfg.cleaning).into()))
    }

    pub fn with_divider(mut self, divider: VoltageDivider) -> Self {
        self.divider = divider;
        self
    }

    pub fn with_thermistor(mut self, thermistor: Thermistor) -> Self {
        self.thermistor = thermistor;
        self
    }

    pub fn with_params(mut self, params: CleaningParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &CleaningParams {
        &self.params
    }

    /// ADC counts through calibration and the physical model.
    pub fn convert(&self, adc: f64) -> Conversion {
        let voltage = self.curve.apply(adc);
        let resistance = self.divider.resistance(voltage);
        let temperature_c = self.thermistor.temperature_c(resistance);
        Conversion {
            voltage,
            resistance,
            temperature_c,
        }
    }

    /// Clean and convert a parsed log.
    pub fn run(&self, log: &ParsedLog) -> CleanSeries {
        let mut diagnostics = Diagnostics {
            malformed: log.skipped.len(),
            ..Diagnostics::default()
        };

        let mut timestamps: Vec<i64> = log.rows.iter().map(|r| r.timestamp).collect();
        let report = repair_with_report(&mut timestamps, self.params.max_difference);
        diagnostics.corrected_too_small = report.too_small;
        diagnostics.corrected_too_large = report.too_large;

        let mut marked = report.deletions.iter().copied().peekable();
        let mut records = Vec::with_capacity(log.rows.len());
        for (i, (row, &ts)) in log.rows.iter().zip(&timestamps).enumerate() {
            if marked.peek() == Some(&i) {
                marked.next();
                tracing::warn!(line = row.line, timestamp = row.timestamp, "dropping row with implausible timestamp");
                diagnostics.drop_row(row.line, DropReason::ImplausibleTimestamp);
                continue;
            }

            if !self.params.is_plausible(&row.adc) {
                tracing::warn!(line = row.line, adc1 = row.adc[0], adc2 = row.adc[1], "dropping out-of-range reading");
                diagnostics.drop_row(row.line, DropReason::OutOfRange);
                continue;
            }

            let timestamp = ts.saturating_add(self.params.tz_offset_s);
            let Some(time) = to_datetime(self.params.epoch, timestamp) else {
                tracing::warn!(line = row.line, timestamp, "dropping row outside the calendar range");
                diagnostics.drop_row(row.line, DropReason::ImplausibleTimestamp);
                continue;
            };

            let c = [self.convert(row.adc[0]), self.convert(row.adc[1])];
            if !c.iter().all(Conversion::is_finite) {
                tracing::warn!(line = row.line, adc1 = row.adc[0], adc2 = row.adc[1], "dropping row with non-finite temperature");
                diagnostics.drop_row(row.line, DropReason::NonFinite);
                continue;
            }

            records.push(CleanRecord {
                time,
                timestamp,
                voltage: [c[0].voltage, c[1].voltage],
                resistance: [c[0].resistance, c[1].resistance],
                temperature_c: [c[0].temperature_c, c[1].temperature_c],
            });
        }

        tracing::info!(
            kept = records.len(),
            malformed = diagnostics.malformed,
            implausible_timestamp = diagnostics.implausible_timestamp,
            out_of_range = diagnostics.out_of_range,
            non_finite = diagnostics.non_finite,
            "cleaning finished"
        );
        CleanSeries {
            records,
            diagnostics,
        }
    }
}

fn to_datetime(epoch: NaiveDateTime, seconds: i64) -> Option<NaiveDateTime> {
    TimeDelta::try_seconds(seconds).and_then(|d| epoch.checked_add_signed(d))
}

impl CleanSeries {
    /// Write the series as CSV, one column group per labelled channel.
    pub fn write_csv<W: Write>(&self, writer: W, labels: [&str; 2]) -> Result<()> {
        let mut w = csv::Writer::from_writer(writer);
        let mut header = vec!["time".to_string(), "timestamp".to_string()];
        for l in labels {
            header.push(format!("{l}_voltage_v"));
            header.push(format!("{l}_resistance_ohm"));
            header.push(format!("{l}_temperature_c"));
        }
        w.write_record(&header)?;
        for r in &self.records {
            let mut row = vec![
                r.time.format("%Y-%m-%d %H:%M:%S").to_string(),
                r.timestamp.to_string(),
            ];
            for ch in 0..2 {
                row.push(format!("{:.4}", r.voltage[ch]));
                row.push(format!("{:.1}", r.resistance[ch]));
                row.push(format!("{:.2}", r.temperature_c[ch]));
            }
            w.write_record(&row)?;
        }
        w.flush()?;
        Ok(())
    }
}
