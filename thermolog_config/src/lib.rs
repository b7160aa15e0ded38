#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema and calibration table loading for the thermistor logger.
//!
//! - `Config` and its sections are deserialized from TOML and validated.
//! - The calibration CSV loader enforces headers and yields raw samples; the
//!   fit itself lives in `thermolog_core::calibration`.
use chrono::NaiveDateTime;
use serde::Deserialize;

/// Calibration CSV schema.
///
/// Expected headers:
/// adc,voltage            (unweighted)
/// adc,voltage,uncertainty
///
/// Example:
/// adc,voltage
/// 512,0.52
/// 2048,1.71
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct CalibrationRow {
    pub adc: f64,
    pub voltage: f64,
    #[serde(default)]
    pub uncertainty: Option<f64>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct DividerCfg {
    /// Supply voltage across the whole divider (V)
    pub vref: f64,
    /// Fixed resistor in series with the NTC (Ohm)
    pub resistor_ohm: f64,
}

impl Default for DividerCfg {
    fn default() -> Self {
        Self {
            vref: 3.3,
            resistor_ohm: 10e3,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ThermistorCfg {
    /// R25 of the NTC (Ohm)
    pub rref_ohm: f64,
}

impl Default for ThermistorCfg {
    fn default() -> Self {
        Self { rref_ohm: 10e3 }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CleaningCfg {
    /// Threshold handed to the timestamp repair filter
    pub max_difference: i64,
    /// Readings at or below this value are treated as a shorted input
    pub adc_min_exclusive: f64,
    /// Readings above this value are treated as a disconnected input
    pub adc_max: f64,
    /// Fixed offset added to every timestamp (seconds)
    pub tz_offset_s: i64,
    /// Zero point of the device's integer timestamps
    pub epoch: NaiveDateTime,
}

impl Default for CleaningCfg {
    fn default() -> Self {
        Self {
            max_difference: 60,
            adc_min_exclusive: 20.0,
            adc_max: 4095.0,
            tz_offset_s: 0,
            epoch: device_epoch(),
        }
    }
}

/// 2000-01-01T00:00:00, the epoch of MicroPython's `time.time()` on embedded ports.
pub fn device_epoch() -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(2000, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct LoggerCfg {
    /// Conversions averaged per channel for one logged value
    pub n_reads: u32,
    /// Seconds between two logged rows
    pub interval_s: u64,
}

impl Default for LoggerCfg {
    fn default() -> Self {
        Self {
            n_reads: 100,
            interval_s: 10,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub divider: DividerCfg,
    pub thermistor: ThermistorCfg,
    pub cleaning: CleaningCfg,
    pub logger: LoggerCfg,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Load calibration samples from a CSV file with strict headers.
pub fn load_calibration_csv(path: &std::path::Path) -> eyre::Result<Vec<CalibrationRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| eyre::eyre!("open calibration CSV {:?}: {}", path, e))?;

    // Enforce exact headers
    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers {:?}: {}", path, e))?
        .clone();
    let actual: Vec<&str> = headers.iter().collect();
    if actual != ["adc", "voltage"] && actual != ["adc", "voltage", "uncertainty"] {
        eyre::bail!(
            "calibration CSV must have headers 'adc,voltage[,uncertainty]', got: {}",
            actual.join(",")
        );
    }

    let mut rows = Vec::new();
    for (idx, rec) in rdr.deserialize::<CalibrationRow>().enumerate() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                eyre::bail!("invalid CSV row {}: {}", idx + 2, e);
            }
        }
    }
    Ok(rows)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Divider
        if !(self.divider.vref.is_finite() && self.divider.vref > 0.0) {
            eyre::bail!("divider.vref must be > 0");
        }
        if !(self.divider.resistor_ohm.is_finite() && self.divider.resistor_ohm > 0.0) {
            eyre::bail!("divider.resistor_ohm must be > 0");
        }

        // Thermistor
        if !(self.thermistor.rref_ohm.is_finite() && self.thermistor.rref_ohm > 0.0) {
            eyre::bail!("thermistor.rref_ohm must be > 0");
        }

        // Cleaning
        if !(self.cleaning.adc_min_exclusive.is_finite() && self.cleaning.adc_max.is_finite()) {
            eyre::bail!("cleaning ADC bounds must be finite");
        }
        if self.cleaning.adc_max <= self.cleaning.adc_min_exclusive {
            eyre::bail!("cleaning.adc_max must be > cleaning.adc_min_exclusive");
        }
        if self.cleaning.tz_offset_s.abs() > 24 * 60 * 60 {
            eyre::bail!("cleaning.tz_offset_s is unreasonably large (>24h)");
        }

        // Logger
        if self.logger.n_reads == 0 {
            eyre::bail!("logger.n_reads must be >= 1");
        }
        if self.logger.interval_s == 0 {
            eyre::bail!("logger.interval_s must be >= 1");
        }

        // Logging
        if let Some(r) = self.logging.rotation.as_deref()
            && !matches!(r, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got '{r}'");
        }

        Ok(())
    }
}
