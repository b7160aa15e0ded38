//! `From` implementations bridging `thermolog_config` types to `thermolog_core` types.

use crate::calibration::CalibrationSample;
use std::time::Duration;

use crate::config::{CleaningParams, LoggerParams};
use crate::thermistor::{Thermistor, VoltageDivider};

// ── Divider ──────────────────────────────────────────────────────────────────

impl From<&thermolog_config::DividerCfg> for VoltageDivider {
    fn from(c: &thermolog_config::DividerCfg) -> Self {
        Self {
            vref: c.vref,
            resistor: c.resistor_ohm,
        }
    }
}

// ── Thermistor ───────────────────────────────────────────────────────────────

impl From<&thermolog_config::ThermistorCfg> for Thermistor {
    fn from(c: &thermolog_config::ThermistorCfg) -> Self {
        Self { rref: c.rref_ohm }
    }
}

// ── CleaningParams ───────────────────────────────────────────────────────────

impl From<&thermolog_config::CleaningCfg> for CleaningParams {
    fn from(c: &thermolog_config::CleaningCfg) -> Self {
        Self {
            max_difference: c.max_difference,
            adc_min_exclusive: c.adc_min_exclusive,
            adc_max: c.adc_max,
            tz_offset_s: c.tz_offset_s,
            epoch: c.epoch,
        }
    }
}

// ── LoggerParams ─────────────────────────────────────────────────────────────

impl From<&thermolog_config::LoggerCfg> for LoggerParams {
    fn from(c: &thermolog_config::LoggerCfg) -> Self {
        Self {
            n_reads: c.n_reads,
            interval: Duration::from_secs(c.interval_s),
        }
    }
}

// ── Calibration ──────────────────────────────────────────────────────────────

impl From<&thermolog_config::CalibrationRow> for CalibrationSample {
    fn from(r: &thermolog_config::CalibrationRow) -> Self {
        Self {
            adc: r.adc,
            voltage: r.voltage,
            uncertainty: r.uncertainty,
        }
    }
}
