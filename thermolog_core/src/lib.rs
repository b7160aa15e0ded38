#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Offline processing of NTC thermistor logs (hardware-agnostic).
//!
//! ## Architecture
//!
//! - **Calibration**: weighted linear fit of ADC counts to volts (`calibration`)
//! - **Physics**: divider and Steinhart–Hart model (`thermistor`)
//! - **Timestamp repair**: sliding-window glitch correction (`timestamps`)
//! - **Parsing**: raw log rows with skip diagnostics (`records`)
//! - **Cleaning**: the full row pipeline and CSV export (`pipeline`)
//! - **Logging**: the device-side polling session (`logger`)
//!
//! Everything here is single-threaded batch code. The timestamp repair in
//! particular must see the sequence in order, one window after another.

pub mod calibration;
pub mod config;
pub mod conversions;
pub mod error;
pub mod logger;
pub mod mocks;
pub mod pipeline;
pub mod records;
pub mod thermistor;
pub mod timestamps;

pub use calibration::{
    CalibrationCurve, CalibrationSample, Residual, fit_linear, fit_parallel, write_residuals_csv,
};
pub use config::{CleaningParams, LoggerParams};
pub use error::{BuildError, CalibrationError, LoggerError, PipelineError};
pub use logger::{LoggedRow, LoggingSession};
pub use pipeline::{CleanRecord, CleanSeries, Diagnostics, DropReason, DroppedRow, Pipeline};
pub use records::{ParsedLog, RawRecord, SkipReason, SkippedRow, parse_log};
pub use thermistor::{Thermistor, VoltageDivider};
pub use timestamps::{RepairReport, repair_timestamps, repair_with_report};
