//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "thermolog", version, about = "Clean and calibrate NTC thermistor logs")]
pub struct Cli {
    /// Path to config TOML (typed); built-in defaults when omitted
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Emit JSON (records, diagnostics, errors) instead of text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); RUST_LOG takes precedence
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean a raw log into a calibrated temperature series
    Clean {
        /// Raw log written by the logger (timestamp,adc1,adc2; no header)
        #[arg(short = 'd', long, value_name = "FILE")]
        data: PathBuf,
        /// ADC calibration measurements (CSV: adc,voltage[,uncertainty])
        #[arg(short = 'r', long, value_name = "FILE")]
        calibration: PathBuf,
        /// Write the series as CSV here instead of printing it
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Probe label used to name the two channels
        #[arg(short, long, value_name = "LABEL", default_value = "ntc")]
        label: String,
    },
    /// Fit the ADC response and report the calibration diagnostics
    Calibrate {
        /// ADC calibration measurements (CSV: adc,voltage[,uncertainty])
        #[arg(value_name = "FILE")]
        calibration: PathBuf,
        /// Write measured vs. fitted values as CSV here
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}
