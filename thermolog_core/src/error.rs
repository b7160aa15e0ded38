use thiserror::Error;

/// Failure to derive a calibration curve. Fatal for a pipeline run: there is
/// no sensible default curve to fall back to.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalibrationError {
    #[error("calibration requires at least two samples, got {0}")]
    TooFewSamples(usize),
    #[error("calibration inputs differ in length: {adc} ADC readings, {voltage} voltages")]
    LengthMismatch { adc: usize, voltage: usize },
    #[error("calibration sample {0} has a non-finite value")]
    NonFinite(usize),
    #[error("calibration sample {index} has invalid uncertainty {value} (must be finite and > 0)")]
    InvalidUncertainty { index: usize, value: f64 },
    #[error("calibration fit did not converge: {0}")]
    NoConvergence(&'static str),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("calibration error: {0}")]
    Calibration(#[from] CalibrationError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Pipeline parameters that cannot produce a meaningful series.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(&'static str),
}

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("logger needs at least one ADC channel")]
    NoChannels,
    #[error("logger.n_reads must be >= 1")]
    ZeroReads,
    #[error("adc channel {index} read failed: {message}")]
    Channel { index: usize, message: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
