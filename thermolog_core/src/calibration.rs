//! Linear ADC response calibration.
//!
//! Fits `voltage = gradient * adc + offset` by weighted least squares over a
//! handful of reference measurements.

use std::io::Write;

use serde::Serialize;

use crate::error::{CalibrationError, PipelineError};

/// One reference measurement: raw ADC counts against a voltmeter reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationSample {
    pub adc: f64,
    pub voltage: f64,
    /// One-sigma uncertainty of `voltage`; weights the fit as `1/σ²`.
    pub uncertainty: Option<f64>,
}

impl CalibrationSample {
    pub fn new(adc: f64, voltage: f64) -> Self {
        Self {
            adc,
            voltage,
            uncertainty: None,
        }
    }
}

/// Fitted ADC→voltage map. Immutable once fitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationCurve {
    gradient: f64,
    offset: f64,
    residual_rms: f64,
}

/// Measured vs. fitted value for one calibration sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Residual {
    pub adc: f64,
    pub measured_v: f64,
    pub fitted_v: f64,
    pub residual_v: f64,
}

impl CalibrationCurve {
    /// Curve from known parameters (e.g. a previously persisted fit).
    pub fn from_parameters(gradient: f64, offset: f64) -> Self {
        Self {
            gradient,
            offset,
            residual_rms: 0.0,
        }
    }

    pub fn gradient(&self) -> f64 {
        self.gradient
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Weighted RMS of the fit residuals in volts.
    pub fn residual_rms(&self) -> f64 {
        self.residual_rms
    }

    #[inline]
    pub fn apply(&self, adc: f64) -> f64 {
        self.gradient * adc + self.offset
    }

    pub fn apply_all(&self, adc: &[f64]) -> Vec<f64> {
        adc.iter().map(|&x| self.apply(x)).collect()
    }

    /// Diagnostic table comparing each sample against the fitted line.
    pub fn residuals(&self, samples: &[CalibrationSample]) -> Vec<Residual> {
        samples
            .iter()
            .map(|s| {
                let fitted_v = self.apply(s.adc);
                Residual {
                    adc: s.adc,
                    measured_v: s.voltage,
                    fitted_v,
                    residual_v: s.voltage - fitted_v,
                }
            })
            .collect()
    }
}

/// Write the fit diagnostic table (`adc,measured_v,fitted_v,residual_v`).
pub fn write_residuals_csv<W: Write>(residuals: &[Residual], writer: W) -> Result<(), PipelineError> {
    let mut w = csv::Writer::from_writer(writer);
    for r in residuals {
        w.serialize(r)?;
    }
    w.flush()?;
    Ok(())
}

/// Fit from parallel ADC/voltage sequences, optionally with per-point uncertainties.
pub fn fit_parallel(
    adc: &[f64],
    voltage: &[f64],
    uncertainty: Option<&[f64]>,
) -> Result<CalibrationCurve, CalibrationError> {
    if adc.len() != voltage.len() {
        return Err(CalibrationError::LengthMismatch {
            adc: adc.len(),
            voltage: voltage.len(),
        });
    }
    if let Some(u) = uncertainty
        && u.len() != adc.len()
    {
        return Err(CalibrationError::LengthMismatch {
            adc: adc.len(),
            voltage: u.len(),
        });
    }
    let samples: Vec<CalibrationSample> = adc
        .iter()
        .zip(voltage)
        .enumerate()
        .map(|(i, (&a, &v))| CalibrationSample {
            adc: a,
            voltage: v,
            uncertainty: uncertainty.map(|u| u[i]),
        })
        .collect();
    fit_linear(&samples)
}

/// Weighted least-squares fit of `voltage = gradient * adc + offset`.
///
/// Samples are weighted by `1/σ²` only when every sample carries an
/// uncertainty; a partially specified table is fitted unweighted.
pub fn fit_linear(samples: &[CalibrationSample]) -> Result<CalibrationCurve, CalibrationError> {
    if samples.len() < 2 {
        return Err(CalibrationError::TooFewSamples(samples.len()));
    }
    for (i, s) in samples.iter().enumerate() {
        if !(s.adc.is_finite() && s.voltage.is_finite()) {
            return Err(CalibrationError::NonFinite(i));
        }
        if let Some(u) = s.uncertainty
            && !(u.is_finite() && u > 0.0)
        {
            return Err(CalibrationError::InvalidUncertainty { index: i, value: u });
        }
    }

    let weighted = samples.iter().all(|s| s.uncertainty.is_some());
    let weight = |s: &CalibrationSample| -> f64 {
        match s.uncertainty {
            Some(u) if weighted => 1.0 / (u * u),
            _ => 1.0,
        }
    };

    let mut sum_w = 0.0f64;
    let mut sum_wx = 0.0f64;
    let mut sum_wy = 0.0f64;
    let mut sum_wxx = 0.0f64;
    for s in samples {
        let w = weight(s);
        sum_w += w;
        sum_wx += w * s.adc;
        sum_wy += w * s.voltage;
        sum_wxx += w * s.adc * s.adc;
    }
    let mean_x = sum_wx / sum_w;
    let mean_y = sum_wy / sum_w;

    let mut sxx = 0.0f64;
    let mut sxy = 0.0f64;
    for s in samples {
        let w = weight(s);
        let dx = s.adc - mean_x;
        sxx += w * dx * dx;
        sxy += w * dx * (s.voltage - mean_y);
    }
    // Relative threshold: identical readings leave only rounding noise in sxx.
    if !sxx.is_finite() || sxx <= f64::EPSILON * sum_wxx.max(f64::MIN_POSITIVE) {
        return Err(CalibrationError::NoConvergence(
            "ADC readings have no spread; gradient is undetermined",
        ));
    }
    let gradient = sxy / sxx;
    let offset = mean_y - gradient * mean_x;
    if !(gradient.is_finite() && offset.is_finite()) {
        return Err(CalibrationError::NoConvergence(
            "fit produced non-finite parameters",
        ));
    }

    let mut sum_wrr = 0.0f64;
    for s in samples {
        let r = s.voltage - (gradient * s.adc + offset);
        sum_wrr += weight(s) * r * r;
    }
    let residual_rms = (sum_wrr / sum_w).sqrt();

    tracing::debug!(gradient, offset, residual_rms, n = samples.len(), weighted, "calibration fitted");
    Ok(CalibrationCurve {
        gradient,
        offset,
        residual_rms,
    })
}
