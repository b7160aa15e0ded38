//! NTC physics: divider voltage → resistance → temperature.
//!
//! Nothing here guards against out-of-domain input. A voltage at or above the
//! supply, or at or below zero, yields NaN or ±∞; callers drop such rows.

use serde::Serialize;

/// Coefficients of the extended Steinhart–Hart interpolation for the Vishay
/// NTCLE100E3 series (B25/85 = 3977 K, R25 from 2.2 kΩ to 10 kΩ).
pub const A1: f64 = 3.354016e-3;
pub const B1: f64 = 2.569850e-4;
pub const C1: f64 = 2.620131e-6;
pub const D1: f64 = 6.383091e-8;

/// 0 °C in kelvin.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Resistive divider with the NTC on the measured leg.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoltageDivider {
    /// Total voltage across the divider (V).
    pub vref: f64,
    /// Fixed resistor of the divider (Ω).
    pub resistor: f64,
}

impl Default for VoltageDivider {
    fn default() -> Self {
        Self {
            vref: 3.3,
            resistor: 10e3,
        }
    }
}

impl VoltageDivider {
    /// NTC resistance for the voltage measured across it.
    #[inline]
    pub fn resistance(&self, voltage: f64) -> f64 {
        self.resistor / (self.vref / voltage - 1.0)
    }

    pub fn resistances(&self, voltages: &[f64]) -> Vec<f64> {
        voltages.iter().map(|&v| self.resistance(v)).collect()
    }
}

/// NTC response curve; `rref` must be the part's R25.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thermistor {
    pub rref: f64,
}

impl Default for Thermistor {
    fn default() -> Self {
        Self { rref: 10e3 }
    }
}

impl Thermistor {
    /// Temperature in kelvin.
    #[inline]
    pub fn temperature_k(&self, resistance: f64) -> f64 {
        let l = (resistance / self.rref).ln();
        let t_inv = A1 + B1 * l + C1 * l * l + D1 * l * l * l;
        1.0 / t_inv
    }

    /// Temperature in degrees Celsius.
    #[inline]
    pub fn temperature_c(&self, resistance: f64) -> f64 {
        self.temperature_k(resistance) - KELVIN_OFFSET
    }

    pub fn temperatures_c(&self, resistances: &[f64]) -> Vec<f64> {
        resistances
            .iter()
            .map(|&r| self.temperature_c(r))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_resistance_is_r25() {
        let t = Thermistor::default().temperature_c(10e3);
        assert_eq!(t, 1.0 / A1 - KELVIN_OFFSET);
        assert!((t - 25.0).abs() < 0.01);
    }

    #[test]
    fn mid_supply_is_equal_resistors() {
        let d = VoltageDivider::default();
        assert!((d.resistance(1.65) - 10e3).abs() < 1e-6);
    }

    #[test]
    fn ntc_cools_as_resistance_rises() {
        let th = Thermistor::default();
        let ts = th.temperatures_c(&[5e3, 10e3, 20e3]);
        assert!(ts[0] > ts[1] && ts[1] > ts[2]);
    }

    #[test]
    fn out_of_domain_voltage_is_not_finite() {
        let d = VoltageDivider::default();
        let th = Thermistor::default();
        // at the supply: division by zero
        assert!(!d.resistance(3.3).is_finite());
        // above the supply: negative resistance, log of a negative number
        assert!(th.temperature_c(d.resistance(3.5)).is_nan());
        // zero volts: zero resistance, log(0) = -inf
        assert!(th.temperature_c(d.resistance(0.0)).is_nan());
    }
}
