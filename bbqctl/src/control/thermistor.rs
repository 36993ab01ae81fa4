//! Voltage divider and Steinhart-Hart conversion.
//!
//! Each probe sits in series with a known resistor across the supply rail.
//! The reference channel reads half the supply, so the rail itself is
//! `2 * reference`:
//!
//! ```text
//! R_probe = V_probe * R_fixed / (2 * V_ref - V_probe)
//! 1 / T_k = c0 + c1 * ln(R_probe) + c2 * ln(R_probe)^3
//! ```

use super::config::ProbeConfig;

const KELVIN_OFFSET: f64 = 273.15;

/// Thermistor resistance implied by the averaged divider voltages.
///
/// Not sanitised: may be zero, negative, infinite or NaN for implausible
/// inputs.
pub fn probe_resistance_ohms(config: &ProbeConfig, probe_mv: f64, reference_mv: f64) -> f64 {
    probe_mv * f64::from(config.probe_resistor_ohms) / (reference_mv * 2.0 - probe_mv)
}

/// Probe temperature in °F, or `0.0` when the inputs are degenerate.
///
/// A non-positive or non-finite resistance, or a non-finite result, reads
/// as `0.0` so that callers never see NaN or infinity.
pub fn probe_temp_f(config: &ProbeConfig, probe_mv: f64, reference_mv: f64) -> f64 {
    let r_probe_ohms = probe_resistance_ohms(config, probe_mv, reference_mv);
    if !r_probe_ohms.is_finite() || r_probe_ohms <= 0.0 {
        return 0.0;
    }

    let log_r = r_probe_ohms.ln();
    let temp_k = 1.0
        / (config.steinhart_coeff0
            + config.steinhart_coeff1 * log_r
            + config.steinhart_coeff2 * log_r * log_r * log_r);
    let temp_f = (temp_k - KELVIN_OFFSET) * 9.0 / 5.0 + 32.0;

    if temp_f.is_finite() { temp_f } else { 0.0 }
}

/// Divider voltage a probe at `temp_f` would produce; the inverse of
/// [`probe_temp_f`] for physically meaningful temperatures.
pub fn probe_mv_for_temp_f(config: &ProbeConfig, temp_f: f64, reference_mv: f64) -> f64 {
    let temp_k = (temp_f - 32.0) * 5.0 / 9.0 + KELVIN_OFFSET;

    // Closed-form root of the Steinhart-Hart cubic in ln(R).
    let x = (config.steinhart_coeff0 - 1.0 / temp_k) / config.steinhart_coeff2;
    let y = ((config.steinhart_coeff1 / (3.0 * config.steinhart_coeff2)).powi(3) + x * x / 4.0)
        .sqrt();
    let r_probe_ohms = ((y - x / 2.0).cbrt() - (y + x / 2.0).cbrt()).exp();

    2.0 * reference_mv * r_probe_ohms / (r_probe_ohms + f64::from(config.probe_resistor_ohms))
}
