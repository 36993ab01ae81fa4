/// Thermistor calibration, fixed for the lifetime of a [`Controller`].
///
/// [`Controller`]: super::Controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeConfig {
    /// Steinhart-Hart `A` term.
    pub steinhart_coeff0: f64,

    /// Steinhart-Hart `B` term, multiplies `ln(R)`.
    pub steinhart_coeff1: f64,

    /// Steinhart-Hart `C` term, multiplies `ln(R)^3`.
    pub steinhart_coeff2: f64,

    /// Fixed resistor in series with each thermistor (ohms).
    pub probe_resistor_ohms: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            steinhart_coeff0: 0.0007343140544,
            steinhart_coeff1: 0.0002157437229,
            steinhart_coeff2: 0.0000000951568577,
            probe_resistor_ohms: 10_000,
        }
    }
}
