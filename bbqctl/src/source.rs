//! Where probe voltages come from.
//!
//! On the smoker the readings come from an ADC; here the [`ReadingSource`]
//! trait is the seam, and [`SimulatedSmoker`] stands in for the hardware
//! so the daemon can run on a host.

use async_trait::async_trait;
use rand::Rng;
use tokio::sync::watch;

use crate::api_client::types::ControllerState;
use crate::control::{ProbeConfig, probe_mv_for_temp_f};
use crate::error::{Error, Result};

/// One sample of the three ADC channels (mV).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readings {
    pub reference_mv: u32,
    pub ambient_mv: u32,
    pub food_mv: u32,
}

#[async_trait]
pub trait ReadingSource: Send {
    /// Take one sample of all three channels.
    async fn read(&mut self) -> Result<Readings>;
}

/// Half of a 3.3 V rail.
const REFERENCE_MV: f64 = 1650.0;

const OUTSIDE_TEMP_F: f64 = 70.0;

/// Pit heating per sample at 100% duty (°F).
const FIRE_GAIN_F: f64 = 4.0;

/// Fraction of the pit/outside difference lost per sample.
const PIT_LOSS_RATE: f64 = 0.01;

/// Fraction of the pit/meat difference the meat gains per sample.
const FOOD_GAIN_RATE: f64 = 0.002;

/// A first-order smoker model that reacts to the fan duty.
///
/// The fan stokes the fire in proportion to the published duty, the pit
/// leaks heat to the outside, and the meat slowly follows the pit.
/// Temperatures are turned back into divider voltages with the same probe
/// calibration the controller uses.
pub struct SimulatedSmoker {
    config: ProbeConfig,
    state_rx: watch::Receiver<ControllerState>,
    pit_temp_f: f64,
    food_temp_f: f64,
    noise_mv: f64,
}

impl SimulatedSmoker {
    pub fn new(config: ProbeConfig, state_rx: watch::Receiver<ControllerState>) -> Self {
        Self {
            config,
            state_rx,
            pit_temp_f: 150.0,
            food_temp_f: 40.0,
            noise_mv: 2.0,
        }
    }

    /// Peak uniform noise added to each probe channel (mV).
    pub fn with_noise(mut self, noise_mv: f64) -> Self {
        self.noise_mv = noise_mv.abs();
        self
    }

    pub fn with_temperatures(mut self, pit_temp_f: f64, food_temp_f: f64) -> Self {
        self.pit_temp_f = pit_temp_f;
        self.food_temp_f = food_temp_f;
        self
    }

    pub fn pit_temp_f(&self) -> f64 {
        self.pit_temp_f
    }

    pub fn food_temp_f(&self) -> f64 {
        self.food_temp_f
    }

    fn step(&mut self, duty_pct: u8) {
        let duty = f64::from(duty_pct.min(100)) / 100.0;
        self.pit_temp_f += FIRE_GAIN_F * duty - PIT_LOSS_RATE * (self.pit_temp_f - OUTSIDE_TEMP_F);
        self.food_temp_f += FOOD_GAIN_RATE * (self.pit_temp_f - self.food_temp_f);
    }

    fn channel_mv(&self, temp_f: f64) -> u32 {
        let mv = probe_mv_for_temp_f(&self.config, temp_f, REFERENCE_MV) + jitter(self.noise_mv);
        mv.round().max(0.0) as u32
    }
}

#[async_trait]
impl ReadingSource for SimulatedSmoker {
    async fn read(&mut self) -> Result<Readings> {
        if self.state_rx.has_changed().is_err() {
            return Err(Error::Sensor("duty channel closed".into()));
        }
        let duty_pct = self.state_rx.borrow().duty_pct;
        self.step(duty_pct);

        Ok(Readings {
            reference_mv: REFERENCE_MV as u32,
            ambient_mv: self.channel_mv(self.pit_temp_f),
            food_mv: self.channel_mv(self.food_temp_f),
        })
    }
}

fn jitter(noise_mv: f64) -> f64 {
    if noise_mv == 0.0 {
        return 0.0;
    }
    rand::rng().random_range(-noise_mv..=noise_mv)
}
