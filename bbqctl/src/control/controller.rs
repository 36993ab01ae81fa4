use super::config::ProbeConfig;
use super::policy::{DutyDecision, DutyPolicy};
use super::samples::{DEFAULT_CAPACITY, SampleBuffer};
use super::settings::SharedSettings;
use super::thermistor::probe_temp_f;
use crate::tracing::prelude::*;

/// Result of one [`Controller::output`] call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Output {
    /// Pit temperature from probe 0 (°F); `0.0` if the probe is unreadable.
    pub ambient_temp_f: f64,
    /// Meat temperature from probe 1 (°F); `0.0` if the probe is unreadable.
    pub food_temp_f: f64,
    pub duty_pct: u8,
}

/// Turns raw probe voltages into temperatures and a fan duty cycle.
///
/// One instance per smoker. The control loop owns it and feeds it with
/// [`provide_readings`](Self::provide_readings); settings come in through
/// the [`SharedSettings`] handle given at construction and are read once
/// per [`output`](Self::output).
pub struct Controller<const N: usize = DEFAULT_CAPACITY> {
    config: ProbeConfig,
    settings: SharedSettings,
    samples: SampleBuffer<N>,
    policy: DutyPolicy,
    last_decision: Option<DutyDecision>,
}

impl<const N: usize> Controller<N> {
    pub fn new(config: ProbeConfig, settings: SharedSettings) -> Self {
        Self {
            config,
            settings,
            samples: SampleBuffer::new(),
            policy: DutyPolicy::new(),
            last_decision: None,
        }
    }

    pub fn samples(&self) -> &SampleBuffer<N> {
        &self.samples
    }

    /// Decision taken by the most recent [`output`](Self::output) call.
    pub fn last_decision(&self) -> Option<DutyDecision> {
        self.last_decision
    }

    pub fn provide_readings(&mut self, reference_mv: u32, ambient_mv: u32, food_mv: u32) {
        self.samples.record(reference_mv, ambient_mv, food_mv);
    }

    /// Convert the current sample window and update the fan duty.
    ///
    /// Takes `&mut self` because the duty cycle is sticky inside the dead
    /// band: it only changes when the pit leaves the band or an override
    /// applies.
    pub fn output(&mut self) -> Output {
        let avg = self.samples.averages();
        let ambient_temp_f = probe_temp_f(&self.config, avg.ambient_mv, avg.reference_mv);
        let food_temp_f = probe_temp_f(&self.config, avg.food_mv, avg.reference_mv);

        let settings = self.settings.snapshot();
        let decision = self.policy.decide(ambient_temp_f, &settings);

        if self.last_decision != Some(decision) {
            info!(
                previous = ?self.last_decision,
                mode = %decision.mode,
                auto_state = ?decision.auto_state,
                ambient_temp_f = %ambient_temp_f,
                duty_pct = self.policy.duty_pct(),
                "Duty decision changed"
            );
        }
        self.last_decision = Some(decision);

        Output {
            ambient_temp_f,
            food_temp_f,
            duty_pct: self.policy.duty_pct(),
        }
    }
}
