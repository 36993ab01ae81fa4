//! The periodic control loop.
//!
//! Every tock the sampler may take a measurement, always recomputes the
//! controller output, may publish a report, and sets the fan level for
//! the current slice of the PWM period. It is the only owner of the
//! [`Controller`].

use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::api_client::types::ControllerState;
use crate::config::LoopTiming;
use crate::control::{Controller, DEFAULT_CAPACITY, Output};
use crate::fan::{DutySlicer, FanOutput};
use crate::probe_fault::{FaultStatus, ProbeFaultLatch};
use crate::source::ReadingSource;
use crate::tracing::prelude::*;

/// Consecutive degenerate reports before a probe is flagged.
pub const PROBE_FAULT_REPORTS: u32 = 3;

pub struct Sampler<S, F, const N: usize = DEFAULT_CAPACITY> {
    controller: Controller<N>,
    source: S,
    fan: F,
    timing: LoopTiming,
    slicer: DutySlicer,
    state_tx: watch::Sender<ControllerState>,
    session_id: u32,
    started: Instant,
    tock: u64,
    ambient_fault: ProbeFaultLatch,
    food_fault: ProbeFaultLatch,
}

impl<S, F, const N: usize> Sampler<S, F, N>
where
    S: ReadingSource,
    F: FanOutput,
{
    /// The session id is taken from the state already in `state_tx`. Zero
    /// measurement or reporting periods are treated as one.
    pub fn new(
        controller: Controller<N>,
        source: S,
        fan: F,
        timing: LoopTiming,
        state_tx: watch::Sender<ControllerState>,
    ) -> Self {
        let session_id = state_tx.borrow().session_id;
        let timing = LoopTiming {
            measurement_period: timing.measurement_period.max(1),
            reporting_period: timing.reporting_period.max(1),
            ..timing
        };

        Self {
            controller,
            source,
            fan,
            timing,
            slicer: DutySlicer::new(timing.duty_period),
            state_tx,
            session_id,
            started: Instant::now(),
            tock: 0,
            ambient_fault: ProbeFaultLatch::new(PROBE_FAULT_REPORTS),
            food_fault: ProbeFaultLatch::new(PROBE_FAULT_REPORTS),
        }
    }

    pub async fn run(mut self, cancellation: CancellationToken) {
        info!(
            session_id = self.session_id,
            tock_ms = self.timing.tock.as_millis() as u64,
            "Sampler started"
        );

        let mut interval = tokio::time::interval(self.timing.tock);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = cancellation.cancelled() => {
                    break;
                }
                _ = interval.tick() => {
                    self.tock().await;
                }
            }
        }

        // Leave the fan off when the loop stops.
        if let Err(e) = self.fan.set(false).await {
            warn!(error = %e, "Failed to switch fan off on shutdown");
        }
        info!(tocks = self.tock, "Sampler stopped");
    }

    pub fn controller(&self) -> &Controller<N> {
        &self.controller
    }

    pub fn fan(&self) -> &F {
        &self.fan
    }

    pub fn tocks(&self) -> u64 {
        self.tock
    }

    async fn tock(&mut self) -> Output {
        let tock = self.tock;

        if tock % u64::from(self.timing.measurement_period) == 0 {
            self.measure().await;
        }

        let output = self.controller.output();

        if tock % u64::from(self.timing.reporting_period) == 0 {
            self.report(&output);
        }

        let on = self.slicer.is_on(tock, output.duty_pct);
        if let Err(e) = self.fan.set(on).await {
            warn!(error = %e, on, "Failed to set fan level");
        }

        self.tock += 1;
        output
    }

    async fn measure(&mut self) {
        match self.source.read().await {
            Ok(readings) => {
                trace!(?readings, "Probe readings");
                self.controller.provide_readings(
                    readings.reference_mv,
                    readings.ambient_mv,
                    readings.food_mv,
                );
            }
            Err(e) => warn!(error = %e, "Skipping measurement"),
        }
    }

    fn report(&mut self, output: &Output) {
        check_probe(&mut self.ambient_fault, "ambient", output.ambient_temp_f);
        check_probe(&mut self.food_fault, "food", output.food_temp_f);

        let decision = self.controller.last_decision();
        let state = ControllerState {
            session_id: self.session_id,
            uptime_secs: self.started.elapsed().as_secs(),
            ambient_temp_f: output.ambient_temp_f,
            food_temp_f: output.food_temp_f,
            duty_pct: output.duty_pct,
            mode: decision.map(|d| d.mode.to_string()),
            auto_state: decision.and_then(|d| d.auto_state).map(|s| s.to_string()),
            warming_up: !self.controller.samples().is_full(),
            ambient_probe_fault: self.ambient_fault.is_latched(),
            food_probe_fault: self.food_fault.is_latched(),
        };

        info!(
            ambient_temp_f = %format_args!("{:.1}", output.ambient_temp_f),
            food_temp_f = %format_args!("{:.1}", output.food_temp_f),
            duty_pct = output.duty_pct,
            "Report"
        );
        for (signal, value) in [
            ("ambient_temp_f", output.ambient_temp_f),
            ("food_temp_f", output.food_temp_f),
            ("duty_pct", f64::from(output.duty_pct)),
        ] {
            debug!(topic = %state.topic(signal), value, "Publishing");
        }

        self.state_tx.send_replace(state);
    }
}

fn check_probe(latch: &mut ProbeFaultLatch, probe: &'static str, temp_f: f64) {
    match latch.check(ProbeFaultLatch::is_degenerate(temp_f)) {
        FaultStatus::Raised => warn!(probe, "Probe reading degenerate; check wiring"),
        FaultStatus::Cleared => info!(probe, "Probe reading recovered"),
        FaultStatus::Healthy | FaultStatus::Suspect | FaultStatus::Active => {}
    }
}
