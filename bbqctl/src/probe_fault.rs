//! Latches a warning when a probe keeps reading as degenerate.
//!
//! The controller reports `0.0 °F` for a probe whose voltages make no
//! sense (unplugged, shorted, no reference). One such report can be a
//! glitch; a run of them means the probe needs attention.
//!
//! ```text
//!         faulty            faulty x threshold
//!  Healthy ──────► Suspect ───────────────────► Latched
//!     ▲               │                            │
//!     │    healthy    │            healthy         │
//!     └───────────────┴────────────────────────────┘
//! ```

/// Result of [`ProbeFaultLatch::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultStatus {
    /// Probe reads fine.
    Healthy,

    /// Faulty, but fewer than `threshold` reports in a row.
    Suspect,

    /// The run just reached `threshold`. Returned once per episode.
    Raised,

    /// Still faulty after being raised.
    Active,

    /// Probe reads fine again after being raised. Returned once.
    Cleared,
}

#[derive(Debug, Clone, Copy)]
enum State {
    Healthy,
    Suspect(u32),
    Latched,
}

/// Counts consecutive faulty reports for one probe.
#[derive(Debug, Clone)]
pub struct ProbeFaultLatch {
    threshold: u32,
    state: State,
}

impl ProbeFaultLatch {
    /// `threshold` consecutive faulty reports raise the fault; zero is
    /// treated as one.
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            state: State::Healthy,
        }
    }

    /// Whether a reported temperature is the controller's degenerate value.
    /// A genuine 0 °F reading is indistinguishable and counts as faulty.
    pub fn is_degenerate(temp_f: f64) -> bool {
        temp_f == 0.0
    }

    /// True between [`FaultStatus::Raised`] and [`FaultStatus::Cleared`].
    pub fn is_latched(&self) -> bool {
        matches!(self.state, State::Latched)
    }

    pub fn check(&mut self, faulty: bool) -> FaultStatus {
        match (self.state, faulty) {
            (State::Healthy, false) => FaultStatus::Healthy,

            (State::Healthy, true) => self.count(1),

            (State::Suspect(_), false) => {
                self.state = State::Healthy;
                FaultStatus::Healthy
            }

            (State::Suspect(run), true) => self.count(run + 1),

            (State::Latched, false) => {
                self.state = State::Healthy;
                FaultStatus::Cleared
            }

            (State::Latched, true) => FaultStatus::Active,
        }
    }

    fn count(&mut self, run: u32) -> FaultStatus {
        if run >= self.threshold {
            self.state = State::Latched;
            FaultStatus::Raised
        } else {
            self.state = State::Suspect(run);
            FaultStatus::Suspect
        }
    }
}
