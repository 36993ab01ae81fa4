//! Software PWM for the blower fan.
//!
//! The fan is a plain on/off output. A duty percentage is turned into a
//! level per tock by slicing a fixed period: the first `duty%` of each
//! period is on, the rest off.

use async_trait::async_trait;

use crate::error::Result;
use crate::tracing::prelude::*;

/// Maps a tock number and a duty percentage to a fan level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutySlicer {
    period_tocks: u32,
}

impl DutySlicer {
    /// `period_tocks` must be non-zero.
    pub fn new(period_tocks: u32) -> Self {
        Self {
            period_tocks: period_tocks.max(1),
        }
    }

    pub fn period_tocks(&self) -> u32 {
        self.period_tocks
    }

    /// Whether the fan should be on during `tock`. Duties above 100 count
    /// as always on.
    pub fn is_on(&self, tock: u64, duty_pct: u8) -> bool {
        let period = u64::from(self.period_tocks);
        tock % period < u64::from(duty_pct) * period / 100
    }
}

/// A switchable fan output.
#[async_trait]
pub trait FanOutput: Send {
    async fn set(&mut self, on: bool) -> Result<()>;
}

/// Fan stand-in for hosts without a fan: logs level changes.
#[derive(Debug, Default)]
pub struct LogFan {
    on: bool,
    switches: u64,
}

impl LogFan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Number of level changes so far.
    pub fn switches(&self) -> u64 {
        self.switches
    }
}

#[async_trait]
impl FanOutput for LogFan {
    async fn set(&mut self, on: bool) -> Result<()> {
        if on != self.on {
            self.on = on;
            self.switches += 1;
            trace!(on, "Fan level changed");
        }
        Ok(())
    }
}
