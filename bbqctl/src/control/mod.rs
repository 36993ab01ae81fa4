//! Temperature conversion and fan duty decisions.
//!
//! The [`Controller`] owns a ring of raw probe voltages, converts their
//! averages to temperatures and picks a fan duty cycle from the current
//! [`Settings`]. Everything here is in-memory arithmetic; callers drive it
//! from a periodic loop.

mod config;
mod controller;
mod policy;
mod samples;
mod settings;
mod thermistor;

pub use config::ProbeConfig;
pub use controller::{Controller, Output};
pub use policy::{AutoState, DutyDecision, DutyMode, DutyPolicy};
pub use samples::{DEFAULT_CAPACITY, SampleAverages, SampleBuffer};
pub use settings::{Settings, SharedSettings};
pub use thermistor::{probe_mv_for_temp_f, probe_resistance_ohms, probe_temp_f};
