//! Barbecue smoker fan controller.
//!
//! Two thermistor probes and a half-rail reference are sampled into a
//! rolling window, converted to temperatures with the Steinhart-Hart
//! equation and used to pick a fan duty cycle. The daemon runs the
//! sampling loop and serves the state and settings over HTTP.

pub mod api;
pub mod api_client;
pub mod config;
pub mod control;
pub mod error;
pub mod fan;
pub mod probe_fault;
pub mod sampler;
pub mod source;
pub mod tracing;
