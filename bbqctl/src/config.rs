//! Daemon configuration from `BBQ_*` environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `BBQ_API_ADDR` | `127.0.0.1:7780` |
//! | `BBQ_TOCK_MS` | `100` |
//! | `BBQ_MEASUREMENT_PERIOD` | `10` tocks |
//! | `BBQ_REPORTING_PERIOD` | `50` tocks |
//! | `BBQ_DUTY_PERIOD` | `100` tocks |
//! | `BBQ_STEINHART_C0`, `_C1`, `_C2` | calibrated probe coefficients |
//! | `BBQ_PROBE_RESISTOR_OHMS` | `10000` |
//! | `BBQ_THRESHOLD_F` | `225` |
//! | `BBQ_BANG_BANG_WINDOW` | `5` |
//! | `BBQ_AUTOMATIC_DUTY_PCT` | `70` |
//! | `BBQ_MANUAL_DUTY_PCT` | `70` |

use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::control::{ProbeConfig, Settings};
use crate::error::{Error, Result};

const DEFAULT_API_ADDR: &str = "127.0.0.1:7780";

/// Sampling loop cadence. Periods are counted in tocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTiming {
    pub tock: Duration,
    /// Read the probes every this many tocks.
    pub measurement_period: u32,
    /// Log and publish the state every this many tocks.
    pub reporting_period: u32,
    /// Length of one software PWM cycle.
    pub duty_period: u32,
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self {
            tock: Duration::from_millis(100),
            measurement_period: 10,
            reporting_period: 50,
            duty_period: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub api_addr: SocketAddr,
    pub timing: LoopTiming,
    pub probe: ProbeConfig,
    /// Settings in force until someone changes them over the API.
    pub initial_settings: Settings,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let probe_defaults = ProbeConfig::default();
        let timing_defaults = LoopTiming::default();
        let settings_defaults = Settings::default();

        let api_addr = match lookup("BBQ_API_ADDR") {
            Some(raw) => parse_value("BBQ_API_ADDR", &raw)?,
            None => DEFAULT_API_ADDR
                .parse()
                .map_err(|e| config_error("BBQ_API_ADDR", DEFAULT_API_ADDR, e))?,
        };

        let tock_ms: u64 = read(
            &lookup,
            "BBQ_TOCK_MS",
            timing_defaults.tock.as_millis() as u64,
        )?;
        let timing = LoopTiming {
            tock: Duration::from_millis(non_zero("BBQ_TOCK_MS", tock_ms)?),
            measurement_period: non_zero(
                "BBQ_MEASUREMENT_PERIOD",
                read(
                    &lookup,
                    "BBQ_MEASUREMENT_PERIOD",
                    timing_defaults.measurement_period,
                )?,
            )?,
            reporting_period: non_zero(
                "BBQ_REPORTING_PERIOD",
                read(
                    &lookup,
                    "BBQ_REPORTING_PERIOD",
                    timing_defaults.reporting_period,
                )?,
            )?,
            duty_period: non_zero(
                "BBQ_DUTY_PERIOD",
                read(&lookup, "BBQ_DUTY_PERIOD", timing_defaults.duty_period)?,
            )?,
        };

        let probe = ProbeConfig {
            steinhart_coeff0: read(&lookup, "BBQ_STEINHART_C0", probe_defaults.steinhart_coeff0)?,
            steinhart_coeff1: read(&lookup, "BBQ_STEINHART_C1", probe_defaults.steinhart_coeff1)?,
            steinhart_coeff2: read(&lookup, "BBQ_STEINHART_C2", probe_defaults.steinhart_coeff2)?,
            probe_resistor_ohms: non_zero(
                "BBQ_PROBE_RESISTOR_OHMS",
                read(
                    &lookup,
                    "BBQ_PROBE_RESISTOR_OHMS",
                    probe_defaults.probe_resistor_ohms,
                )?,
            )?,
        };

        let initial_settings = Settings {
            threshold_f: read(&lookup, "BBQ_THRESHOLD_F", settings_defaults.threshold_f)?,
            bang_bang_window: read(
                &lookup,
                "BBQ_BANG_BANG_WINDOW",
                settings_defaults.bang_bang_window,
            )?,
            automatic_duty_pct: percent(
                "BBQ_AUTOMATIC_DUTY_PCT",
                read(
                    &lookup,
                    "BBQ_AUTOMATIC_DUTY_PCT",
                    settings_defaults.automatic_duty_pct,
                )?,
            )?,
            manual_duty_pct: percent(
                "BBQ_MANUAL_DUTY_PCT",
                read(
                    &lookup,
                    "BBQ_MANUAL_DUTY_PCT",
                    settings_defaults.manual_duty_pct,
                )?,
            )?,
            ..settings_defaults
        };

        Ok(Self {
            api_addr,
            timing,
            probe,
            initial_settings,
        })
    }
}

fn read<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse().map_err(|e| config_error(key, raw, e))
}

fn non_zero<T>(key: &'static str, value: T) -> Result<T>
where
    T: Default + PartialEq + Display,
{
    if value == T::default() {
        return Err(config_error(key, &value.to_string(), "must be non-zero"));
    }
    Ok(value)
}

fn percent(key: &'static str, value: u8) -> Result<u8> {
    if value > 100 {
        return Err(config_error(key, &value.to_string(), "must be 0--100"));
    }
    Ok(value)
}

fn config_error(key: &'static str, value: &str, reason: impl Display) -> Error {
    Error::Config {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn should_use_defaults_when_nothing_is_set() {
        let config = DaemonConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config.api_addr, "127.0.0.1:7780".parse().unwrap());
        assert_eq!(config.timing, LoopTiming::default());
        assert_eq!(config.probe, ProbeConfig::default());
        assert_eq!(config.initial_settings, Settings::default());
    }

    #[test]
    fn should_override_from_variables() {
        let config = DaemonConfig::from_lookup(lookup_from(&[
            ("BBQ_API_ADDR", "0.0.0.0:9000"),
            ("BBQ_TOCK_MS", "20"),
            ("BBQ_DUTY_PERIOD", "50"),
            ("BBQ_PROBE_RESISTOR_OHMS", "100000"),
            ("BBQ_THRESHOLD_F", " 250 "),
            ("BBQ_BANG_BANG_WINDOW", "-3"),
            ("BBQ_AUTOMATIC_DUTY_PCT", "100"),
        ]))
        .unwrap();

        assert_eq!(config.api_addr, "0.0.0.0:9000".parse().unwrap());
        assert_eq!(config.timing.tock, Duration::from_millis(20));
        assert_eq!(config.timing.duty_period, 50);
        assert_eq!(config.probe.probe_resistor_ohms, 100_000);
        assert_eq!(config.initial_settings.threshold_f, 250);
        assert_eq!(config.initial_settings.bang_bang_window, -3);
        assert_eq!(config.initial_settings.automatic_duty_pct, 100);
        assert!(!config.initial_settings.lid_mode);
    }

    #[test]
    fn should_reject_unparseable_value() {
        let err = DaemonConfig::from_lookup(lookup_from(&[("BBQ_THRESHOLD_F", "hot")]))
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Config {
                key: "BBQ_THRESHOLD_F",
                ..
            }
        ));
    }

    #[test]
    fn should_reject_zero_period() {
        let err = DaemonConfig::from_lookup(lookup_from(&[("BBQ_REPORTING_PERIOD", "0")]))
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Config {
                key: "BBQ_REPORTING_PERIOD",
                ..
            }
        ));
    }

    #[test]
    fn should_reject_duty_above_one_hundred() {
        let err = DaemonConfig::from_lookup(lookup_from(&[("BBQ_MANUAL_DUTY_PCT", "101")]))
            .unwrap_err();

        assert!(err.to_string().contains("BBQ_MANUAL_DUTY_PCT"));
    }
}
