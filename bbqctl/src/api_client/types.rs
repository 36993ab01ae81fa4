//! API data transfer objects.
//!
//! These types define the API contract shared between the server and
//! clients.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::control::Settings;
use crate::error::{Error, Result};

/// Snapshot of the controller, published by the sampling loop.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct ControllerState {
    /// Random per-run identifier, used to namespace reported signals.
    pub session_id: u32,
    pub uptime_secs: u64,
    pub ambient_temp_f: f64,
    pub food_temp_f: f64,
    pub duty_pct: u8,
    /// `manual`, `lid_open` or `automatic`; absent before the first report.
    pub mode: Option<String>,
    /// `heating_needed`, `settled` or `overheated` in automatic mode.
    pub auto_state: Option<String>,
    /// True until the sample window has been filled once.
    pub warming_up: bool,
    /// Pit probe has read as degenerate for several reports in a row.
    pub ambient_probe_fault: bool,
    /// Meat probe has read as degenerate for several reports in a row.
    pub food_probe_fault: bool,
}

impl ControllerState {
    pub fn new(session_id: u32) -> Self {
        Self {
            session_id,
            warming_up: true,
            ..Self::default()
        }
    }

    /// Per-session topic name for one signal, e.g. `/bbq/42/duty_pct`.
    pub fn topic(&self, signal: &str) -> String {
        format!("/bbq/{}/{}", self.session_id, signal)
    }
}

/// Current control settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct SettingsState {
    pub lid_mode: bool,
    pub is_manual: bool,
    pub manual_duty_pct: u8,
    pub automatic_duty_pct: u8,
    pub threshold_f: i16,
    pub bang_bang_window: i16,
}

impl From<Settings> for SettingsState {
    fn from(s: Settings) -> Self {
        Self {
            lid_mode: s.lid_mode,
            is_manual: s.is_manual,
            manual_duty_pct: s.manual_duty_pct,
            automatic_duty_pct: s.automatic_duty_pct,
            threshold_f: s.threshold_f,
            bang_bang_window: s.bang_bang_window,
        }
    }
}

/// Partial settings update; absent fields are left alone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct SettingsPatchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lid_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_manual: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_duty_pct: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automatic_duty_pct: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_f: Option<i16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bang_bang_window: Option<i16>,
}

impl SettingsPatchRequest {
    /// Check duty percentages are within 0--100.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("manual_duty_pct", self.manual_duty_pct),
            ("automatic_duty_pct", self.automatic_duty_pct),
        ] {
            if let Some(pct) = value.filter(|&pct| pct > 100) {
                return Err(Error::InvalidSettings(format!(
                    "{name} must be 0--100, got {pct}"
                )));
            }
        }
        Ok(())
    }

    pub fn apply(&self, settings: &mut Settings) {
        if let Some(v) = self.lid_mode {
            settings.lid_mode = v;
        }
        if let Some(v) = self.is_manual {
            settings.is_manual = v;
        }
        if let Some(v) = self.manual_duty_pct {
            settings.manual_duty_pct = v;
        }
        if let Some(v) = self.automatic_duty_pct {
            settings.automatic_duty_pct = v;
        }
        if let Some(v) = self.threshold_f {
            settings.threshold_f = v;
        }
        if let Some(v) = self.bang_bang_window {
            settings.bang_bang_window = v;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Parse `key=value` words, as typed on the command line.
    pub fn from_assignments<S: AsRef<str>>(words: &[S]) -> Result<Self> {
        let mut patch = Self::default();

        for word in words {
            let word = word.as_ref();
            let (key, value) = word.split_once('=').ok_or_else(|| {
                Error::InvalidSettings(format!("expected key=value, got {word:?}"))
            })?;
            let value = value.trim();

            match key.trim() {
                "lid_mode" => patch.lid_mode = Some(parse_flag(key, value)?),
                "is_manual" => patch.is_manual = Some(parse_flag(key, value)?),
                "manual_duty_pct" => patch.manual_duty_pct = Some(parse_number(key, value)?),
                "automatic_duty_pct" => patch.automatic_duty_pct = Some(parse_number(key, value)?),
                "threshold_f" => patch.threshold_f = Some(parse_number(key, value)?),
                "bang_bang_window" => patch.bang_bang_window = Some(parse_number(key, value)?),
                other => {
                    return Err(Error::InvalidSettings(format!("unknown setting {other:?}")));
                }
            }
        }

        patch.validate()?;
        Ok(patch)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value {
        "1" | "true" | "on" => Ok(true),
        "0" | "false" | "off" => Ok(false),
        _ => Err(Error::InvalidSettings(format!(
            "{key} expects true/false, got {value:?}"
        ))),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::InvalidSettings(format!("{key} out of range: {value:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_apply_only_present_fields() {
        let mut settings = Settings::default();
        let patch = SettingsPatchRequest {
            threshold_f: Some(250),
            lid_mode: Some(true),
            ..Default::default()
        };

        patch.apply(&mut settings);

        assert_eq!(
            settings,
            Settings {
                threshold_f: 250,
                lid_mode: true,
                ..Settings::default()
            }
        );
    }

    #[test]
    fn should_reject_duty_above_one_hundred() {
        let patch = SettingsPatchRequest {
            automatic_duty_pct: Some(101),
            ..Default::default()
        };

        assert!(matches!(patch.validate(), Err(Error::InvalidSettings(_))));
    }

    #[test]
    fn should_deserialize_partial_json() {
        let patch: SettingsPatchRequest =
            serde_json::from_str(r#"{"is_manual": true, "manual_duty_pct": 55}"#).unwrap();

        assert_eq!(patch.is_manual, Some(true));
        assert_eq!(patch.manual_duty_pct, Some(55));
        assert_eq!(patch.threshold_f, None);
    }

    #[test]
    fn should_parse_command_line_assignments() {
        let patch = SettingsPatchRequest::from_assignments(&[
            "threshold_f=-10",
            "lid_mode=on",
            "automatic_duty_pct=100",
        ])
        .unwrap();

        assert_eq!(patch.threshold_f, Some(-10));
        assert_eq!(patch.lid_mode, Some(true));
        assert_eq!(patch.automatic_duty_pct, Some(100));
    }

    #[test]
    fn should_reject_malformed_assignments() {
        assert!(SettingsPatchRequest::from_assignments(&["threshold_f"]).is_err());
        assert!(SettingsPatchRequest::from_assignments(&["colour=red"]).is_err());
        assert!(SettingsPatchRequest::from_assignments(&["lid_mode=maybe"]).is_err());
        assert!(SettingsPatchRequest::from_assignments(&["threshold_f=40000"]).is_err());
        assert!(SettingsPatchRequest::from_assignments(&["manual_duty_pct=150"]).is_err());
    }

    #[test]
    fn should_name_topics_by_session() {
        let state = ControllerState::new(42);

        assert_eq!(state.topic("food_temp_f"), "/bbq/42/food_temp_f");
        assert!(state.warming_up);
    }
}
