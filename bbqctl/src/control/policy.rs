use strum::Display;

use super::settings::Settings;

/// Which rule chose the duty cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum DutyMode {
    Manual,
    LidOpen,
    Automatic,
}

/// Position of the pit temperature relative to the dead band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum AutoState {
    /// Below `threshold - window`: fan on.
    HeatingNeeded,
    /// Inside the band: fan left as it was.
    Settled,
    /// Above `threshold + window`: fan off.
    Overheated,
}

impl AutoState {
    pub fn from_temperature(temp_f: f64, settings: &Settings) -> Self {
        let threshold = i32::from(settings.threshold_f);
        let window = i32::from(settings.bang_bang_window);

        if temp_f < f64::from(threshold - window) {
            AutoState::HeatingNeeded
        } else if temp_f > f64::from(threshold + window) {
            AutoState::Overheated
        } else {
            AutoState::Settled
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DutyDecision {
    pub mode: DutyMode,
    /// Only set in [`DutyMode::Automatic`].
    pub auto_state: Option<AutoState>,
}

/// Bang-bang duty selection with manual and lid overrides.
///
/// The duty is remembered between calls: inside the dead band it stays
/// at whatever the last decision left it at, which is what keeps the fan
/// from chattering around the setpoint.
#[derive(Debug, Clone, Default)]
pub struct DutyPolicy {
    duty_pct: u8,
}

impl DutyPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn duty_pct(&self) -> u8 {
        self.duty_pct
    }

    /// Apply one decision for the given pit temperature.
    pub fn decide(&mut self, pit_temp_f: f64, settings: &Settings) -> DutyDecision {
        if settings.is_manual {
            self.duty_pct = settings.manual_duty_pct;
            return DutyDecision {
                mode: DutyMode::Manual,
                auto_state: None,
            };
        }

        if settings.lid_mode {
            self.duty_pct = 0;
            return DutyDecision {
                mode: DutyMode::LidOpen,
                auto_state: None,
            };
        }

        let state = AutoState::from_temperature(pit_temp_f, settings);
        match state {
            AutoState::HeatingNeeded => self.duty_pct = settings.automatic_duty_pct,
            AutoState::Overheated => self.duty_pct = 0,
            AutoState::Settled => {}
        }

        DutyDecision {
            mode: DutyMode::Automatic,
            auto_state: Some(state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn automatic() -> Settings {
        Settings {
            threshold_f: 225,
            bang_bang_window: 5,
            automatic_duty_pct: 70,
            ..Settings::default()
        }
    }

    #[test_case(219.9, AutoState::HeatingNeeded; "below band")]
    #[test_case(220.0, AutoState::Settled; "lower edge")]
    #[test_case(225.0, AutoState::Settled; "setpoint")]
    #[test_case(230.0, AutoState::Settled; "upper edge")]
    #[test_case(230.1, AutoState::Overheated; "above band")]
    fn should_classify_temperature_against_band(temp_f: f64, expected: AutoState) {
        assert_eq!(AutoState::from_temperature(temp_f, &automatic()), expected);
    }

    #[test]
    fn should_not_overflow_on_extreme_band() {
        let settings = Settings {
            threshold_f: i16::MAX,
            bang_bang_window: i16::MAX,
            ..Settings::default()
        };

        assert_eq!(
            AutoState::from_temperature(70_000.0, &settings),
            AutoState::Overheated
        );
        assert_eq!(
            AutoState::from_temperature(1.0, &settings),
            AutoState::Settled
        );
    }

    #[test]
    fn should_use_manual_duty_regardless_of_lid_and_temperature() {
        let mut policy = DutyPolicy::new();
        let settings = Settings {
            is_manual: true,
            lid_mode: true,
            manual_duty_pct: 42,
            ..automatic()
        };

        for temp in [0.0, 100.0, 225.0, 500.0] {
            let decision = policy.decide(temp, &settings);
            assert_eq!(decision.mode, DutyMode::Manual);
            assert_eq!(policy.duty_pct(), 42);
        }
    }

    #[test]
    fn should_pause_fan_with_lid_open() {
        let mut policy = DutyPolicy::new();
        let settings = Settings {
            lid_mode: true,
            ..automatic()
        };

        for temp in [0.0, 100.0, 225.0, 500.0] {
            let decision = policy.decide(temp, &settings);
            assert_eq!(decision.mode, DutyMode::LidOpen);
            assert_eq!(decision.auto_state, None);
            assert_eq!(policy.duty_pct(), 0);
        }
    }

    #[test]
    fn should_hold_duty_off_when_entering_band_from_above() {
        let mut policy = DutyPolicy::new();
        let settings = automatic();

        policy.decide(150.0, &settings);
        assert_eq!(policy.duty_pct(), 70);

        policy.decide(240.0, &settings);
        assert_eq!(policy.duty_pct(), 0);

        let decision = policy.decide(224.0, &settings);
        assert_eq!(decision.auto_state, Some(AutoState::Settled));
        assert_eq!(policy.duty_pct(), 0);
    }

    #[test]
    fn should_hold_duty_on_when_entering_band_from_below() {
        let mut policy = DutyPolicy::new();
        let settings = automatic();

        policy.decide(210.0, &settings);
        assert_eq!(policy.duty_pct(), 70);

        policy.decide(226.0, &settings);
        assert_eq!(policy.duty_pct(), 70);
    }

    #[test]
    fn should_start_with_fan_off_inside_band() {
        let mut policy = DutyPolicy::new();

        policy.decide(225.0, &automatic());

        assert_eq!(policy.duty_pct(), 0);
    }

    #[test]
    fn should_keep_manual_duty_when_returning_to_automatic_inside_band() {
        let mut policy = DutyPolicy::new();
        let manual = Settings {
            is_manual: true,
            manual_duty_pct: 33,
            ..automatic()
        };

        policy.decide(225.0, &manual);
        policy.decide(225.0, &automatic());

        assert_eq!(policy.duty_pct(), 33);
    }

    #[test]
    fn should_pass_through_out_of_range_duty_unchanged() {
        let mut policy = DutyPolicy::new();
        let settings = Settings {
            is_manual: true,
            manual_duty_pct: 150,
            ..automatic()
        };

        policy.decide(225.0, &settings);

        assert_eq!(policy.duty_pct(), 150);
    }
}
