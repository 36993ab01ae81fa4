use std::sync::Arc;

use parking_lot::Mutex;

/// Operator-adjustable control settings.
///
/// Values are stored as written; range checks belong to whoever edits
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Lid is open: pause the fan unless in manual mode.
    pub lid_mode: bool,

    pub is_manual: bool,

    /// Duty (0--100) applied while `is_manual` is set.
    pub manual_duty_pct: u8,

    /// Duty (0--100) applied when the pit drops below the band.
    pub automatic_duty_pct: u8,

    /// Pit target (°F).
    pub threshold_f: i16,

    /// Half-width of the dead band around `threshold_f` (°F).
    pub bang_bang_window: i16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lid_mode: false,
            is_manual: false,
            manual_duty_pct: 70,
            automatic_duty_pct: 70,
            threshold_f: 225,
            bang_bang_window: 5,
        }
    }
}

/// Settings shared between the control loop and whoever edits them.
///
/// A single mutex guards the whole record, and readers copy it out, so a
/// reader never observes half of an update.
#[derive(Debug, Clone, Default)]
pub struct SharedSettings {
    inner: Arc<Mutex<Settings>>,
}

impl SharedSettings {
    pub fn new(settings: Settings) -> Self {
        Self {
            inner: Arc::new(Mutex::new(settings)),
        }
    }

    /// Copy of the current settings.
    pub fn snapshot(&self) -> Settings {
        *self.inner.lock()
    }

    /// Swap in a whole new record, returning the previous one.
    pub fn replace(&self, settings: Settings) -> Settings {
        std::mem::replace(&mut *self.inner.lock(), settings)
    }

    /// Edit the settings in place under the lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut Settings) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn should_read_back_exactly_what_was_written() {
        let shared = SharedSettings::default();
        let written = Settings {
            lid_mode: true,
            is_manual: true,
            manual_duty_pct: 100,
            automatic_duty_pct: 0,
            threshold_f: -40,
            bang_bang_window: i16::MAX,
        };

        shared.replace(written);

        assert_eq!(shared.snapshot(), written);
    }

    #[test]
    fn should_return_previous_settings_on_replace() {
        let shared = SharedSettings::default();

        let previous = shared.replace(Settings {
            threshold_f: 250,
            ..Settings::default()
        });

        assert_eq!(previous, Settings::default());
    }

    #[test]
    fn should_share_state_between_clones() {
        let shared = SharedSettings::default();
        let editor = shared.clone();

        editor.update(|s| s.threshold_f = 275);

        assert_eq!(shared.snapshot().threshold_f, 275);
    }

    #[test]
    fn should_never_observe_partial_update() {
        let shared = SharedSettings::default();
        let low = Settings {
            manual_duty_pct: 10,
            automatic_duty_pct: 10,
            threshold_f: 100,
            bang_bang_window: 1,
            ..Settings::default()
        };
        let high = Settings {
            manual_duty_pct: 90,
            automatic_duty_pct: 90,
            threshold_f: 300,
            bang_bang_window: 9,
            ..Settings::default()
        };
        shared.replace(low);

        let writer = {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..10_000 {
                    shared.update(|s| *s = if i % 2 == 0 { high } else { low });
                }
            })
        };

        for _ in 0..10_000 {
            let seen = shared.snapshot();
            assert!(seen == low || seen == high, "torn read: {seen:?}");
        }

        writer.join().unwrap();
    }
}
