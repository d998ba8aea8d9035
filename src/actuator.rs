//! # Actuator Control
//!
//! Maps station state onto the indicator pair and the buzzer. Every rule is
//! an idempotent state-to-output write: applying the same inputs twice
//! drives the lines to the same levels, so the main loop can re-run rules
//! freely.
//!
//! Precedence between the two light controls: a manual toggle flips the
//! indicators immediately and holds until the next automatic luminosity
//! cycle, which re-applies the threshold rule unconditionally.

use crate::lines::OutputLine;
use crate::tick::BuzzerTimer;

/// A lux reading the threshold rule may act on. The sensor returns garbage
/// on bus failures, so NaN, infinities and negatives skip the cycle.
fn plausible_lux(lux: f32) -> bool {
    lux.is_finite() && lux >= 0.0
}

/// Indicator and buzzer outputs plus the rules that drive them.
pub struct Actuators<O> {
    indicator_a: O,
    indicator_b: O,
    buzzer: O,
    lights_on: bool,
    lux_threshold: f32,
    buzzer_duration_ticks: u32,
}

impl<O: OutputLine> Actuators<O> {
    pub fn new(
        indicator_a: O,
        indicator_b: O,
        buzzer: O,
        lux_threshold: f32,
        buzzer_duration_ticks: u32,
    ) -> Self {
        Actuators {
            indicator_a,
            indicator_b,
            buzzer,
            lights_on: false,
            lux_threshold,
            buzzer_duration_ticks,
        }
    }

    /// The threshold rule: below the threshold both indicators go on,
    /// otherwise both go off. Returns the applied state, or `None` when the
    /// reading was implausible and the outputs were left alone.
    pub fn apply_luminosity(&mut self, lux: f32) -> Option<bool> {
        if !plausible_lux(lux) {
            return None;
        }
        let on = lux < self.lux_threshold;
        self.drive_indicators(on);
        Some(on)
    }

    /// Manual override: flip the pair. Holds until the next automatic
    /// luminosity cycle.
    pub fn toggle_lights(&mut self) -> bool {
        let on = !self.lights_on;
        self.drive_indicators(on);
        on
    }

    /// Presence alert: arm the countdown for the full duration and sound the
    /// buzzer. The tick handler silences it at expiry.
    ///
    /// Order matters: the countdown is re-armed before the output goes high,
    /// so an expiry tick from the previous window landing mid-alert only
    /// decrements the fresh count and can never silence the line just
    /// asserted.
    pub fn presence_alert(&self, timer: &BuzzerTimer) {
        timer.restart(self.buzzer_duration_ticks);
        self.buzzer.set_active(true);
    }

    /// State the indicators were last driven to.
    pub fn lights_on(&self) -> bool {
        self.lights_on
    }

    fn drive_indicators(&mut self, on: bool) {
        self.indicator_a.set_active(on);
        self.indicator_b.set_active(on);
        self.lights_on = on;
    }
}
