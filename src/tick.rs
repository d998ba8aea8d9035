//! # Periodic Tick Scheduler
//!
//! One fixed-period tick drives all timing: poll intervals become "due"
//! flags, the rain line is sampled through its debounce filter, and the
//! buzzer countdown is decremented. The handler is constant-time and never
//! touches the sensor bus or the display; slow work happens in the main loop
//! once the flags are drained.
//!
//! Due events are derived by taking the shared tick counter modulo each
//! interval. There is no per-event re-arming, so intervals cannot drift: the
//! thousandth tick is due whether or not the previous handler ran late.

use crate::config::TimingConfig;
use crate::debounce::DebouncedInput;
use crate::lines::{InputLine, OutputLine};
use crate::station::SharedState;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

/// Countdown driving timed buzzer shutoff.
///
/// Shared between contexts: the main loop restarts it when presence fires,
/// the tick handler decrements it. Restarting mid-period always re-arms the
/// full duration; the output is deasserted on the exact tick the count
/// reaches zero.
#[derive(Debug, Default)]
pub struct BuzzerTimer {
    active: AtomicBool,
    remaining: AtomicU32,
}

impl BuzzerTimer {
    pub const fn new() -> Self {
        BuzzerTimer {
            active: AtomicBool::new(false),
            remaining: AtomicU32::new(0),
        }
    }

    /// Arm (or re-arm) the countdown for the full duration.
    pub fn restart(&self, duration_ticks: u32) {
        // Remaining is published before the active flag so a concurrent tick
        // never decrements a stale count after seeing the timer active.
        self.remaining.store(duration_ticks, Ordering::Release);
        self.active.store(true, Ordering::Release);
    }

    /// Advance one tick. Returns true exactly once per activation, on the
    /// tick the countdown expires; the caller deasserts the output then.
    pub fn tick(&self) -> bool {
        if !self.active.load(Ordering::Acquire) {
            return false;
        }
        let counted = self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |r| r.checked_sub(1));
        match counted {
            Ok(1) | Err(_) => {
                // Reached zero now, or armed with a zero duration.
                self.active.store(false, Ordering::Release);
                true
            }
            Ok(_) => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn remaining_ticks(&self) -> u32 {
        self.remaining.load(Ordering::Acquire)
    }
}

/// The per-tick handler state. Owned by whichever thread the platform runs
/// the ticker on; nothing in here is shared except through [`SharedState`].
pub struct TickScheduler<R, B> {
    counter: u32,
    luminosity_every: u32,
    climate_every: u32,
    rain_line: R,
    rain_filter: DebouncedInput,
    buzzer_line: B,
    shared: Arc<SharedState>,
}

impl<R: InputLine, B: OutputLine> TickScheduler<R, B> {
    /// Build the scheduler and seed the rain state from the line's current
    /// level, so a station booted in the rain starts out knowing it.
    pub fn new(
        timing: &TimingConfig,
        rain_line: R,
        buzzer_line: B,
        shared: Arc<SharedState>,
    ) -> Self {
        let initial_rain = rain_line.is_active();
        shared.set_raining(initial_rain);
        TickScheduler {
            counter: 0,
            luminosity_every: timing.luminosity_poll_ticks.max(1),
            climate_every: timing.climate_poll_ticks.max(1),
            rain_line,
            rain_filter: DebouncedInput::new(initial_rain, timing.debounce_window_ticks),
            buzzer_line,
            shared,
        }
    }

    /// One tick. Interrupt-context work only: counter, modulo checks, one
    /// line sample, one countdown step.
    pub fn tick(&mut self) {
        // Wraps after ~49.7 days at 1 ms; the single shortened interval at
        // the wrap seam is harmless for polling cadences.
        self.counter = self.counter.wrapping_add(1);

        if self.counter % self.luminosity_every == 0 {
            self.shared.work.luminosity_due.raise();
        }
        if self.counter % self.climate_every == 0 {
            self.shared.work.climate_due.raise();
        }

        if let Some(raining) = self.rain_filter.sample(self.rain_line.is_active()) {
            self.shared.set_raining(raining);
            self.shared.work.rain_changed.raise();
        }

        if self.shared.buzzer.tick() {
            self.buzzer_line.set_active(false);
        }
    }
}
