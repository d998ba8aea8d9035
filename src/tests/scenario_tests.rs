//! # End-to-End Station Scenarios
//!
//! These tests assemble the whole pipeline, from the tick scheduler and
//! debounce filter through the flag bus to the main loop and actuators, and
//! drive it the way the running binary does, with the tick handler called
//! directly so time is deterministic. Sensors and lines come from the
//! simulator module, the display is the headless terminal grid.

use crate::sim::{SimClimateSensor, SimLightSensor, SimWorld};
use ambient_station_lib::config::TimingConfig;
use ambient_station_lib::{
    Actuators, InputLine, LatchLine, OutputLine, SensorSnapshot, SharedState, Station,
    TerminalDisplay, TickScheduler,
};
use std::sync::Arc;

const COLUMNS: usize = 20;
const BLANK: &str = "                    ";

fn timing() -> TimingConfig {
    TimingConfig {
        tick_period_ms: 1,
        debounce_window_ticks: 200,
        luminosity_poll_ticks: 1000,
        climate_poll_ticks: 2000,
        buzzer_duration_ticks: 1000,
        startup_banner_ms: 0,
    }
}

/// The full station on a workbench: simulated world, latch lines, manual
/// clock.
struct Bench {
    station: Station<TerminalDisplay, SimLightSensor, SimClimateSensor, Arc<LatchLine>>,
    scheduler: TickScheduler<Arc<LatchLine>, Arc<LatchLine>>,
    shared: Arc<SharedState>,
    world: Arc<SimWorld>,
    rain: Arc<LatchLine>,
    indicator_a: Arc<LatchLine>,
    indicator_b: Arc<LatchLine>,
    buzzer: Arc<LatchLine>,
}

impl Bench {
    fn new() -> Self {
        let timing = timing();
        let world = Arc::new(SimWorld::new());
        let shared = Arc::new(SharedState::new());
        let rain = Arc::new(LatchLine::new(false));
        let indicator_a = Arc::new(LatchLine::new(false));
        let indicator_b = Arc::new(LatchLine::new(false));
        let buzzer = Arc::new(LatchLine::new(false));

        let actuators = Actuators::new(
            Arc::clone(&indicator_a),
            Arc::clone(&indicator_b),
            Arc::clone(&buzzer),
            50.0,
            timing.buzzer_duration_ticks,
        );
        let station = Station::new(
            TerminalDisplay::headless(COLUMNS, 4),
            SimLightSensor::new(Arc::clone(&world)),
            SimClimateSensor::new(Arc::clone(&world)),
            actuators,
            Arc::clone(&shared),
            COLUMNS,
        );
        let scheduler = TickScheduler::new(
            &timing,
            Arc::clone(&rain),
            Arc::clone(&buzzer),
            Arc::clone(&shared),
        );

        Bench {
            station,
            scheduler,
            shared,
            world,
            rain,
            indicator_a,
            indicator_b,
            buzzer,
        }
    }

    /// Advance the clock without servicing, like ticks landing while the
    /// main loop is between passes.
    fn ticks(&mut self, n: u32) {
        for _ in 0..n {
            self.scheduler.tick();
        }
    }

    /// One main-loop pass.
    fn service(&mut self) {
        self.station.service();
    }

    fn line(&self, row: usize) -> String {
        self.station.display().line(row)
    }

    fn snapshot(&self) -> SensorSnapshot {
        *self.station.snapshot()
    }
}

/// Start-up through the first polls: the screen fills with climate data and
/// the light rule runs once.
#[test]
fn first_polls_populate_screen_and_lights() {
    let mut bench = Bench::new();
    bench.world.set_lux(30.0); // dim evening

    bench.ticks(2000); // crosses both poll intervals
    bench.service();

    assert_eq!(bench.line(0), "Temp: 21.0 C        ");
    assert_eq!(bench.line(1), "Hum:  40.0 %        ");
    assert!(
        bench.indicator_a.is_active() && bench.indicator_b.is_active(),
        "30 lux is below the 50 lux threshold"
    );
}

/// A rain line flickering well inside the debounce window never surfaces:
/// no state change, no re-render, no event.
#[test]
fn rain_bounce_inside_the_window_is_invisible() {
    let mut bench = Bench::new();
    bench.ticks(2000);
    bench.service();
    let screen_before = (bench.line(0), bench.line(1));

    // High, low, high again within 50 ticks of the 200-tick window.
    for _ in 0..4 {
        bench.rain.set_active(true);
        bench.ticks(50);
        bench.rain.set_active(false);
        bench.ticks(50);
    }
    bench.service();

    assert!(!bench.shared.is_raining());
    assert_eq!(
        (bench.line(0), bench.line(1)),
        screen_before,
        "a bouncing line must not disturb the display"
    );
}

/// Rain held past the window commits exactly once, and the rain notice
/// replaces the climate lines until the rain stops.
#[test]
fn steady_rain_reports_once_and_owns_the_display() {
    let mut bench = Bench::new();
    bench.ticks(2000);
    bench.service();

    bench.rain.set_active(true);
    bench.ticks(200);
    bench.service();

    assert!(bench.shared.is_raining());
    assert_eq!(bench.line(0), "It is raining!      ");
    assert_eq!(bench.line(1), BLANK, "climate suppressed during rain");

    // Steady rain afterwards: no further change events.
    bench.ticks(600);
    assert!(
        !bench.shared.work.rain_changed.is_raised(),
        "rain change must fire once per transition"
    );

    bench.rain.set_active(false);
    bench.ticks(200);
    bench.service();
    assert!(!bench.shared.is_raining());
    assert_eq!(bench.line(0), "Temp: 21.0 C        ", "climate screen returns");
}

/// Climate polls are consumed but not performed while it rains; the reading
/// that changed mid-rain appears at the first poll after the rain.
#[test]
fn climate_poll_waits_out_the_rain() {
    let mut bench = Bench::new();

    bench.rain.set_active(true);
    bench.ticks(200);
    bench.service(); // rain screen up

    bench.world.set_temperature(30.0);
    bench.world.set_humidity(90.0);
    bench.ticks(1800); // tick 2000: climate due during rain
    bench.service();

    assert_eq!(
        bench.snapshot(),
        SensorSnapshot::new(),
        "no bus read happens during rain"
    );
    assert!(
        !bench.shared.work.climate_due.is_raised(),
        "the due flag is consumed, not deferred"
    );

    bench.rain.set_active(false);
    bench.ticks(200);
    bench.service();
    bench.ticks(1800); // tick 4000: first poll after the rain
    bench.service();

    assert_eq!(bench.snapshot().temperature_c, Some(30.0));
    assert_eq!(bench.line(0), "Temp: 30.0 C        ");
    assert_eq!(bench.line(1), "Hum:  90.0 %        ");
}

/// The threshold rule follows the light across poll cycles.
#[test]
fn light_cycles_drive_the_indicator_pair() {
    let mut bench = Bench::new();

    bench.world.set_lux(30.0);
    bench.ticks(1000);
    bench.service();
    assert!(bench.indicator_a.is_active() && bench.indicator_b.is_active());

    bench.world.set_lux(80.0);
    bench.ticks(1000);
    bench.service();
    assert!(!bench.indicator_a.is_active() && !bench.indicator_b.is_active());
}

/// A manual toggle wins immediately and holds only until the next
/// luminosity poll re-applies the threshold rule.
#[test]
fn manual_toggle_holds_until_the_next_auto_cycle() {
    let mut bench = Bench::new();
    bench.world.set_lux(80.0); // bright: rule says off
    bench.ticks(1000);
    bench.service();
    assert!(!bench.indicator_a.is_active());

    bench.shared.work.light_toggle.raise(); // button pressed
    bench.service();
    assert!(bench.indicator_a.is_active(), "manual toggle flips the pair");

    bench.ticks(1000); // next automatic cycle
    bench.service();
    assert!(
        !bench.indicator_a.is_active(),
        "threshold rule reclaims the lights"
    );
}

/// The presence buzzer sounds for exactly the configured number of ticks.
#[test]
fn buzzer_sounds_for_exactly_the_configured_window() {
    let mut bench = Bench::new();

    bench.shared.work.presence.raise();
    bench.service();
    assert!(bench.buzzer.is_active(), "alert starts the buzzer");

    bench.ticks(999);
    assert!(bench.buzzer.is_active(), "tick 999: still sounding");

    bench.ticks(1);
    assert!(!bench.buzzer.is_active(), "tick 1000: silenced by the timer");
}

/// Motion during an active alert restarts the window; the total sound time
/// is measured from the last detection.
#[test]
fn renewed_motion_restarts_the_buzzer_window() {
    let mut bench = Bench::new();

    bench.shared.work.presence.raise();
    bench.service();
    bench.ticks(600);

    bench.shared.work.presence.raise(); // second pass of the person
    bench.service();

    bench.ticks(999);
    assert!(
        bench.buzzer.is_active(),
        "window counts from the second detection"
    );
    bench.ticks(1);
    assert!(!bench.buzzer.is_active());
}

/// Failed climate reads leave the last valid values on screen, per field.
#[test]
fn failed_reads_keep_the_last_valid_values() {
    let mut bench = Bench::new();
    bench.ticks(2000);
    bench.service(); // 21.0 C / 40.0 %

    bench.world.set_temperature(f32::NAN);
    bench.world.set_humidity(65.0);
    bench.ticks(2000);
    bench.service();

    assert_eq!(bench.line(0), "Temp: 21.0 C        ", "stale but valid");
    assert_eq!(bench.line(1), "Hum:  65.0 %        ", "good channel updates");

    bench.world.set_temperature(25.0);
    bench.world.set_humidity(f32::NAN);
    bench.ticks(2000);
    bench.service();

    assert_eq!(bench.line(0), "Temp: 25.0 C        ");
    assert_eq!(bench.line(1), "Hum:  65.0 %        ");
}

/// An implausible lux reading skips the cycle without touching the lights.
#[test]
fn garbage_lux_reading_skips_the_light_cycle() {
    let mut bench = Bench::new();
    bench.world.set_lux(30.0);
    bench.ticks(1000);
    bench.service();
    assert!(bench.indicator_a.is_active());

    bench.world.set_lux(f32::NAN); // bus glitch
    bench.ticks(1000);
    bench.service();
    assert!(
        bench.indicator_a.is_active(),
        "lights hold through a garbage reading"
    );

    bench.world.set_lux(200.0);
    bench.ticks(1000);
    bench.service();
    assert!(!bench.indicator_a.is_active(), "next good reading applies");
}

/// Events raised between passes are never lost, and a burst of identical
/// events collapses into one action.
#[test]
fn events_between_passes_are_neither_lost_nor_duplicated() {
    let mut bench = Bench::new();

    for _ in 0..5 {
        bench.shared.work.presence.raise(); // burst from a twitchy sensor
    }
    bench.service();
    assert!(bench.buzzer.is_active());
    assert_eq!(
        bench.shared.buzzer.remaining_ticks(),
        1000,
        "one alert, one full window"
    );

    bench.ticks(1000);
    assert!(!bench.buzzer.is_active());

    bench.shared.work.presence.raise(); // after the pass, before the next
    bench.service();
    assert!(bench.buzzer.is_active(), "later event handled next pass");
}

/// A rainy evening end to end: climate screen, rain takeover, motion during
/// rain, recovery.
#[test]
fn rainy_evening_walkthrough() {
    let mut bench = Bench::new();
    bench.world.set_lux(20.0);
    bench.world.set_temperature(18.0);
    bench.world.set_humidity(70.0);

    bench.ticks(2000);
    bench.service();
    assert_eq!(bench.line(0), "Temp: 18.0 C        ");
    assert!(bench.indicator_a.is_active(), "dark enough for the lights");

    // The rain starts.
    bench.rain.set_active(true);
    bench.ticks(200);
    bench.service();
    assert_eq!(bench.line(0), "It is raining!      ");

    // Someone walks by while it rains; the buzzer still works.
    bench.shared.work.presence.raise();
    bench.service();
    assert!(bench.buzzer.is_active());
    bench.ticks(1000);
    assert!(!bench.buzzer.is_active());

    // Rain passes; the climate lines come back at the next poll.
    bench.rain.set_active(false);
    bench.ticks(200);
    bench.service();
    bench.world.set_temperature(17.5);
    bench.ticks(2000);
    bench.service();
    assert_eq!(bench.line(0), "Temp: 17.5 C        ");
    assert_eq!(bench.line(1), "Hum:  70.0 %        ");
    assert!(bench.indicator_a.is_active(), "still dark out");
}
