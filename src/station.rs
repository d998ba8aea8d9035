//! # Station Core
//!
//! [`SharedState`] is the one structure both execution contexts touch: the
//! flag bus, the debounced rain state, and the buzzer countdown, all
//! lock-free. [`Station`] is the main-loop side, the only place slow
//! operations (sensor bus reads, display writes) are allowed to happen.
//!
//! Each [`Station::service`] pass drains every pending flag with an atomic
//! test-and-clear and performs the deferred action. A flag raised again
//! while its action runs is simply picked up by the next pass, so nothing an
//! interrupt reports is ever lost, only coalesced.

use crate::actuator::Actuators;
use crate::display::{CharDisplay, DisplayError};
use crate::edge::{EdgePolicy, EdgeSource};
use crate::flags::PendingWork;
use crate::lines::{InputLine, OutputLine};
use crate::platform::{Platform, PlatformError};
use crate::presenter;
use crate::sensors::{ClimateSensor, LightSensor, LightSensorError, SensorSnapshot};
use crate::tick::{BuzzerTimer, TickScheduler};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Fatal start-up and wiring errors. Transient run-time failures (bad
/// readings, display write errors) are handled locally and never surface
/// here.
#[derive(Debug, Error)]
pub enum StationError {
    #[error("display error: {0}")]
    Display(#[from] DisplayError),
    #[error("light sensor initialization failed: {0}")]
    LightSensor(#[from] LightSensorError),
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// State shared between interrupt context and the main loop.
///
/// Everything in here is atomic; neither side ever blocks the other. The
/// tick and edge handlers write, the main loop reads and consumes.
#[derive(Debug, Default)]
pub struct SharedState {
    /// The flag bus.
    pub work: PendingWork,
    /// Debounced rain state, written only by the tick handler.
    raining: AtomicBool,
    /// Presence buzzer countdown.
    pub buzzer: BuzzerTimer,
}

impl SharedState {
    pub const fn new() -> Self {
        SharedState {
            work: PendingWork::new(),
            raining: AtomicBool::new(false),
            buzzer: BuzzerTimer::new(),
        }
    }

    /// The debounced rain state.
    pub fn is_raining(&self) -> bool {
        self.raining.load(Ordering::Acquire)
    }

    pub(crate) fn set_raining(&self, raining: bool) {
        self.raining.store(raining, Ordering::Release);
    }
}

/// The main control loop and everything it alone may touch.
pub struct Station<D, L, C, O> {
    display: D,
    light: L,
    climate: C,
    actuators: Actuators<O>,
    shared: Arc<SharedState>,
    snapshot: SensorSnapshot,
    columns: usize,
}

impl<D, L, C, O> Station<D, L, C, O>
where
    D: CharDisplay,
    L: LightSensor,
    C: ClimateSensor,
    O: OutputLine,
{
    pub fn new(
        display: D,
        light: L,
        climate: C,
        actuators: Actuators<O>,
        shared: Arc<SharedState>,
        columns: usize,
    ) -> Self {
        Station {
            display,
            light,
            climate,
            actuators,
            shared,
            snapshot: SensorSnapshot::new(),
            columns,
        }
    }

    /// Start-up sequence: banner, light sensor bring-up, ready notice.
    ///
    /// A light sensor that fails `begin` is fatal; the failure is put on the
    /// display (the one place a headless station can report it) before the
    /// error propagates.
    pub fn start(&mut self, banner_ms: u64) -> Result<(), StationError> {
        self.display.clear()?;
        self.display.set_cursor(0, 0)?;
        self.display.print("Starting...")?;

        if let Err(error) = self.light.begin() {
            self.display.set_cursor(0, 1)?;
            self.display.print("Light sensor error")?;
            return Err(error.into());
        }

        self.display.set_cursor(0, 1)?;
        self.display.print("System started!")?;
        thread::sleep(Duration::from_millis(banner_ms));
        self.display.clear()?;
        Ok(())
    }

    /// One main-loop pass: drain every pending flag and perform its action.
    ///
    /// Bounded and non-blocking. Display write failures are reported to
    /// stderr and the pass continues; the next render overwrites whatever
    /// state the display was left in.
    pub fn service(&mut self) {
        if self.shared.work.rain_changed.take() {
            if self.shared.is_raining() {
                println!("Rain detected");
            } else {
                println!("Rain stopped");
            }
            self.render();
        }

        if self.shared.work.luminosity_due.take() {
            let lux = self.light.read_light_level();
            if self.actuators.apply_luminosity(lux).is_none() {
                eprintln!("Implausible light reading ({}); keeping indicator state", lux);
            }
        }

        if self.shared.work.climate_due.take() {
            if self.shared.is_raining() {
                // Rain keeps the bus quiet and the rain notice on screen;
                // the next scheduled poll retries.
            } else {
                let temperature = self.climate.read_temperature();
                let humidity = self.climate.read_humidity();
                if !self.snapshot.record_temperature(temperature) {
                    eprintln!("Temperature read failed; keeping last value");
                }
                if !self.snapshot.record_humidity(humidity) {
                    eprintln!("Humidity read failed; keeping last value");
                }
                self.render();
            }
        }

        if self.shared.work.light_toggle.take() {
            let on = self.actuators.toggle_lights();
            println!("Lights toggled {}", if on { "on" } else { "off" });
        }

        if self.shared.work.presence.take() {
            println!("Motion detected");
            self.actuators.presence_alert(&self.shared.buzzer);
        }
    }

    /// Run service passes until `stop` is set. Paints the current state
    /// once on entry; afterwards the display only changes on events.
    pub fn run(&mut self, stop: &AtomicBool) {
        self.render();
        while !stop.load(Ordering::Acquire) {
            self.service();
            thread::sleep(Duration::from_millis(1));
        }
    }

    /// Last valid climate readings, for status reporting and tests.
    pub fn snapshot(&self) -> &SensorSnapshot {
        &self.snapshot
    }

    /// The display, for inspection in tests.
    pub fn display(&self) -> &D {
        &self.display
    }

    fn render(&mut self) {
        let raining = self.shared.is_raining();
        if let Err(error) =
            presenter::render(&mut self.display, self.columns, raining, &self.snapshot)
        {
            eprintln!("Display write failed: {}", error);
        }
    }
}

/// Wire the interrupt side: hand the tick handler and both edge sources to
/// the platform. The edge baselines are seeded from the lines' current
/// levels so an edge arriving right after registration is classified
/// correctly.
pub fn install<P, R, B>(
    platform: &mut P,
    shared: Arc<SharedState>,
    mut scheduler: TickScheduler<R, B>,
    tick_period: Duration,
) -> Result<(), PlatformError>
where
    P: Platform,
    R: InputLine + Send + 'static,
    B: OutputLine + Send + 'static,
{
    platform.start_ticker(tick_period, Box::new(move || scheduler.tick()))?;

    let presence = EdgeSource::new(EdgePolicy::Rising, platform.presence_level());
    platform.watch_presence(Box::new(
        presence.into_handler(Arc::clone(&shared), |s: &SharedState| &s.work.presence),
    ))?;

    let toggle = EdgeSource::new(EdgePolicy::Falling, platform.toggle_level());
    platform.watch_toggle(Box::new(
        toggle.into_handler(shared, |s: &SharedState| &s.work.light_toggle),
    ))?;

    Ok(())
}
