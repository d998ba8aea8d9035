//! # Simulation Platform
//!
//! Development mode without hardware. The display paints to the terminal,
//! the sensors read from an in-memory world, and stdin commands stand in
//! for the physical lines. Stimuli and ticks run on their own threads, so
//! they exercise the same interrupt-to-main-loop hand-off the Pi build
//! uses; the only thing simulated is where the levels come from.

use ambient_station_lib::{
    ClimateSensor, InputLine, LatchLine, LevelHandler, LightSensor, LightSensorError, OutputLine,
    Platform, PlatformError, SharedState, TickHandler,
};
use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// The simulated environment: lux, temperature, humidity. Values are f32
/// bits in atomics so the console thread can update them while the main
/// loop reads.
pub struct SimWorld {
    lux: AtomicU32,
    temperature_c: AtomicU32,
    humidity_pct: AtomicU32,
}

impl SimWorld {
    /// A mild, well-lit room.
    pub fn new() -> Self {
        SimWorld {
            lux: AtomicU32::new(120.0f32.to_bits()),
            temperature_c: AtomicU32::new(21.0f32.to_bits()),
            humidity_pct: AtomicU32::new(40.0f32.to_bits()),
        }
    }

    pub fn lux(&self) -> f32 {
        f32::from_bits(self.lux.load(Ordering::Acquire))
    }

    pub fn set_lux(&self, lux: f32) {
        self.lux.store(lux.to_bits(), Ordering::Release);
    }

    pub fn temperature(&self) -> f32 {
        f32::from_bits(self.temperature_c.load(Ordering::Acquire))
    }

    pub fn set_temperature(&self, celsius: f32) {
        self.temperature_c.store(celsius.to_bits(), Ordering::Release);
    }

    pub fn humidity(&self) -> f32 {
        f32::from_bits(self.humidity_pct.load(Ordering::Acquire))
    }

    pub fn set_humidity(&self, percent: f32) {
        self.humidity_pct.store(percent.to_bits(), Ordering::Release);
    }
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Light sensor backed by the simulated world.
pub struct SimLightSensor {
    world: Arc<SimWorld>,
}

impl SimLightSensor {
    pub fn new(world: Arc<SimWorld>) -> Self {
        SimLightSensor { world }
    }
}

impl LightSensor for SimLightSensor {
    fn begin(&mut self) -> Result<(), LightSensorError> {
        Ok(())
    }

    fn read_light_level(&mut self) -> f32 {
        self.world.lux()
    }
}

/// Climate sensor backed by the simulated world. Feed it NaN through the
/// console (`dht nan 60`) to exercise the failed-read path.
pub struct SimClimateSensor {
    world: Arc<SimWorld>,
}

impl SimClimateSensor {
    pub fn new(world: Arc<SimWorld>) -> Self {
        SimClimateSensor { world }
    }
}

impl ClimateSensor for SimClimateSensor {
    fn read_temperature(&mut self) -> f32 {
        self.world.temperature()
    }

    fn read_humidity(&mut self) -> f32 {
        self.world.humidity()
    }
}

/// Output line that announces level changes on stdout. Idempotent writes
/// stay quiet, so the transcript only shows real transitions.
pub struct LoggingLine {
    name: &'static str,
    line: LatchLine,
}

impl LoggingLine {
    pub fn new(name: &'static str) -> Self {
        LoggingLine {
            name,
            line: LatchLine::new(false),
        }
    }
}

impl OutputLine for LoggingLine {
    fn set_active(&self, active: bool) {
        let was = self.line.swap_active(active);
        if was != active {
            println!("[{}] {}", self.name, if active { "on" } else { "off" });
        }
    }
}

/// Interrupt delivery for the simulator: a sleep-based ticker thread plus
/// edge callbacks fired from whatever thread injects the stimulus.
pub struct SimPlatform {
    rain: Arc<LatchLine>,
    presence: Arc<LatchLine>,
    toggle: Arc<LatchLine>,
    presence_handler: Arc<Mutex<Option<LevelHandler>>>,
    toggle_handler: Arc<Mutex<Option<LevelHandler>>>,
    stop: Arc<AtomicBool>,
}

impl SimPlatform {
    pub fn new(stop: Arc<AtomicBool>) -> Self {
        SimPlatform {
            rain: Arc::new(LatchLine::new(false)),
            presence: Arc::new(LatchLine::new(false)),
            toggle: Arc::new(LatchLine::new(false)),
            presence_handler: Arc::new(Mutex::new(None)),
            toggle_handler: Arc::new(Mutex::new(None)),
            stop,
        }
    }

    /// The rain line, for the tick scheduler to poll.
    pub fn rain_line(&self) -> Arc<LatchLine> {
        Arc::clone(&self.rain)
    }

    /// Start or stop the simulated rain. The debounce window still applies,
    /// exactly as with a wet comparator.
    pub fn set_rain(&self, active: bool) {
        self.rain.set_active(active);
    }

    /// One pass of a person: the presence line goes active and drops again.
    /// Rising-edge policy means exactly one event.
    pub fn pulse_presence(&self) {
        self.presence.set_active(true);
        Self::fire(&self.presence_handler, true);
        self.presence.set_active(false);
        Self::fire(&self.presence_handler, false);
    }

    /// One button press and release. The toggle registers on release.
    pub fn press_toggle(&self) {
        self.toggle.set_active(true);
        Self::fire(&self.toggle_handler, true);
        self.toggle.set_active(false);
        Self::fire(&self.toggle_handler, false);
    }

    fn fire(slot: &Mutex<Option<LevelHandler>>, level: bool) {
        let mut guard = slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handler) = guard.as_mut() {
            handler(level);
        }
    }
}

impl Platform for SimPlatform {
    fn start_ticker(
        &mut self,
        period: Duration,
        mut handler: TickHandler,
    ) -> Result<(), PlatformError> {
        let stop = Arc::clone(&self.stop);
        // Sleep-based cadence; close enough to 1 kHz for development.
        thread::Builder::new()
            .name("ticker".into())
            .spawn(move || {
                while !stop.load(Ordering::Acquire) {
                    handler();
                    thread::sleep(period);
                }
            })
            .map_err(|e| PlatformError::Ticker(e.to_string()))?;
        Ok(())
    }

    fn watch_presence(&mut self, handler: LevelHandler) -> Result<(), PlatformError> {
        *self
            .presence_handler
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(handler);
        Ok(())
    }

    fn watch_toggle(&mut self, handler: LevelHandler) -> Result<(), PlatformError> {
        *self.toggle_handler.lock().unwrap_or_else(|e| e.into_inner()) = Some(handler);
        Ok(())
    }

    fn presence_level(&self) -> bool {
        self.presence.is_active()
    }

    fn toggle_level(&self) -> bool {
        self.toggle.is_active()
    }
}

fn print_help() {
    println!("Commands:");
    println!("  rain on|off     wet or dry the rain line");
    println!("  motion          one presence pulse");
    println!("  toggle          press the light toggle button");
    println!("  lux <value>     set ambient light (try a value below 50)");
    println!("  dht <t> <h>     set temperature/humidity (nan = failed read)");
    println!("  status          show the simulated world");
    println!("  quit            stop the station");
}

fn handle_command(
    line: &str,
    world: &SimWorld,
    platform: &SimPlatform,
    shared: &SharedState,
) -> bool {
    let mut words = line.split_whitespace();
    match words.next() {
        None => {}
        Some("rain") => match words.next() {
            Some("on") => {
                platform.set_rain(true);
                println!("[rain] wet");
            }
            Some("off") => {
                platform.set_rain(false);
                println!("[rain] dry");
            }
            _ => eprintln!("usage: rain on|off"),
        },
        Some("motion") => platform.pulse_presence(),
        Some("toggle") => platform.press_toggle(),
        Some("lux") => match words.next().and_then(|w| w.parse::<f32>().ok()) {
            Some(lux) => {
                world.set_lux(lux);
                println!("[lux] {:.1}", lux);
            }
            None => eprintln!("usage: lux <value>"),
        },
        Some("dht") => {
            let temperature = words.next().and_then(|w| w.parse::<f32>().ok());
            let humidity = words.next().and_then(|w| w.parse::<f32>().ok());
            match (temperature, humidity) {
                (Some(t), Some(h)) => {
                    world.set_temperature(t);
                    world.set_humidity(h);
                    println!("[climate] {:.1} C / {:.1} %", t, h);
                }
                _ => eprintln!("usage: dht <temperature> <humidity>"),
            }
        }
        Some("status") => {
            println!(
                "lux {:.1}, temperature {:.1} C, humidity {:.1} %",
                world.lux(),
                world.temperature(),
                world.humidity()
            );
            println!(
                "raining: {}, buzzer ticks left: {}",
                shared.is_raining(),
                shared.buzzer.remaining_ticks()
            );
        }
        Some("help") => print_help(),
        Some("quit") | Some("exit") => return false,
        Some(unknown) => {
            eprintln!("unknown command: {}", unknown);
            print_help();
        }
    }
    true
}

/// Read stimulus commands from stdin until `quit` or EOF, then flag the
/// main loop to stop.
pub fn spawn_console(
    world: Arc<SimWorld>,
    platform: SimPlatform,
    shared: Arc<SharedState>,
    stop: Arc<AtomicBool>,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new().name("console".into()).spawn(move || {
        print_help();
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if !handle_command(line.trim(), &world, &platform, &shared) {
                break;
            }
            if stop.load(Ordering::Acquire) {
                break;
            }
        }
        stop.store(true, Ordering::Release);
    })
}
