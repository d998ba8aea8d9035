//! # Ambient Station Application Entry Point
//!
//! This binary wires the library core to a platform. By default it runs the
//! interactive simulator (terminal display, stdin stimuli) so the whole
//! station can be exercised on a desk; built with the `hardware` feature and
//! started with `--hardware` it drives real GPIO lines through rppal
//! instead.

// Test modules
#[cfg(test)]
mod tests;

#[cfg(all(target_os = "linux", feature = "hardware"))]
mod gpio_rppal;
mod sim;

use ambient_station_lib::{
    install, Actuators, Config, SharedState, Station, TerminalDisplay, TickScheduler,
};
use anyhow::Context;
use std::env;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

/// Run against real GPIO lines. The display and the bus sensors stay on the
/// development implementations until their drivers are wired in, so this
/// mode exercises the rain, presence, toggle and output lines end to end.
#[cfg(all(target_os = "linux", feature = "hardware"))]
fn run_hardware(
    config: Config,
    shared: Arc<SharedState>,
    stop: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    use rppal::gpio::Gpio;

    println!("Starting sensors...");
    eprintln!("GPIO line bindings (BCM):");
    eprintln!(
        "   rain {} (active {}), presence {}, toggle {} (active {})",
        config.pins.rain_bcm,
        if config.pins.rain_active_low { "low" } else { "high" },
        config.pins.presence_bcm,
        config.pins.toggle_bcm,
        if config.pins.toggle_active_low { "low" } else { "high" },
    );
    eprintln!(
        "   indicators {}/{}, buzzer {}",
        config.pins.indicator_a_bcm, config.pins.indicator_b_bcm, config.pins.buzzer_bcm
    );
    eprintln!("Display and bus sensors run on the development implementations.");

    let gpio = Gpio::new().context("opening the GPIO controller")?;

    let rain = gpio_rppal::open_input(
        &gpio,
        config.pins.rain_bcm,
        config.pins.rain_active_low,
        false,
    )
    .context("opening the rain line")?;
    let indicator_a = Arc::new(
        gpio_rppal::open_output(&gpio, config.pins.indicator_a_bcm)
            .context("opening indicator A")?,
    );
    let indicator_b = Arc::new(
        gpio_rppal::open_output(&gpio, config.pins.indicator_b_bcm)
            .context("opening indicator B")?,
    );
    let buzzer = Arc::new(
        gpio_rppal::open_output(&gpio, config.pins.buzzer_bcm).context("opening the buzzer")?,
    );

    let mut platform = gpio_rppal::RppalPlatform::new(&gpio, &config.pins, Arc::clone(&stop))
        .context("opening the interrupt lines")?;

    let world = Arc::new(sim::SimWorld::new());
    let actuators = Actuators::new(
        indicator_a,
        indicator_b,
        Arc::clone(&buzzer),
        config.control.lux_on_threshold,
        config.timing.buzzer_duration_ticks,
    );
    let mut station = Station::new(
        TerminalDisplay::new(config.display.columns, config.display.rows),
        sim::SimLightSensor::new(Arc::clone(&world)),
        sim::SimClimateSensor::new(world),
        actuators,
        Arc::clone(&shared),
        config.display.columns,
    );

    station
        .start(config.timing.startup_banner_ms)
        .context("station start-up failed")?;

    let scheduler = TickScheduler::new(&config.timing, rain, buzzer, Arc::clone(&shared));
    install(
        &mut platform,
        Arc::clone(&shared),
        scheduler,
        Duration::from_millis(config.timing.tick_period_ms),
    )
    .context("installing interrupt handlers")?;

    // First pass fills the screen and applies the light rule without
    // waiting out the poll intervals.
    shared.work.luminosity_due.raise();
    shared.work.climate_due.raise();

    station.run(&stop);
    Ok(())
}

/// Run the interactive simulator.
fn run_simulator(
    config: Config,
    shared: Arc<SharedState>,
    stop: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    println!("Starting sensors...");

    let world = Arc::new(sim::SimWorld::new());
    let mut platform = sim::SimPlatform::new(Arc::clone(&stop));

    let indicator_a = Arc::new(sim::LoggingLine::new("indicator-a"));
    let indicator_b = Arc::new(sim::LoggingLine::new("indicator-b"));
    let buzzer = Arc::new(sim::LoggingLine::new("buzzer"));

    let actuators = Actuators::new(
        indicator_a,
        indicator_b,
        Arc::clone(&buzzer),
        config.control.lux_on_threshold,
        config.timing.buzzer_duration_ticks,
    );
    let mut station = Station::new(
        TerminalDisplay::new(config.display.columns, config.display.rows),
        sim::SimLightSensor::new(Arc::clone(&world)),
        sim::SimClimateSensor::new(Arc::clone(&world)),
        actuators,
        Arc::clone(&shared),
        config.display.columns,
    );

    station
        .start(config.timing.startup_banner_ms)
        .context("station start-up failed")?;

    let scheduler = TickScheduler::new(
        &config.timing,
        platform.rain_line(),
        Arc::clone(&buzzer),
        Arc::clone(&shared),
    );
    install(
        &mut platform,
        Arc::clone(&shared),
        scheduler,
        Duration::from_millis(config.timing.tick_period_ms),
    )
    .context("installing interrupt handlers")?;

    // First pass fills the screen and applies the light rule without
    // waiting out the poll intervals.
    shared.work.luminosity_due.raise();
    shared.work.climate_due.raise();

    sim::spawn_console(world, platform, Arc::clone(&shared), Arc::clone(&stop))
        .context("starting the console thread")?;

    station.run(&stop);
    println!("Station stopped.");
    Ok(())
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    // Hardware mode is opt-in; the simulator needs no flags and no wiring.
    let hardware_mode = env::args().any(|arg| arg == "--hardware");

    let config = Config::load();
    let shared = Arc::new(SharedState::new());
    let stop = Arc::new(AtomicBool::new(false));

    if hardware_mode {
        #[cfg(all(target_os = "linux", feature = "hardware"))]
        {
            return run_hardware(config, shared, stop);
        }

        #[cfg(all(target_os = "linux", not(feature = "hardware")))]
        eprintln!(
            "GPIO support not enabled. Rebuild with --features hardware; running the simulator instead."
        );

        #[cfg(not(target_os = "linux"))]
        eprintln!("Hardware mode is only available on Linux; running the simulator instead.");
    }

    run_simulator(config, shared, stop)
}
