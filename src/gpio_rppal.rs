//! rppal-backed line adapters and interrupt delivery for the Pi build.
//!
//! Inputs resolve their configured polarity here so the core only ever sees
//! logical levels; outputs are wrapped in a mutex because the line traits
//! take `&self` (the buzzer line is shared between the tick thread and the
//! main loop) while rppal writes need `&mut`.

use ambient_station_lib::config::PinConfig;
use ambient_station_lib::{
    InputLine, LevelHandler, OutputLine, Platform, PlatformError, TickHandler,
};
use rppal::gpio::{Gpio, InputPin, Level, OutputPin, Trigger};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

fn gpio_err(error: rppal::gpio::Error) -> PlatformError {
    PlatformError::Gpio(error.to_string())
}

/// Polarity-resolving input line.
pub struct RppalInput {
    pin: InputPin,
    active_low: bool,
}

impl InputLine for RppalInput {
    fn is_active(&self) -> bool {
        self.pin.is_high() != self.active_low
    }
}

/// Output line, active high.
pub struct RppalOutput {
    pin: Mutex<OutputPin>,
}

impl OutputLine for RppalOutput {
    fn set_active(&self, active: bool) {
        let mut pin = self.pin.lock().unwrap_or_else(|e| e.into_inner());
        if active {
            pin.set_high();
        } else {
            pin.set_low();
        }
    }
}

/// Open an input line. `pullup` enables the internal pull-up, for buttons
/// wired straight to ground.
pub fn open_input(
    gpio: &Gpio,
    bcm: u8,
    active_low: bool,
    pullup: bool,
) -> Result<RppalInput, PlatformError> {
    let pin = gpio.get(bcm).map_err(gpio_err)?;
    let pin = if pullup {
        pin.into_input_pullup()
    } else {
        pin.into_input()
    };
    Ok(RppalInput { pin, active_low })
}

/// Open an output line, driven low initially.
pub fn open_output(gpio: &Gpio, bcm: u8) -> Result<RppalOutput, PlatformError> {
    let pin = gpio.get(bcm).map_err(gpio_err)?.into_output_low();
    Ok(RppalOutput {
        pin: Mutex::new(pin),
    })
}

/// Real interrupt delivery: kernel edge interrupts for presence and toggle,
/// a dedicated thread for the tick.
pub struct RppalPlatform {
    presence: RppalInput,
    toggle: RppalInput,
    stop: Arc<AtomicBool>,
}

impl RppalPlatform {
    pub fn new(
        gpio: &Gpio,
        pins: &PinConfig,
        stop: Arc<AtomicBool>,
    ) -> Result<Self, PlatformError> {
        Ok(RppalPlatform {
            presence: open_input(gpio, pins.presence_bcm, pins.presence_active_low, false)?,
            toggle: open_input(gpio, pins.toggle_bcm, pins.toggle_active_low, true)?,
            stop,
        })
    }

    fn watch(input: &mut RppalInput, mut handler: LevelHandler) -> Result<(), PlatformError> {
        let active_low = input.active_low;
        input
            .pin
            .set_async_interrupt(Trigger::Both, move |level| {
                handler((level == Level::High) != active_low);
            })
            .map_err(gpio_err)
    }
}

impl Platform for RppalPlatform {
    fn start_ticker(
        &mut self,
        period: Duration,
        mut handler: TickHandler,
    ) -> Result<(), PlatformError> {
        let stop = Arc::clone(&self.stop);
        // Sleep-based cadence, same as the simulator. A hardware timer would
        // be tighter, but at 1 ms the scheduler only feeds polling paths and
        // the tolerance is wide.
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
        Self::watch(&mut self.presence, handler)
    }

    fn watch_toggle(&mut self, handler: LevelHandler) -> Result<(), PlatformError> {
        Self::watch(&mut self.toggle, handler)
    }

    fn presence_level(&self) -> bool {
        self.presence.is_active()
    }

    fn toggle_level(&self) -> bool {
        self.toggle.is_active()
    }
}
