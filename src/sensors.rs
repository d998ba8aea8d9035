//! # Sensor Collaborators
//!
//! The light and climate sensors are external drivers behind small traits;
//! this crate only defines what it needs from them. Both are slow bus
//! devices, so they are only ever touched from the main loop, never from
//! tick or edge handlers.
//!
//! Readings are unreliable by nature: the climate sensor signals a failed
//! read with NaN per channel, and the light sensor can return garbage on a
//! bus error. [`SensorSnapshot`] is the defense: it keeps the last valid
//! value per field and refuses invalid overwrites, so the display always
//! shows the most recent reading that actually happened.

use thiserror::Error;

/// Errors from ambient-light sensor initialization.
///
/// Only start-up is fallible through this type; a failed `begin` is fatal
/// for the station (there is no useful degraded mode without the light
/// rule). Per-read failures surface as implausible lux values instead.
#[derive(Debug, Error)]
pub enum LightSensorError {
    #[error("light sensor did not respond during initialization")]
    NotResponding,
    #[error("light sensor bus error: {0}")]
    Bus(String),
}

/// Ambient-light sensor driver interface.
pub trait LightSensor {
    /// One-time start-up initialization. An error here is fatal.
    fn begin(&mut self) -> Result<(), LightSensorError>;

    /// Current illuminance in lux. May return NaN or a negative value on a
    /// bus failure; callers must tolerate implausible readings.
    fn read_light_level(&mut self) -> f32;
}

/// Temperature/humidity sensor driver interface.
///
/// The two channels fail independently; each read returns NaN when that
/// conversion did not complete.
pub trait ClimateSensor {
    /// Temperature in degrees Celsius, NaN on a failed read.
    fn read_temperature(&mut self) -> f32;

    /// Relative humidity in percent, NaN on a failed read.
    fn read_humidity(&mut self) -> f32;
}

/// Last valid climate readings, per field.
///
/// Fields start empty and are never cleared; an invalid read leaves the
/// previous value in place. The presenter shows placeholders until the
/// first valid read lands.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorSnapshot {
    pub temperature_c: Option<f32>,
    pub humidity_pct: Option<f32>,
}

impl SensorSnapshot {
    pub const fn new() -> Self {
        SensorSnapshot {
            temperature_c: None,
            humidity_pct: None,
        }
    }

    /// Accept a temperature reading unless it is NaN. Returns whether the
    /// field was updated.
    pub fn record_temperature(&mut self, reading: f32) -> bool {
        if reading.is_nan() {
            return false;
        }
        self.temperature_c = Some(reading);
        true
    }

    /// Accept a humidity reading unless it is NaN. Returns whether the
    /// field was updated.
    pub fn record_humidity(&mut self, reading: f32) -> bool {
        if reading.is_nan() {
            return false;
        }
        self.humidity_pct = Some(reading);
        true
    }
}
