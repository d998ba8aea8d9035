//! # Ambient Station Core Library
//!
//! This library provides the event and timing core for a small environmental
//! monitoring station: rain, presence, ambient light and climate sensing
//! driving a character display, an indicator pair and a buzzer. It is
//! written for a Raspberry Pi deployment but everything here is host
//! testable; hardware only enters through small traits.
//!
//! ## Design Philosophy
//!
//! ### Two contexts, one hand-off
//! The design splits work between interrupt context (the periodic tick and
//! GPIO edge callbacks) and a single-threaded main loop:
//! - **Interrupt side**: constant-time bookkeeping only. Increment the tick
//!   counter, debounce the rain line, step the buzzer countdown, classify
//!   edges. Never touches the sensor bus or the display.
//! - **Main loop**: drains single-bit pending-work flags each pass and does
//!   all the slow work: bus reads, rule evaluation and display writes.
//!
//! The only bridge between the two is [`SharedState`]: a fixed set of
//! atomic [`flags::EventFlag`]s plus the rain state and buzzer countdown.
//! Producers raise flags; the main loop consumes them with an atomic
//! test-and-clear, so an event firing during its own handling survives to
//! the next pass. Flags are "at least once since last drain", not counters;
//! a burst of identical events collapses into a single pass.
//!
//! ### Timing without drift
//! One 1 ms tick drives everything. Poll intervals are derived by taking
//! the shared tick counter modulo each interval, so there is no per-event
//! re-arming and no accumulated drift; the debounce window and the buzzer
//! duration are counted in the same ticks.
//!
//! ### Data Flow
//! 1. **Lines**: raw GPIO levels → debounce / edge classification (interrupt side)
//! 2. **Flags**: qualifying changes raise pending-work bits
//! 3. **Loop**: [`Station::service`] drains flags → sensor reads → [`actuator`] rules → [`presenter`] output
//!
//! ## Core Types
//!
//! - [`Station`]: the main loop and its collaborators
//! - [`SharedState`]: everything interrupt context may touch
//! - [`TickScheduler`]: the per-tick handler
//! - [`Config`]: pin bindings and timing, loadable from `station-config.toml`

// Module declarations
pub mod actuator;
pub mod config;
pub mod debounce;
pub mod display;
pub mod edge;
pub mod flags;
pub mod lines;
pub mod platform;
pub mod presenter;
pub mod sensors;
pub mod station;
pub mod tick;

pub use actuator::Actuators;
pub use config::Config;
pub use debounce::DebouncedInput;
pub use display::{CharDisplay, DisplayError, TerminalDisplay};
pub use edge::{EdgePolicy, EdgeSource};
pub use flags::{EventFlag, PendingWork};
pub use lines::{InputLine, LatchLine, OutputLine};
pub use platform::{LevelHandler, Platform, PlatformError, TickHandler};
pub use sensors::{ClimateSensor, LightSensor, LightSensorError, SensorSnapshot};
pub use station::{install, SharedState, Station, StationError};
pub use tick::{BuzzerTimer, TickScheduler};
