//! # Platform Abstraction
//!
//! The seam between the portable core and whatever delivers interrupts. A
//! platform owns the tick source and the edge-interrupt lines; the station
//! hands it callbacks at start-up and never talks to it again. On the Pi the
//! callbacks run on rppal's interrupt threads; in the simulator they run on
//! the stimulus thread. Either way they are the "interrupt context" of this
//! design: short, non-blocking, no bus or display access.

use std::time::Duration;
use thiserror::Error;

/// Callback invoked once per scheduler tick.
pub type TickHandler = Box<dyn FnMut() + Send + 'static>;

/// Callback invoked with the new logical level on each line transition.
pub type LevelHandler = Box<dyn FnMut(bool) + Send + 'static>;

/// Errors from platform bring-up.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("gpio error: {0}")]
    Gpio(String),
    #[error("ticker error: {0}")]
    Ticker(String),
}

/// Interrupt delivery for one board (or one simulation).
pub trait Platform {
    /// Start the periodic tick source. Called once.
    fn start_ticker(
        &mut self,
        period: Duration,
        handler: TickHandler,
    ) -> Result<(), PlatformError>;

    /// Register the presence-line transition callback. Called once.
    fn watch_presence(&mut self, handler: LevelHandler) -> Result<(), PlatformError>;

    /// Register the toggle-line transition callback. Called once.
    fn watch_toggle(&mut self, handler: LevelHandler) -> Result<(), PlatformError>;

    /// Current logical level of the presence line, for seeding edge
    /// baselines at registration time.
    fn presence_level(&self) -> bool;

    /// Current logical level of the toggle line.
    fn toggle_level(&self) -> bool;
}
