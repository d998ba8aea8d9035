//! # Digital Line Abstraction
//!
//! The core never talks to GPIO directly. It sees logical levels through the
//! [`InputLine`] and [`OutputLine`] traits; platform adapters (rppal on the
//! Pi, latches in the simulator and tests) resolve electrical polarity, so
//! `true` always means "active" regardless of wiring.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A readable digital line, already polarity-resolved.
pub trait InputLine {
    /// Current logical level. `true` = active.
    fn is_active(&self) -> bool;
}

/// A drivable digital line, already polarity-resolved.
///
/// Writes are idempotent by contract: setting a line to the level it already
/// holds is a no-op at the hardware layer, so callers may re-apply state
/// freely.
pub trait OutputLine {
    fn set_active(&self, active: bool);
}

/// In-memory line backed by an atomic, usable as both input and output.
///
/// The simulator drives one side (stimulus thread as input, main loop
/// observing outputs) and tests inspect it directly. Shared via `Arc` across
/// the tick handler and the main loop, like a real pin register.
#[derive(Debug, Default)]
pub struct LatchLine {
    active: AtomicBool,
}

impl LatchLine {
    pub const fn new(initial: bool) -> Self {
        LatchLine {
            active: AtomicBool::new(initial),
        }
    }

    /// Set the level and return the previous one. Lets wrappers report
    /// transitions without a separate read.
    pub fn swap_active(&self, active: bool) -> bool {
        self.active.swap(active, Ordering::AcqRel)
    }
}

impl InputLine for LatchLine {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl OutputLine for LatchLine {
    fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Release);
    }
}

// Shared handles forward to the underlying line, so a pin can be owned by
// both the tick handler and the main loop.
impl<L: InputLine + ?Sized> InputLine for Arc<L> {
    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}

impl<L: OutputLine + ?Sized> OutputLine for Arc<L> {
    fn set_active(&self, active: bool) {
        (**self).set_active(active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_reflects_last_write() {
        let line = LatchLine::new(false);
        assert!(!line.is_active());

        line.set_active(true);
        assert!(line.is_active());

        line.set_active(false);
        assert!(!line.is_active());
    }

    #[test]
    fn swap_reports_previous_level() {
        let line = LatchLine::new(false);
        assert!(!line.swap_active(true), "previous level was inactive");
        assert!(line.swap_active(true), "level already active");
        assert!(line.swap_active(false));
    }

    #[test]
    fn arc_handle_drives_the_same_line() {
        let line = Arc::new(LatchLine::new(false));
        let handle = Arc::clone(&line);

        handle.set_active(true);
        assert!(line.is_active(), "write through the clone must be visible");
        assert!(handle.is_active());
    }
}
