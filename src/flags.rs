//! # Pending-Work Flags
//!
//! Single-bit hand-off between interrupt context and the main loop. Handlers
//! (tick and edge callbacks) only ever *raise* a flag; the main loop *takes*
//! it with an atomic test-and-clear immediately before acting, so a flag
//! raised again mid-handling survives to the next service pass.
//!
//! A flag means "this happened at least once since the last drain". It is not
//! a counter: bursts faster than the main loop collapse into a single
//! deferred action. That is the intended semantics for every consumer here
//! (re-rendering twice for two rain transitions in one pass would show the
//! same screen anyway).

use std::sync::atomic::{AtomicBool, Ordering};

/// One deferred unit of work, producer-side set only, consumer-side
/// test-and-clear only.
///
/// # Example
/// ```
/// use ambient_station_lib::flags::EventFlag;
///
/// let flag = EventFlag::new();
/// flag.raise();
/// assert!(flag.take());
/// assert!(!flag.take()); // cleared by the first take
/// ```
#[derive(Debug, Default)]
pub struct EventFlag {
    raised: AtomicBool,
}

impl EventFlag {
    pub const fn new() -> Self {
        EventFlag {
            raised: AtomicBool::new(false),
        }
    }

    /// Mark the work as pending. Safe from any context; never blocks.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::Release);
    }

    /// Atomically consume the flag. Returns true if work was pending.
    ///
    /// The swap pairs with the `Release` store in [`raise`](Self::raise), so
    /// state written by the producer before raising is visible to the
    /// consumer after a successful take.
    pub fn take(&self) -> bool {
        self.raised.swap(false, Ordering::Acquire)
    }

    /// Peek without consuming. Diagnostic use only; the main loop must go
    /// through [`take`](Self::take).
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::Acquire)
    }
}

/// The station's complete flag set. One field per deferred action; fixed at
/// compile time, no registration machinery.
#[derive(Debug, Default)]
pub struct PendingWork {
    /// Debounced rain state changed; the display needs re-rendering.
    pub rain_changed: EventFlag,
    /// Luminosity poll interval elapsed; re-evaluate the light rule.
    pub luminosity_due: EventFlag,
    /// Climate poll interval elapsed; read temperature and humidity.
    pub climate_due: EventFlag,
    /// Manual light toggle was pressed.
    pub light_toggle: EventFlag,
    /// Presence detector saw a rising edge.
    pub presence: EventFlag,
}

impl PendingWork {
    pub const fn new() -> Self {
        PendingWork {
            rain_changed: EventFlag::new(),
            luminosity_due: EventFlag::new(),
            climate_due: EventFlag::new(),
            light_toggle: EventFlag::new(),
            presence: EventFlag::new(),
        }
    }
}
