//! # Edge-Triggered Event Sources
//!
//! Turns level transitions on a line into one-shot pending-work flags. An
//! [`EdgeSource`] tracks the last observed level and fires on transitions
//! that match its policy; [`EdgeSource::into_handler`] packages it as the
//! callback a platform invokes from interrupt context.

use crate::flags::EventFlag;
use std::sync::Arc;

/// Which transitions qualify as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePolicy {
    /// Inactive to active only. Used for the presence detector: the alert
    /// fires when motion starts, not when it stops.
    Rising,
    /// Active to inactive only. Used for the light toggle button, which
    /// registers on release.
    Falling,
    /// Any change of level.
    Both,
}

impl EdgePolicy {
    fn matches(self, was: bool, now: bool) -> bool {
        match self {
            EdgePolicy::Rising => !was && now,
            EdgePolicy::Falling => was && !now,
            EdgePolicy::Both => was != now,
        }
    }
}

/// Transition detector for one line.
///
/// Seed it with the line's level at registration time so a hardware edge
/// that arrives immediately afterwards is classified against the real
/// baseline rather than an assumed one.
///
/// # Example
/// ```
/// use ambient_station_lib::edge::{EdgePolicy, EdgeSource};
///
/// let mut presence = EdgeSource::new(EdgePolicy::Rising, false);
/// assert!(presence.feed(true)); // rising edge
/// assert!(!presence.feed(true)); // level repeated, no transition
/// assert!(!presence.feed(false)); // falling edge ignored by policy
/// ```
#[derive(Debug)]
pub struct EdgeSource {
    policy: EdgePolicy,
    last: bool,
}

impl EdgeSource {
    pub fn new(policy: EdgePolicy, initial_level: bool) -> Self {
        EdgeSource {
            policy,
            last: initial_level,
        }
    }

    /// Observe a level. Returns true when the transition from the previous
    /// level qualifies under the policy.
    pub fn feed(&mut self, level: bool) -> bool {
        let was = self.last;
        self.last = level;
        self.policy.matches(was, level)
    }

    /// Package this source as an interrupt-side callback that raises one of
    /// the flags inside `state` on each qualifying edge. The selector is a
    /// plain fn pointer so the handler stays `Send` without capturing
    /// borrows.
    pub fn into_handler<S>(
        mut self,
        state: Arc<S>,
        flag: fn(&S) -> &EventFlag,
    ) -> impl FnMut(bool) + Send + 'static
    where
        S: Send + Sync + 'static,
    {
        move |level| {
            if self.feed(level) {
                flag(&state).raise();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::PendingWork;

    #[test]
    fn rising_policy_fires_only_on_activation() {
        let mut source = EdgeSource::new(EdgePolicy::Rising, false);
        assert!(source.feed(true));
        assert!(!source.feed(false));
        assert!(source.feed(true));
    }

    #[test]
    fn falling_policy_fires_only_on_release() {
        let mut source = EdgeSource::new(EdgePolicy::Falling, false);
        assert!(!source.feed(true), "press is not the event");
        assert!(source.feed(false), "release is");
    }

    #[test]
    fn both_policy_fires_on_every_transition() {
        let mut source = EdgeSource::new(EdgePolicy::Both, false);
        assert!(source.feed(true));
        assert!(source.feed(false));
        assert!(source.feed(true));
    }

    #[test]
    fn repeated_levels_are_not_transitions() {
        let mut source = EdgeSource::new(EdgePolicy::Both, false);
        assert!(!source.feed(false));
        assert!(!source.feed(false));
        assert!(source.feed(true));
        assert!(!source.feed(true));
    }

    #[test]
    fn baseline_suppresses_spurious_startup_edge() {
        // Line idles active at registration; the first callback reporting
        // that same level must not count as a rising edge.
        let mut source = EdgeSource::new(EdgePolicy::Rising, true);
        assert!(!source.feed(true));
        assert!(!source.feed(false));
        assert!(source.feed(true), "a genuine edge still fires");
    }

    #[test]
    fn handler_raises_the_selected_flag() {
        let work = Arc::new(PendingWork::new());
        let source = EdgeSource::new(EdgePolicy::Rising, false);
        let mut handler = source.into_handler(Arc::clone(&work), |w: &PendingWork| &w.presence);

        handler(true);
        assert!(work.presence.take(), "rising edge must raise the flag");

        handler(false);
        handler(false);
        assert!(!work.presence.take(), "no edge, no flag");
        assert!(!work.light_toggle.is_raised(), "other flags untouched");
    }
}
