//! # Digital Input Debouncing
//!
//! Counter-based debounce for noisy lines, sampled once per scheduler tick.
//! A raw level only becomes the stable level after it has been seen on every
//! one of `window` consecutive samples; any sample that reverts resets the
//! dwell count, so contact bounce and rain-sensor chatter faster than the
//! window never surface as state changes.

/// Debounce filter for one digital line.
///
/// Owned by the tick handler; not shared. Callers feed one raw sample per
/// tick and receive `Some(new_stable)` on the sample that commits a change.
///
/// # Example
/// ```
/// use ambient_station_lib::debounce::DebouncedInput;
///
/// let mut input = DebouncedInput::new(false, 3);
/// assert_eq!(input.sample(true), None); // dwell 1
/// assert_eq!(input.sample(true), None); // dwell 2
/// assert_eq!(input.sample(true), Some(true)); // dwell 3 commits
/// assert!(input.stable());
/// ```
#[derive(Debug, Clone)]
pub struct DebouncedInput {
    stable: bool,
    candidate: bool,
    dwell: u32,
    window: u32,
}

impl DebouncedInput {
    /// `window` is the number of consecutive agreeing samples required to
    /// commit a change; must be at least 1.
    pub fn new(initial: bool, window: u32) -> Self {
        DebouncedInput {
            stable: initial,
            candidate: initial,
            dwell: 0,
            window: window.max(1),
        }
    }

    /// The debounced level.
    pub fn stable(&self) -> bool {
        self.stable
    }

    /// Feed one raw sample. Returns the new stable level on the exact sample
    /// that completes the window, `None` otherwise.
    pub fn sample(&mut self, raw: bool) -> Option<bool> {
        if raw != self.candidate {
            // Candidate switched; the dwell count starts over.
            self.candidate = raw;
            self.dwell = 0;
        }

        if self.candidate == self.stable {
            self.dwell = 0;
            return None;
        }

        self.dwell += 1;
        if self.dwell >= self.window {
            self.stable = self.candidate;
            self.dwell = 0;
            return Some(self.stable);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive `n` identical samples, returning the change if one committed.
    fn feed(input: &mut DebouncedInput, raw: bool, n: u32) -> Option<bool> {
        let mut change = None;
        for _ in 0..n {
            if let Some(stable) = input.sample(raw) {
                assert!(change.is_none(), "a single run must commit at most once");
                change = Some(stable);
            }
        }
        change
    }

    #[test]
    fn change_commits_exactly_at_the_window() {
        let mut input = DebouncedInput::new(false, 200);

        assert_eq!(feed(&mut input, true, 199), None, "one short of the window");
        assert_eq!(input.sample(true), Some(true), "200th sample commits");
        assert!(input.stable());
    }

    #[test]
    fn bounce_shorter_than_window_is_absorbed() {
        let mut input = DebouncedInput::new(false, 200);

        // 50-tick flickers, far below the 200-tick window.
        for _ in 0..6 {
            assert_eq!(feed(&mut input, true, 50), None);
            assert_eq!(feed(&mut input, false, 50), None);
        }
        assert!(!input.stable(), "oscillation must never reach stable");
    }

    #[test]
    fn revert_resets_the_dwell_count() {
        let mut input = DebouncedInput::new(false, 100);

        feed(&mut input, true, 99);
        feed(&mut input, false, 1); // reverted at the last moment
        assert_eq!(
            feed(&mut input, true, 99),
            None,
            "dwell must restart from zero after a revert"
        );
        assert_eq!(input.sample(true), Some(true));
    }

    #[test]
    fn committed_level_reports_no_further_changes() {
        let mut input = DebouncedInput::new(false, 10);

        assert_eq!(feed(&mut input, true, 10), Some(true));
        assert_eq!(feed(&mut input, true, 500), None, "level is already stable");
        assert!(input.stable());
    }

    #[test]
    fn returns_to_original_level_after_second_window() {
        let mut input = DebouncedInput::new(false, 10);

        assert_eq!(feed(&mut input, true, 10), Some(true));
        assert_eq!(feed(&mut input, false, 10), Some(false));
        assert!(!input.stable());
    }

    #[test]
    fn window_of_one_commits_immediately() {
        let mut input = DebouncedInput::new(false, 1);
        assert_eq!(input.sample(true), Some(true));
        assert_eq!(input.sample(false), Some(false));
    }
}
