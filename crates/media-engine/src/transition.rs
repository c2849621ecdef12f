// crates/media-engine/src/transition.rs
//! Decorative episode-change transition
//!
//! Two flags with their own deadlines. Starting a transition overwrites both
//! deadlines and bumps the generation, so a window opened by an earlier
//! selection can never clear the flags of a later one.

use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_SLEEVE_REVEAL: Duration = Duration::from_millis(2500);
pub const DEFAULT_DISK_SWAP: Duration = Duration::from_millis(1200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStage {
    SleeveReveal,
    DiskSwap,
}

/// How long each flag stays raised after a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionWindows {
    pub sleeve_reveal: Duration,
    pub disk_swap: Duration,
}

impl Default for TransitionWindows {
    fn default() -> Self {
        Self {
            sleeve_reveal: DEFAULT_SLEEVE_REVEAL,
            disk_swap: DEFAULT_DISK_SWAP,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransitionState {
    windows: TransitionWindows,
    generation: u64,
    sleeve_until: Option<Instant>,
    swap_until: Option<Instant>,
}

impl TransitionState {
    pub fn new(windows: TransitionWindows) -> Self {
        Self {
            windows,
            generation: 0,
            sleeve_until: None,
            swap_until: None,
        }
    }

    /// Raises both flags, superseding any transition in flight
    pub fn begin(&mut self, now: Instant) -> u64 {
        self.generation += 1;
        self.sleeve_until = Some(now + self.windows.sleeve_reveal);
        self.swap_until = Some(now + self.windows.disk_swap);
        self.generation
    }

    /// Lowers every flag whose deadline has passed
    pub fn expire(&mut self, now: Instant) -> Vec<TransitionStage> {
        let mut cleared = Vec::new();

        if self.swap_until.is_some_and(|deadline| deadline <= now) {
            self.swap_until = None;
            cleared.push(TransitionStage::DiskSwap);
        }
        if self.sleeve_until.is_some_and(|deadline| deadline <= now) {
            self.sleeve_until = None;
            cleared.push(TransitionStage::SleeveReveal);
        }

        if !cleared.is_empty() {
            log::trace!("Transition {} cleared {:?}", self.generation, cleared);
        }
        cleared
    }

    /// Drops pending deadlines without waiting for them
    pub fn cancel(&mut self) {
        self.sleeve_until = None;
        self.swap_until = None;
    }

    pub fn sleeve_visible(&self) -> bool {
        self.sleeve_until.is_some()
    }

    pub fn disk_swapping(&self) -> bool {
        self.swap_until.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.sleeve_visible() || self.disk_swapping()
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.sleeve_until, self.swap_until) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn windows(&self) -> TransitionWindows {
        self.windows
    }
}

impl Default for TransitionState {
    fn default() -> Self {
        Self::new(TransitionWindows::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_flags_clear_at_their_windows() {
        let t0 = Instant::now();
        let mut state = TransitionState::default();
        state.begin(t0);
        assert!(state.sleeve_visible());
        assert!(state.disk_swapping());
        assert_eq!(state.next_deadline(), Some(t0 + ms(1200)));

        assert!(state.expire(t0 + ms(1199)).is_empty());
        assert_eq!(state.expire(t0 + ms(1200)), vec![TransitionStage::DiskSwap]);
        assert!(!state.disk_swapping());
        assert!(state.sleeve_visible());

        assert_eq!(state.expire(t0 + ms(2500)), vec![TransitionStage::SleeveReveal]);
        assert!(!state.is_active());
        assert_eq!(state.next_deadline(), None);
    }

    #[test]
    fn test_supersede_never_clears_early() {
        let t0 = Instant::now();
        let mut state = TransitionState::default();
        let first = state.begin(t0);
        let second = state.begin(t0 + ms(1000));
        assert!(second > first);

        // the first selection's swap window would have ended here
        state.expire(t0 + ms(1200));
        assert!(state.disk_swapping());

        state.expire(t0 + ms(2200));
        assert!(!state.disk_swapping());

        // and its sleeve window here
        state.expire(t0 + ms(2500));
        assert!(state.sleeve_visible());

        state.expire(t0 + ms(3500));
        assert!(!state.sleeve_visible());
    }

    #[test]
    fn test_cancel_lowers_flags() {
        let mut state = TransitionState::default();
        state.begin(Instant::now());
        state.cancel();
        assert!(!state.is_active());
        assert_eq!(state.generation(), 1);
    }

    #[test]
    fn test_custom_windows() {
        let t0 = Instant::now();
        let mut state = TransitionState::new(TransitionWindows {
            sleeve_reveal: ms(300),
            disk_swap: ms(100),
        });
        state.begin(t0);
        state.expire(t0 + ms(300));
        assert!(!state.is_active());
    }
}
