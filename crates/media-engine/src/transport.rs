//! Transport controls
//!
//! These only issue requests. Playing state changes when the engine
//! confirms through its events.

use crate::turntable::Turntable;

impl Turntable {
    /// Pauses when the engine reports playing, otherwise asks it to play
    pub fn toggle_play(&mut self) {
        if let Some(session) = self.session_mut() {
            session.toggle();
        }
    }

    /// Selects the previous episode; returns false at the first one
    pub fn previous(&mut self) -> bool {
        match self.current_index() {
            Some(index) if index > self.catalog().first_index() => self.select_episode(index - 1).is_ok(),
            _ => false,
        }
    }

    /// Selects the next episode; returns false at the last one
    pub fn next(&mut self) -> bool {
        match self.current_index() {
            Some(index) if self.catalog().has_next(index) => self.select_episode(index + 1).is_ok(),
            _ => false,
        }
    }

    /// Seeks to `fraction` of the episode, clamped to `[0, 1]`
    ///
    /// Does nothing while the duration is unknown or for NaN.
    pub fn seek_to_fraction(&mut self, fraction: f64) -> Option<f64> {
        self.session_mut()?.seek_to_fraction(fraction)
    }
}
