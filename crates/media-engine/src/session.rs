//! The live session for one selected episode

use crate::adapter::{AdapterId, AudioEvent, AudioHandle};
use crate::sync::{PlaybackSynchronizer, SyncAction};

/// A handle plus the state derived from it
///
/// Sessions are never reused: changing episode releases this one and opens
/// a fresh one.
pub struct PlaybackSession {
    index: usize,
    adapter: AdapterId,
    handle: Box<dyn AudioHandle>,
    sync: PlaybackSynchronizer,
    released: bool,
}

impl PlaybackSession {
    pub fn new(index: usize, adapter: AdapterId, handle: Box<dyn AudioHandle>) -> Self {
        let mut sync = PlaybackSynchronizer::new();
        sync.begin_loading();
        Self {
            index,
            adapter,
            handle,
            sync,
            released: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn adapter(&self) -> AdapterId {
        self.adapter
    }

    pub fn sync(&self) -> &PlaybackSynchronizer {
        &self.sync
    }

    pub fn handle(&self) -> &dyn AudioHandle {
        self.handle.as_ref()
    }

    /// Applies an event; a final episode that ended is rewound on the handle
    pub fn apply(&mut self, event: &AudioEvent, has_next: bool) -> SyncAction {
        let action = self.sync.apply(event, self.handle.as_ref(), has_next);
        if matches!(event, AudioEvent::Ended) && action == SyncAction::None {
            self.handle.seek(0.0);
        }
        action
    }

    pub fn on_frame(&mut self) -> bool {
        self.sync.on_frame(self.handle.as_ref())
    }

    /// Asks the engine to play or pause; state follows from its events
    pub fn toggle(&mut self) {
        if self.handle.is_playing() {
            self.handle.pause();
        } else {
            self.handle.play();
        }
    }

    pub fn seek_to_fraction(&mut self, fraction: f64) -> Option<f64> {
        self.sync.seek_to_fraction(self.handle.as_mut(), fraction)
    }

    pub fn release(&mut self) {
        if !self.released {
            self.handle.release();
            self.released = true;
            log::debug!("Released {} (episode index {})", self.adapter, self.index);
        }
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.release();
    }
}
