// crates/media-engine/src/adapter.rs
//! Audio engine adapter boundary
//!
//! A backend opens one handle per episode. Handles never report state by
//! return value alone: every lifecycle change arrives later as an
//! [`AudioEvent`] on the [`EventSink`] the handle was opened with. Each sink
//! is stamped with the [`AdapterId`] of its handle so the player can drop
//! events from handles it has already replaced.

use std::fmt;
use tokio::sync::mpsc::UnboundedSender;

/// Identity of one opened handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AdapterId(u64);

impl AdapterId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AdapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "adapter#{}", self.0)
    }
}

/// Lifecycle notifications emitted by an audio handle
#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    /// Metadata (at least the duration) is available
    Loaded,
    Play,
    Pause,
    Stop,
    Ended,
    Seeked,
    /// The source could not be opened or probed
    LoadError(String),
    /// Playback was refused or the output failed
    PlayError(String),
}

/// An event together with the handle that produced it
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterEvent {
    pub adapter: AdapterId,
    pub event: AudioEvent,
}

/// Channel end handed to a backend when a handle is opened
#[derive(Debug, Clone)]
pub struct EventSink {
    adapter: AdapterId,
    tx: UnboundedSender<AdapterEvent>,
}

impl EventSink {
    pub fn new(adapter: AdapterId, tx: UnboundedSender<AdapterEvent>) -> Self {
        Self { adapter, tx }
    }

    pub fn adapter(&self) -> AdapterId {
        self.adapter
    }

    /// Delivers an event; returns false once the player is gone
    pub fn emit(&self, event: AudioEvent) -> bool {
        self.tx
            .send(AdapterEvent {
                adapter: self.adapter,
                event,
            })
            .is_ok()
    }
}

/// One loaded, playable audio source
///
/// `play` and `pause` are requests. Whether they took effect is reported
/// through the event sink, never assumed by the caller.
pub trait AudioHandle: Send {
    fn play(&mut self);

    fn pause(&mut self);

    /// Moves the playhead and returns the position actually applied
    fn seek(&mut self, seconds: f64) -> f64;

    /// Current playhead in seconds
    fn position(&self) -> f64;

    /// Total length in seconds, once metadata has loaded
    fn duration(&self) -> Option<f64>;

    fn is_playing(&self) -> bool;

    /// Stops output and frees the underlying resources. Idempotent.
    fn release(&mut self);
}

/// Factory for audio handles
pub trait AudioBackend: Send {
    /// Opens `source` with metadata-only preload
    ///
    /// Failures are not returned here; they arrive as
    /// [`AudioEvent::LoadError`] on `events`.
    fn open(&mut self, source: &str, events: EventSink) -> Box<dyn AudioHandle>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_sink_stamps_adapter_id() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = EventSink::new(AdapterId::new(3), tx);

        assert!(sink.emit(AudioEvent::Loaded));
        let received = rx.try_recv().unwrap();
        assert_eq!(received.adapter, AdapterId::new(3));
        assert_eq!(received.event, AudioEvent::Loaded);
    }

    #[test]
    fn test_emit_after_receiver_dropped() {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = EventSink::new(AdapterId::new(1), tx);
        drop(rx);
        assert!(!sink.emit(AudioEvent::Play));
    }

    #[test]
    fn test_adapter_id_display() {
        assert_eq!(AdapterId::new(12).to_string(), "adapter#12");
    }
}
