// crates/media-engine/src/device.rs
//! Backend that plays local files on the default output device

use crate::adapter::{AudioBackend, AudioEvent, AudioHandle, EventSink};
use crate::playback_thread::{PlaybackCommand, PlaybackThread, SharedPlayback};
use std::path::PathBuf;
use std::sync::Arc;

/// Resolves episode sources against a media directory
///
/// Sources such as `/audio/episode-1.mp3` are looked up under `media_root`
/// when one is set. Remote URLs are not streamed.
#[derive(Debug, Clone, Default)]
pub struct DeviceBackend {
    media_root: Option<PathBuf>,
}

impl DeviceBackend {
    pub fn new(media_root: Option<PathBuf>) -> Self {
        Self { media_root }
    }

    pub fn resolve(&self, source: &str) -> Option<PathBuf> {
        if is_remote(source) {
            return None;
        }
        match &self.media_root {
            Some(root) => Some(root.join(source.trim_start_matches('/'))),
            None => Some(PathBuf::from(source)),
        }
    }
}

fn is_remote(source: &str) -> bool {
    let lower = source.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl AudioBackend for DeviceBackend {
    fn open(&mut self, source: &str, events: EventSink) -> Box<dyn AudioHandle> {
        let Some(path) = self.resolve(source) else {
            events.emit(AudioEvent::LoadError(format!(
                "remote source not supported: {}",
                source
            )));
            return Box::new(DeviceHandle::inert());
        };

        match PlaybackThread::start(&path, events.clone()) {
            Ok(thread) => Box::new(DeviceHandle::new(thread)),
            Err(e) => {
                events.emit(AudioEvent::LoadError(e.to_string()));
                Box::new(DeviceHandle::inert())
            }
        }
    }

    fn name(&self) -> &'static str {
        "device"
    }
}

pub struct DeviceHandle {
    thread: Option<PlaybackThread>,
    shared: Arc<SharedPlayback>,
}

impl DeviceHandle {
    fn new(thread: PlaybackThread) -> Self {
        let shared = Arc::clone(thread.shared());
        Self {
            thread: Some(thread),
            shared,
        }
    }

    /// A handle whose source never loaded
    fn inert() -> Self {
        Self {
            thread: None,
            shared: Arc::new(SharedPlayback::new()),
        }
    }

    fn send(&self, command: PlaybackCommand) {
        if let Some(thread) = &self.thread {
            if let Err(e) = thread.send_command(command) {
                log::warn!("{}", e);
            }
        }
    }
}

impl AudioHandle for DeviceHandle {
    fn play(&mut self) {
        self.send(PlaybackCommand::Play);
    }

    fn pause(&mut self) {
        self.send(PlaybackCommand::Pause);
    }

    fn seek(&mut self, seconds: f64) -> f64 {
        let target = match self.shared.duration() {
            Some(duration) => seconds.clamp(0.0, duration),
            None => seconds.max(0.0),
        };
        self.send(PlaybackCommand::Seek(target));
        self.shared.set_position(target);
        target
    }

    fn position(&self) -> f64 {
        self.shared.position()
    }

    fn duration(&self) -> Option<f64> {
        self.shared.duration()
    }

    fn is_playing(&self) -> bool {
        self.shared.is_playing()
    }

    fn release(&mut self) {
        if let Some(mut thread) = self.thread.take() {
            thread.stop();
        }
    }
}

impl Drop for DeviceHandle {
    fn drop(&mut self) {
        self.release();
    }
}
