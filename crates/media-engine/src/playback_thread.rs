// FILE: crates/media-engine/src/playback_thread.rs
//! Decoder thread behind a device handle
//!
//! The thread owns the decoder and the output stream. It takes commands over
//! a crossbeam channel and reports every state change as an [`AudioEvent`].

use crate::adapter::{AudioEvent, EventSink};
use crate::decoder::AudioDecoder;
use crate::error::{EngineError, EngineResult};
use crate::output::AudioOutput;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration as StdDuration;

/// Commands sent to the playback thread
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackCommand {
    Play,
    Pause,
    Seek(f64),
    Stop,
}

/// Values the thread publishes for lock-free reads
#[derive(Debug)]
pub struct SharedPlayback {
    position: AtomicU64,
    duration: AtomicU64,
    playing: AtomicBool,
    running: AtomicBool,
}

impl SharedPlayback {
    pub fn new() -> Self {
        Self {
            position: AtomicU64::new(0f64.to_bits()),
            duration: AtomicU64::new(f64::NAN.to_bits()),
            playing: AtomicBool::new(false),
            running: AtomicBool::new(true),
        }
    }

    pub fn position(&self) -> f64 {
        f64::from_bits(self.position.load(Ordering::Relaxed))
    }

    pub fn set_position(&self, seconds: f64) {
        self.position.store(seconds.to_bits(), Ordering::Relaxed);
    }

    pub fn duration(&self) -> Option<f64> {
        let duration = f64::from_bits(self.duration.load(Ordering::Relaxed));
        (duration.is_finite() && duration > 0.0).then_some(duration)
    }

    fn set_duration(&self, seconds: Option<f64>) {
        let bits = seconds.unwrap_or(f64::NAN).to_bits();
        self.duration.store(bits, Ordering::Relaxed);
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Relaxed)
    }

    fn set_playing(&self, playing: bool) {
        self.playing.store(playing, Ordering::Relaxed);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

impl Default for SharedPlayback {
    fn default() -> Self {
        Self::new()
    }
}

/// Playback thread handle
pub struct PlaybackThread {
    handle: Option<thread::JoinHandle<()>>,
    command_tx: Sender<PlaybackCommand>,
    shared: Arc<SharedPlayback>,
}

impl PlaybackThread {
    /// Spawns the thread for `path`
    ///
    /// Probe and decode failures are reported through `events` rather than
    /// returned.
    pub fn start(path: &Path, events: EventSink) -> EngineResult<Self> {
        let path = path.to_path_buf();
        let shared = Arc::new(SharedPlayback::new());
        let (command_tx, command_rx) = bounded(16);

        let thread_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name(format!("playback-{}", events.adapter().value()))
            .spawn(move || {
                let failure_sink = events.clone();
                if let Err(e) = playback_loop(&path, command_rx, &thread_shared, events) {
                    log::error!("Playback thread error: {}", e);
                    failure_sink.emit(AudioEvent::PlayError(e.to_string()));
                }
                thread_shared.set_playing(false);
                thread_shared.running.store(false, Ordering::Relaxed);
            })?;

        Ok(Self {
            handle: Some(handle),
            command_tx,
            shared,
        })
    }

    /// Send a command to the playback thread
    pub fn send_command(&self, cmd: PlaybackCommand) -> EngineResult<()> {
        self.command_tx
            .send(cmd)
            .map_err(|e| EngineError::InvalidState(format!("Failed to send command: {}", e)))
    }

    pub fn shared(&self) -> &Arc<SharedPlayback> {
        &self.shared
    }

    /// Stops the thread and waits for it to exit
    pub fn stop(&mut self) {
        self.shared.running.store(false, Ordering::Relaxed);
        let _ = self.send_command(PlaybackCommand::Stop);

        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for PlaybackThread {
    fn drop(&mut self) {
        self.stop();
    }
}

fn playback_loop(
    path: &Path,
    command_rx: Receiver<PlaybackCommand>,
    shared: &SharedPlayback,
    events: EventSink,
) -> EngineResult<()> {
    let mut decoder = match AudioDecoder::open(path) {
        Ok(decoder) => decoder,
        Err(e) => {
            events.emit(AudioEvent::LoadError(e.to_string()));
            return Ok(());
        }
    };
    let spec = *decoder.spec();
    shared.set_duration(decoder.duration());
    events.emit(AudioEvent::Loaded);

    let (audio_tx, audio_rx) = bounded::<Vec<f32>>(4);
    let mut output: Option<AudioOutput> = None;
    let mut playing = false;
    let mut current_position = 0.0_f64;

    while shared.is_running() {
        let command = if playing {
            command_rx.try_recv().ok()
        } else {
            match command_rx.recv_timeout(StdDuration::from_millis(50)) {
                Ok(command) => Some(command),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        };

        match command {
            Some(PlaybackCommand::Play) if !playing => {
                if output.is_none() {
                    match start_output(spec.rate, spec.channels.count() as u16, &audio_rx) {
                        Ok(started) => output = Some(started),
                        Err(e) => {
                            events.emit(AudioEvent::PlayError(e.to_string()));
                            continue;
                        }
                    }
                }
                if decoder.duration().is_some_and(|d| current_position >= d) {
                    decoder.seek(0.0)?;
                    current_position = 0.0;
                    shared.set_position(0.0);
                }
                playing = true;
                shared.set_playing(true);
                events.emit(AudioEvent::Play);
            }
            Some(PlaybackCommand::Pause) if playing => {
                playing = false;
                shared.set_playing(false);
                events.emit(AudioEvent::Pause);
            }
            Some(PlaybackCommand::Seek(time)) => match decoder.seek(time) {
                Ok(landed) => {
                    current_position = landed;
                    shared.set_position(landed);
                    events.emit(AudioEvent::Seeked);
                }
                Err(e) => log::warn!("Seek to {:.1}s failed: {}", time, e),
            },
            Some(PlaybackCommand::Stop) => break,
            Some(_) | None => {}
        }

        if !playing {
            continue;
        }

        match decoder.decode_next()? {
            Some(decoded) => {
                let channels = decoded.spec.channels.count().max(1);
                let frames = decoded.samples.len() / channels;
                current_position += frames as f64 / f64::from(decoded.spec.rate);
                shared.set_position(current_position);

                if audio_tx.send(decoded.samples).is_err() {
                    break;
                }
            }
            None => {
                playing = false;
                shared.set_playing(false);
                if let Some(duration) = decoder.duration() {
                    current_position = duration;
                    shared.set_position(duration);
                }
                log::info!("Playback finished");
                events.emit(AudioEvent::Ended);
            }
        }
    }

    if let Some(mut output) = output {
        output.stop();
    }
    Ok(())
}

fn start_output(
    sample_rate: u32,
    channels: u16,
    audio_rx: &Receiver<Vec<f32>>,
) -> EngineResult<AudioOutput> {
    let mut output = AudioOutput::new(sample_rate, channels)?;
    output.play(audio_rx.clone())?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{AdapterEvent, AdapterId};
    use tokio::sync::mpsc;

    #[test]
    fn test_shared_defaults() {
        let shared = SharedPlayback::new();
        assert_eq!(shared.position(), 0.0);
        assert_eq!(shared.duration(), None);
        assert!(!shared.is_playing());
        assert!(shared.is_running());
    }

    #[test]
    fn test_missing_file_reports_load_error() {
        let (tx, mut rx) = mpsc::unbounded_channel::<AdapterEvent>();
        let sink = EventSink::new(AdapterId::new(9), tx);

        let mut thread = PlaybackThread::start(Path::new("nonexistent.mp3"), sink).unwrap();
        let event = rx.blocking_recv().unwrap();
        assert_eq!(event.adapter, AdapterId::new(9));
        assert!(matches!(event.event, AudioEvent::LoadError(_)));

        thread.stop();
        assert!(!thread.shared().is_running());
    }
}
