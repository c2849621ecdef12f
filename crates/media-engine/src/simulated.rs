// crates/media-engine/src/simulated.rs
//! Virtual-clock backend
//!
//! Plays nothing. The playhead advances with (tokio) time while "playing"
//! and an end event fires when it reaches the duration. Used for headless
//! runs and for exercising the player without an output device.

use crate::adapter::{AudioBackend, AudioEvent, AudioHandle, EventSink};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use vinylcast_core::EpisodeCatalog;

#[derive(Debug, Clone, Default)]
pub struct SimulatedBackend {
    durations: HashMap<String, f64>,
    autoplay_blocked: bool,
}

impl SimulatedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Knows every catalog source, using the nominal durations
    pub fn from_catalog(catalog: &EpisodeCatalog) -> Self {
        let durations = catalog
            .iter()
            .map(|e| (e.audio_url.clone(), f64::from(e.duration)))
            .collect();
        Self {
            durations,
            autoplay_blocked: false,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>, duration_secs: f64) -> Self {
        self.durations.insert(source.into(), duration_secs);
        self
    }

    /// Rejects the first play request on every handle, as browsers do
    /// before any user interaction
    pub fn with_autoplay_blocked(mut self, blocked: bool) -> Self {
        self.autoplay_blocked = blocked;
        self
    }
}

impl AudioBackend for SimulatedBackend {
    fn open(&mut self, source: &str, events: EventSink) -> Box<dyn AudioHandle> {
        let clock = match self.durations.get(source) {
            Some(&duration) if duration.is_finite() && duration > 0.0 => {
                events.emit(AudioEvent::Loaded);
                Some(Arc::new(Mutex::new(VirtualClock::new(duration))))
            }
            _ => {
                events.emit(AudioEvent::LoadError(format!("source not found: {}", source)));
                None
            }
        };

        Box::new(SimulatedHandle {
            events,
            clock,
            reject_next_play: self.autoplay_blocked,
            end_timer: None,
            released: false,
        })
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

#[derive(Debug)]
struct VirtualClock {
    offset: f64,
    started: Option<Instant>,
    duration: f64,
}

impl VirtualClock {
    fn new(duration: f64) -> Self {
        Self {
            offset: 0.0,
            started: None,
            duration,
        }
    }

    fn position(&self) -> f64 {
        let position = match self.started {
            Some(started) => self.offset + started.elapsed().as_secs_f64(),
            None => self.offset,
        };
        position.min(self.duration)
    }

    fn is_running(&self) -> bool {
        self.started.is_some() && self.position() < self.duration
    }

    fn start(&mut self) {
        if self.started.is_none() {
            self.started = Some(Instant::now());
        }
    }

    fn halt(&mut self) {
        self.offset = self.position();
        self.started = None;
    }

    fn remaining(&self) -> Duration {
        Duration::from_secs_f64((self.duration - self.position()).max(0.0))
    }
}

fn lock(clock: &Mutex<VirtualClock>) -> MutexGuard<'_, VirtualClock> {
    clock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct SimulatedHandle {
    events: EventSink,
    clock: Option<Arc<Mutex<VirtualClock>>>,
    reject_next_play: bool,
    end_timer: Option<JoinHandle<()>>,
    released: bool,
}

impl SimulatedHandle {
    fn cancel_end_timer(&mut self) {
        if let Some(timer) = self.end_timer.take() {
            timer.abort();
        }
    }

    fn schedule_end(&mut self) {
        self.cancel_end_timer();
        let Some(clock) = self.clock.clone() else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::debug!("No runtime; {} will not report its end", self.events.adapter());
            return;
        };

        let remaining = lock(&clock).remaining();
        let events = self.events.clone();
        self.end_timer = Some(runtime.spawn(async move {
            tokio::time::sleep(remaining).await;
            let ended = {
                let mut clock = lock(&clock);
                if clock.started.is_some() {
                    clock.halt();
                    true
                } else {
                    false
                }
            };
            if ended {
                events.emit(AudioEvent::Ended);
            }
        }));
    }
}

impl AudioHandle for SimulatedHandle {
    fn play(&mut self) {
        if self.released {
            return;
        }
        let Some(clock) = self.clock.clone() else {
            self.events
                .emit(AudioEvent::PlayError("source is not loaded".to_string()));
            return;
        };
        if self.reject_next_play {
            self.reject_next_play = false;
            self.events.emit(AudioEvent::PlayError(
                "playback requires a user gesture".to_string(),
            ));
            return;
        }

        {
            let mut clock = lock(&clock);
            if clock.is_running() {
                return;
            }
            if clock.position() >= clock.duration {
                clock.offset = 0.0;
            }
            clock.start();
        }
        self.schedule_end();
        self.events.emit(AudioEvent::Play);
    }

    fn pause(&mut self) {
        let Some(clock) = self.clock.clone() else {
            return;
        };
        let was_running = {
            let mut clock = lock(&clock);
            let running = clock.is_running();
            clock.halt();
            running
        };
        self.cancel_end_timer();
        if was_running {
            self.events.emit(AudioEvent::Pause);
        }
    }

    fn seek(&mut self, seconds: f64) -> f64 {
        let Some(clock) = self.clock.clone() else {
            return 0.0;
        };
        let (applied, running) = {
            let mut clock = lock(&clock);
            let running = clock.started.is_some();
            let applied = if seconds.is_finite() {
                seconds.clamp(0.0, clock.duration)
            } else {
                0.0
            };
            clock.offset = applied;
            if running {
                clock.started = Some(Instant::now());
            }
            (applied, running)
        };
        if running {
            self.schedule_end();
        }
        self.events.emit(AudioEvent::Seeked);
        applied
    }

    fn position(&self) -> f64 {
        self.clock
            .as_ref()
            .map(|clock| lock(clock).position())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.clock.as_ref().map(|clock| lock(clock).duration)
    }

    fn is_playing(&self) -> bool {
        self.clock
            .as_ref()
            .is_some_and(|clock| lock(clock).is_running())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.cancel_end_timer();
        if let Some(clock) = &self.clock {
            lock(clock).halt();
        }
        self.released = true;
    }
}

impl Drop for SimulatedHandle {
    fn drop(&mut self) {
        self.release();
    }
}
