// crates/media-engine/src/turntable.rs
//! The turntable: one live playback session plus its transition
//!
//! All player state lives in a single [`Turntable`] value and is mutated
//! from one task. Backend threads only talk to it through the event
//! channel.

use crate::adapter::{AdapterEvent, AdapterId, AudioBackend, EventSink};
use crate::error::{EngineError, EngineResult};
use crate::session::PlaybackSession;
use crate::state::{PlayerSnapshot, SyncState};
use crate::sync::SyncAction;
use crate::transition::{TransitionState, TransitionWindows};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use vinylcast_core::EpisodeCatalog;

pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(16);
/// Shortest sampling period `run` will use
pub const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurntableSettings {
    pub windows: TransitionWindows,
    /// Position sampling period while playing
    pub frame_interval: Duration,
    /// Start the next episode when one ends
    pub auto_advance: bool,
}

impl Default for TurntableSettings {
    fn default() -> Self {
        Self {
            windows: TransitionWindows::default(),
            frame_interval: DEFAULT_FRAME_INTERVAL,
            auto_advance: true,
        }
    }
}

/// Requests a front end can send to a running turntable
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    Select(usize),
    TogglePlay,
    Previous,
    Next,
    SeekToFraction(f64),
    Shutdown,
}

pub struct Turntable {
    catalog: Arc<EpisodeCatalog>,
    backend: Box<dyn AudioBackend>,
    settings: TurntableSettings,
    events_tx: mpsc::UnboundedSender<AdapterEvent>,
    events_rx: mpsc::UnboundedReceiver<AdapterEvent>,
    next_adapter: u64,
    session: Option<PlaybackSession>,
    transition: TransitionState,
}

impl Turntable {
    /// Mounts the player on the first episode of the catalog
    pub fn new(
        catalog: Arc<EpisodeCatalog>,
        backend: Box<dyn AudioBackend>,
        settings: TurntableSettings,
    ) -> Self {
        let first = catalog.first_index();
        let mut turntable = Self::unmounted(catalog, backend, settings);
        turntable.mount(first);
        turntable
    }

    /// Mounts the player directly on episode `start`
    ///
    /// Nothing is opened when `start` is out of range.
    pub fn with_start(
        catalog: Arc<EpisodeCatalog>,
        backend: Box<dyn AudioBackend>,
        settings: TurntableSettings,
        start: usize,
    ) -> EngineResult<Self> {
        let mut turntable = Self::unmounted(catalog, backend, settings);
        turntable.select_episode(start)?;
        Ok(turntable)
    }

    fn unmounted(
        catalog: Arc<EpisodeCatalog>,
        backend: Box<dyn AudioBackend>,
        settings: TurntableSettings,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            catalog,
            backend,
            settings,
            events_tx,
            events_rx,
            next_adapter: 0,
            session: None,
            transition: TransitionState::new(settings.windows),
        }
    }

    /// Switches to episode `index`
    ///
    /// Every episode change goes through here: list selection, skip and
    /// auto-advance. The previous handle is released before the next one is
    /// opened, and the transition restarts. Re-selecting the current index
    /// rebuilds its handle, which is how a failed load is retried.
    pub fn select_episode(&mut self, index: usize) -> EngineResult<()> {
        if !self.catalog.contains_index(index) {
            return Err(EngineError::InvalidIndex {
                index,
                len: self.catalog.len(),
            });
        }
        self.mount(index);
        Ok(())
    }

    fn mount(&mut self, index: usize) {
        if let Some(mut previous) = self.session.take() {
            previous.release();
        }

        let Some(episode) = self.catalog.get(index) else {
            return;
        };

        self.next_adapter += 1;
        let adapter = AdapterId::new(self.next_adapter);
        let sink = EventSink::new(adapter, self.events_tx.clone());
        let handle = self.backend.open(&episode.audio_url, sink);

        log::info!(
            "Loading episode {} '{}' on {} ({})",
            episode.id,
            episode.title,
            adapter,
            self.backend.name()
        );

        self.session = Some(PlaybackSession::new(index, adapter, handle));
        self.transition.begin(Instant::now());
    }

    /// Applies an adapter event, ignoring those from replaced handles
    pub fn handle_event(&mut self, event: AdapterEvent) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if event.adapter != session.adapter() {
            log::debug!(
                "Ignoring {:?} from superseded {}",
                event.event,
                event.adapter
            );
            return;
        }

        let index = session.index();
        let has_next = self.settings.auto_advance && self.catalog.has_next(index);
        if session.apply(&event.event, has_next) == SyncAction::Advance {
            log::info!("Episode at index {} ended, advancing", index);
            self.mount(index + 1);
        }
    }

    /// Drains events already queued by backends
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            processed += 1;
        }
        processed
    }

    /// One animation frame; returns whether polling continues
    pub fn on_frame(&mut self) -> bool {
        self.session
            .as_mut()
            .map(|session| session.on_frame())
            .unwrap_or(false)
    }

    pub fn expire_transitions(&mut self, now: Instant) {
        self.transition.expire(now);
    }

    pub fn is_polling(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.sync().is_polling())
    }

    pub fn current_index(&self) -> Option<usize> {
        self.session.as_ref().map(|session| session.index())
    }

    pub fn current_adapter(&self) -> Option<AdapterId> {
        self.session.as_ref().map(|session| session.adapter())
    }

    pub fn state(&self) -> SyncState {
        self.session
            .as_ref()
            .map(|session| session.sync().state())
            .unwrap_or(SyncState::Idle)
    }

    pub fn is_playing(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.sync().is_playing())
    }

    pub fn transition(&self) -> &TransitionState {
        &self.transition
    }

    /// The record spins only while playing and not mid-swap
    pub fn vinyl_spinning(&self) -> bool {
        self.is_playing() && !self.transition.disk_swapping()
    }

    pub fn catalog(&self) -> &EpisodeCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> TurntableSettings {
        self.settings
    }

    pub(crate) fn session_mut(&mut self) -> Option<&mut PlaybackSession> {
        self.session.as_mut()
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        let index = self.current_index().unwrap_or(0);
        let episode = self.catalog.get(index);
        let sync = self.session.as_ref().map(|session| session.sync());

        PlayerSnapshot {
            index,
            episode_id: episode.map(|e| e.id).unwrap_or_default(),
            title: episode.map(|e| e.title.clone()).unwrap_or_default(),
            state: self.state(),
            position: sync.map(|s| s.position()).unwrap_or(0.0),
            duration: sync.and_then(|s| s.duration()),
            nominal_duration: episode.map(|e| e.nominal_duration()).unwrap_or_default(),
            progress: sync.map(|s| s.progress()).unwrap_or(0.0),
            is_playing: self.is_playing(),
            sleeve_visible: self.transition.sleeve_visible(),
            disk_swapping: self.transition.disk_swapping(),
            vinyl_spinning: self.vinyl_spinning(),
            has_previous: index > 0,
            has_next: self.catalog.has_next(index),
            error: sync.and_then(|s| s.error().cloned()),
        }
    }

    /// Releases the live handle and drops pending transition deadlines
    pub fn shutdown(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.release();
        }
        self.transition.cancel();
    }

    fn execute(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Select(index) => {
                if let Err(e) = self.select_episode(index) {
                    log::warn!("Selection rejected: {}", e);
                }
            }
            PlayerCommand::TogglePlay => self.toggle_play(),
            PlayerCommand::Previous => {
                self.previous();
            }
            PlayerCommand::Next => {
                self.next();
            }
            PlayerCommand::SeekToFraction(fraction) => {
                self.seek_to_fraction(fraction);
            }
            PlayerCommand::Shutdown => self.shutdown(),
        }
    }

    /// Drives the player until `Shutdown` or until every command sender is gone
    ///
    /// Publishes a fresh snapshot after every step.
    pub async fn run(
        mut self,
        mut commands: mpsc::Receiver<PlayerCommand>,
        snapshots: watch::Sender<PlayerSnapshot>,
    ) {
        // the loop owns the receiver; the field keeps a closed placeholder
        let (_, placeholder) = mpsc::unbounded_channel();
        let mut events = std::mem::replace(&mut self.events_rx, placeholder);

        let mut frames =
            tokio::time::interval(self.settings.frame_interval.max(MIN_FRAME_INTERVAL));
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        snapshots.send_replace(self.snapshot());

        loop {
            let polling = self.is_polling();
            let deadline = self.transition.next_deadline();

            tokio::select! {
                command = commands.recv() => match command {
                    Some(PlayerCommand::Shutdown) | None => break,
                    Some(command) => self.execute(command),
                },
                Some(event) = events.recv() => self.handle_event(event),
                _ = frames.tick(), if polling => {
                    self.on_frame();
                }
                _ = wait_for(deadline) => self.expire_transitions(Instant::now()),
            }

            snapshots.send_replace(self.snapshot());
        }

        self.shutdown();
        snapshots.send_replace(self.snapshot());
        log::debug!("Turntable stopped");
    }
}

impl Drop for Turntable {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
