//! Media Engine - turntable playback for VinylCast
//!
//! A [`Turntable`] owns exactly one [`PlaybackSession`] at a time. Audio
//! comes from an [`AudioBackend`]: [`DeviceBackend`] decodes local files and
//! plays them on the default output device, [`SimulatedBackend`] runs on a
//! virtual clock. Playback state is derived only from the events a backend
//! reports.

mod adapter;
mod decoder;
mod device;
mod error;
mod output;
pub(crate) mod playback_thread;
mod session;
mod simulated;
mod state;
mod sync;
mod transition;
mod transport;
mod turntable;

pub use adapter::{AdapterEvent, AdapterId, AudioBackend, AudioEvent, AudioHandle, EventSink};
pub use decoder::AudioDecoder;
pub use device::{DeviceBackend, DeviceHandle};
pub use error::{EngineError, EngineResult};
pub use output::AudioOutput;
pub use session::PlaybackSession;
pub use simulated::{SimulatedBackend, SimulatedHandle};
pub use state::{PlaybackError, PlayerSnapshot, SyncState};
pub use sync::{PlaybackSynchronizer, SyncAction};
pub use transition::{
    TransitionStage, TransitionState, TransitionWindows, DEFAULT_DISK_SWAP, DEFAULT_SLEEVE_REVEAL,
};
pub use turntable::{
    PlayerCommand, Turntable, TurntableSettings, DEFAULT_FRAME_INTERVAL, MIN_FRAME_INTERVAL,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_exports_accessible() {
        let _ = SyncState::Idle;
        let _ = TransitionWindows::default();
        let _ = TurntableSettings::default();
    }

    #[test]
    fn test_error_display() {
        let error = EngineError::UnsupportedSource("ftp://x".into());
        assert!(format!("{}", error).contains("ftp://x"));
    }
}
