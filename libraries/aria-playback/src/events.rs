//! Player events
//!
//! Event-based communication for UI synchronization. The manager
//! accumulates events as state changes and the host drains them with
//! [`crate::PlayerManager::drain_events`], so consumers subscribe to
//! changes instead of reaching into shared state.

use crate::types::PlaybackState;
use serde::{Deserialize, Serialize};

/// Events emitted by the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Playback state changed (playing, paused, loading, stopped)
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// The current track changed
    TrackChanged {
        /// ID of the new current track
        track_id: String,
        /// ID of the previous track (if any)
        previous_track_id: Option<String>,
    },

    /// Position update from the sink
    PositionUpdate {
        /// Current playback position
        position_ms: u64,
        /// Total track duration
        duration_ms: u64,
    },

    /// Volume or mute state changed
    VolumeChanged {
        /// New volume level (0-100)
        level: u8,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// The queue was replaced or rebuilt
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// A non-fatal playback error occurred
    Error {
        /// Error message for the UI to surface
        message: String,
    },
}
