//! Core types for the playback engine

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Track information for queue management
///
/// Carries everything the player and the UI need; fetched eagerly from the
/// catalog services so playback never waits on metadata I/O. Immutable once
/// placed in a queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier from the catalog
    pub id: String,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Cover art URL (optional)
    pub cover_url: Option<String>,

    /// Streaming URL handed to the audio sink
    pub audio_url: String,

    /// Track duration, if the catalog knows it
    ///
    /// `None` until the sink reports the real duration.
    pub duration: Option<Duration>,
}

/// Playback state
///
/// `Loading` covers the window between asking the sink to start a freshly
/// loaded source and the sink confirming (or refusing) it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No track selected
    Stopped,

    /// Waiting for the sink to start a newly loaded source
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Stop when the queue ends
    Off,

    /// Loop the entire queue
    All,

    /// Replay the current track on completion
    One,
}

/// What caused a skip to the next track
///
/// A user-initiated skip wraps at the end of the queue even with repeat off;
/// a skip caused by natural track completion does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipTrigger {
    /// Explicit "next" from the user
    Manual,

    /// Natural track completion
    Automatic,
}

/// Configuration for the player manager
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Initial volume (0-100, default: 70)
    pub volume: u8,

    /// Initial shuffle setting (default: off)
    pub shuffle: bool,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Elapsed time above which "previous" restarts the current track
    /// instead of moving back (default: 3 seconds)
    pub restart_threshold: Duration,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            volume: 70,
            shuffle: false,
            repeat: RepeatMode::Off,
            restart_threshold: Duration::from_secs(3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlayerConfig::default();
        assert_eq!(config.volume, 70);
        assert!(!config.shuffle);
        assert_eq!(config.repeat, RepeatMode::Off);
        assert_eq!(config.restart_threshold, Duration::from_secs(3));
    }

    #[test]
    fn track_creation() {
        let track = Track {
            id: "track1".to_string(),
            title: "Test Song".to_string(),
            artist: "Test Artist".to_string(),
            cover_url: None,
            audio_url: "https://cdn.example.com/track1.mp3".to_string(),
            duration: Some(Duration::from_secs(180)),
        };

        assert_eq!(track.id, "track1");
        assert_eq!(track.title, "Test Song");
    }
}
