//! Aria Player - Playback Engine
//!
//! Platform-agnostic playback management for Aria Player.
//!
//! This crate provides:
//! - Play queue with current-position tracking
//! - Next/previous advance policy (shuffle, repeat modes, manual-wrap)
//! - Transport control (play/pause/seek/volume/mute)
//! - Epoch-guarded handling of asynchronous sink starts
//! - Sink event bridge (progress reports, completion handling)
//! - Event surface for UI synchronization
//!
//! # Architecture
//!
//! `aria-playback` is completely platform-agnostic:
//! - No dependency on any audio backend
//! - No dependency on any UI framework
//! - No dependency on the catalog services
//!
//! Audio output is provided via the [`AudioSink`] trait; the host
//! application wires a real device (an HTML audio element, a native output
//! stream) to it and feeds the sink's signals back through
//! [`PlayerManager::process_sink_events`]. Everything is single-threaded:
//! commands apply synchronously, and the only asynchronous edge is the
//! sink's `start` future, which the host drives and whose result is
//! discarded if a newer command has superseded it.
//!
//! # Example
//!
//! ```rust
//! use aria_playback::test_utils::FakeSink;
//! use aria_playback::{PlayerConfig, PlayerManager, Track};
//!
//! let sink = FakeSink::new();
//! let handle = sink.handle();
//! let mut player = PlayerManager::new(Box::new(sink), PlayerConfig::default());
//!
//! let track = Track {
//!     id: "track1".to_string(),
//!     title: "My Song".to_string(),
//!     artist: "Artist Name".to_string(),
//!     cover_url: None,
//!     audio_url: "https://cdn.example.com/track1.mp3".to_string(),
//!     duration: None,
//! };
//!
//! if let Some(request) = player.play_track(track, Vec::new()) {
//!     futures::executor::block_on(player.drive(request));
//! }
//! assert!(player.is_playing());
//!
//! // Sink signals feed back through the bridge
//! handle.emit_ended();
//! player.process_sink_events();
//! assert!(!player.is_playing()); // single-track queue ran out
//! ```

mod bridge;
mod error;
mod events;
mod manager;
pub mod policy;
mod queue;
mod sink;
pub mod test_utils;
pub mod types;
mod volume;

// Public exports
pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use manager::{PlayerManager, StartRequest};
pub use sink::{AudioSink, SinkEvent, SinkEvents};
pub use types::{PlaybackState, PlayerConfig, RepeatMode, SkipTrigger, Track};
