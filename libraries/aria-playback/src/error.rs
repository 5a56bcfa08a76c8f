//! Error types for the playback engine

use thiserror::Error;

/// Playback errors
///
/// Both variants are non-fatal: the player converts them into a paused state
/// and a `last_error` field rather than propagating them. Commands against an
/// empty queue are no-ops, seeks clamp silently, and stale start results are
/// discarded without surfacing here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// The sink refused to start, e.g. a platform autoplay restriction.
    /// The UI should require an explicit user gesture before retrying.
    #[error("playback blocked by the platform")]
    Blocked,

    /// The sink could not resolve or open the audio source
    #[error("failed to load audio source: {0}")]
    Load(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
