//! Audio sink contract
//!
//! Abstracts the audio-rendering device (an HTML audio element, a native
//! output stream) so the engine is testable without audio hardware. The
//! sink owns decoding and output; the engine only tells it what to play
//! and listens to its signals.

use crate::error::Result;
use futures::future::BoxFuture;
use std::sync::mpsc;
use std::time::Duration;

/// Asynchronous signals emitted by a sink
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SinkEvent {
    /// Periodic progress report
    TimeUpdate {
        /// Current playback position
        position: Duration,
        /// Total duration as the sink knows it
        duration: Duration,
    },

    /// The current source played to its end
    Ended,
}

/// Abstract audio output device
///
/// All methods are synchronous except [`AudioSink::start`], which returns a
/// future resolving when the device has actually begun (or refused) output.
/// The future must not borrow the sink: it is issued, handed to the caller,
/// and may resolve long after the engine has moved on to another track.
/// There is no cancellation; superseded results are discarded by the caller.
pub trait AudioSink: Send {
    /// Assign the source to play. Does not start playback by itself.
    fn load_source(&mut self, url: &str);

    /// Begin output of the loaded source
    ///
    /// May fail asynchronously with [`crate::PlaybackError::Blocked`] (e.g.
    /// autoplay restrictions) or [`crate::PlaybackError::Load`].
    fn start(&mut self) -> BoxFuture<'static, Result<()>>;

    /// Pause output. Synchronous and idempotent.
    fn stop(&mut self);

    /// Move the playback position
    fn seek_to(&mut self, position: Duration);

    /// Set output gain (0.0-1.0)
    fn set_gain(&mut self, gain: f32);

    /// Subscribe to the sink's signals
    ///
    /// A sink carries at most one active subscription; subscribing again
    /// supersedes the previous one. Dropping the returned handle releases
    /// the subscription, so a handler can never keep firing against a sink
    /// its owner has let go of.
    fn subscribe(&mut self) -> SinkEvents;
}

/// Subscription handle for sink signals
///
/// Events queue up inside the handle until drained. Dropping the handle
/// ends delivery.
#[derive(Debug)]
pub struct SinkEvents {
    receiver: mpsc::Receiver<SinkEvent>,
}

impl SinkEvents {
    /// Create a connected sender/subscription pair
    ///
    /// Sink implementations keep the sender and push their signals into it;
    /// a failed send means the subscription was dropped and the sender can
    /// be discarded.
    pub fn channel() -> (mpsc::Sender<SinkEvent>, SinkEvents) {
        let (sender, receiver) = mpsc::channel();
        (sender, SinkEvents { receiver })
    }

    /// Take all events delivered since the last drain
    pub fn drain(&mut self) -> Vec<SinkEvent> {
        self.receiver.try_iter().collect()
    }
}
