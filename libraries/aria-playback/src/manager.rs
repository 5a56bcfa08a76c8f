//! Player manager - transport control
//!
//! Owns the queue, the playback settings, and the audio sink, and keeps the
//! sink synchronized with the user's intent. Commands mutate in-memory state
//! synchronously and in issue order; only the sink's `start` completes out of
//! band, and its results are re-admitted through an epoch guard so a late
//! resolution for a superseded track can never corrupt state.

use crate::{
    error::{PlaybackError, Result},
    events::PlayerEvent,
    policy::{self, Advance},
    queue::{Activation, PlayQueue},
    sink::{AudioSink, SinkEvent, SinkEvents},
    types::{PlaybackState, PlayerConfig, RepeatMode, SkipTrigger, Track},
    volume::Volume,
};
use futures::future::BoxFuture;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// An in-flight sink start operation
///
/// Returned by every command that asks the sink to begin output. The host
/// drives the future (usually by awaiting it through
/// [`PlayerManager::drive`]) and feeds the outcome back through
/// [`PlayerManager::complete_start`]. Dropping a request simply abandons the
/// result; the epoch guard makes that safe.
pub struct StartRequest {
    epoch: u64,
    future: BoxFuture<'static, Result<()>>,
}

impl StartRequest {
    /// Epoch the request was issued under
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Split into the epoch tag and the raw sink future, for hosts that
    /// drive completion themselves
    pub fn into_parts(self) -> (u64, BoxFuture<'static, Result<()>>) {
        (self.epoch, self.future)
    }
}

/// Central playback management
///
/// One instance exists per session. It is the only owner of the audio sink;
/// everything else observes playback through the read accessors and
/// [`PlayerManager::drain_events`].
pub struct PlayerManager {
    // Sink and its event subscription
    sink: Box<dyn AudioSink>,
    sink_events: SinkEvents,

    // Queue
    queue: PlayQueue,

    // Transport state
    state: PlaybackState,
    progress: Duration,
    duration: Duration,

    // Settings (independent of any particular queue)
    volume: Volume,
    shuffle: bool,
    repeat: RepeatMode,
    restart_threshold: Duration,

    // Stale-response guard for asynchronous sink starts
    epoch: u64,

    // Source the sink currently has loaded; loading is skipped when the
    // current track's URL already matches
    loaded_url: Option<String>,

    // Most recent non-fatal sink failure
    last_error: Option<PlaybackError>,

    // Event queue for UI synchronization
    pending_events: Vec<PlayerEvent>,

    // Injected RNG so shuffle order is reproducible in tests
    rng: StdRng,
}

impl PlayerManager {
    /// Create a new player around a sink
    pub fn new(sink: Box<dyn AudioSink>, config: PlayerConfig) -> Self {
        Self::with_rng(sink, config, StdRng::from_entropy())
    }

    /// Create a player with a deterministic shuffle order
    pub fn with_rng_seed(sink: Box<dyn AudioSink>, config: PlayerConfig, seed: u64) -> Self {
        Self::with_rng(sink, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut sink: Box<dyn AudioSink>, config: PlayerConfig, rng: StdRng) -> Self {
        let sink_events = sink.subscribe();
        let volume = Volume::new(config.volume);
        sink.set_gain(volume.gain());

        Self {
            sink,
            sink_events,
            queue: PlayQueue::new(),
            state: PlaybackState::Stopped,
            progress: Duration::ZERO,
            duration: Duration::ZERO,
            volume,
            shuffle: config.shuffle,
            repeat: config.repeat,
            restart_threshold: config.restart_threshold,
            epoch: 0,
            loaded_url: None,
            last_error: None,
            pending_events: Vec::new(),
            rng,
        }
    }

    /// Swap the sink instance
    ///
    /// The old sink's event subscription is released the moment the new one
    /// takes its place, so signals from the replaced device can never reach
    /// the player again. Playback does not carry over; the next `play`
    /// reloads into the new sink.
    pub fn replace_sink(&mut self, mut sink: Box<dyn AudioSink>) {
        let sink_events = sink.subscribe();
        sink.set_gain(self.volume.gain());

        // Old subscription first, then the old sink itself
        self.sink_events = sink_events;
        self.sink = sink;
        self.loaded_url = None;

        if matches!(self.state, PlaybackState::Playing | PlaybackState::Loading) {
            self.set_state(PlaybackState::Paused);
        }
    }

    // ===== Playback Control =====

    /// Play a track, optionally in the context of a source list
    ///
    /// A non-empty `source_list` (search results, playlist contents, a
    /// trending page) becomes the new queue with `track` selected. Without a
    /// list, a track already in the queue is re-selected in place; only a
    /// track with no context at all collapses the queue to that one track.
    pub fn play_track(&mut self, track: Track, source_list: Vec<Track>) -> Option<StartRequest> {
        let previous = self.queue.current_track().map(|t| t.id.clone());

        match self.queue.activate(track, source_list) {
            Activation::Replaced | Activation::Wrapped => self.emit_queue_changed(),
            Activation::Selected => {}
        }

        if let Some(current) = self.queue.current_track() {
            let id = current.id.clone();
            if previous.as_deref() != Some(id.as_str()) {
                self.emit_track_changed(id, previous);
            }
        }

        self.begin_start()
    }

    /// Start or resume playback of the current track
    ///
    /// No-op when nothing is selected.
    pub fn play(&mut self) -> Option<StartRequest> {
        self.begin_start()
    }

    /// Pause playback. Idempotent.
    pub fn pause(&mut self) {
        if matches!(self.state, PlaybackState::Playing | PlaybackState::Loading) {
            debug!("pausing playback");
            self.sink.stop();
            self.set_state(PlaybackState::Paused);
        }
    }

    /// Toggle between play and pause
    ///
    /// With nothing selected but a non-empty queue, selects the first track
    /// and plays it. With an empty queue this is a no-op.
    pub fn toggle_play(&mut self) -> Option<StartRequest> {
        if self.queue.current_track().is_none() {
            if self.queue.is_empty() {
                return None;
            }
            self.select_index(0);
            return self.begin_start();
        }

        match self.state {
            PlaybackState::Playing | PlaybackState::Loading => {
                self.pause();
                None
            }
            PlaybackState::Paused | PlaybackState::Stopped => self.begin_start(),
        }
    }

    /// Skip to the next track per the advance policy
    ///
    /// Unless the policy stops playback, the new track starts immediately.
    pub fn skip_next(&mut self, trigger: SkipTrigger) -> Option<StartRequest> {
        if self.queue.is_empty() {
            return None;
        }

        match policy::next_index(
            self.queue.len(),
            self.queue.current_index(),
            self.shuffle,
            self.repeat,
            trigger,
            &mut self.rng,
        ) {
            Advance::To(index) => {
                self.select_index(index);
                self.begin_start()
            }
            Advance::Stop => {
                debug!("queue exhausted, halting playback");
                self.sink.stop();
                self.set_state(PlaybackState::Paused);
                None
            }
            // "next" never asks for a restart
            Advance::RestartCurrent => None,
        }
    }

    /// Skip to the previous track, or restart the current one
    ///
    /// Far enough into a track this rewinds to its start without changing
    /// the position in the queue or the play/pause state.
    pub fn skip_previous(&mut self) -> Option<StartRequest> {
        if self.queue.is_empty() {
            return None;
        }

        match policy::previous_index(
            self.queue.len(),
            self.queue.current_index(),
            self.progress,
            self.restart_threshold,
            self.shuffle,
            &mut self.rng,
        ) {
            Advance::RestartCurrent => {
                self.sink.seek_to(Duration::ZERO);
                self.progress = Duration::ZERO;
                self.emit_position_update();
                None
            }
            Advance::To(index) => {
                self.select_index(index);
                self.begin_start()
            }
            Advance::Stop => None,
        }
    }

    // ===== Seek =====

    /// Seek within the current track
    ///
    /// Clamps to the known duration; with the duration still unknown the
    /// position is passed through unclamped. The in-memory position updates
    /// optimistically before the sink confirms.
    pub fn seek(&mut self, position: Duration) {
        if self.queue.current_track().is_none() {
            return;
        }

        let clamped = if self.duration > Duration::ZERO {
            position.min(self.duration)
        } else {
            position
        };

        self.sink.seek_to(clamped);
        self.progress = clamped;
        self.emit_position_update();
    }

    // ===== Volume =====

    /// Set volume (clamped to 0-100)
    ///
    /// Any non-zero level clears mute, matching the volume slider behavior.
    pub fn set_volume(&mut self, level: u8) {
        if level > 0 && self.volume.is_muted() {
            self.volume.unmute();
        }
        self.volume.set_level(level);
        self.push_gain();
        self.emit_volume_changed();
    }

    /// Get current volume level (0-100)
    pub fn get_volume(&self) -> u8 {
        self.volume.level()
    }

    /// Set mute state
    pub fn set_muted(&mut self, muted: bool) {
        if muted {
            self.volume.mute();
        } else {
            self.volume.unmute();
        }
        self.push_gain();
        self.emit_volume_changed();
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.push_gain();
        self.emit_volume_changed();
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    // ===== Shuffle & Repeat =====

    /// Enable or disable shuffle
    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
    }

    /// Get current shuffle setting
    pub fn get_shuffle(&self) -> bool {
        self.shuffle
    }

    /// Set repeat mode
    pub fn set_repeat(&mut self, mode: RepeatMode) {
        self.repeat = mode;
    }

    /// Get current repeat mode
    pub fn get_repeat(&self) -> RepeatMode {
        self.repeat
    }

    // ===== Asynchronous start completion =====

    /// Feed back the outcome of a sink start
    ///
    /// Results from a superseded epoch are discarded entirely: no state
    /// mutation, no error surfaced. This is what keeps a late success for
    /// track A from corrupting state after the user has moved on to track B.
    pub fn complete_start(&mut self, epoch: u64, result: Result<()>) {
        if epoch != self.epoch {
            trace!(epoch, current = self.epoch, "discarding stale sink start result");
            return;
        }

        match result {
            Ok(()) => {
                self.last_error = None;
                if self.state == PlaybackState::Loading {
                    self.set_state(PlaybackState::Playing);
                }
                // A pause issued while the start was pending wins; a
                // confirmed start must not resurrect playback.
            }
            Err(err) => {
                warn!(error = %err, "sink failed to start");
                self.emit_error(err.to_string());
                self.last_error = Some(err);
                self.set_state(PlaybackState::Paused);
            }
        }
    }

    /// Await a start request and apply its outcome
    pub async fn drive(&mut self, request: StartRequest) {
        let (epoch, future) = request.into_parts();
        let result = future.await;
        self.complete_start(epoch, result);
    }

    // ===== State Queries =====

    /// Get current playback state
    pub fn get_state(&self) -> PlaybackState {
        self.state
    }

    /// Whether the sink has confirmed it is outputting audio
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Get currently selected track
    pub fn get_current_track(&self) -> Option<&Track> {
        self.queue.current_track()
    }

    /// Get current queue position
    pub fn get_current_index(&self) -> Option<usize> {
        self.queue.current_index()
    }

    /// Get current playback position
    pub fn get_progress(&self) -> Duration {
        self.progress
    }

    /// Get current track duration as last reported
    pub fn get_duration(&self) -> Duration {
        self.duration
    }

    /// Get all tracks in queue order
    pub fn get_queue(&self) -> &[Track] {
        self.queue.tracks()
    }

    /// Get queue length
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Most recent non-fatal sink failure, cleared by a successful start
    pub fn last_error(&self) -> Option<&PlaybackError> {
        self.last_error.as_ref()
    }

    // ===== Events =====

    /// Drain all pending events
    ///
    /// Returns every event emitted since the last drain. The UI should call
    /// this after issuing commands or processing sink events.
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internal =====

    /// Ask the sink to play the current track
    ///
    /// Loads the source only when it differs from what the sink already has,
    /// so unrelated state churn never restarts playback. A fresh load passes
    /// through `Loading` until the sink confirms; a same-source start moves
    /// to `Playing` optimistically and reverts on failure.
    fn begin_start(&mut self) -> Option<StartRequest> {
        let track = self.queue.current_track()?;
        let url = track.audio_url.clone();
        let track_duration = track.duration;

        if self.loaded_url.as_deref() != Some(url.as_str()) {
            debug!(%url, "loading new source");
            self.sink.load_source(&url);
            self.loaded_url = Some(url);
            self.progress = Duration::ZERO;
            self.duration = track_duration.unwrap_or(Duration::ZERO);
            self.set_state(PlaybackState::Loading);
        } else {
            self.set_state(PlaybackState::Playing);
        }

        self.epoch += 1;
        let epoch = self.epoch;
        trace!(epoch, "requesting sink start");

        Some(StartRequest {
            epoch,
            future: self.sink.start(),
        })
    }

    /// Replay the current track from its start (repeat-one completion)
    pub(crate) fn replay_current(&mut self) -> Option<StartRequest> {
        self.sink.seek_to(Duration::ZERO);
        self.progress = Duration::ZERO;
        self.emit_position_update();
        self.begin_start()
    }

    /// Apply a progress report from the sink
    pub(crate) fn apply_time_update(&mut self, position: Duration, duration: Duration) {
        self.duration = duration;
        self.progress = if duration > Duration::ZERO {
            position.min(duration)
        } else {
            position
        };
        self.emit_position_update();
    }

    /// Take all sink events delivered since the last drain
    pub(crate) fn take_sink_events(&mut self) -> Vec<SinkEvent> {
        self.sink_events.drain()
    }

    fn select_index(&mut self, index: usize) {
        let previous = self.queue.current_track().map(|t| t.id.clone());
        if self.queue.select_index(index) {
            if let Some(current) = self.queue.current_track() {
                let id = current.id.clone();
                if previous.as_deref() != Some(id.as_str()) {
                    self.emit_track_changed(id, previous);
                }
            }
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            debug!(?state, "playback state changed");
            self.state = state;
            self.emit_state_changed(state);
        }
    }

    fn push_gain(&mut self) {
        self.sink.set_gain(self.volume.gain());
    }

    fn emit_state_changed(&mut self, state: PlaybackState) {
        self.pending_events.push(PlayerEvent::StateChanged { state });
    }

    fn emit_track_changed(&mut self, track_id: String, previous_track_id: Option<String>) {
        self.pending_events.push(PlayerEvent::TrackChanged {
            track_id,
            previous_track_id,
        });
    }

    fn emit_position_update(&mut self) {
        self.pending_events.push(PlayerEvent::PositionUpdate {
            position_ms: self.progress.as_millis() as u64,
            duration_ms: self.duration.as_millis() as u64,
        });
    }

    fn emit_volume_changed(&mut self) {
        self.pending_events.push(PlayerEvent::VolumeChanged {
            level: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }

    fn emit_queue_changed(&mut self) {
        self.pending_events.push(PlayerEvent::QueueChanged {
            length: self.queue.len(),
        });
    }

    fn emit_error(&mut self, message: String) {
        self.pending_events.push(PlayerEvent::Error { message });
    }
}
