//! Deterministic sink double for tests
//!
//! [`FakeSink`] implements [`AudioSink`] entirely in memory: it records the
//! commands it receives and gives tests a [`FakeSinkHandle`] to resolve
//! start futures and emit sink signals at exactly the moment the scenario
//! calls for. This is what makes races between user commands and pending
//! sink operations reproducible.

use crate::error::{PlaybackError, Result};
use crate::sink::{AudioSink, SinkEvent, SinkEvents};
use futures::channel::oneshot;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::VecDeque;
use std::sync::{mpsc, Arc, Mutex, MutexGuard};
use std::time::Duration;

/// How `start` futures resolve
#[derive(Debug, Clone)]
pub enum StartMode {
    /// Resolve successfully as soon as the future is awaited
    Resolve,

    /// Fail with the given error
    Fail(PlaybackError),

    /// Stay pending until the test resolves it through the handle
    Manual,
}

#[derive(Debug)]
struct FakeSinkState {
    loaded_url: Option<String>,
    load_count: usize,
    start_count: usize,
    playing: bool,
    gain: f32,
    seeks: Vec<Duration>,
    start_mode: StartMode,
    pending_starts: VecDeque<oneshot::Sender<Result<()>>>,
    subscriber: Option<mpsc::Sender<SinkEvent>>,
}

/// In-memory audio sink
pub struct FakeSink {
    state: Arc<Mutex<FakeSinkState>>,
}

/// Test-side control over a [`FakeSink`] that has been handed to a player
#[derive(Clone)]
pub struct FakeSinkHandle {
    state: Arc<Mutex<FakeSinkState>>,
}

impl FakeSink {
    /// Create a sink whose starts succeed immediately
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeSinkState {
                loaded_url: None,
                load_count: 0,
                start_count: 0,
                playing: false,
                gain: 0.0,
                seeks: Vec::new(),
                start_mode: StartMode::Resolve,
                pending_starts: VecDeque::new(),
                subscriber: None,
            })),
        }
    }

    /// Control handle, kept by the test after the sink moves into the player
    pub fn handle(&self) -> FakeSinkHandle {
        FakeSinkHandle {
            state: Arc::clone(&self.state),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FakeSinkState> {
        self.state.lock().expect("fake sink state poisoned")
    }
}

impl Default for FakeSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for FakeSink {
    fn load_source(&mut self, url: &str) {
        let mut state = self.lock();
        state.loaded_url = Some(url.to_string());
        state.load_count += 1;
        state.playing = false;
    }

    fn start(&mut self) -> BoxFuture<'static, Result<()>> {
        let (tx, rx) = oneshot::channel();

        {
            let mut state = self.lock();
            state.start_count += 1;
            match state.start_mode.clone() {
                StartMode::Resolve => {
                    state.playing = true;
                    let _ = tx.send(Ok(()));
                }
                StartMode::Fail(err) => {
                    let _ = tx.send(Err(err));
                }
                StartMode::Manual => state.pending_starts.push_back(tx),
            }
        }

        rx.map(|outcome| match outcome {
            Ok(result) => result,
            Err(_) => Err(PlaybackError::Load("start request dropped".to_string())),
        })
        .boxed()
    }

    fn stop(&mut self) {
        self.lock().playing = false;
    }

    fn seek_to(&mut self, position: Duration) {
        self.lock().seeks.push(position);
    }

    fn set_gain(&mut self, gain: f32) {
        self.lock().gain = gain;
    }

    fn subscribe(&mut self) -> SinkEvents {
        let (sender, events) = SinkEvents::channel();
        self.lock().subscriber = Some(sender);
        events
    }
}

impl FakeSinkHandle {
    /// Change how subsequent starts resolve
    pub fn set_start_mode(&self, mode: StartMode) {
        self.lock().start_mode = mode;
    }

    /// Resolve the oldest pending start (Manual mode)
    ///
    /// Returns false if no start is pending or its future was dropped.
    pub fn resolve_next_start(&self, result: Result<()>) -> bool {
        let mut state = self.lock();
        match state.pending_starts.pop_front() {
            Some(tx) => {
                if result.is_ok() {
                    state.playing = true;
                }
                tx.send(result).is_ok()
            }
            None => false,
        }
    }

    /// Number of starts still awaiting resolution
    pub fn pending_start_count(&self) -> usize {
        self.lock().pending_starts.len()
    }

    /// Emit a progress signal; returns false if no subscription is live
    pub fn emit_time_update(&self, position: Duration, duration: Duration) -> bool {
        self.send(SinkEvent::TimeUpdate { position, duration })
    }

    /// Emit a completion signal; returns false if no subscription is live
    pub fn emit_ended(&self) -> bool {
        self.lock().playing = false;
        self.send(SinkEvent::Ended)
    }

    /// URL the sink currently has loaded
    pub fn loaded_url(&self) -> Option<String> {
        self.lock().loaded_url.clone()
    }

    /// How many times a source was loaded
    pub fn load_count(&self) -> usize {
        self.lock().load_count
    }

    /// How many starts were requested
    pub fn start_count(&self) -> usize {
        self.lock().start_count
    }

    /// Last gain pushed to the sink
    pub fn gain(&self) -> f32 {
        self.lock().gain
    }

    /// Every seek the sink received, in order
    pub fn seeks(&self) -> Vec<Duration> {
        self.lock().seeks.clone()
    }

    /// Whether the sink believes it is outputting audio
    pub fn is_playing(&self) -> bool {
        self.lock().playing
    }

    fn send(&self, event: SinkEvent) -> bool {
        let mut state = self.lock();
        match &state.subscriber {
            Some(sender) => {
                if sender.send(event).is_ok() {
                    true
                } else {
                    // Subscription dropped; stop holding the dead sender
                    state.subscriber = None;
                    false
                }
            }
            None => false,
        }
    }

    fn lock(&self) -> MutexGuard<'_, FakeSinkState> {
        self.state.lock().expect("fake sink state poisoned")
    }
}
