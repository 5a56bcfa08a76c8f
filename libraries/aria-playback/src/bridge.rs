//! Sink event dispatch
//!
//! Feeds the sink's asynchronous signals back into the player: progress
//! reports update position state, and track completion either replays the
//! current track (repeat-one) or advances through the normal policy.
//!
//! The subscription behind this is acquired when the manager attaches to a
//! sink ([`PlayerManager::new`] / [`PlayerManager::replace_sink`]) and is a
//! scoped handle: replacing it or dropping the manager releases it, so a
//! swapped-out sink can never keep feeding a live player.

use crate::{
    manager::{PlayerManager, StartRequest},
    sink::SinkEvent,
    types::{RepeatMode, SkipTrigger},
};
use tracing::debug;

impl PlayerManager {
    /// Process all sink signals delivered since the last call
    ///
    /// The host calls this whenever its sink reports activity (or on a UI
    /// tick). Returns a start request when a completion caused a new track
    /// (or the same one, under repeat-one) to begin playing.
    pub fn process_sink_events(&mut self) -> Option<StartRequest> {
        let mut request = None;

        for event in self.take_sink_events() {
            match event {
                SinkEvent::TimeUpdate { position, duration } => {
                    self.apply_time_update(position, duration);
                }
                SinkEvent::Ended => {
                    request = self.handle_ended();
                }
            }
        }

        request
    }

    /// React to natural completion of the current track
    ///
    /// Repeat-one replays the same queue position without consulting the
    /// advance policy; everything else is an automatic skip.
    fn handle_ended(&mut self) -> Option<StartRequest> {
        debug!(repeat = ?self.get_repeat(), "current track completed");

        if self.get_repeat() == RepeatMode::One && self.get_current_track().is_some() {
            return self.replay_current();
        }

        self.skip_next(SkipTrigger::Automatic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeSink;
    use crate::types::{PlaybackState, PlayerConfig, Track};
    use futures::executor::block_on;
    use std::time::Duration;

    fn create_test_track(id: &str) -> Track {
        Track {
            id: id.to_string(),
            title: format!("Track {}", id),
            artist: "Test Artist".to_string(),
            cover_url: None,
            audio_url: format!("https://cdn.example.com/{}.mp3", id),
            duration: Some(Duration::from_secs(180)),
        }
    }

    fn playing_manager(track_ids: &[&str], start: &str) -> (PlayerManager, crate::test_utils::FakeSinkHandle) {
        let sink = FakeSink::new();
        let handle = sink.handle();
        let mut manager = PlayerManager::new(Box::new(sink), PlayerConfig::default());

        let tracks: Vec<Track> = track_ids.iter().map(|id| create_test_track(id)).collect();
        let request = manager.play_track(create_test_track(start), tracks);
        block_on(manager.drive(request.unwrap()));

        (manager, handle)
    }

    #[test]
    fn time_updates_flow_into_state() {
        let (mut manager, handle) = playing_manager(&["1", "2"], "1");

        assert!(handle.emit_time_update(Duration::from_secs(42), Duration::from_secs(200)));
        let request = manager.process_sink_events();

        assert!(request.is_none());
        assert_eq!(manager.get_progress(), Duration::from_secs(42));
        assert_eq!(manager.get_duration(), Duration::from_secs(200));
    }

    #[test]
    fn progress_clamped_to_reported_duration() {
        let (mut manager, handle) = playing_manager(&["1"], "1");

        handle.emit_time_update(Duration::from_secs(500), Duration::from_secs(200));
        manager.process_sink_events();

        assert_eq!(manager.get_progress(), Duration::from_secs(200));
    }

    #[test]
    fn ended_with_repeat_one_replays_in_place() {
        let (mut manager, handle) = playing_manager(&["1", "2", "3"], "2");
        manager.set_repeat(RepeatMode::One);

        handle.emit_time_update(Duration::from_secs(180), Duration::from_secs(180));
        manager.process_sink_events();

        handle.emit_ended();
        let request = manager.process_sink_events();

        // Same track, rewound, still playing
        assert_eq!(manager.get_current_track().unwrap().id, "2");
        assert_eq!(manager.get_progress(), Duration::ZERO);
        assert!(manager.is_playing());
        assert!(handle.seeks().contains(&Duration::ZERO));

        block_on(manager.drive(request.unwrap()));
        assert!(manager.is_playing());
    }

    #[test]
    fn ended_advances_to_next_track() {
        let (mut manager, handle) = playing_manager(&["1", "2", "3"], "1");

        handle.emit_ended();
        let request = manager.process_sink_events();

        assert_eq!(manager.get_current_track().unwrap().id, "2");
        block_on(manager.drive(request.unwrap()));
        assert!(manager.is_playing());
    }

    #[test]
    fn ended_at_queue_end_halts() {
        let (mut manager, handle) = playing_manager(&["1", "2", "3"], "3");

        handle.emit_ended();
        let request = manager.process_sink_events();

        assert!(request.is_none());
        assert!(!manager.is_playing());
        assert_eq!(manager.get_state(), PlaybackState::Paused);
        // Position unchanged
        assert_eq!(manager.get_current_index(), Some(2));
    }

    #[test]
    fn ended_at_queue_end_with_repeat_all_wraps() {
        let (mut manager, handle) = playing_manager(&["1", "2", "3"], "3");
        manager.set_repeat(RepeatMode::All);

        handle.emit_ended();
        let request = manager.process_sink_events();

        assert_eq!(manager.get_current_track().unwrap().id, "1");
        block_on(manager.drive(request.unwrap()));
        assert!(manager.is_playing());
    }
}
