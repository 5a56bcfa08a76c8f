//! Play queue: ordered track list plus the current position
//!
//! The queue is replaced wholesale whenever the user starts playback from a
//! different source list (search results, a playlist, the trending page);
//! it is never diffed incrementally.

use crate::types::Track;

/// How a play request was absorbed into the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Activation {
    /// The queue was replaced by the supplied source list
    Replaced,

    /// A single track became the whole queue
    Wrapped,

    /// The track was already in the queue; only the position moved
    Selected,
}

/// Ordered track list with a current position
///
/// No position is selected until the first play request arrives.
#[derive(Debug, Clone, Default)]
pub(crate) struct PlayQueue {
    tracks: Vec<Track>,
    current: Option<usize>,
}

impl PlayQueue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the queue with a new track list
    ///
    /// The current position moves to `start_track_id` if it is present in
    /// `tracks`, otherwise to the first track. An empty list leaves the
    /// queue untouched.
    pub fn replace(&mut self, tracks: Vec<Track>, start_track_id: Option<&str>) {
        if tracks.is_empty() {
            return;
        }

        let start = start_track_id
            .and_then(|id| tracks.iter().position(|t| t.id == id))
            .unwrap_or(0);

        self.tracks = tracks;
        self.current = Some(start);
    }

    /// Move the current position to a track already in the queue
    ///
    /// Keeps the user's browsing context intact when a visible track is
    /// re-clicked. Returns false (and changes nothing) if the track is not
    /// in the queue.
    pub fn select_existing(&mut self, track_id: &str) -> bool {
        match self.tracks.iter().position(|t| t.id == track_id) {
            Some(index) => {
                self.current = Some(index);
                true
            }
            None => false,
        }
    }

    /// Make a single track the entire queue
    ///
    /// Used when a track is played without any list context.
    pub fn wrap_single(&mut self, track: Track) {
        self.tracks = vec![track];
        self.current = Some(0);
    }

    /// Absorb a play request
    ///
    /// A non-empty source list replaces the queue; otherwise an existing
    /// queue entry is re-selected if possible, and only as a last resort
    /// does the single track become the queue. This favors preserving the
    /// user's browsing queue over collapsing it to one track.
    pub fn activate(&mut self, track: Track, source_list: Vec<Track>) -> Activation {
        if !source_list.is_empty() {
            self.replace(source_list, Some(&track.id));
            Activation::Replaced
        } else if self.tracks.is_empty() || !self.select_existing(&track.id) {
            self.wrap_single(track);
            Activation::Wrapped
        } else {
            Activation::Selected
        }
    }

    /// Move the current position to `index`
    ///
    /// Returns false if the index is out of bounds.
    pub fn select_index(&mut self, index: usize) -> bool {
        if index < self.tracks.len() {
            self.current = Some(index);
            true
        } else {
            false
        }
    }

    /// Current position, if any track is selected
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Currently selected track
    pub fn current_track(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    /// All tracks in queue order
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of tracks in the queue
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn create_test_track(id: &str, title: &str) -> Track {
        Track {
            id: id.to_string(),
            title: title.to_string(),
            artist: "Test Artist".to_string(),
            cover_url: None,
            audio_url: format!("https://cdn.example.com/{}.mp3", id),
            duration: Some(Duration::from_secs(180)),
        }
    }

    #[test]
    fn create_empty_queue() {
        let queue = PlayQueue::new();
        assert_eq!(queue.len(), 0);
        assert!(queue.is_empty());
        assert_eq!(queue.current_index(), None);
        assert!(queue.current_track().is_none());
    }

    #[test]
    fn replace_selects_start_track() {
        let mut queue = PlayQueue::new();
        queue.replace(
            vec![
                create_test_track("1", "Track 1"),
                create_test_track("2", "Track 2"),
                create_test_track("3", "Track 3"),
            ],
            Some("2"),
        );

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.current_index(), Some(1));
        assert_eq!(queue.current_track().unwrap().id, "2");
    }

    #[test]
    fn replace_with_unknown_start_falls_back_to_first() {
        let mut queue = PlayQueue::new();
        queue.replace(
            vec![
                create_test_track("1", "Track 1"),
                create_test_track("2", "Track 2"),
            ],
            Some("missing"),
        );

        assert_eq!(queue.current_index(), Some(0));
    }

    #[test]
    fn replace_with_empty_list_is_noop() {
        let mut queue = PlayQueue::new();
        queue.replace(vec![create_test_track("1", "Track 1")], None);

        queue.replace(Vec::new(), None);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.current_index(), Some(0));
    }

    #[test]
    fn select_existing_moves_position_only() {
        let mut queue = PlayQueue::new();
        queue.replace(
            vec![
                create_test_track("1", "Track 1"),
                create_test_track("2", "Track 2"),
                create_test_track("3", "Track 3"),
            ],
            Some("1"),
        );

        assert!(queue.select_existing("3"));
        assert_eq!(queue.current_index(), Some(2));
        assert_eq!(queue.len(), 3);

        assert!(!queue.select_existing("missing"));
        assert_eq!(queue.current_index(), Some(2));
    }

    #[test]
    fn wrap_single_makes_one_track_queue() {
        let mut queue = PlayQueue::new();
        queue.wrap_single(create_test_track("1", "Track 1"));

        assert_eq!(queue.len(), 1);
        assert_eq!(queue.current_index(), Some(0));
    }

    #[test]
    fn activate_with_source_list_replaces() {
        let mut queue = PlayQueue::new();
        queue.wrap_single(create_test_track("old", "Old"));

        let activation = queue.activate(
            create_test_track("2", "Track 2"),
            vec![
                create_test_track("1", "Track 1"),
                create_test_track("2", "Track 2"),
            ],
        );

        assert_eq!(activation, Activation::Replaced);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.current_track().unwrap().id, "2");
    }

    #[test]
    fn activate_prefers_existing_queue_entry() {
        let mut queue = PlayQueue::new();
        queue.replace(
            vec![
                create_test_track("1", "Track 1"),
                create_test_track("2", "Track 2"),
            ],
            Some("1"),
        );

        let activation = queue.activate(create_test_track("2", "Track 2"), Vec::new());

        assert_eq!(activation, Activation::Selected);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.current_index(), Some(1));
    }

    #[test]
    fn activate_wraps_unknown_track_without_context() {
        let mut queue = PlayQueue::new();
        queue.replace(vec![create_test_track("1", "Track 1")], None);

        let activation = queue.activate(create_test_track("9", "Track 9"), Vec::new());

        assert_eq!(activation, Activation::Wrapped);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.current_track().unwrap().id, "9");
    }

    #[test]
    fn select_index_bounds_checked() {
        let mut queue = PlayQueue::new();
        queue.replace(
            vec![
                create_test_track("1", "Track 1"),
                create_test_track("2", "Track 2"),
            ],
            None,
        );

        assert!(queue.select_index(1));
        assert_eq!(queue.current_index(), Some(1));

        assert!(!queue.select_index(2));
        assert_eq!(queue.current_index(), Some(1));
    }
}
