use crate::track::Track;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// How next/previous pick a track. Both modes wrap around the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackMode {
    #[default]
    Shuffle,
    Loop,
}

impl PlaybackMode {
    pub fn toggled(self) -> Self {
        match self {
            PlaybackMode::Shuffle => PlaybackMode::Loop,
            PlaybackMode::Loop => PlaybackMode::Shuffle,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlaybackMode::Shuffle => "Shuffle",
            PlaybackMode::Loop => "Loop",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: Vec<Track>,
    current_index: Option<usize>,
    mode: PlaybackMode,
    shuffle_order: Vec<usize>,
}

impl Queue {
    pub fn new(mode: PlaybackMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Add a single track to the end of the queue
    pub fn add(&mut self, track: Track) {
        self.tracks.push(track);
        self.rebuild_shuffle_order();
    }

    /// Add multiple tracks to the end of the queue
    pub fn add_many(&mut self, tracks: Vec<Track>) {
        if tracks.is_empty() {
            return;
        }
        self.tracks.extend(tracks);
        self.rebuild_shuffle_order();
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    /// Switch between shuffle and loop, returning the new mode
    pub fn toggle_mode(&mut self) -> PlaybackMode {
        self.mode = self.mode.toggled();
        self.rebuild_shuffle_order();
        self.mode
    }

    /// Set the current playing index
    pub fn set_current(&mut self, index: usize) -> Option<&Track> {
        if index < self.tracks.len() {
            self.current_index = Some(index);
        }
        self.tracks.get(index)
    }

    /// Get the current track
    pub fn current_track(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.tracks.get(i))
    }

    /// Get the current index
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Advance to the next track, returns the new current index.
    /// With nothing playing yet this starts from the first track.
    pub fn advance(&mut self) -> Option<usize> {
        let next = match self.current_index {
            Some(current) => self.next_index(current)?,
            None => self.first_index()?,
        };
        self.current_index = Some(next);
        Some(next)
    }

    /// Go to the previous track, returns the new current index
    pub fn go_back(&mut self) -> Option<usize> {
        let prev = match self.current_index {
            Some(current) => self.prev_index(current)?,
            None => self.first_index()?,
        };
        self.current_index = Some(prev);
        Some(prev)
    }

    /// Get all tracks in the queue
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Get the number of tracks in the queue
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    fn first_index(&self) -> Option<usize> {
        if self.tracks.is_empty() {
            return None;
        }
        match self.mode {
            PlaybackMode::Shuffle => self.shuffle_order.first().copied(),
            PlaybackMode::Loop => Some(0),
        }
    }

    fn next_index(&self, current: usize) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }

        match self.mode {
            PlaybackMode::Shuffle => {
                let pos = self.shuffle_order.iter().position(|&x| x == current)?;
                Some(self.shuffle_order[(pos + 1) % len])
            }
            PlaybackMode::Loop => Some((current + 1) % len),
        }
    }

    fn prev_index(&self, current: usize) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }

        match self.mode {
            PlaybackMode::Shuffle => {
                let pos = self.shuffle_order.iter().position(|&x| x == current)?;
                Some(self.shuffle_order[(pos + len - 1) % len])
            }
            PlaybackMode::Loop => Some((current + len - 1) % len),
        }
    }

    fn rebuild_shuffle_order(&mut self) {
        if self.mode != PlaybackMode::Shuffle || self.tracks.is_empty() {
            self.shuffle_order.clear();
            return;
        }

        let mut rng = rand::rng();
        self.shuffle_order = (0..self.tracks.len()).collect();
        self.shuffle_order.shuffle(&mut rng);

        // Keep the current track at the front so a full cycle visits every other track first
        if let Some(current) = self.current_index
            && let Some(pos) = self.shuffle_order.iter().position(|&x| x == current)
        {
            self.shuffle_order.swap(0, pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn make_track(name: &str) -> Track {
        Track::from_path(format!("/music/{name}.mp3"))
    }

    fn make_queue(mode: PlaybackMode, n: usize) -> Queue {
        let mut queue = Queue::new(mode);
        queue.add_many((0..n).map(|i| make_track(&i.to_string())).collect());
        queue
    }

    #[test]
    fn test_add_and_len() {
        let mut queue = Queue::new(PlaybackMode::Loop);
        assert!(queue.is_empty());

        queue.add(make_track("1"));
        assert_eq!(queue.len(), 1);

        queue.add(make_track("2"));
        assert_eq!(queue.len(), 2);
        assert!(queue.current_index().is_none());
    }

    #[test]
    fn test_loop_advance_wraps() {
        let mut queue = make_queue(PlaybackMode::Loop, 3);

        assert_eq!(queue.advance(), Some(0));
        assert_eq!(queue.advance(), Some(1));
        assert_eq!(queue.advance(), Some(2));
        assert_eq!(queue.advance(), Some(0));
        assert_eq!(queue.current_track().unwrap().title, "0");
    }

    #[test]
    fn test_loop_go_back_wraps() {
        let mut queue = make_queue(PlaybackMode::Loop, 3);
        queue.set_current(0);
        assert_eq!(queue.go_back(), Some(2));
        assert_eq!(queue.go_back(), Some(1));
    }

    #[test]
    fn test_shuffle_visits_every_track() {
        let mut queue = make_queue(PlaybackMode::Shuffle, 6);
        let mut seen = HashSet::new();
        for _ in 0..6 {
            seen.insert(queue.advance().unwrap());
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_shuffle_back_returns_previous() {
        let mut queue = make_queue(PlaybackMode::Shuffle, 5);
        let first = queue.advance().unwrap();
        let second = queue.advance().unwrap();
        assert_ne!(first, second);
        assert_eq!(queue.go_back(), Some(first));
    }

    #[test]
    fn test_toggle_mode() {
        let mut queue = make_queue(PlaybackMode::Shuffle, 3);
        queue.set_current(1);
        assert_eq!(queue.toggle_mode(), PlaybackMode::Loop);
        assert_eq!(queue.advance(), Some(2));
        assert_eq!(queue.toggle_mode(), PlaybackMode::Shuffle);
        assert_eq!(queue.current_index(), Some(2));
    }

    #[test]
    fn test_empty_queue_does_not_move() {
        let mut queue = Queue::new(PlaybackMode::Loop);
        assert!(queue.advance().is_none());
        assert!(queue.go_back().is_none());
        assert!(queue.set_current(3).is_none());
        assert!(queue.current_track().is_none());
    }
}
