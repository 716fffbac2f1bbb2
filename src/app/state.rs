use crate::lyrics::{LyricCursor, LyricsState};
use crate::queue::{PlaybackMode, Queue};
use ratatui::layout::Rect;

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub created_at: std::time::Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Success,
            created_at: std::time::Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Error,
            created_at: std::time::Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > std::time::Duration::from_secs(3)
    }
}

/// Selection and scroll position of the playlist panel
#[derive(Debug, Clone, Default)]
pub struct ListState {
    pub selected: usize,
    pub scroll_offset: usize,
}

impl ListState {
    pub fn select(&mut self, index: usize, len: usize) {
        self.selected = index.min(len.saturating_sub(1));
    }

    pub fn select_prev(&mut self, step: usize) {
        self.selected = self.selected.saturating_sub(step);
    }

    pub fn select_next(&mut self, step: usize, len: usize) {
        self.select(self.selected.saturating_add(step), len);
    }

    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected - visible_height + 1;
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlaybackState {
    pub paused: bool,
    pub position_ms: u64,
    /// Zero until the media service reports the track length
    pub duration_ms: u64,
    pub volume: u8,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            paused: true,
            position_ms: 0,
            duration_ms: 0,
            volume: crate::config::defaults::VOLUME,
        }
    }
}

impl PlaybackState {
    pub fn progress_ratio(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        (self.position_ms as f64 / self.duration_ms as f64).clamp(0.0, 1.0)
    }

    /// "mm:ss/mm:ss" as shown next to the progress bar
    pub fn progress_label(&self) -> String {
        let pos = self.position_ms / 1000;
        let dur = self.duration_ms / 1000;
        format!("{:02}:{:02}/{:02}:{:02}", pos / 60, pos % 60, dur / 60, dur % 60)
    }
}

/// Lyrics of the current track plus the line currently highlighted
#[derive(Debug, Clone, Default)]
pub struct LyricsView {
    pub state: LyricsState,
    cursor: LyricCursor,
}

impl LyricsView {
    pub fn set(&mut self, state: LyricsState) {
        self.state = state;
        self.cursor.reset();
    }

    /// Re-evaluate the active line. Returns whether the panel needs a redraw.
    pub fn refresh(&mut self, position_ms: u64, force: bool) -> bool {
        let entries = self.state.entries();
        if entries.is_empty() {
            return force;
        }
        self.cursor.refresh(position_ms, entries, force).is_some()
    }

    /// Highlighted line; `None` while there are no entries.
    pub fn active_line(&self) -> Option<usize> {
        self.cursor.last_active_line()
    }
}

/// Screen areas from the last frame, used for mouse hit testing
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutHints {
    pub playlist: Rect,
    pub progress: Rect,
    pub volume: Rect,
}

/// Everything the player shows and mutates, owned by the app loop.
pub struct AppState {
    pub should_quit: bool,

    pub queue: Queue,
    pub list: ListState,

    pub playback: PlaybackState,
    pub lyrics: LyricsView,

    /// Name of the current track, mirrored into the terminal title
    pub window_title: Option<String>,

    pub layout: LayoutHints,

    pub toast: Option<Toast>,
    pub status: String,
}

impl AppState {
    pub fn new(mode: PlaybackMode, volume: u8) -> Self {
        Self {
            should_quit: false,
            queue: Queue::new(mode),
            list: ListState::default(),
            playback: PlaybackState {
                volume: volume.min(100),
                ..PlaybackState::default()
            },
            lyrics: LyricsView::default(),
            window_title: None,
            layout: LayoutHints::default(),
            toast: None,
            status: String::new(),
        }
    }

    /// Rows visible in the playlist panel during the last frame
    pub fn list_height(&self) -> usize {
        self.layout.playlist.height as usize
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(PlaybackMode::default(), crate::config::defaults::VOLUME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::LyricEntry;

    #[test]
    fn test_progress_label() {
        let p = PlaybackState {
            paused: false,
            position_ms: 65_400,
            duration_ms: 245_000,
            volume: 50,
        };
        assert_eq!(p.progress_label(), "01:05/04:05");
        assert!((p.progress_ratio() - 65_400.0 / 245_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_progress_ratio_with_unknown_duration() {
        let p = PlaybackState::default();
        assert_eq!(p.progress_ratio(), 0.0);
        assert_eq!(p.progress_label(), "00:00/00:00");
    }

    #[test]
    fn test_lyrics_view_refresh() {
        let mut view = LyricsView::default();
        assert!(!view.refresh(0, false));
        assert!(view.refresh(0, true));
        assert_eq!(view.active_line(), None);

        view.set(LyricsState::Loaded(vec![
            LyricEntry::new(0, "a"),
            LyricEntry::new(1000, "b"),
        ]));
        assert!(view.refresh(500, false));
        assert_eq!(view.active_line(), Some(0));
        assert!(!view.refresh(700, false));
        assert!(view.refresh(1500, false));
        assert_eq!(view.active_line(), Some(1));

        // A new track starts with no highlighted line
        view.set(LyricsState::Loaded(vec![LyricEntry::new(0, "x")]));
        assert_eq!(view.active_line(), None);
    }

    #[test]
    fn test_list_scroll() {
        let mut list = ListState::default();
        list.select_next(12, 20);
        list.update_scroll(5);
        assert_eq!(list.selected, 12);
        assert_eq!(list.scroll_offset, 8);
        list.select_next(100, 20);
        assert_eq!(list.selected, 19);
        list.select_prev(19);
        list.update_scroll(5);
        assert_eq!(list.scroll_offset, 0);
    }
}
