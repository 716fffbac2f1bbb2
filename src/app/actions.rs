use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayTarget {
    /// Play/pause, or start the queue when nothing has played yet
    Toggle,
    Index(usize),
    Next,
    Previous,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekTarget {
    Absolute { ms: u64 },
    Relative { delta_ms: i64 },
    /// Fraction of the track duration, 0.0..=1.0
    Fraction(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeChange {
    Set(u8),
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,

    // Playback
    PlayRequested(PlayTarget),
    SeekRequested(SeekTarget),
    VolumeChanged(VolumeChange),
    ToggleMode,

    // Reported by the media service
    TrackChanged(usize),
    PositionTick { ms: u64 },
    DurationChanged { ms: u64 },
    PlaybackStateChanged { paused: bool },
    TrackEnded,
    PlayerError(String),

    // Import
    DropAccepted(Vec<PathBuf>),

    // Playlist panel
    ListUp,
    ListDown,
    GoTop,
    GoBottom,
    PageUp,
    PageDown,
    SelectRow(usize),

    Resize,
}
