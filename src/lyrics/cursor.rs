//! Maps a playback position to the active lyric line.

use super::parser::LyricEntry;

/// Index of the lyric line active at `position_ms`.
///
/// Returns 0 for an empty sequence, so callers must check emptiness before
/// treating the result as a real index. A position exactly on an interior
/// timestamp matches no gap and falls back to the last line.
pub fn active_line(position_ms: u64, entries: &[LyricEntry]) -> usize {
    let Some(first) = entries.first() else {
        return 0;
    };
    if position_ms < first.start_ms {
        return 0;
    }

    entries
        .windows(2)
        .position(|pair| pair[0].start_ms < position_ms && position_ms < pair[1].start_ms)
        .unwrap_or(entries.len() - 1)
}

/// First visible row that keeps `active` centered in a viewport of `height`
/// rows, clamped so the last line never scrolls above the bottom edge.
pub fn scroll_offset(active: usize, total: usize, height: usize) -> usize {
    if height == 0 || total <= height {
        return 0;
    }
    active
        .saturating_sub(height / 2)
        .min(total - height)
}

/// Remembers the last rendered line so position ticks that land on the same
/// line can skip re-rendering.
#[derive(Debug, Clone, Default)]
pub struct LyricCursor {
    last_active_line: Option<usize>,
}

impl LyricCursor {
    /// Returns the line to render, or `None` when nothing changed since the
    /// previous call and no refresh was forced.
    pub fn refresh(
        &mut self,
        position_ms: u64,
        entries: &[LyricEntry],
        force: bool,
    ) -> Option<usize> {
        let line = active_line(position_ms, entries);
        if self.last_active_line == Some(line) && !force {
            return None;
        }
        self.last_active_line = Some(line);
        Some(line)
    }

    pub fn last_active_line(&self) -> Option<usize> {
        self.last_active_line
    }

    pub fn reset(&mut self) {
        self.last_active_line = None;
    }
}
