//! Root layout widget - orchestrates main layout structure

use crate::app::state::AppState;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use super::{lyrics, now_playing, playlist};

/// Main layout structure:
/// ┌────────────────────────┬────────────────────────┐
/// │        Playlist        │         Lyrics         │
/// │                        │                        │
/// ├────────────────────────┴────────────────────────┤
/// │ Player: track, progress, controls, status       │
/// └─────────────────────────────────────────────────┘
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let root = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),    // Playlist + lyrics
            Constraint::Length(6), // Player bar
        ])
        .split(root);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    playlist::render(frame, state, body[0]);
    lyrics::render(frame, state, body[1]);
    now_playing::render(frame, state, rows[1]);
}
