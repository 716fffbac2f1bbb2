//! Now Playing bar - current track, clickable progress bar and transport state

use super::truncate_str;
use crate::app::state::{AppState, ToastKind};
use crate::queue::PlaybackMode;
use crate::tui::theme::{Icons, get_theme};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

pub fn render(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;

    let block = theme.panel(icons.music, "Player");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let padded = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner)[1];

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Track
            Constraint::Length(1), // Progress bar
            Constraint::Length(1), // Time + controls + volume + mode
            Constraint::Min(0),    // Toast or status
        ])
        .split(padded);

    let content_width = padded.width.saturating_sub(1) as usize;

    let np = state
        .queue
        .current_track()
        .map(|t| t.display_name())
        .unwrap_or_else(|| "Not playing".to_string());
    let title_line = Line::from(Span::styled(
        truncate_str(&np, content_width),
        Style::default()
            .fg(theme.palette.fg_primary)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(title_line), rows[0]);

    state.layout.progress = rows[1];
    let bar = render_progress_bar(rows[1].width as usize, state.playback.progress_ratio(), icons);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            bar,
            Style::default().fg(theme.palette.accent),
        ))),
        rows[1],
    );

    let playback = &state.playback;
    let play_icon = if playback.paused { icons.play } else { icons.pause };
    let vol_icon = if playback.volume == 0 {
        icons.volume_mute
    } else if playback.volume < 50 {
        icons.volume_low
    } else {
        icons.volume_high
    };
    let mode = state.queue.mode();
    let mode_icon = match mode {
        PlaybackMode::Shuffle => icons.shuffle,
        PlaybackMode::Loop => icons.repeat,
    };

    let mut controls = vec![
        Span::styled(
            playback.progress_label(),
            Style::default().fg(theme.palette.fg_secondary),
        ),
        Span::raw(" "),
        Span::styled(icons.prev, Style::default().fg(theme.palette.fg_secondary)),
        Span::raw(" "),
        Span::styled(play_icon, Style::default().fg(theme.palette.playing)),
        Span::raw(" "),
        Span::styled(icons.next, Style::default().fg(theme.palette.fg_secondary)),
        Span::raw("  "),
        Span::styled(vol_icon, Style::default().fg(theme.palette.fg_secondary)),
        Span::raw(" "),
    ];

    // The gauge is clickable: its cells map onto 0..=100%.
    let gauge_x: usize = controls.iter().map(Span::width).sum();
    state.layout.volume = gauge_rect(rows[2], gauge_x);
    controls.extend([
        Span::styled(
            render_progress_bar(
                VOLUME_GAUGE_WIDTH as usize,
                f64::from(playback.volume) / 100.0,
                icons,
            ),
            Style::default().fg(theme.palette.accent),
        ),
        Span::raw(" "),
        Span::styled(
            format!("{}%", playback.volume),
            Style::default().fg(theme.palette.fg_secondary),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} {}", mode_icon, mode.label()),
            Style::default().fg(theme.palette.accent_alt),
        ),
    ]);
    let controls = Line::from(controls);
    frame.render_widget(Paragraph::new(controls), rows[2]);

    let footer = if let Some(toast) = &state.toast
        && !toast.is_expired()
    {
        let (prefix, color) = match toast.kind {
            ToastKind::Success => (icons.success, theme.palette.playing),
            ToastKind::Error => (icons.error, theme.palette.error),
        };
        Line::from(vec![
            Span::styled(format!("{} ", prefix), Style::default().fg(color)),
            Span::styled(
                truncate_str(&toast.message, content_width.saturating_sub(3)),
                Style::default().fg(color),
            ),
        ])
    } else {
        Line::from(Span::styled(
            truncate_str(&state.status, content_width),
            Style::default().fg(theme.palette.fg_secondary),
        ))
    };
    frame.render_widget(Paragraph::new(footer), rows[3]);
}

/// Gauge cells, one per 10% step including zero
const VOLUME_GAUGE_WIDTH: u16 = 11;

/// Area of the volume gauge starting `offset` columns into `row`, or an empty
/// rect when the row is too narrow to show all of it.
fn gauge_rect(row: Rect, offset: usize) -> Rect {
    let Ok(offset) = u16::try_from(offset) else {
        return Rect::default();
    };
    if offset.saturating_add(VOLUME_GAUGE_WIDTH) > row.width {
        return Rect::default();
    }
    Rect::new(row.x + offset, row.y, VOLUME_GAUGE_WIDTH, 1)
}

fn render_progress_bar(width: usize, ratio: f64, icons: &Icons) -> String {
    if width < 3 {
        return String::new();
    }

    let filled = ((width - 1) as f64 * ratio).round() as usize;
    let empty = width.saturating_sub(filled + 1);

    let mut bar = String::with_capacity(width * 3);
    for _ in 0..filled {
        bar.push_str(icons.progress_full);
    }
    bar.push_str(icons.progress_head);
    for _ in 0..empty {
        bar.push_str(icons.progress_empty);
    }
    bar
}
