//! Playlist panel - every track with artist and title columns

use super::{pad_to_width, truncate_str};
use crate::app::state::AppState;
use crate::tui::theme::get_theme;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

const ARTIST_WIDTH: usize = 16;

pub fn render(frame: &mut Frame, state: &mut AppState, area: Rect) {
    let theme = get_theme();
    let icons = &theme.icons;

    let title = format!("Playlist ({})", state.queue.len());
    let block = theme.panel(icons.playlist, &title);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    state.layout.playlist = inner;

    if state.queue.is_empty() {
        let hint = Paragraph::new(vec![
            Line::default(),
            Line::from(Span::styled(
                "Drop mp3/wma/ogg files on the terminal",
                Style::default().fg(theme.palette.fg_secondary),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(hint, inner);
        return;
    }

    let visible_height = inner.height as usize;
    state.list.update_scroll(visible_height);

    let current_idx = state.queue.current_index();
    let selected_idx = state.list.selected;
    let title_width = (inner.width as usize).saturating_sub(ARTIST_WIDTH + 8);

    let lines: Vec<Line> = state
        .queue
        .tracks()
        .iter()
        .enumerate()
        .skip(state.list.scroll_offset)
        .take(visible_height)
        .map(|(i, track)| {
            let is_current = current_idx == Some(i);
            let is_selected = i == selected_idx;

            let prefix = if is_current { icons.play } else { " " };
            let style = if is_selected {
                Style::default()
                    .fg(theme.palette.fg_primary)
                    .bg(theme.palette.bg_highlight)
                    .add_modifier(Modifier::BOLD)
            } else if is_current {
                Style::default()
                    .fg(theme.palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.palette.fg_primary)
            };

            Line::from(vec![
                Span::styled(format!("{prefix} "), Style::default().fg(theme.palette.accent)),
                Span::styled(
                    format!("{:>3}  ", i),
                    Style::default().fg(theme.palette.fg_secondary),
                ),
                Span::styled(pad_to_width(&track.artist, ARTIST_WIDTH), style),
                Span::styled(" ", style),
                Span::styled(truncate_str(&track.title, title_width), style),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}
