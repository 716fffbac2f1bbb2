//! Lyrics panel - the whole lyric sheet, active line bold and centered

use crate::app::state::AppState;
use crate::lyrics::cursor::scroll_offset;
use crate::tui::theme::get_theme;
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

pub fn render(frame: &mut Frame, state: &AppState, area: Rect) {
    let theme = get_theme();
    let block = theme.panel(theme.icons.lyrics, "Lyrics");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(message) = state.lyrics.state.placeholder() {
        let paragraph = Paragraph::new(vec![
            Line::default(),
            Line::from(Span::styled(
                message,
                Style::default().fg(theme.palette.fg_secondary),
            )),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
        return;
    }

    let entries = state.lyrics.state.entries();
    let active = state.lyrics.active_line();

    let lines: Vec<Line> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let style = if Some(i) == active {
                Style::default()
                    .fg(theme.palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.palette.fg_secondary)
            };
            Line::from(Span::styled(entry.text.as_str(), style))
        })
        .collect();

    let offset = scroll_offset(
        active.unwrap_or(0),
        entries.len(),
        inner.height as usize,
    );
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .scroll((offset, 0));
    frame.render_widget(paragraph, inner);
}
