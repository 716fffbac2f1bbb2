use crate::app::actions::{Action, PlayTarget, SeekTarget, VolumeChange};
use crate::app::dropped::parse_dropped;
use crate::app::events::{Event, InputEvent};
use crate::app::state::AppState;
use crate::config::defaults::SEEK_STEP_MS;
use crossterm::event::{
    self, Event as CtEvent, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use ratatui::layout::{Position, Rect};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

const DOUBLE_CLICK: Duration = Duration::from_millis(400);

pub fn spawn_input_task(tx: mpsc::Sender<Event>) {
    tokio::task::spawn_blocking(move || {
        loop {
            if !event::poll(Duration::from_millis(250)).unwrap_or(false) {
                if tx.is_closed() {
                    break;
                }
                continue;
            }
            let ev = match event::read() {
                Ok(CtEvent::Key(k)) if k.kind == KeyEventKind::Press => InputEvent::Key(k),
                Ok(CtEvent::Mouse(m)) => InputEvent::Mouse(m),
                Ok(CtEvent::Paste(text)) => InputEvent::Paste(text),
                Ok(CtEvent::Resize(_, _)) => InputEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "terminal read failed");
                    continue;
                }
            };
            if tx.blocking_send(Event::Input(ev)).is_err() {
                break;
            }
        }
    });
}

/// Remembers the last clicked playlist row to detect double clicks.
#[derive(Debug, Default)]
pub struct ClickTracker {
    last: Option<(Instant, usize)>,
}

impl ClickTracker {
    /// Record a click on `row`, returning true when it completes a double click.
    pub fn click(&mut self, row: usize, now: Instant) -> bool {
        let double = matches!(
            self.last,
            Some((at, last_row)) if last_row == row && now.duration_since(at) <= DOUBLE_CLICK
        );
        self.last = if double { None } else { Some((now, row)) };
        double
    }
}

pub fn map_input_to_action(
    state: &AppState,
    clicks: &mut ClickTracker,
    ev: InputEvent,
) -> Option<Action> {
    match ev {
        InputEvent::Resize => Some(Action::Resize),
        InputEvent::Paste(text) => Some(Action::DropAccepted(parse_dropped(&text))),
        InputEvent::Mouse(m) => {
            let pos = Position::new(m.column, m.row);
            match m.kind {
                MouseEventKind::ScrollUp => Some(Action::ListUp),
                MouseEventKind::ScrollDown => Some(Action::ListDown),
                MouseEventKind::Down(MouseButton::Left) => {
                    mouse_click(state, clicks, pos, Instant::now())
                }
                _ => None,
            }
        }
        InputEvent::Key(k) => map_key(state, k),
    }
}

fn mouse_click(
    state: &AppState,
    clicks: &mut ClickTracker,
    pos: Position,
    now: Instant,
) -> Option<Action> {
    let progress = state.layout.progress;
    if progress.contains(pos) {
        return Some(Action::SeekRequested(SeekTarget::Fraction(fraction_at(
            progress, pos.x,
        ))));
    }

    let volume = state.layout.volume;
    if volume.contains(pos) {
        let level = (fraction_at(volume, pos.x) * 100.0).round() as u8;
        return Some(Action::VolumeChanged(VolumeChange::Set(level)));
    }

    let list = state.layout.playlist;
    if list.contains(pos) {
        let row = state.list.scroll_offset + (pos.y - list.y) as usize;
        if row >= state.queue.len() {
            return None;
        }
        return Some(if clicks.click(row, now) {
            Action::PlayRequested(PlayTarget::Index(row))
        } else {
            Action::SelectRow(row)
        });
    }

    None
}

/// Horizontal click position inside `area` as a 0.0..=1.0 fraction.
fn fraction_at(area: Rect, x: u16) -> f64 {
    if area.width <= 1 {
        return 0.0;
    }
    let offset = x.saturating_sub(area.x) as f64;
    (offset / (area.width - 1) as f64).clamp(0.0, 1.0)
}

fn map_key(state: &AppState, k: crossterm::event::KeyEvent) -> Option<Action> {
    match k.code {
        // Quit
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('c') if k.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),

        // Navigation - vim style
        KeyCode::Up | KeyCode::Char('k') => Some(Action::ListUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ListDown),
        KeyCode::Char('g') | KeyCode::Home => Some(Action::GoTop),
        KeyCode::Char('G') | KeyCode::End => Some(Action::GoBottom),
        KeyCode::Char('d') if k.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::PageDown),
        KeyCode::Char('u') if k.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::PageUp),
        KeyCode::PageDown => Some(Action::PageDown),
        KeyCode::PageUp => Some(Action::PageUp),

        // Playback
        KeyCode::Enter if !state.queue.is_empty() => {
            Some(Action::PlayRequested(PlayTarget::Index(state.list.selected)))
        }
        KeyCode::Char(' ') => Some(Action::PlayRequested(PlayTarget::Toggle)),
        KeyCode::Char('n') => Some(Action::PlayRequested(PlayTarget::Next)),
        KeyCode::Char('p') => Some(Action::PlayRequested(PlayTarget::Previous)),
        KeyCode::Char('m') => Some(Action::ToggleMode),
        KeyCode::Char('=') | KeyCode::Char('+') => Some(Action::VolumeChanged(VolumeChange::Up)),
        KeyCode::Char('-') | KeyCode::Char('_') => {
            Some(Action::VolumeChanged(VolumeChange::Down))
        }
        KeyCode::Char('0') => Some(Action::SeekRequested(SeekTarget::Absolute { ms: 0 })),
        KeyCode::Char(']') | KeyCode::Right => Some(Action::SeekRequested(SeekTarget::Relative {
            delta_ms: SEEK_STEP_MS,
        })),
        KeyCode::Char('[') | KeyCode::Left => Some(Action::SeekRequested(SeekTarget::Relative {
            delta_ms: -SEEK_STEP_MS,
        })),

        _ => None,
    }
}
