//! Single-threaded routing of actions to the state they own.
//!
//! The dispatcher never talks to the media service directly: it mutates
//! [`AppState`] and hands back the [`PlayerCommand`]s the app loop should run.

use super::actions::{Action, PlayTarget, SeekTarget, VolumeChange};
use super::state::{AppState, Toast};
use crate::config::defaults::VOLUME_STEP;
use crate::lyrics;
use crate::player::PlayerCommand;
use crate::playlist::PlaylistStore;
use crate::track::Track;
use encoding_rs::Encoding;
use std::path::PathBuf;

/// What the app loop has to do after an action.
#[derive(Debug, Default, PartialEq)]
pub struct Outcome {
    pub commands: Vec<PlayerCommand>,
    pub redraw: bool,
}

impl Outcome {
    fn redraw() -> Self {
        Self {
            commands: Vec::new(),
            redraw: true,
        }
    }

    fn with(commands: Vec<PlayerCommand>) -> Self {
        Self {
            commands,
            redraw: true,
        }
    }
}

pub struct Dispatcher {
    playlist: PlaylistStore,
    encoding: &'static Encoding,
}

impl Dispatcher {
    pub fn new(playlist: PlaylistStore, encoding: &'static Encoding) -> Self {
        Self { playlist, encoding }
    }

    pub fn dispatch(&mut self, state: &mut AppState, action: Action) -> Outcome {
        match action {
            Action::Quit => {
                state.should_quit = true;
                Outcome::default()
            }
            Action::PlayRequested(target) => self.play_requested(state, target),
            Action::SeekRequested(target) => seek_requested(state, target),
            Action::VolumeChanged(change) => volume_changed(state, change),
            Action::ToggleMode => {
                let mode = state.queue.toggle_mode();
                state.status = format!("Mode: {}", mode.label());
                tracing::debug!(mode = mode.label(), "playback mode changed");
                Outcome::redraw()
            }
            Action::TrackChanged(index) => self.track_changed(state, index),
            Action::PositionTick { ms } => position_tick(state, ms),
            Action::DurationChanged { ms } => {
                state.playback.duration_ms = ms;
                Outcome::redraw()
            }
            Action::PlaybackStateChanged { paused } => {
                state.playback.paused = paused;
                Outcome::redraw()
            }
            Action::TrackEnded => {
                state.playback.position_ms = 0;
                match state.queue.advance() {
                    Some(index) => self.dispatch(state, Action::TrackChanged(index)),
                    None => {
                        state.status = "Playback ended".into();
                        Outcome::redraw()
                    }
                }
            }
            Action::PlayerError(e) => {
                tracing::warn!(error = %e, "player error");
                state.status = format!("Player error: {e}");
                state.toast = Some(Toast::error(e));
                Outcome::redraw()
            }
            Action::DropAccepted(paths) => self.drop_accepted(state, paths),
            Action::ListUp => move_selection(state, |list, _| list.select_prev(1)),
            Action::ListDown => move_selection(state, |list, len| list.select_next(1, len)),
            Action::PageUp => move_selection(state, |list, _| list.select_prev(10)),
            Action::PageDown => move_selection(state, |list, len| list.select_next(10, len)),
            Action::GoTop => move_selection(state, |list, _| list.selected = 0),
            Action::GoBottom => move_selection(state, |list, len| {
                list.selected = len.saturating_sub(1)
            }),
            Action::SelectRow(row) => move_selection(state, |list, len| list.select(row, len)),
            Action::Resize => {
                let position = state.playback.position_ms;
                if !state.lyrics.state.entries().is_empty() {
                    state.lyrics.refresh(position, true);
                }
                Outcome::redraw()
            }
        }
    }

    fn play_requested(&mut self, state: &mut AppState, target: PlayTarget) -> Outcome {
        let index = match target {
            PlayTarget::Toggle => {
                if state.queue.current_index().is_some() {
                    return toggle_pause(state);
                }
                state.queue.advance()
            }
            PlayTarget::Index(i) => state.queue.set_current(i).map(|_| i),
            PlayTarget::Next => state.queue.advance(),
            PlayTarget::Previous => state.queue.go_back(),
        };

        match index {
            Some(index) => self.dispatch(state, Action::TrackChanged(index)),
            None => {
                if state.queue.is_empty() {
                    state.status = "Playlist is empty: drop some files here".into();
                }
                Outcome::redraw()
            }
        }
    }

    fn track_changed(&mut self, state: &mut AppState, index: usize) -> Outcome {
        let Some(track) = state.queue.set_current(index).cloned() else {
            tracing::warn!(index, "track change to missing index");
            return Outcome::default();
        };

        state.playback.position_ms = 0;
        state.playback.duration_ms = 0;
        state.playback.paused = false;
        let len = state.queue.len();
        let height = state.list_height();
        state.list.select(index, len);
        state.list.update_scroll(height);

        state
            .lyrics
            .set(lyrics::load_for_track(&track.path, self.encoding));
        state.lyrics.refresh(0, true);

        let name = track.display_name();
        tracing::info!(index, track = %track.path.display(), "track changed");
        state.status = format!("Playing: {name}");
        state.window_title = Some(name);

        Outcome::with(vec![PlayerCommand::Load(track.path), PlayerCommand::Play])
    }

    fn drop_accepted(&mut self, state: &mut AppState, paths: Vec<PathBuf>) -> Outcome {
        if paths.is_empty() {
            state.status = "No mp3/wma/ogg files in drop".into();
            return Outcome::redraw();
        }

        let count = paths.len();
        let mut unsaved = 0;
        for path in paths {
            // A track that cannot be persisted still plays this session
            if let Err(e) = self.playlist.append(&path) {
                tracing::warn!(
                    error = %format!("{e:#}"),
                    path = %path.display(),
                    "failed to persist dropped track"
                );
                unsaved += 1;
            }
            state.queue.add(Track::from_path(path));
        }

        state.toast = Some(if unsaved == 0 {
            Toast::success(format!("Added {count} tracks"))
        } else {
            Toast::error(format!("Added {count} tracks, {unsaved} not saved to the playlist"))
        });
        tracing::info!(count, unsaved, total = state.queue.len(), "tracks dropped");
        state.status = format!("Playlist: {} tracks", state.queue.len());
        Outcome::redraw()
    }
}

fn toggle_pause(state: &mut AppState) -> Outcome {
    state.playback.paused = !state.playback.paused;
    let command = if state.playback.paused {
        PlayerCommand::Pause
    } else {
        PlayerCommand::Play
    };
    Outcome::with(vec![command])
}

fn seek_requested(state: &mut AppState, target: SeekTarget) -> Outcome {
    let duration = state.playback.duration_ms;
    if duration == 0 {
        return Outcome::default();
    }

    let position = match target {
        SeekTarget::Absolute { ms } => ms,
        SeekTarget::Relative { delta_ms } => state.playback.position_ms.saturating_add_signed(delta_ms),
        SeekTarget::Fraction(f) => (duration as f64 * f.clamp(0.0, 1.0)) as u64,
    }
    .min(duration);

    state.playback.position_ms = position;
    state.lyrics.refresh(position, false);
    Outcome::with(vec![PlayerCommand::Seek {
        position_ms: position,
    }])
}

fn position_tick(state: &mut AppState, ms: u64) -> Outcome {
    // Nothing derived from position is meaningful until the duration is known
    if state.playback.duration_ms == 0 {
        return Outcome::default();
    }

    let previous_second = state.playback.position_ms / 1000;
    state.playback.position_ms = ms;
    let lyric_changed = state.lyrics.refresh(ms, false);

    Outcome {
        commands: Vec::new(),
        redraw: lyric_changed || previous_second != ms / 1000,
    }
}

fn volume_changed(state: &mut AppState, change: VolumeChange) -> Outcome {
    let current = state.playback.volume;
    let volume = match change {
        VolumeChange::Set(v) => v.min(100),
        VolumeChange::Up => current.saturating_add(VOLUME_STEP).min(100),
        VolumeChange::Down => current.saturating_sub(VOLUME_STEP),
    };
    if volume == current {
        return Outcome::default();
    }
    state.playback.volume = volume;
    Outcome::with(vec![PlayerCommand::SetVolume(volume)])
}

fn move_selection(
    state: &mut AppState,
    f: impl FnOnce(&mut super::state::ListState, usize),
) -> Outcome {
    let len = state.queue.len();
    let height = state.list_height();
    f(&mut state.list, len);
    state.list.update_scroll(height);
    Outcome::redraw()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::ToastKind;
    use crate::lyrics::LyricsState;
    use crate::queue::PlaybackMode;
    use std::path::Path;
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        dispatcher: Dispatcher,
        state: AppState,
    }

    fn fixture(tracks: &[&str]) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = PlaylistStore::open(&dir.path().join("playlist")).unwrap();
        let mut state = AppState::new(PlaybackMode::Loop, 50);
        state.queue.add_many(
            tracks
                .iter()
                .map(|name| Track::from_path(dir.path().join(name)))
                .collect(),
        );
        Fixture {
            dispatcher: Dispatcher::new(store, encoding_rs::UTF_8),
            state,
            dir,
        }
    }

    impl Fixture {
        fn dispatch(&mut self, action: Action) -> Outcome {
            self.dispatcher.dispatch(&mut self.state, action)
        }

        fn write_lrc(&self, name: &str, content: &str) {
            std::fs::write(self.dir.path().join(name), content).unwrap();
        }
    }

    #[test]
    fn test_first_toggle_starts_queue() {
        let mut fx = fixture(&["a.mp3", "b.mp3"]);
        let out = fx.dispatch(Action::PlayRequested(PlayTarget::Toggle));

        let path = fx.dir.path().join("a.mp3");
        assert_eq!(
            out.commands,
            vec![PlayerCommand::Load(path), PlayerCommand::Play]
        );
        assert_eq!(fx.state.queue.current_index(), Some(0));
        assert_eq!(fx.state.window_title.as_deref(), Some("a"));
        assert!(!fx.state.playback.paused);
    }

    #[test]
    fn test_toggle_pauses_and_resumes() {
        let mut fx = fixture(&["a.mp3"]);
        fx.dispatch(Action::PlayRequested(PlayTarget::Toggle));

        let out = fx.dispatch(Action::PlayRequested(PlayTarget::Toggle));
        assert_eq!(out.commands, vec![PlayerCommand::Pause]);
        let out = fx.dispatch(Action::PlayRequested(PlayTarget::Toggle));
        assert_eq!(out.commands, vec![PlayerCommand::Play]);
    }

    #[test]
    fn test_toggle_on_empty_playlist() {
        let mut fx = fixture(&[]);
        let out = fx.dispatch(Action::PlayRequested(PlayTarget::Toggle));
        assert!(out.commands.is_empty());
        assert!(fx.state.status.contains("empty"));
    }

    #[test]
    fn test_track_change_loads_lyrics() {
        let mut fx = fixture(&["a.mp3", "b.ogg"]);
        fx.write_lrc("b.lrc", "[00:00.00]x\n[00:01.00]y\n[00:02.00]z\n");

        fx.dispatch(Action::PlayRequested(PlayTarget::Index(1)));
        assert_eq!(fx.state.lyrics.state.entries().len(), 3);
        // Position 0 sits exactly on the first timestamp, so the last line wins
        assert_eq!(fx.state.lyrics.active_line(), Some(2));
        assert_eq!(fx.state.list.selected, 1);

        fx.dispatch(Action::PlayRequested(PlayTarget::Previous));
        assert_eq!(
            fx.state.lyrics.state,
            LyricsState::NotFound(fx.dir.path().join("a.lrc"))
        );
        assert_eq!(fx.state.lyrics.active_line(), None);
    }

    #[test]
    fn test_position_ignored_until_duration_known() {
        let mut fx = fixture(&["a.mp3"]);
        fx.write_lrc("a.lrc", "[00:00.00]x\n[00:01.00]y\n[00:02.00]z\n");
        fx.dispatch(Action::TrackChanged(0));

        let out = fx.dispatch(Action::PositionTick { ms: 1500 });
        assert_eq!(out, Outcome::default());
        assert_eq!(fx.state.playback.position_ms, 0);
        assert_eq!(fx.state.lyrics.active_line(), Some(2));
    }

    #[test]
    fn test_position_tick_follows_lyrics() {
        let mut fx = fixture(&["a.mp3"]);
        fx.write_lrc("a.lrc", "[00:00.00]x\n[00:01.00]y\n[00:02.00]z\n");
        fx.dispatch(Action::TrackChanged(0));
        fx.dispatch(Action::DurationChanged { ms: 10_000 });

        let out = fx.dispatch(Action::PositionTick { ms: 1200 });
        assert!(out.redraw);
        assert_eq!(fx.state.lyrics.active_line(), Some(1));

        // Same line and same second: nothing to redraw
        let out = fx.dispatch(Action::PositionTick { ms: 1400 });
        assert!(!out.redraw);

        // Exact boundary lags to the last line
        fx.dispatch(Action::PositionTick { ms: 1000 });
        assert_eq!(fx.state.lyrics.active_line(), Some(2));
    }

    #[test]
    fn test_resize_forces_lyric_refresh() {
        let mut fx = fixture(&["a.mp3"]);
        fx.write_lrc("a.lrc", "[00:00.00]x\n[00:01.00]y\n");
        fx.dispatch(Action::TrackChanged(0));
        fx.dispatch(Action::DurationChanged { ms: 10_000 });
        fx.dispatch(Action::PositionTick { ms: 500 });

        let out = fx.dispatch(Action::Resize);
        assert!(out.redraw);
        assert_eq!(fx.state.lyrics.active_line(), Some(0));
    }

    #[test]
    fn test_seek_requires_duration() {
        let mut fx = fixture(&["a.mp3"]);
        fx.dispatch(Action::TrackChanged(0));

        let out = fx.dispatch(Action::SeekRequested(SeekTarget::Fraction(0.5)));
        assert!(out.commands.is_empty());

        fx.dispatch(Action::DurationChanged { ms: 200_000 });
        let out = fx.dispatch(Action::SeekRequested(SeekTarget::Fraction(0.5)));
        assert_eq!(
            out.commands,
            vec![PlayerCommand::Seek {
                position_ms: 100_000
            }]
        );

        let out = fx.dispatch(Action::SeekRequested(SeekTarget::Relative {
            delta_ms: -150_000,
        }));
        assert_eq!(out.commands, vec![PlayerCommand::Seek { position_ms: 0 }]);

        let out = fx.dispatch(Action::SeekRequested(SeekTarget::Absolute { ms: 999_999 }));
        assert_eq!(
            out.commands,
            vec![PlayerCommand::Seek {
                position_ms: 200_000
            }]
        );
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut fx = fixture(&[]);
        let out = fx.dispatch(Action::VolumeChanged(VolumeChange::Set(250)));
        assert_eq!(out.commands, vec![PlayerCommand::SetVolume(100)]);

        let out = fx.dispatch(Action::VolumeChanged(VolumeChange::Up));
        assert!(out.commands.is_empty());

        let out = fx.dispatch(Action::VolumeChanged(VolumeChange::Down));
        assert_eq!(out.commands, vec![PlayerCommand::SetVolume(95)]);
    }

    #[test]
    fn test_drop_appends_to_playlist_and_queue() {
        let mut fx = fixture(&["a.mp3"]);
        let dropped = vec![PathBuf::from("/x/one.mp3"), PathBuf::from("/x/two.ogg")];
        fx.dispatch(Action::DropAccepted(dropped));

        assert_eq!(fx.state.queue.len(), 3);
        assert_eq!(fx.state.queue.tracks()[2].title, "two");

        let store = PlaylistStore::open(&fx.dir.path().join("playlist")).unwrap();
        assert_eq!(store.load_all().unwrap(), vec!["/x/one.mp3", "/x/two.ogg"]);
        assert!(matches!(
            fx.state.toast,
            Some(Toast { kind: ToastKind::Success, .. })
        ));
    }

    #[test]
    fn test_drop_still_queues_when_playlist_file_is_gone() {
        let mut fx = fixture(&[]);
        let playlist = fx.dir.path().join("playlist");
        std::fs::remove_file(&playlist).unwrap();
        std::fs::create_dir(&playlist).unwrap();

        fx.dispatch(Action::DropAccepted(vec![PathBuf::from("/x/one.mp3")]));

        assert_eq!(fx.state.queue.len(), 1);
        let toast = fx.state.toast.as_ref().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert!(toast.message.contains("1 not saved"));
    }

    #[test]
    fn test_track_ended_advances() {
        let mut fx = fixture(&["a.mp3", "b.mp3"]);
        fx.dispatch(Action::TrackChanged(1));

        let out = fx.dispatch(Action::TrackEnded);
        let path = fx.dir.path().join("a.mp3");
        assert_eq!(out.commands[0], PlayerCommand::Load(path));
        assert_eq!(fx.state.queue.current_index(), Some(0));
    }

    #[test]
    fn test_list_navigation_is_bounded() {
        let mut fx = fixture(&["a.mp3", "b.mp3", "c.mp3"]);
        fx.dispatch(Action::GoBottom);
        assert_eq!(fx.state.list.selected, 2);
        fx.dispatch(Action::ListDown);
        assert_eq!(fx.state.list.selected, 2);
        fx.dispatch(Action::PageUp);
        assert_eq!(fx.state.list.selected, 0);
        fx.dispatch(Action::SelectRow(7));
        assert_eq!(fx.state.list.selected, 2);
        assert!(Path::new(&fx.state.queue.tracks()[2].path).ends_with("c.mp3"));
    }
}
