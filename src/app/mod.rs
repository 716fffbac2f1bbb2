pub mod actions;
pub mod dispatch;
pub mod dropped;
pub mod events;
pub mod state;

use crate::config::Config;
use crate::input::{self, ClickTracker};
use crate::lyrics::decode::encoding_for_label;
use crate::player::PlayerCommand;
use crate::player::mpv::MpvHandle;
use crate::playlist::PlaylistStore;
use crate::track::Track;
use crate::tui::{self, TuiTerminal};
use actions::Action;
use anyhow::Context;
use dispatch::Dispatcher;
use events::{Event, PlayerEvent};
use state::{AppState, Toast};
use tokio::sync::mpsc;

pub struct App {
    cfg: Config,
    config_path: std::path::PathBuf,
    state: AppState,
    dispatcher: Dispatcher,
    clicks: ClickTracker,
    mpv: Option<MpvHandle>,
    last_title: Option<String>,
}

impl App {
    pub fn new(cfg: Config, config_path: std::path::PathBuf) -> anyhow::Result<Self> {
        let encoding = encoding_for_label(&cfg.lyrics.encoding)?;
        let playlist = PlaylistStore::open(&cfg.paths.playlist_path())?;

        let mut state = AppState::new(cfg.player.mode, cfg.player.volume);
        let saved = playlist.load_all().context("load playlist")?;
        tracing::info!(tracks = saved.len(), path = %playlist.path().display(), "playlist loaded");
        state
            .queue
            .add_many(saved.into_iter().map(Track::from_path).collect());

        Ok(Self {
            cfg,
            config_path,
            state,
            dispatcher: Dispatcher::new(playlist, encoding),
            clicks: ClickTracker::default(),
            mpv: None,
            last_title: None,
        })
    }

    pub async fn run(&mut self, terminal: &mut TuiTerminal) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<Event>(256);

        input::spawn_input_task(tx.clone());
        // No ticker: mpv pushes time-pos changes, and the dispatcher decides
        // which of them are worth a frame.

        let mpv_log = self.cfg.paths.mpv_log_path();
        match MpvHandle::spawn(
            tx.clone(),
            self.cfg.player.audio_device.as_deref(),
            Some(&mpv_log),
        )
        .await
        {
            Ok(h) => {
                if let Err(e) = h.set_volume(self.state.playback.volume).await {
                    tracing::warn!(error = %e, "initial volume not applied");
                }
                self.mpv = Some(h);
            }
            Err(e) => {
                tracing::error!(error = %e, "mpv unavailable");
                self.state.toast = Some(Toast::error(format!("mpv disabled: {e:#}")));
                self.mpv = None;
            }
        }
        drop(tx);

        tui::draw(terminal, &mut self.state)?;

        while let Some(ev) = rx.recv().await {
            let (action, from_input) = match ev {
                Event::Input(input_ev) => (
                    input::map_input_to_action(&self.state, &mut self.clicks, input_ev),
                    true,
                ),
                Event::Player(pe) => (player_action(pe), false),
            };

            let mut redraw = from_input;
            if let Some(action) = action {
                let outcome = self.dispatcher.dispatch(&mut self.state, action);
                redraw |= outcome.redraw;
                self.execute(outcome.commands).await;
            }

            if self.state.should_quit {
                break;
            }

            self.sync_title();
            if redraw {
                tui::draw(terminal, &mut self.state)?;
            }
        }

        self.save_state_on_quit();
        Ok(())
    }

    async fn execute(&mut self, commands: Vec<PlayerCommand>) {
        if commands.is_empty() {
            return;
        }
        let Some(mpv) = &self.mpv else {
            self.state.status = "mpv not available".to_string();
            return;
        };
        for cmd in commands {
            tracing::debug!(?cmd, "player command");
            let res = match &cmd {
                PlayerCommand::Load(path) => mpv.load_file(path).await,
                PlayerCommand::Play => mpv.play().await,
                PlayerCommand::Pause => mpv.pause().await,
                PlayerCommand::Seek { position_ms } => mpv.seek_absolute(*position_ms).await,
                PlayerCommand::SetVolume(v) => mpv.set_volume(*v).await,
            };
            if let Err(e) = res {
                tracing::warn!(?cmd, error = %e, "player command failed");
                self.state.toast = Some(Toast::error(format!("{e:#}")));
            }
        }
    }

    fn sync_title(&mut self) {
        if self.state.window_title == self.last_title {
            return;
        }
        let title = self.state.window_title.as_deref().unwrap_or("rawsteel");
        if let Err(e) = tui::set_title(title) {
            tracing::debug!(error = %e, "terminal title not updated");
        }
        self.last_title = self.state.window_title.clone();
    }

    fn save_state_on_quit(&mut self) {
        self.cfg.player.volume = self.state.playback.volume;
        self.cfg.player.mode = self.state.queue.mode();

        if let Err(e) = crate::config::save(&self.cfg, Some(&self.config_path)) {
            tracing::warn!(error = %e, "config not saved on quit");
        }
    }
}

fn player_action(ev: PlayerEvent) -> Option<Action> {
    Some(match ev {
        PlayerEvent::Started => Action::PlaybackStateChanged { paused: false },
        PlayerEvent::Paused => Action::PlaybackStateChanged { paused: true },
        PlayerEvent::Position { ms } => Action::PositionTick { ms },
        PlayerEvent::Duration { ms } => Action::DurationChanged { ms },
        PlayerEvent::Ended => Action::TrackEnded,
        PlayerEvent::Error(message) => Action::PlayerError(message),
    })
}
