mod app;
mod config;
mod input;
mod lyrics;
mod player;
mod playlist;
mod queue;
mod track;
mod tui;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rawsteel", version, about = "Terminal music player with synced LRC lyrics")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the interactive TUI (default).
    Tui,
    /// Parse an .lrc file and print its timed lines (headless).
    Lyrics {
        file: PathBuf,
        /// Mark the line active at this playback position (milliseconds).
        #[arg(long)]
        at: Option<u64>,
    },
    /// Inspect or extend the saved playlist (headless).
    Playlist {
        #[command(subcommand)]
        cmd: PlaylistCommand,
    },
}

#[derive(Debug, Subcommand)]
enum PlaylistCommand {
    /// Print every saved track.
    List,
    /// Append audio files (mp3/wma/ogg); other files are skipped.
    Add { paths: Vec<PathBuf> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;
    let cfg_path = match cli.config.clone() {
        Some(p) => p,
        None => config::default_config_path().context("default config path")?,
    };

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => {
            init_tracing_to_file(&cfg.paths.log_path())?;
            let mut app = app::App::new(cfg.clone(), cfg_path)?;
            let mut terminal = tui::TerminalGuard::enter(cfg.input.mouse).context("init terminal")?;
            app.run(terminal.terminal_mut()).await?;
        }
        Command::Lyrics { file, at } => {
            init_tracing_to_stderr();
            print_lyrics(&cfg, &file, at)?;
        }
        Command::Playlist { cmd } => {
            init_tracing_to_stderr();
            let store = playlist::PlaylistStore::open(&cfg.paths.playlist_path())?;
            match cmd {
                PlaylistCommand::List => {
                    for (i, raw) in store.load_all()?.into_iter().enumerate() {
                        let t = track::Track::from_path(raw);
                        println!("{:02}. {}  ({})", i + 1, t.display_name(), t.path.display());
                    }
                }
                PlaylistCommand::Add { paths } => {
                    let accepted = accepted_audio(&paths)?;
                    store.append_many(&accepted)?;
                    println!(
                        "Added {} of {} file(s) to {}",
                        accepted.len(),
                        paths.len(),
                        store.path().display()
                    );
                }
            }
        }
    }

    Ok(())
}

fn print_lyrics(cfg: &config::Config, file: &Path, at: Option<u64>) -> anyhow::Result<()> {
    let encoding = lyrics::decode::encoding_for_label(&cfg.lyrics.encoding)?;
    let bytes = std::fs::read(file).with_context(|| format!("read {}", file.display()))?;
    let entries = lyrics::parser::parse(&lyrics::decode::decode(&bytes, encoding));
    if entries.is_empty() {
        println!("No timed lyrics in {}", file.display());
        return Ok(());
    }

    let active = at.map(|ms| lyrics::active_line(ms, &entries));
    for (i, e) in entries.iter().enumerate() {
        let marker = if active == Some(i) { '>' } else { ' ' };
        let (min, rest) = (e.start_ms / 60_000, e.start_ms % 60_000);
        println!(
            "{marker} [{:02}:{:02}.{:03}] {}",
            min,
            rest / 1000,
            rest % 1000,
            e.text
        );
    }
    Ok(())
}

/// Absolute paths of the supported audio files among `paths`.
fn accepted_audio(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for p in paths {
        let name = p.to_string_lossy();
        if !track::is_supported_audio(&name) {
            tracing::warn!(path = %p.display(), "skipping unsupported file");
            continue;
        }
        out.push(std::path::absolute(p).with_context(|| format!("resolve {}", p.display()))?);
    }
    Ok(out)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// The TUI owns the terminal, so its logs go to a file.
fn init_tracing_to_file(log_path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("open log file {}", log_path.display()))?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
    Ok(())
}

fn init_tracing_to_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::parse_from(["rawsteel", "lyrics", "a.lrc", "--at", "1500"]);
        match cli.command {
            Some(Command::Lyrics { file, at }) => {
                assert_eq!(file, PathBuf::from("a.lrc"));
                assert_eq!(at, Some(1500));
            }
            other => panic!("unexpected {other:?}"),
        }

        let cli = Cli::parse_from(["rawsteel", "--config", "c.toml", "playlist", "add", "a.mp3", "b.txt"]);
        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
        assert!(matches!(
            cli.command,
            Some(Command::Playlist { cmd: PlaylistCommand::Add { ref paths } }) if paths.len() == 2
        ));

        assert!(Cli::parse_from(["rawsteel"]).command.is_none());
    }

    #[test]
    fn test_accepted_audio_filters_by_suffix() {
        let paths = vec![
            PathBuf::from("/music/a.mp3"),
            PathBuf::from("/music/cover.jpg"),
            PathBuf::from("/music/b.ogg"),
        ];
        let out = accepted_audio(&paths).unwrap();
        assert_eq!(out, vec![PathBuf::from("/music/a.mp3"), PathBuf::from("/music/b.ogg")]);
    }
}
