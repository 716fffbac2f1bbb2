//! Lyrics module for loading and following synchronized lyrics
//!
//! This module provides:
//! - LRC format parser for timestamped lyrics
//! - A cursor that maps playback position to the active line
//! - Loading of the `.lrc` file that sits beside an audio file

pub mod cursor;
pub mod decode;
pub mod parser;

pub use cursor::{LyricCursor, active_line};
pub use parser::LyricEntry;

use crate::track::AUDIO_SUFFIXES;
use encoding_rs::Encoding;
use std::path::{Path, PathBuf};

/// Lyrics for the current track
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LyricsState {
    /// No track has been loaded yet
    #[default]
    Empty,
    NotFound(PathBuf),
    OpenFailed(PathBuf),
    Loaded(Vec<LyricEntry>),
}

impl LyricsState {
    /// Parsed entries, empty unless lyrics were loaded.
    pub fn entries(&self) -> &[LyricEntry] {
        match self {
            LyricsState::Loaded(entries) => entries,
            _ => &[],
        }
    }

    /// Text shown in place of the lyrics, if any.
    pub fn placeholder(&self) -> Option<String> {
        match self {
            LyricsState::Empty => Some("Lyrics...".to_string()),
            LyricsState::NotFound(p) => Some(format!("Lyric not exist: {}", p.display())),
            LyricsState::OpenFailed(p) => Some(format!("Lyric open failed: {}", p.display())),
            LyricsState::Loaded(entries) if entries.is_empty() => {
                Some("No timed lyrics in file".to_string())
            }
            LyricsState::Loaded(_) => None,
        }
    }
}

/// Path of the lyric file for an audio file: a trailing `mp3`, `wma` or
/// `ogg` is replaced by `lrc`. Other paths are returned unchanged.
pub fn lyric_path_for(audio: &Path) -> PathBuf {
    let raw = audio.to_string_lossy();
    for suffix in AUDIO_SUFFIXES {
        if let Some(stem) = raw.strip_suffix(suffix) {
            return PathBuf::from(format!("{stem}lrc"));
        }
    }
    audio.to_path_buf()
}

/// Read and parse the lyrics that belong to `audio`.
pub fn load_for_track(audio: &Path, encoding: &'static Encoding) -> LyricsState {
    let path = lyric_path_for(audio);
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no lyric file");
        return LyricsState::NotFound(path);
    }

    match std::fs::read(&path) {
        Ok(bytes) => {
            let text = decode::decode(&bytes, encoding);
            let entries = parser::parse(&text);
            tracing::info!(path = %path.display(), lines = entries.len(), "loaded lyrics");
            LyricsState::Loaded(entries)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to open lyric file");
            LyricsState::OpenFailed(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lyric_path_for() {
        assert_eq!(
            lyric_path_for(Path::new("/music/a - b.mp3")),
            PathBuf::from("/music/a - b.lrc")
        );
        assert_eq!(
            lyric_path_for(Path::new("/music/track.ogg")),
            PathBuf::from("/music/track.lrc")
        );
        // Suffix match is case-sensitive
        assert_eq!(
            lyric_path_for(Path::new("/music/track.MP3")),
            PathBuf::from("/music/track.MP3")
        );
    }

    #[test]
    fn test_every_playable_suffix_has_a_lyric_path() {
        for suffix in AUDIO_SUFFIXES {
            let audio = PathBuf::from(format!("/music/song.{suffix}"));
            assert!(crate::track::is_supported_audio(&audio.to_string_lossy()));
            assert_eq!(lyric_path_for(&audio), PathBuf::from("/music/song.lrc"));
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("song.mp3");
        let state = load_for_track(&audio, encoding_rs::UTF_8);
        assert_eq!(state, LyricsState::NotFound(dir.path().join("song.lrc")));
        assert!(state.entries().is_empty());
        assert!(state.placeholder().unwrap().starts_with("Lyric not exist: "));
    }

    #[test]
    fn test_load_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("song.wma");
        std::fs::write(dir.path().join("song.lrc"), "[00:01.00]One\n[00:02.00]Two\n").unwrap();

        let state = load_for_track(&audio, encoding_rs::UTF_8);
        assert_eq!(state.entries().len(), 2);
        assert_eq!(state.entries()[1].text, "Two");
        assert!(state.placeholder().is_none());
    }

    #[test]
    fn test_load_gbk_file() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("song.mp3");
        let mut bytes = b"[00:03.00]".to_vec();
        bytes.extend_from_slice(&[0xC4, 0xE3, 0xBA, 0xC3]);
        std::fs::write(dir.path().join("song.lrc"), bytes).unwrap();

        let state = load_for_track(&audio, encoding_rs::GBK);
        assert_eq!(state.entries(), &[LyricEntry::new(3000, "你好")]);
    }

    #[test]
    fn test_unreadable_path_reports_open_failed() {
        // A directory with the lyric name exists but cannot be read as a file
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("song.lrc")).unwrap();
        let state = load_for_track(&dir.path().join("song.mp3"), encoding_rs::UTF_8);
        assert_eq!(state, LyricsState::OpenFailed(dir.path().join("song.lrc")));
    }
}
