use std::path::{Path, PathBuf};

/// File name suffixes accepted for playback and import.
pub const AUDIO_SUFFIXES: [&str; 3] = ["mp3", "wma", "ogg"];

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    pub artist: String,
    pub title: String,
}

impl Track {
    /// Build a track from its path, reading "Artist - Title" from the file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = display_name(&path);
        let parts: Vec<&str> = name
            .split('-')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        let (artist, title) = match parts.as_slice() {
            [] => (UNKNOWN, UNKNOWN),
            [title] => (UNKNOWN, *title),
            [artist, title, ..] => (*artist, *title),
        };

        Self {
            artist: artist.to_string(),
            title: title.to_string(),
            path,
        }
    }

    /// File name without its extension.
    pub fn display_name(&self) -> String {
        display_name(&self.path)
    }
}

fn display_name(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Case-sensitive suffix check against [`AUDIO_SUFFIXES`].
pub fn is_supported_audio(name: &str) -> bool {
    AUDIO_SUFFIXES.iter().any(|s| name.ends_with(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artist_and_title_from_name() {
        let t = Track::from_path("/music/Faye Wong - Red Bean.mp3");
        assert_eq!(t.artist, "Faye Wong");
        assert_eq!(t.title, "Red Bean");
        assert_eq!(t.display_name(), "Faye Wong - Red Bean");
    }

    #[test]
    fn test_title_only() {
        let t = Track::from_path("/music/Interlude.ogg");
        assert_eq!(t.artist, "Unknown");
        assert_eq!(t.title, "Interlude");
    }

    #[test]
    fn test_extra_dashes_and_empty_parts() {
        let t = Track::from_path("/music/-A--B-C.wma");
        assert_eq!(t.artist, "A");
        assert_eq!(t.title, "B");

        let t = Track::from_path("/music/ - .mp3");
        assert_eq!(t.artist, "Unknown");
        assert_eq!(t.title, "Unknown");
    }

    #[test]
    fn test_supported_audio() {
        assert!(is_supported_audio("/a/b.mp3"));
        assert!(is_supported_audio("file:///a/b.ogg"));
        assert!(is_supported_audio("/a/b.wma"));
        assert!(!is_supported_audio("/a/b.MP3"));
        assert!(!is_supported_audio("/a/b.flac"));
    }
}
