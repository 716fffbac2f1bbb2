use super::Config;

pub const VOLUME: u8 = 50;
pub const LYRIC_ENCODING: &str = "utf-8";
pub const PLAYLIST_FILE: &str = "playlist";
pub const LOG_FILE: &str = "rawsteel.log";
pub const MPV_LOG_FILE: &str = "mpv.log";

/// Seek step for the `[` / `]` keys, in milliseconds
pub const SEEK_STEP_MS: i64 = 5_000;
/// Volume step for the `-` / `+` keys
pub const VOLUME_STEP: u8 = 5;

/// Config written on first run.
pub fn defaults() -> Config {
    Config::default()
}
