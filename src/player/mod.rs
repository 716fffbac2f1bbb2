pub mod mpv;

use std::path::PathBuf;

/// Requests for the media service, produced by the dispatcher and executed
/// by the app loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    Load(PathBuf),
    Play,
    Pause,
    Seek { position_ms: u64 },
    SetVolume(u8),
}
