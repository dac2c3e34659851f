pub mod spotify;

#[cfg(test)]
pub(crate) mod fake;

use anyhow::Result;
use async_trait::async_trait;

/// What kind of item the remote player is currently playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Track,
    Episode,
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemKind::Track => write!(f, "track"),
            ItemKind::Episode => write!(f, "episode"),
        }
    }
}

impl std::str::FromStr for ItemKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "track" => Ok(ItemKind::Track),
            "episode" => Ok(ItemKind::Episode),
            _ => Err(anyhow::anyhow!("Unsupported item type: {}", s)),
        }
    }
}

/// One fetched instant of remote playback state.
///
/// `progress_ms <= duration_ms` is whatever the service reports; nothing
/// here enforces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub is_playing: bool,
    pub device_id: String,
    pub item_kind: ItemKind,
    pub item_name: String,
    /// Artists joined with ", " for tracks, the show name for episodes
    pub subtitle: String,
    pub album_name: Option<String>,
    pub album_art_url: Option<String>,
    pub progress_ms: u64,
    pub duration_ms: u64,
}

/// A control action sent to the remote player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SkipNext,
    SkipPrevious,
    Pause,
    Resume,
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::SkipNext => write!(f, "skip to next"),
            Command::SkipPrevious => write!(f, "skip to previous"),
            Command::Pause => write!(f, "pause"),
            Command::Resume => write!(f, "resume"),
        }
    }
}

/// The remote playback service the widget mirrors and controls.
///
/// Every call may suspend indefinitely; callers must not assume timeouts.
#[async_trait]
pub trait PlaybackService: Send + Sync {
    /// Human-readable backend name for logs
    fn name(&self) -> &str;

    /// Fetch the current playback state. `None` means nothing is playing.
    async fn get_playback_state(&self) -> Result<Option<PlaybackSnapshot>>;

    async fn skip_to_next(&self, device_id: &str) -> Result<()>;

    async fn skip_to_previous(&self, device_id: &str) -> Result<()>;

    async fn pause_playback(&self, device_id: &str) -> Result<()>;

    async fn start_resume_playback(&self, device_id: &str) -> Result<()>;

    /// Send a [`Command`] through the matching operation
    async fn send_command(&self, command: Command, device_id: &str) -> Result<()> {
        match command {
            Command::SkipNext => self.skip_to_next(device_id).await,
            Command::SkipPrevious => self.skip_to_previous(device_id).await,
            Command::Pause => self.pause_playback(device_id).await,
            Command::Resume => self.start_resume_playback(device_id).await,
        }
    }
}

pub use spotify::SpotifyClient;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_kind_from_str() {
        assert_eq!("track".parse::<ItemKind>().unwrap(), ItemKind::Track);
        assert_eq!("Episode".parse::<ItemKind>().unwrap(), ItemKind::Episode);
        assert!("ad".parse::<ItemKind>().is_err());
        assert!("unknown".parse::<ItemKind>().is_err());
    }

    #[test]
    fn test_command_display() {
        assert_eq!(Command::SkipNext.to_string(), "skip to next");
        assert_eq!(Command::Resume.to_string(), "resume");
    }
}
