use crate::remote::{Command, ItemKind, PlaybackSnapshot};

/// Playback icons shared by the play/pause control and the favicon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Play,
    Pause,
    SkipBack,
    SkipForward,
}

impl Icon {
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::Play => "▶",
            Icon::Pause => "⏸",
            Icon::SkipBack => "⏮",
            Icon::SkipForward => "⏭",
        }
    }

    pub fn alt(&self) -> &'static str {
        match self {
            Icon::Play => "Play button",
            Icon::Pause => "Pause button",
            Icon::SkipBack => "Back button",
            Icon::SkipForward => "Forward button",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlId {
    Previous,
    PlayPause,
    Next,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlView {
    pub id: ControlId,
    pub icon: Icon,
}

/// Transport controls bound to one snapshot's device and play state.
///
/// Rebuilt wholesale on every reconcile; an old binding is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportControls {
    device_id: String,
    is_playing: bool,
}

impl TransportControls {
    pub fn bind(device_id: &str, is_playing: bool) -> Self {
        Self {
            device_id: device_id.to_string(),
            is_playing,
        }
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn command_for(&self, control: ControlId) -> Command {
        match control {
            ControlId::Previous => Command::SkipPrevious,
            ControlId::PlayPause if self.is_playing => Command::Pause,
            ControlId::PlayPause => Command::Resume,
            ControlId::Next => Command::SkipNext,
        }
    }

    pub fn views(&self) -> Vec<ControlView> {
        vec![
            ControlView { id: ControlId::Previous, icon: Icon::SkipBack },
            ControlView {
                id: ControlId::PlayPause,
                icon: if self.is_playing { Icon::Pause } else { Icon::Play },
            },
            ControlView { id: ControlId::Next, icon: Icon::SkipForward },
        ]
    }
}

/// Album details, only ever present for tracks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumInfo {
    pub name: String,
    pub art_url: Option<String>,
}

/// What is on screen, derived from the last applied snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlaying {
    pub kind: ItemKind,
    pub title: String,
    pub subtitle: String,
    pub album: Option<AlbumInfo>,
}

/// Last known remote playback state and the flags derived from it
#[derive(Debug, Default)]
pub struct PlaybackStore {
    now_playing: Option<NowPlaying>,
    is_playing: bool,
    device_id: String,
}

impl PlaybackStore {
    /// Replace everything with what `snapshot` says
    pub fn update(&mut self, snapshot: &PlaybackSnapshot) {
        let album = match snapshot.item_kind {
            ItemKind::Track => snapshot.album_name.as_ref().map(|name| AlbumInfo {
                name: name.clone(),
                art_url: snapshot.album_art_url.clone(),
            }),
            ItemKind::Episode => None,
        };

        self.now_playing = Some(NowPlaying {
            kind: snapshot.item_kind,
            title: snapshot.item_name.clone(),
            subtitle: snapshot.subtitle.clone(),
            album,
        });
        self.is_playing = snapshot.is_playing;
        self.device_id = snapshot.device_id.clone();
    }

    pub fn now_playing(&self) -> Option<&NowPlaying> {
        self.now_playing.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Most recently observed device, empty until the first snapshot
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn has_snapshot(&self) -> bool {
        self.now_playing.is_some()
    }
}

/// Everything a display surface needs to paint the widget
#[derive(Debug, Clone, PartialEq)]
pub struct NowPlayingView {
    pub loading: bool,
    pub title: String,
    pub subtitle: String,
    pub album: Option<String>,
    pub album_art_url: Option<String>,
    pub position_ms: u64,
    pub duration_ms: u64,
    pub progress: f64,
    /// Progress bar drawn in its paused style
    pub paused: bool,
    pub window_title: String,
    pub favicon: Icon,
    pub controls: Vec<ControlView>,
}

impl NowPlayingView {
    pub fn loading() -> Self {
        Self {
            loading: true,
            title: String::new(),
            subtitle: String::new(),
            album: None,
            album_art_url: None,
            position_ms: 0,
            duration_ms: 0,
            progress: 0.0,
            paused: true,
            window_title: "Loading".to_string(),
            favicon: Icon::Pause,
            controls: Vec::new(),
        }
    }

    pub fn control(&self, id: ControlId) -> Option<&ControlView> {
        self.controls.iter().find(|control| control.id == id)
    }
}

impl Default for NowPlayingView {
    fn default() -> Self {
        Self::loading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::fake::{episode, track};

    #[test]
    fn test_controls_follow_play_state() {
        let playing = TransportControls::bind("device-1", true);
        assert_eq!(playing.command_for(ControlId::PlayPause), Command::Pause);
        assert_eq!(playing.command_for(ControlId::Next), Command::SkipNext);
        assert_eq!(playing.command_for(ControlId::Previous), Command::SkipPrevious);
        assert_eq!(playing.views()[1].icon, Icon::Pause);

        let paused = TransportControls::bind("device-1", false);
        assert_eq!(paused.command_for(ControlId::PlayPause), Command::Resume);
        assert_eq!(paused.views()[1].icon, Icon::Play);
    }

    #[test]
    fn test_store_starts_empty() {
        let store = PlaybackStore::default();
        assert!(!store.has_snapshot());
        assert!(!store.is_playing());
        assert_eq!(store.device_id(), "");
    }

    #[test]
    fn test_store_drops_album_for_episode() {
        let mut store = PlaybackStore::default();
        store.update(&track("Song", &["X"], true, 0));
        assert_eq!(store.now_playing().unwrap().album.as_ref().unwrap().name, "Song (Album)");

        store.update(&episode("Ep", "Show", false, 0));
        let now_playing = store.now_playing().unwrap();
        assert!(now_playing.album.is_none());
        assert_eq!(now_playing.subtitle, "Show");
        assert_eq!(store.device_id(), "device-2");
        assert!(!store.is_playing());
    }

    #[test]
    fn test_loading_view() {
        let view = NowPlayingView::default();
        assert!(view.loading);
        assert_eq!(view.window_title, "Loading");
        assert!(view.control(ControlId::PlayPause).is_none());
    }
}
