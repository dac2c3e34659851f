//! Turning fetched snapshots into display state.
//!
//! The [`Reconciler`] is the only writer of the store, the progress clock,
//! and the control bindings. Each `apply` replaces all three together.

use std::time::Duration;

use super::state::{ControlId, Icon, NowPlayingView, PlaybackStore, TransportControls};
use crate::progress::ProgressClock;
use crate::remote::{Command, PlaybackSnapshot};

pub struct Reconciler {
    store: PlaybackStore,
    clock: ProgressClock,
    controls: Option<TransportControls>,
}

impl Reconciler {
    pub fn new(tick_interval: Duration, clamp_progress: bool) -> Self {
        Self {
            store: PlaybackStore::default(),
            clock: ProgressClock::new(tick_interval, clamp_progress),
            controls: None,
        }
    }

    pub fn apply(&mut self, snapshot: PlaybackSnapshot) {
        tracing::debug!(
            "Applying {} '{}' ({}, {}/{} ms)",
            snapshot.item_kind,
            snapshot.item_name,
            if snapshot.is_playing { "playing" } else { "paused" },
            snapshot.progress_ms,
            snapshot.duration_ms
        );

        self.store.update(&snapshot);
        self.clock
            .start(snapshot.progress_ms, snapshot.duration_ms, snapshot.is_playing);
        self.controls = Some(TransportControls::bind(
            &snapshot.device_id,
            snapshot.is_playing,
        ));
    }

    /// Command bound to `control` by the last apply, if any apply happened
    pub fn bound_command(&self, control: ControlId) -> Option<(Command, String)> {
        self.controls
            .as_ref()
            .map(|controls| (controls.command_for(control), controls.device_id().to_string()))
    }

    pub fn store(&self) -> &PlaybackStore {
        &self.store
    }

    pub fn clock(&self) -> &ProgressClock {
        &self.clock
    }

    /// Next render tick of the live progress simulation
    pub async fn tick(&mut self) -> u64 {
        self.clock.tick().await
    }

    pub fn view(&self) -> NowPlayingView {
        let Some(now_playing) = self.store.now_playing() else {
            return NowPlayingView::loading();
        };

        let is_playing = self.store.is_playing();
        let window_title = if is_playing {
            format!("Playing {}", now_playing.title)
        } else {
            "Paused".to_string()
        };

        NowPlayingView {
            loading: false,
            title: now_playing.title.clone(),
            subtitle: now_playing.subtitle.clone(),
            album: now_playing.album.as_ref().map(|album| album.name.clone()),
            album_art_url: now_playing.album.as_ref().and_then(|album| album.art_url.clone()),
            position_ms: self.clock.current_position_ms(),
            duration_ms: self.clock.duration_ms(),
            progress: self.clock.fraction(),
            paused: !is_playing,
            window_title,
            favicon: if is_playing { Icon::Play } else { Icon::Pause },
            controls: self
                .controls
                .as_ref()
                .map(|controls| controls.views())
                .unwrap_or_default(),
        }
    }
}
