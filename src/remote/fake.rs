//! Scripted in-memory playback service for engine tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use super::{Command, ItemKind, PlaybackService, PlaybackSnapshot};

pub enum FakeFetch {
    Snapshot(PlaybackSnapshot),
    Delayed(Duration, PlaybackSnapshot),
    Nothing,
    Fail,
}

#[derive(Default)]
pub struct FakeService {
    script: Mutex<VecDeque<FakeFetch>>,
    fallback: Mutex<Option<PlaybackSnapshot>>,
    fetches: AtomicUsize,
    commands: Mutex<Vec<(Command, String)>>,
    fail_commands: AtomicBool,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the response for the next unscripted fetch
    pub fn push(&self, fetch: FakeFetch) {
        self.script.lock().unwrap().push_back(fetch);
    }

    /// Response used once the script runs out
    pub fn set_fallback(&self, snapshot: PlaybackSnapshot) {
        *self.fallback.lock().unwrap() = Some(snapshot);
    }

    pub fn fail_commands(&self, fail: bool) {
        self.fail_commands.store(fail, Ordering::SeqCst);
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn commands(&self) -> Vec<(Command, String)> {
        self.commands.lock().unwrap().clone()
    }

    fn record(&self, command: Command, device_id: &str) -> Result<()> {
        self.commands.lock().unwrap().push((command, device_id.to_string()));
        if self.fail_commands.load(Ordering::SeqCst) {
            Err(anyhow!("device not found"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PlaybackService for FakeService {
    fn name(&self) -> &str {
        "fake"
    }

    async fn get_playback_state(&self) -> Result<Option<PlaybackSnapshot>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(FakeFetch::Snapshot(snapshot)) => Ok(Some(snapshot)),
            Some(FakeFetch::Delayed(delay, snapshot)) => {
                tokio::time::sleep(delay).await;
                Ok(Some(snapshot))
            }
            Some(FakeFetch::Nothing) => Ok(None),
            Some(FakeFetch::Fail) => Err(anyhow!("service unavailable")),
            None => Ok(self.fallback.lock().unwrap().clone()),
        }
    }

    async fn skip_to_next(&self, device_id: &str) -> Result<()> {
        self.record(Command::SkipNext, device_id)
    }

    async fn skip_to_previous(&self, device_id: &str) -> Result<()> {
        self.record(Command::SkipPrevious, device_id)
    }

    async fn pause_playback(&self, device_id: &str) -> Result<()> {
        self.record(Command::Pause, device_id)
    }

    async fn start_resume_playback(&self, device_id: &str) -> Result<()> {
        self.record(Command::Resume, device_id)
    }
}

pub fn track(name: &str, artists: &[&str], is_playing: bool, progress_ms: u64) -> PlaybackSnapshot {
    PlaybackSnapshot {
        is_playing,
        device_id: "device-1".to_string(),
        item_kind: ItemKind::Track,
        item_name: name.to_string(),
        subtitle: artists.join(", "),
        album_name: Some(format!("{} (Album)", name)),
        album_art_url: Some(format!("https://img/{}", name)),
        progress_ms,
        duration_ms: 200_000,
    }
}

pub fn episode(name: &str, show: &str, is_playing: bool, progress_ms: u64) -> PlaybackSnapshot {
    PlaybackSnapshot {
        is_playing,
        device_id: "device-2".to_string(),
        item_kind: ItemKind::Episode,
        item_name: name.to_string(),
        subtitle: show.to_string(),
        album_name: None,
        album_art_url: None,
        progress_ms,
        duration_ms: 3_600_000,
    }
}
