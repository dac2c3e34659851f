//! The playback synchronization engine.
//!
//! [`Engine`] owns every piece of mutable playback state and runs a single
//! event loop: poll ticks, progress render ticks, and [`EngineEvent`]s are
//! handled one at a time to completion. Remote calls never run on the loop
//! itself; they are spawned and post their results back as events.

pub mod commands;
pub mod gestures;
pub mod reconcile;
pub mod state;
pub mod sync;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{mpsc, watch};

use crate::config::SyncConfig;
use crate::remote::{Command, PlaybackService, PlaybackSnapshot};

pub use commands::CommandDispatcher;
pub use gestures::SwipeDirection;
pub use reconcile::Reconciler;
pub use state::{ControlId, ControlView, Icon, NowPlayingView, PlaybackStore, TransportControls};
pub use sync::{RefreshReason, SyncScheduler};

#[derive(Debug)]
pub enum EngineEvent {
    /// Start an out-of-band refresh
    Refresh(RefreshReason),
    /// A fetch finished. `Ok(None)` means nothing is playing.
    Fetched {
        seq: u64,
        reason: RefreshReason,
        result: Result<Option<PlaybackSnapshot>>,
    },
    CommandFinished {
        command: Command,
        result: Result<()>,
    },
    Gesture(SwipeDirection),
    /// A transport control was activated
    Activate(ControlId),
    Shutdown,
}

/// Cloneable way for the outside world to poke the engine
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl EngineHandle {
    pub fn refresh(&self) {
        let _ = self.tx.send(EngineEvent::Refresh(RefreshReason::Manual));
    }

    pub fn gesture(&self, direction: SwipeDirection) {
        let _ = self.tx.send(EngineEvent::Gesture(direction));
    }

    pub fn activate(&self, control: ControlId) {
        let _ = self.tx.send(EngineEvent::Activate(control));
    }

    pub fn shutdown(&self) {
        let _ = self.tx.send(EngineEvent::Shutdown);
    }
}

pub struct Engine {
    reconciler: Reconciler,
    scheduler: SyncScheduler,
    dispatcher: CommandDispatcher,
    events_tx: mpsc::UnboundedSender<EngineEvent>,
    events_rx: mpsc::UnboundedReceiver<EngineEvent>,
    view_tx: watch::Sender<NowPlayingView>,
}

impl Engine {
    pub fn new(service: Arc<dyn PlaybackService>, config: &SyncConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (view_tx, _) = watch::channel(NowPlayingView::loading());

        tracing::info!(
            "Syncing with {} every {} ms (stale responses {})",
            service.name(),
            config.poll_interval_ms,
            if config.discard_stale_responses { "discarded" } else { "applied" }
        );

        Self {
            reconciler: Reconciler::new(
                Duration::from_millis(config.progress_tick_ms.max(1)),
                config.clamp_progress,
            ),
            scheduler: SyncScheduler::new(
                Arc::clone(&service),
                events_tx.clone(),
                Duration::from_millis(config.poll_interval_ms.max(1)),
                config.discard_stale_responses,
            ),
            dispatcher: CommandDispatcher::new(service, events_tx.clone()),
            events_tx,
            events_rx,
            view_tx,
        }
    }

    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            tx: self.events_tx.clone(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<NowPlayingView> {
        self.view_tx.subscribe()
    }

    /// Run until [`EngineHandle::shutdown`] is called
    pub async fn run(mut self) {
        self.scheduler.refresh(RefreshReason::Startup);
        let mut poll = self.scheduler.poll_timer();

        loop {
            tokio::select! {
                _ = poll.tick() => {
                    self.scheduler.refresh(RefreshReason::Scheduled);
                }
                _ = self.reconciler.tick() => {
                    self.publish();
                }
                Some(event) = self.events_rx.recv() => {
                    if !self.handle_event(event) {
                        break;
                    }
                }
            }
        }

        tracing::info!("Sync engine stopped");
    }

    /// Handle one event to completion. Returns false on shutdown.
    pub fn handle_event(&mut self, event: EngineEvent) -> bool {
        match event {
            EngineEvent::Refresh(reason) => {
                self.scheduler.refresh(reason);
            }
            EngineEvent::Fetched { seq, reason, result } => {
                self.on_fetched(seq, reason, result);
            }
            EngineEvent::CommandFinished { command, result } => match result {
                Ok(()) => {
                    self.scheduler.refresh(RefreshReason::AfterCommand(command));
                }
                Err(e) => {
                    tracing::warn!("Failed to {}: {:#}", command, e);
                }
            },
            EngineEvent::Gesture(direction) => {
                if let Some(command) = gestures::route(direction) {
                    let device_id = self.reconciler.store().device_id().to_string();
                    self.dispatcher.dispatch(command, &device_id);
                } else {
                    tracing::trace!("Ignoring {:?} swipe", direction);
                }
            }
            EngineEvent::Activate(control) => match self.reconciler.bound_command(control) {
                Some((command, device_id)) => self.dispatcher.dispatch(command, &device_id),
                None => tracing::debug!("No controls bound yet, ignoring {:?}", control),
            },
            EngineEvent::Shutdown => return false,
        }
        true
    }

    fn on_fetched(&mut self, seq: u64, reason: RefreshReason, result: Result<Option<PlaybackSnapshot>>) {
        match result {
            Ok(Some(snapshot)) => {
                if self.scheduler.accept(seq) {
                    self.reconciler.apply(snapshot);
                    self.publish();
                } else {
                    tracing::debug!("Discarding out-of-order response #{} ({})", seq, reason);
                }
            }
            Ok(None) => {
                tracing::debug!("Nothing playing (refresh #{}, {})", seq, reason);
            }
            Err(e) => {
                tracing::warn!("Playback refresh #{} ({}) failed: {:#}", seq, reason, e);
            }
        }
    }

    /// Push the current view to subscribers if it changed
    fn publish(&self) {
        let next = self.reconciler.view();
        self.view_tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}
