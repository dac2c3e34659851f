//! Refresh scheduling.
//!
//! Every refresh runs as its own task and reports back through the engine
//! channel, so refreshes may overlap and a hung request never blocks the
//! next cycle. Each fetch is stamped with a sequence number; with
//! `discard_stale` on, a response older than the newest applied one is
//! dropped instead of overwriting fresher state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use super::EngineEvent;
use crate::remote::{Command, PlaybackService};

/// Why a refresh cycle was started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshReason {
    Startup,
    Scheduled,
    AfterCommand(Command),
    Manual,
}

impl std::fmt::Display for RefreshReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefreshReason::Startup => write!(f, "startup"),
            RefreshReason::Scheduled => write!(f, "scheduled"),
            RefreshReason::AfterCommand(command) => write!(f, "after {}", command),
            RefreshReason::Manual => write!(f, "manual"),
        }
    }
}

pub struct SyncScheduler {
    service: Arc<dyn PlaybackService>,
    events: mpsc::UnboundedSender<EngineEvent>,
    poll_interval: Duration,
    discard_stale: bool,
    next_seq: u64,
    newest_applied: Option<u64>,
}

impl SyncScheduler {
    pub fn new(
        service: Arc<dyn PlaybackService>,
        events: mpsc::UnboundedSender<EngineEvent>,
        poll_interval: Duration,
        discard_stale: bool,
    ) -> Self {
        Self {
            service,
            events,
            poll_interval,
            discard_stale,
            next_seq: 0,
            newest_applied: None,
        }
    }

    /// Periodic poll timer; its first tick is one interval from now
    pub fn poll_timer(&self) -> Interval {
        let mut interval =
            tokio::time::interval_at(Instant::now() + self.poll_interval, self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    }

    /// Start one fetch in the background and return its sequence number
    pub fn refresh(&mut self, reason: RefreshReason) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        tracing::trace!("Refresh #{} ({})", seq, reason);

        let service = Arc::clone(&self.service);
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = service.get_playback_state().await;
            let _ = events.send(EngineEvent::Fetched { seq, reason, result });
        });

        seq
    }

    /// Whether the response to fetch `seq` should be applied.
    ///
    /// Marks `seq` as the newest applied response when it is accepted.
    pub fn accept(&mut self, seq: u64) -> bool {
        if self.discard_stale && self.newest_applied.is_some_and(|newest| seq <= newest) {
            return false;
        }
        self.newest_applied = Some(self.newest_applied.map_or(seq, |newest| newest.max(seq)));
        true
    }

    /// Number of fetches started so far
    pub fn issued(&self) -> u64 {
        self.next_seq
    }
}
