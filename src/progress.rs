//! Local playback position simulation between remote polls.
//!
//! [`ProgressClock`] extrapolates position from the last reported progress
//! using a monotonic anchor. While running it also owns a ticker task that
//! emits render ticks at a fixed cadence. Every [`ProgressClock::start`]
//! aborts the previous ticker before spawning the next one, and ticks carry
//! the generation of the simulation that produced them so ticks queued by a
//! superseded ticker are dropped in [`ProgressClock::tick`].

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(50);

/// The live simulation for one snapshot
#[derive(Debug, Clone, Copy)]
struct LocalProgress {
    anchor: Instant,
    anchor_progress_ms: u64,
    duration_ms: u64,
    running: bool,
}

pub struct ProgressClock {
    progress: Option<LocalProgress>,
    generation: u64,
    tick_interval: Duration,
    clamp: bool,
    ticker: Option<JoinHandle<()>>,
    tick_tx: mpsc::UnboundedSender<u64>,
    tick_rx: mpsc::UnboundedReceiver<u64>,
}

impl ProgressClock {
    pub fn new(tick_interval: Duration, clamp: bool) -> Self {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        Self {
            progress: None,
            generation: 0,
            tick_interval,
            clamp,
            ticker: None,
            tick_tx,
            tick_rx,
        }
    }

    /// Replace the current simulation with one anchored now.
    ///
    /// Must be called inside a tokio runtime when `running` is true.
    pub fn start(&mut self, initial_progress_ms: u64, duration_ms: u64, running: bool) {
        self.stop_ticker();
        self.generation += 1;
        self.progress = Some(LocalProgress {
            anchor: Instant::now(),
            anchor_progress_ms: initial_progress_ms,
            duration_ms,
            running,
        });

        if running {
            self.ticker = Some(spawn_ticker(
                self.generation,
                self.tick_interval,
                self.tick_tx.clone(),
            ));
        }
    }

    /// Freeze the simulation at its current position and cancel the ticker
    pub fn stop(&mut self) {
        let position = self.current_position_ms();
        self.stop_ticker();
        if let Some(progress) = self.progress.as_mut() {
            progress.anchor = Instant::now();
            progress.anchor_progress_ms = position;
            progress.running = false;
        }
    }

    fn stop_ticker(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }

    /// Extrapolated position, clamped to `[0, duration]` when clamping is on
    pub fn current_position_ms(&self) -> u64 {
        let Some(progress) = self.progress else {
            return 0;
        };

        let position = if progress.running {
            let elapsed = Instant::now().saturating_duration_since(progress.anchor);
            progress
                .anchor_progress_ms
                .saturating_add(elapsed.as_millis() as u64)
        } else {
            progress.anchor_progress_ms
        };

        if self.clamp {
            position.min(progress.duration_ms)
        } else {
            position
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.progress.map(|p| p.duration_ms).unwrap_or(0)
    }

    /// Fraction of the item played, 0.0 when the duration is unknown
    pub fn fraction(&self) -> f64 {
        let duration = self.duration_ms();
        if duration == 0 {
            return 0.0;
        }
        self.current_position_ms() as f64 / duration as f64
    }

    pub fn is_running(&self) -> bool {
        self.progress.map(|p| p.running).unwrap_or(false)
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait for the next render tick of the current simulation.
    ///
    /// Cancel safe. Pending forever while no ticker runs.
    pub async fn tick(&mut self) -> u64 {
        loop {
            match self.tick_rx.recv().await {
                Some(generation) if generation == self.generation => return generation,
                Some(_) => continue,
                // The clock holds a sender, so the channel never closes
                None => std::future::pending::<()>().await,
            }
        }
    }
}

impl Drop for ProgressClock {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

fn spawn_ticker(generation: u64, period: Duration, tx: mpsc::UnboundedSender<u64>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            if tx.send(generation).is_err() {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> ProgressClock {
        ProgressClock::new(DEFAULT_TICK_INTERVAL, true)
    }

    fn drain(clock: &mut ProgressClock) -> Vec<u64> {
        let mut ticks = Vec::new();
        while let Ok(generation) = clock.tick_rx.try_recv() {
            ticks.push(generation);
        }
        ticks
    }

    #[tokio::test(start_paused = true)]
    async fn test_position_equals_initial_progress_after_start() {
        let mut clock = clock();
        clock.start(1000, 200_000, true);
        assert_eq!(clock.current_position_ms(), 1000);

        clock.start(42, 200_000, false);
        assert_eq!(clock.current_position_ms(), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_running_position_advances_with_time() {
        let mut clock = clock();
        clock.start(1000, 200_000, true);

        tokio::time::advance(Duration::from_millis(50)).await;
        assert_eq!(clock.current_position_ms(), 1050);

        let before = clock.current_position_ms();
        tokio::time::advance(Duration::from_millis(120)).await;
        assert!(clock.current_position_ms() >= before);
        assert_eq!(clock.current_position_ms(), 1170);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paused_position_is_frozen() {
        let mut clock = clock();
        clock.start(5000, 200_000, false);

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(clock.current_position_ms(), 5000);
        assert!(!clock.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_position_clamped_to_duration() {
        let mut clock = clock();
        clock.start(9_900, 10_000, true);
        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(clock.current_position_ms(), 10_000);
        assert_eq!(clock.fraction(), 1.0);

        let mut unclamped = ProgressClock::new(DEFAULT_TICK_INTERVAL, false);
        unclamped.start(9_900, 10_000, true);
        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(unclamped.current_position_ms(), 14_900);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_leaves_single_ticker() {
        let mut clock = clock();
        clock.start(0, 200_000, true);
        let first = clock.generation();
        clock.start(10_000, 200_000, true);
        let second = clock.generation();
        assert_ne!(first, second);

        tokio::time::sleep(Duration::from_millis(190)).await;

        let ticks = drain(&mut clock);
        // Ticks at 0, 50, 100 and 150 ms from the surviving ticker only
        assert_eq!(ticks.len(), 4);
        assert!(ticks.iter().all(|&generation| generation == second));
        assert!(clock.is_ticking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_skips_superseded_generation() {
        let mut clock = clock();
        clock.start(0, 200_000, true);
        let stale = clock.generation();
        clock.tick_tx.send(stale).unwrap();
        clock.start(0, 200_000, true);

        let generation = clock.tick().await;
        assert_eq!(generation, clock.generation());
        assert_ne!(generation, stale);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_freezes_and_cancels_ticker() {
        let mut clock = clock();
        clock.start(1000, 200_000, true);
        tokio::time::advance(Duration::from_millis(300)).await;
        clock.stop();
        assert!(!clock.is_running());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(clock.current_position_ms(), 1300);
        assert!(!clock.is_ticking());
    }

    #[test]
    fn test_empty_clock() {
        let clock = clock();
        assert_eq!(clock.current_position_ms(), 0);
        assert_eq!(clock.fraction(), 0.0);
        assert!(!clock.is_running());
    }
}
