//! Cancelable once-per-period tick task.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Shortest period the ticker accepts; `interval_at` panics on zero.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A running countdown. Ticks arrive on an internal channel; the task is
/// aborted on [`cancel`](Countdown::cancel) or when the handle is dropped.
#[derive(Debug)]
pub struct Countdown {
    ticks: mpsc::Receiver<()>,
    handle: JoinHandle<()>,
}

impl Countdown {
    /// Spawn the ticker. The first tick fires one `period` after the call.
    /// A zero period is raised to one millisecond.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(period: Duration) -> Self {
        let period = period.max(MIN_PERIOD);
        let (tx, ticks) = mpsc::channel(1);
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });
        Self { ticks, handle }
    }

    /// Wait for the next tick. Returns `None` once the countdown is cancelled.
    pub async fn tick(&mut self) -> Option<()> {
        self.ticks.recv().await
    }

    pub fn cancel(&mut self) {
        self.handle.abort();
        self.ticks.close();
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
