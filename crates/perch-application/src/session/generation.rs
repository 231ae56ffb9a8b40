//! Session generations: one owner for every timer a session spawns.

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Owns all deferred work of one loaded session.
///
/// Delayed tasks and tickers are spawned through the generation and stop as a
/// unit when it is cancelled, so a timer from a replaced session can never
/// act after the replacement.
#[derive(Debug)]
pub struct Generation {
    id: u64,
    token: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl Generation {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            token: CancellationToken::new(),
            tasks: Mutex::new(Vec::new()),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Token cancelled together with this generation.
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }

    /// Runs `work` once after `delay`, unless the generation is cancelled first.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn_delayed<F>(&self, delay: Duration, work: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let token = self.token.clone();
        self.track(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if !token.is_cancelled() {
                        work();
                    }
                }
            }
        });
    }

    /// Runs `tick` every `period` (first run after one period) until the
    /// generation is cancelled.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn_ticker<F>(&self, period: Duration, mut tick: F)
    where
        F: FnMut() + Send + 'static,
    {
        let token = self.token.clone();
        self.track(async move {
            let mut interval =
                tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {
                        if token.is_cancelled() {
                            break;
                        }
                        tick();
                    }
                }
            }
        });
    }

    /// Cancels the generation and aborts every task it spawned.
    pub fn cancel(&self) {
        self.token.cancel();
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        for task in tasks.drain(..) {
            task.abort();
        }
    }

    fn track<F>(&self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(future);
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.retain(|task| !task.is_finished());
        tasks.push(handle);
    }
}

impl Drop for Generation {
    fn drop(&mut self) {
        self.cancel();
    }
}
