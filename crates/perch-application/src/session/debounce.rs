//! Debounced preference saves.

use perch_core::preference::{PreferenceRecord, PreferenceStore};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

struct PendingSave {
    token: CancellationToken,
    record: PreferenceRecord,
}

/// Coalesces a burst of snapshots into a single save.
///
/// Every `schedule` cancels the not-yet-fired save and starts a new quiet
/// period, so only the last snapshot of a burst is written. Saves that have
/// already fired run to completion; they are serialized so an older snapshot
/// can never land after a newer one.
#[derive(Clone)]
pub struct SaveDebouncer {
    store: PreferenceStore,
    delay: Duration,
    parent: CancellationToken,
    pending: Arc<Mutex<Option<PendingSave>>>,
    in_flight: Arc<tokio::sync::Mutex<()>>,
}

impl SaveDebouncer {
    /// Creates a debouncer whose pending saves are also cancelled by `parent`.
    pub fn new(store: PreferenceStore, delay: Duration, parent: CancellationToken) -> Self {
        Self {
            store,
            delay,
            parent,
            pending: Arc::new(Mutex::new(None)),
            in_flight: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Replaces any pending save with `record`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule(&self, record: PreferenceRecord) {
        let token = self.parent.child_token();
        {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = pending.replace(PendingSave {
                token: token.clone(),
                record,
            }) {
                previous.token.cancel();
            }
        }

        let store = self.store.clone();
        let delay = self.delay;
        let pending = self.pending.clone();
        let in_flight = self.in_flight.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }

            let _serial = in_flight.lock().await;
            let record = {
                let mut pending = pending.lock().unwrap_or_else(PoisonError::into_inner);
                if token.is_cancelled() {
                    return;
                }
                match pending.take() {
                    Some(save) => save.record,
                    None => return,
                }
            };

            if store.save(&record).await {
                tracing::debug!("[Session] Saved preferences for '{}'", record.model_path);
            } else {
                tracing::warn!(
                    "[Session] Debounced save failed for '{}'",
                    record.model_path
                );
            }
        });
    }

    /// Drops the pending save without writing it.
    pub fn cancel(&self) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        match pending.take() {
            Some(save) => {
                save.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Writes the pending save immediately. Returns `None` when nothing was
    /// pending, otherwise the save result.
    pub async fn flush(&self) -> Option<bool> {
        let record = {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            let save = pending.take()?;
            save.token.cancel();
            save.record
        };
        let _serial = self.in_flight.lock().await;
        Some(self.store.save(&record).await)
    }

    /// Discards the pending save and writes `record` right away, after any
    /// save that is already in flight.
    pub async fn save_now(&self, record: &PreferenceRecord) -> bool {
        self.cancel();
        let _serial = self.in_flight.lock().await;
        self.store.save(record).await
    }

    pub fn has_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use perch_core::error::Result;
    use perch_core::preference::{PreferenceTransport, Vec2};

    #[derive(Default)]
    struct RecordingTransport {
        saved: Mutex<Vec<PreferenceRecord>>,
    }

    #[async_trait]
    impl PreferenceTransport for RecordingTransport {
        async fn fetch_all(&self) -> Result<Vec<PreferenceRecord>> {
            Ok(self.saved.lock().unwrap().clone())
        }

        async fn store(&self, record: &PreferenceRecord) -> Result<bool> {
            self.saved.lock().unwrap().push(record.clone());
            Ok(true)
        }
    }

    fn snapshot(x: f64) -> PreferenceRecord {
        PreferenceRecord::new("/m/Foo/Foo.model3.json", Vec2::new(x, 0.0), Vec2::splat(0.2))
    }

    fn debouncer(transport: Arc<RecordingTransport>, parent: CancellationToken) -> SaveDebouncer {
        SaveDebouncer::new(
            PreferenceStore::new(transport),
            Duration::from_millis(500),
            parent,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_saves_only_last_snapshot() {
        let transport = Arc::new(RecordingTransport::default());
        let debouncer = debouncer(transport.clone(), CancellationToken::new());

        for x in 0..10 {
            debouncer.schedule(snapshot(x as f64));
            tokio::time::advance(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(600)).await;

        let saved = transport.saved.lock().unwrap().clone();
        assert_eq!(saved, vec![snapshot(9.0)]);
        assert!(!debouncer.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_save_separately() {
        let transport = Arc::new(RecordingTransport::default());
        let debouncer = debouncer(transport.clone(), CancellationToken::new());

        debouncer.schedule(snapshot(1.0));
        tokio::time::sleep(Duration::from_millis(600)).await;
        debouncer.schedule(snapshot(2.0));
        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(transport.saved.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_parent_cancellation_drops_pending() {
        let transport = Arc::new(RecordingTransport::default());
        let parent = CancellationToken::new();
        let debouncer = debouncer(transport.clone(), parent.clone());

        debouncer.schedule(snapshot(1.0));
        parent.cancel();
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(transport.saved.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_writes_immediately_once() {
        let transport = Arc::new(RecordingTransport::default());
        let debouncer = debouncer(transport.clone(), CancellationToken::new());

        assert_eq!(debouncer.flush().await, None);
        debouncer.schedule(snapshot(4.0));
        assert_eq!(debouncer.flush().await, Some(true));
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(transport.saved.lock().unwrap().clone(), vec![snapshot(4.0)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_now_replaces_pending() {
        let transport = Arc::new(RecordingTransport::default());
        let debouncer = debouncer(transport.clone(), CancellationToken::new());

        debouncer.schedule(snapshot(1.0));
        assert!(debouncer.save_now(&snapshot(2.0)).await);
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert_eq!(transport.saved.lock().unwrap().clone(), vec![snapshot(2.0)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending() {
        let transport = Arc::new(RecordingTransport::default());
        let debouncer = debouncer(transport.clone(), CancellationToken::new());

        debouncer.schedule(snapshot(1.0));
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(transport.saved.lock().unwrap().is_empty());
    }
}
