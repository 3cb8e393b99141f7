//! Keyed debouncing for filter inputs
//!
//! Typing into a per-column filter box must not issue a query per keystroke.
//! Each key (one per input) holds at most one pending action; submitting
//! again before the delay elapses aborts the previous one.

use std::future::Future;
use std::time::Duration;

use ahash::AHashMap;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

pub struct Debouncer {
    delay: Duration,
    pending: Mutex<AHashMap<String, JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: Mutex::new(AHashMap::new()) }
    }

    /// Schedule `action` to run after the delay, replacing any action still
    /// pending under the same key.
    pub fn submit<F>(&self, key: &str, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        });
        if let Some(previous) = self.pending.lock().insert(key.to_string(), handle) {
            previous.abort();
        }
    }

    /// Drop a pending action without running it
    pub fn cancel(&self, key: &str) {
        if let Some(handle) = self.pending.lock().remove(key) {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        for handle in self.pending.lock().values() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn rapid_submissions_coalesce_to_one_run() {
        let debouncer = Debouncer::new(Duration::from_millis(400));
        let runs = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            let runs = runs.clone();
            debouncer.submit("city", async move {
                runs.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn distinct_keys_run_independently() {
        let debouncer = Debouncer::new(Duration::from_millis(400));
        let runs = Arc::new(AtomicUsize::new(0));

        for key in ["city", "phone"] {
            let runs = runs.clone();
            debouncer.submit(key, async move {
                runs.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_the_pending_action() {
        let debouncer = Debouncer::new(Duration::from_millis(400));
        let runs = Arc::new(AtomicUsize::new(0));

        {
            let runs = runs.clone();
            debouncer.submit("city", async move {
                runs.fetch_add(1, Ordering::SeqCst);
            });
        }
        debouncer.cancel("city");

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
