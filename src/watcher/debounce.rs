use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Per-path settle timer for modification bursts.
///
/// Every `schedule` call for a path supersedes the pending one, so a burst of
/// notifications fires the callback once, `delay` after the last notification.
/// Timers run on the tokio runtime; nothing blocks the caller.
#[derive(Debug, Clone)]
pub struct PathDebouncer {
    delay: Duration,
    /// Path -> ticket of the most recent schedule call.
    pending: Arc<Mutex<HashMap<PathBuf, u64>>>,
    next_ticket: Arc<AtomicU64>,
}

impl PathDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_ticket: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Arm (or re-arm) the timer for `path`. `fire` runs only if no later call
    /// for the same path arrives before the delay elapses.
    pub fn schedule<F>(&self, path: PathBuf, fire: F) -> JoinHandle<()>
    where
        F: FnOnce(PathBuf) + Send + 'static,
    {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        self.lock().insert(path.clone(), ticket);

        let this = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(this.delay).await;
            let latest = {
                let mut pending = this.lock();
                if pending.get(&path) == Some(&ticket) {
                    pending.remove(&path);
                    true
                } else {
                    false
                }
            };
            if latest {
                fire(path);
            }
        })
    }

    /// Number of paths with an armed timer.
    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, u64>> {
        self.pending.lock().unwrap_or_else(|p| p.into_inner())
    }
}
