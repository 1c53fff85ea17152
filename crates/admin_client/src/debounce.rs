use std::{sync::Arc, time::Duration};

use tokio::{sync::Mutex, task::JoinHandle, time};

/// Quiescence window applied to search filter inputs.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Delays committing a fast-changing value until it has been stable for the
/// configured window. Every `submit` aborts the pending commit and restarts
/// the timer, so a burst of edits produces exactly one downstream commit
/// carrying the last value.
pub struct Debouncer<T> {
    delay: Duration,
    commit: Arc<dyn Fn(T) + Send + Sync>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, commit: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            delay,
            commit: Arc::new(commit),
            pending: Mutex::new(None),
        }
    }

    pub async fn submit(&self, value: T) {
        let mut pending = self.pending.lock().await;
        if let Some(task) = pending.take() {
            task.abort();
        }
        let commit = Arc::clone(&self.commit);
        let delay = self.delay;
        *pending = Some(tokio::spawn(async move {
            time::sleep(delay).await;
            commit(value);
        }));
    }

    pub async fn cancel(&self) {
        if let Some(task) = self.pending.lock().await.take() {
            task.abort();
        }
    }
}
