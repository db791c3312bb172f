use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

struct PendingTimer {
    token: CancellationToken,
    task: JoinHandle<()>,
}

/// Delays delivery of a value until no newer value has been scheduled for
/// `delay`. Superseded values are dropped, never delivered.
///
/// Dropping the debouncer cancels the pending timer.
pub struct Debouncer<T> {
    delay: Duration,
    runtime: Handle,
    sink: Arc<dyn Fn(T) + Send + Sync>,
    pending: Option<PendingTimer>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(runtime: Handle, delay: Duration, sink: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            delay,
            runtime,
            sink: Arc::new(sink),
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Restarts the timer with `value` as the candidate.
    pub fn schedule(&mut self, value: T) {
        self.cancel();

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let sink = Arc::clone(&self.sink);
        let delay = self.delay;
        let task = self.runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = cancelled.cancelled() => {}
                _ = tokio::time::sleep(delay) => sink(value),
            }
        });

        self.pending = Some(PendingTimer { token, task });
    }

    /// Drops the pending value, if any.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.token.cancel();
        }
    }

    /// Whether a value is still waiting for its quiet window.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.token.is_cancelled() && !pending.task.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.token.cancel();
        }
    }
}
