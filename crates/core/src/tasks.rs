//! Owned background tasks
//!
//! A [`TaskGuard`] pairs a spawned Tokio task with the cancellation token it
//! listens on. Dropping the guard cancels the task, so a component that owns
//! its guards cannot leak timers past its own lifetime.

use std::future::Future;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Handle to a cancellable background task.
#[derive(Debug)]
pub struct TaskGuard {
    name: &'static str,
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl TaskGuard {
    /// Spawn `task` on the current runtime.
    ///
    /// The closure receives the token the task must watch. Returns `None`
    /// when called outside a Tokio runtime.
    pub fn spawn<F, Fut>(name: &'static str, task: F) -> Option<Self>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(task = name, "no Tokio runtime; background task not started");
            return None;
        };

        let token = CancellationToken::new();
        let handle = runtime.spawn(task(token.clone()));
        debug!(task = name, "background task started");

        Some(Self { name, token, handle: Some(handle) })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the task is still executing.
    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled() && self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the task to stop without waiting for it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Cancel the task and wait for it to wind down.
    pub async fn stop(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.await {
                warn!(task = self.name, error = %err, "background task ended abnormally");
            }
        }
        debug!(task = self.name, "background task stopped");
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        if !self.token.is_cancelled() {
            debug!(task = self.name, "task guard dropped; cancelling");
            self.token.cancel();
        }
    }
}
