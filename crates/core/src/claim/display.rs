//! Read-only view of the concierge address
//!
//! Shows the full address wherever the user needs to copy it. It never
//! receives the new value from the controller directly: it listens to the
//! [`ClaimNotifier`] and refetches after a debounce, which gives the backend
//! time to make the write visible to reads.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use concierge_domain::constants::DEFAULT_REFRESH_DEBOUNCE_MS;
use concierge_domain::{ConciergeError, Result};
use parking_lot::Mutex;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use super::notifier::ClaimNotifier;
use super::ports::ClaimGateway;
use crate::tasks::TaskGuard;

/// What the address view renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DisplayState {
    /// Not refreshed yet
    #[default]
    Idle,
    Loading,
    /// Signed in but no claim ("Set up your email first")
    NotSetUp,
    /// Full concierge address
    Address(String),
}

impl DisplayState {
    pub fn address(&self) -> Option<&str> {
        match self {
            Self::Address(address) => Some(address),
            _ => None,
        }
    }
}

struct DisplayShared {
    gateway: Arc<dyn ClaimGateway>,
    domain: String,
    state_tx: watch::Sender<DisplayState>,
    /// Bumped per refresh; only the latest one may publish.
    generation: AtomicU64,
}

impl DisplayShared {
    async fn refresh(&self) -> DisplayState {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let showing_address = matches!(*self.state_tx.borrow(), DisplayState::Address(_));
        if !showing_address {
            self.state_tx.send_replace(DisplayState::Loading);
        }

        let fetched = self.gateway.get_claim().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "dropping superseded address refresh");
            return self.state_tx.borrow().clone();
        }

        let next = match fetched {
            Ok(Some(claim)) => DisplayState::Address(claim.full_address(&self.domain)),
            Ok(None) => DisplayState::NotSetUp,
            Err(err) => {
                warn!(error = %err, "address refresh failed");
                // Keep showing a known address rather than flashing the setup hint.
                let current = self.state_tx.borrow().clone();
                match current {
                    DisplayState::Address(_) => current,
                    _ => DisplayState::NotSetUp,
                }
            }
        };

        self.state_tx.send_replace(next.clone());
        next
    }
}

/// Address view that follows claim-changed signals.
pub struct ClaimDisplay {
    shared: Arc<DisplayShared>,
    debounce: Duration,
    listener: Mutex<Option<TaskGuard>>,
}

impl ClaimDisplay {
    pub fn new(gateway: Arc<dyn ClaimGateway>, domain: impl Into<String>) -> Self {
        let (state_tx, _rx) = watch::channel(DisplayState::Idle);
        Self {
            shared: Arc::new(DisplayShared {
                gateway,
                domain: domain.into(),
                state_tx,
                generation: AtomicU64::new(0),
            }),
            debounce: Duration::from_millis(DEFAULT_REFRESH_DEBOUNCE_MS),
            listener: Mutex::new(None),
        }
    }

    /// Override the refresh debounce.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn current(&self) -> DisplayState {
        self.shared.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.shared.state_tx.subscribe()
    }

    /// Fetch the claim now.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> DisplayState {
        self.shared.refresh().await
    }

    pub fn is_listening(&self) -> bool {
        self.listener.lock().as_ref().is_some_and(TaskGuard::is_running)
    }

    /// Start following `notifier`.
    ///
    /// Bursts of signals within the debounce window collapse into a single
    /// refresh.
    ///
    /// # Errors
    /// `InvalidState` if already listening or no Tokio runtime is available.
    pub fn start(&self, notifier: &ClaimNotifier) -> Result<()> {
        let mut listener = self.listener.lock();
        if listener.as_ref().is_some_and(TaskGuard::is_running) {
            return Err(ConciergeError::InvalidState("display already listening".into()));
        }

        let mut rx = notifier.subscribe();
        let shared = Arc::clone(&self.shared);
        let debounce = self.debounce;

        let guard = TaskGuard::spawn("claim-display", move |token| async move {
            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    received = rx.recv() => match received {
                        Ok(_) | Err(RecvError::Lagged(_)) => {}
                        Err(RecvError::Closed) => break,
                    },
                }

                // Debounce: wait, then fold whatever else arrived meanwhile.
                tokio::select! {
                    () = token.cancelled() => break,
                    () = tokio::time::sleep(debounce) => {}
                }
                while let Ok(_) | Err(tokio::sync::broadcast::error::TryRecvError::Lagged(_)) =
                    rx.try_recv()
                {}

                debug!("refreshing address after claim change");
                shared.refresh().await;
            }
        })
        .ok_or_else(|| ConciergeError::InvalidState("no async runtime available".into()))?;

        *listener = Some(guard);
        Ok(())
    }

    /// Stop following the notifier and wait for the listener to exit.
    ///
    /// # Errors
    /// `InvalidState` if not listening.
    pub async fn stop(&self) -> Result<()> {
        let guard = self.listener.lock().take();
        match guard {
            Some(guard) => {
                guard.stop().await;
                Ok(())
            }
            None => Err(ConciergeError::InvalidState("display not listening".into())),
        }
    }
}

impl std::fmt::Debug for ClaimDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimDisplay")
            .field("domain", &self.shared.domain)
            .field("debounce", &self.debounce)
            .field("state", &self.current())
            .finish_non_exhaustive()
    }
}
