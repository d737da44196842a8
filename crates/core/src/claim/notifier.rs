//! Claim-changed broadcast
//!
//! Views that show the claim subscribe here and refetch on their own; the
//! event only says that something changed.

use tokio::sync::broadcast;
use tracing::debug;

const DEFAULT_CAPACITY: usize = 16;

/// Emitted after a claim was committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimChanged {
    /// Local-part the backend confirmed at commit time
    pub local_part: String,
}

/// Process-wide publish/subscribe channel for [`ClaimChanged`].
///
/// Cloning shares the channel.
#[derive(Debug, Clone)]
pub struct ClaimNotifier {
    tx: broadcast::Sender<ClaimChanged>,
}

impl ClaimNotifier {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClaimChanged> {
        self.tx.subscribe()
    }

    /// Publish a change; returns how many subscribers will see it.
    pub fn publish(&self, event: ClaimChanged) -> usize {
        match self.tx.send(event) {
            Ok(receivers) => {
                debug!(receivers, "claim change published");
                receivers
            }
            Err(_) => {
                debug!("claim change published with no subscribers");
                0
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ClaimNotifier {
    fn default() -> Self {
        Self::new()
    }
}
