use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use concierge_core::ClaimGateway;
use concierge_domain::{AvailabilityCheck, ConciergeError, EmailClaim, Result};
use tokio::sync::Semaphore;

#[derive(Default)]
struct Backend {
    /// The signed-in user's claim
    owner: Option<String>,
    /// Local-parts held by other users
    taken: HashSet<String>,
    /// Name another user grabs right after it was reported available
    steal_after_check: Option<String>,
    fail_lookup: bool,
    fail_check: bool,
    fail_upsert: bool,
}

/// In-memory stand-in for the `/user/email` backend.
///
/// Counts calls per operation and can hold availability checks or commits
/// until the test releases them.
#[derive(Default)]
pub struct InMemoryClaimGateway {
    backend: Mutex<Backend>,
    get_calls: AtomicUsize,
    check_calls: AtomicUsize,
    upsert_calls: AtomicUsize,
    check_gate: Mutex<Option<Arc<Semaphore>>>,
    upsert_gate: Mutex<Option<Arc<Semaphore>>>,
    /// Delay applied to the next lookup's response only
    lookup_delay: Mutex<Option<Duration>>,
}

impl InMemoryClaimGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_claim(local_part: &str) -> Arc<Self> {
        let gateway = Self::new();
        gateway.set_owner(local_part);
        gateway
    }

    /// Simulate a claim made elsewhere (another tab, another device).
    pub fn set_owner(&self, local_part: &str) {
        self.backend.lock().unwrap().owner = Some(local_part.to_string());
    }

    pub fn owner(&self) -> Option<String> {
        self.backend.lock().unwrap().owner.clone()
    }

    pub fn mark_taken(&self, local_part: &str) {
        self.backend.lock().unwrap().taken.insert(local_part.to_string());
    }

    pub fn steal_after_check(&self, local_part: &str) {
        self.backend.lock().unwrap().steal_after_check = Some(local_part.to_string());
    }

    pub fn fail_lookup(&self, fail: bool) {
        self.backend.lock().unwrap().fail_lookup = fail;
    }

    pub fn fail_check(&self, fail: bool) {
        self.backend.lock().unwrap().fail_check = fail;
    }

    pub fn fail_upsert(&self, fail: bool) {
        self.backend.lock().unwrap().fail_upsert = fail;
    }

    /// Block availability checks until [`Self::release_checks`].
    pub fn hold_checks(&self) {
        *self.check_gate.lock().unwrap() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release_checks(&self, count: usize) {
        if let Some(gate) = self.check_gate.lock().unwrap().as_ref() {
            gate.add_permits(count);
        }
    }

    /// Block commits until [`Self::release_upserts`].
    pub fn hold_upserts(&self) {
        *self.upsert_gate.lock().unwrap() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release_upserts(&self, count: usize) {
        if let Some(gate) = self.upsert_gate.lock().unwrap().as_ref() {
            gate.add_permits(count);
        }
    }

    /// Answer the next lookup with the current claim, but only after `delay`.
    pub fn delay_next_lookup(&self, delay: Duration) {
        *self.lookup_delay.lock().unwrap() = Some(delay);
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn check_calls(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }

    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    async fn pass(gate: &Mutex<Option<Arc<Semaphore>>>) {
        let gate = gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.acquire().await.expect("gate closed").forget();
        }
    }
}

#[async_trait]
impl ClaimGateway for InMemoryClaimGateway {
    async fn get_claim(&self) -> Result<Option<EmailClaim>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        let response = {
            let backend = self.backend.lock().unwrap();
            if backend.fail_lookup {
                Err(ConciergeError::Network("connection refused".into()))
            } else {
                Ok(backend.owner.clone().map(EmailClaim::new))
            }
        };
        let delay = self.lookup_delay.lock().unwrap().take();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        response
    }

    async fn check_availability(&self, candidate: &str) -> Result<AvailabilityCheck> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        Self::pass(&self.check_gate).await;

        let mut backend = self.backend.lock().unwrap();
        if backend.fail_check {
            return Err(ConciergeError::Network("availability service returned 503".into()));
        }
        let available = !backend.taken.contains(candidate);
        if available && backend.steal_after_check.as_deref() == Some(candidate) {
            backend.taken.insert(candidate.to_string());
        }
        Ok(AvailabilityCheck {
            candidate: candidate.to_string(),
            available,
            message: (!available).then(|| "already in use".to_string()),
        })
    }

    async fn upsert_claim(&self, candidate: &str) -> Result<EmailClaim> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        Self::pass(&self.upsert_gate).await;

        let mut backend = self.backend.lock().unwrap();
        if backend.fail_upsert {
            return Err(ConciergeError::Network("upstream reset".into()));
        }
        if backend.taken.contains(candidate) {
            return Err(ConciergeError::Conflict(format!("{candidate} is taken")));
        }
        backend.owner = Some(candidate.to_string());
        Ok(EmailClaim::new(candidate))
    }
}
