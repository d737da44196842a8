//! Email claim state machine
//!
//! [`ClaimController`] owns the claim workflow for one signed-in user:
//! loading the current claim, editing and validating a candidate, checking
//! availability, committing, and announcing the change to other views.
//!
//! # Stale responses
//!
//! Every action that issues a request or abandons one bumps a generation
//! counter. A response is applied only if the generation it was issued under
//! is still current; otherwise it is dropped. Responses are never cancelled at
//! the transport level, only ignored.
//!
//! # Background work
//!
//! While the state is `NoClaim` and the user is signed in, a poll task
//! re-fetches the claim on a fixed interval. It is stopped as soon as a claim
//! shows up, the state changes, or the controller is shut down. A second
//! short-lived task moves `Saved` back to `HasClaim` after the confirmation
//! window. Both hold only a weak reference to the controller.

use std::sync::Arc;
use std::time::Duration;

use concierge_domain::constants::{
    DEFAULT_CONFIRMATION_WINDOW_MS, DEFAULT_POLL_INTERVAL_MS, MIN_POLL_INTERVAL_MS, MSG_CHECK_FAILED,
    MSG_NOT_AVAILABLE, MSG_SAVE_FAILED,
};
use concierge_domain::{
    validate_local_part, AuthState, ClaimState, ConciergeConfig, ConciergeError, EmailClaim,
    Result, Stage, ValidationError,
};
use parking_lot::{Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::notifier::{ClaimChanged, ClaimNotifier};
use super::ports::ClaimGateway;
use super::snapshot::{ClaimSnapshot, Notice};
use crate::tasks::TaskGuard;

/// Controller behavior knobs
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Stage used for local-part validation
    pub stage: Stage,
    /// Domain used to render the full address
    pub domain: String,
    /// Re-poll interval while no claim exists, floored at
    /// [`MIN_POLL_INTERVAL_MS`]
    pub poll_interval: Duration,
    /// How long `Saved` lasts before returning to `HasClaim`
    pub confirmation_window: Duration,
}

impl ControllerSettings {
    pub fn from_config(config: &ConciergeConfig) -> Self {
        Self {
            stage: config.stage.clone(),
            domain: config.domain.clone(),
            poll_interval: config.claim.poll_interval(),
            confirmation_window: config.claim.confirmation_window(),
        }
    }
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            stage: Stage::default(),
            domain: String::new(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            confirmation_window: Duration::from_millis(DEFAULT_CONFIRMATION_WINDOW_MS),
        }
    }
}

/// How a submit attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing to submit after trimming
    Ignored,
    /// Local validation failed; no request was made
    Rejected(ValidationError),
    /// The backend reported the candidate as taken
    Unavailable,
    /// Committed
    Saved(EmailClaim),
    /// Transport or backend failure, with the message shown to the user
    Failed(String),
    /// The controller moved on while a response was pending
    Superseded,
}

struct Inner {
    snapshot: ClaimSnapshot,
    generation: u64,
    auth: AuthState,
    poll: Option<TaskGuard>,
    confirm: Option<TaskGuard>,
}

impl Inner {
    fn new() -> Self {
        Self {
            snapshot: ClaimSnapshot::default(),
            generation: 0,
            auth: AuthState::Loading,
            poll: None,
            confirm: None,
        }
    }

    fn next_generation(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.generation
    }

    fn clear_messages(&mut self) {
        self.snapshot.error = None;
        self.snapshot.notice = None;
    }

    fn stop_background(&mut self) {
        // Dropping a guard cancels its task.
        self.poll = None;
        self.confirm = None;
    }

    fn committed_buffer(&self) -> String {
        self.snapshot.committed_local_part().unwrap_or_default().to_string()
    }
}

struct Shared {
    gateway: Arc<dyn ClaimGateway>,
    notifier: ClaimNotifier,
    settings: ControllerSettings,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<ClaimSnapshot>,
}

impl Shared {
    fn transition(&self, inner: &mut Inner, next: ClaimState) {
        let previous = inner.snapshot.state;
        inner.snapshot.state = next;
        if previous != next {
            debug!(from = %previous, to = %next, "claim state transition");
        }
        self.state_tx.send_replace(inner.snapshot.clone());
    }

    fn enter_no_claim(self: &Arc<Self>, inner: &mut Inner) {
        inner.snapshot.committed = None;
        self.transition(inner, ClaimState::NoClaim);
        if inner.auth.is_signed_in() && inner.poll.is_none() {
            inner.poll = Self::spawn_poll(self, inner.generation);
        }
    }

    fn spawn_poll(self: &Arc<Self>, generation: u64) -> Option<TaskGuard> {
        let weak = Arc::downgrade(self);
        let interval = self.settings.poll_interval.max(Duration::from_millis(MIN_POLL_INTERVAL_MS));

        TaskGuard::spawn("claim-poll", move |token| async move {
            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    () = tokio::time::sleep(interval) => {}
                }

                let Some(shared) = weak.upgrade() else { break };
                let result = shared.gateway.get_claim().await;
                if token.is_cancelled() || shared.apply_poll(generation, result) {
                    break;
                }
            }
            debug!("claim poll finished");
        })
    }

    /// Apply a poll result. Returns `true` when polling should stop.
    fn apply_poll(&self, generation: u64, result: Result<Option<EmailClaim>>) -> bool {
        let mut inner = self.inner.lock();
        if inner.generation != generation || inner.snapshot.state != ClaimState::NoClaim {
            return true;
        }

        match result {
            Ok(Some(claim)) => {
                info!(local_part = %claim.local_part, "claim appeared while polling");
                inner.snapshot.edit_buffer = claim.local_part.clone();
                inner.snapshot.committed = Some(claim);
                self.transition(&mut inner, ClaimState::HasClaim);
                inner.poll = None;
                true
            }
            Ok(None) => {
                debug!("claim still not configured");
                false
            }
            Err(err) => {
                warn!(error = %err, "claim poll failed; retrying on next tick");
                false
            }
        }
    }

    fn spawn_confirmation(self: &Arc<Self>, generation: u64) -> Option<TaskGuard> {
        let weak = Arc::downgrade(self);
        let window = self.settings.confirmation_window;

        TaskGuard::spawn("claim-confirmation", move |token| async move {
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(window) => {
                    if let Some(shared) = weak.upgrade() {
                        shared.finish_confirmation(generation);
                    }
                }
            }
        })
    }

    fn finish_confirmation(&self, generation: u64) {
        let mut inner = self.inner.lock();
        if inner.generation == generation && inner.snapshot.state == ClaimState::Saved {
            inner.snapshot.notice = None;
            self.transition(&mut inner, ClaimState::HasClaim);
        }
        inner.confirm = None;
    }
}

/// Client-side state machine for the concierge email claim.
///
/// Cloning yields another handle to the same controller.
#[derive(Clone)]
pub struct ClaimController {
    shared: Arc<Shared>,
}

impl ClaimController {
    /// Create a controller in the `Unknown` state.
    pub fn new(
        gateway: Arc<dyn ClaimGateway>,
        notifier: ClaimNotifier,
        settings: ControllerSettings,
    ) -> Self {
        let (state_tx, _rx) = watch::channel(ClaimSnapshot::default());
        Self {
            shared: Arc::new(Shared {
                gateway,
                notifier,
                settings,
                inner: Mutex::new(Inner::new()),
                state_tx,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.shared.inner.lock()
    }

    pub fn snapshot(&self) -> ClaimSnapshot {
        self.lock().snapshot.clone()
    }

    pub fn state(&self) -> ClaimState {
        self.lock().snapshot.state
    }

    /// Watch every snapshot change.
    pub fn subscribe(&self) -> watch::Receiver<ClaimSnapshot> {
        self.shared.state_tx.subscribe()
    }

    /// Channel on which successful commits are announced.
    pub fn notifier(&self) -> &ClaimNotifier {
        &self.shared.notifier
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.shared.settings
    }

    /// Full address for the committed claim.
    pub fn full_address(&self) -> Option<String> {
        self.lock().snapshot.full_address(&self.shared.settings.domain)
    }

    /// Whether the `NoClaim` poll is active.
    pub fn is_polling(&self) -> bool {
        self.lock().poll.as_ref().is_some_and(TaskGuard::is_running)
    }

    /// Feed the identity provider's state.
    ///
    /// Signing in from `Unknown` loads the claim. Losing the session resets
    /// the controller to `Unknown` and invalidates pending responses.
    #[instrument(skip(self))]
    pub async fn set_auth_state(&self, auth: AuthState) {
        let should_load = {
            let mut inner = self.lock();
            let previous = inner.auth;
            inner.auth = auth;

            if auth.is_signed_in() {
                inner.snapshot.state == ClaimState::Unknown
            } else {
                if previous.is_signed_in() || inner.snapshot.state != ClaimState::Unknown {
                    info!(auth = %auth, "session ended; resetting claim state");
                    self.reset(&mut inner);
                }
                false
            }
        };

        if should_load {
            if let Err(err) = self.reload().await {
                warn!(error = %err, "initial claim load skipped");
            }
        }
    }

    /// Stop all background work and forget the claim.
    ///
    /// Any response still in flight is discarded when it arrives.
    pub fn shutdown(&self) {
        let mut inner = self.lock();
        inner.auth = AuthState::SignedOut;
        self.reset(&mut inner);
        info!("claim controller shut down");
    }

    fn reset(&self, inner: &mut Inner) {
        inner.next_generation();
        inner.stop_background();
        inner.snapshot = ClaimSnapshot::default();
        self.shared.state_tx.send_replace(inner.snapshot.clone());
    }

    /// Fetch the claim from the backend.
    ///
    /// A missing claim lands in `NoClaim` and starts polling. A failed lookup
    /// is logged and keeps the last known claim, if any.
    ///
    /// # Errors
    /// `InvalidState` when signed out, while the editor is open, or while
    /// another request is in flight.
    #[instrument(skip(self))]
    pub async fn reload(&self) -> Result<ClaimState> {
        let generation = {
            let mut inner = self.lock();
            if !inner.auth.is_signed_in() {
                return Err(ConciergeError::InvalidState("not signed in".into()));
            }
            let state = inner.snapshot.state;
            if state.is_busy() {
                return Err(ConciergeError::InvalidState(format!(
                    "cannot reload while {state}: request in flight"
                )));
            }
            if matches!(state, ClaimState::Editing | ClaimState::Error) {
                return Err(ConciergeError::InvalidState(format!("cannot reload while {state}")));
            }
            inner.stop_background();
            inner.clear_messages();
            let generation = inner.next_generation();
            self.shared.transition(&mut inner, ClaimState::Loading);
            generation
        };

        let result = self.shared.gateway.get_claim().await;

        let mut inner = self.lock();
        if inner.generation != generation {
            debug!("discarding superseded claim lookup");
            return Ok(inner.snapshot.state);
        }

        match result {
            Ok(Some(claim)) => {
                info!(local_part = %claim.local_part, "claim loaded");
                inner.snapshot.edit_buffer = claim.local_part.clone();
                inner.snapshot.committed = Some(claim);
                self.shared.transition(&mut inner, ClaimState::HasClaim);
            }
            Ok(None) => {
                info!("no claim configured yet");
                inner.snapshot.edit_buffer.clear();
                self.shared.enter_no_claim(&mut inner);
            }
            Err(err) => {
                warn!(error = %err, "claim lookup failed");
                if inner.snapshot.committed.is_some() {
                    self.shared.transition(&mut inner, ClaimState::HasClaim);
                } else {
                    self.shared.enter_no_claim(&mut inner);
                }
            }
        }

        Ok(inner.snapshot.state)
    }

    /// Open the editor.
    ///
    /// From `NoClaim`/`HasClaim`/`Saved` the buffer is seeded with the
    /// committed value; from `Error` the rejected candidate is kept for retry.
    ///
    /// # Errors
    /// `InvalidState` while loading or while a request is in flight.
    pub fn begin_edit(&self) -> Result<()> {
        let mut inner = self.lock();
        let state = inner.snapshot.state;
        if !state.can_edit() {
            return Err(ConciergeError::InvalidState(format!("cannot edit while {state}")));
        }

        inner.next_generation();
        inner.stop_background();
        if state != ClaimState::Error {
            inner.snapshot.edit_buffer = inner.committed_buffer();
        }
        inner.clear_messages();
        self.shared.transition(&mut inner, ClaimState::Editing);
        Ok(())
    }

    /// Replace the edit buffer.
    ///
    /// Clears the previous error and notice, then returns live validation
    /// feedback for a non-empty candidate (also stored as the error message).
    ///
    /// # Errors
    /// `InvalidState` unless the editor is open.
    pub fn set_input(&self, value: impl Into<String>) -> Result<Option<ValidationError>> {
        let mut inner = self.lock();
        let state = inner.snapshot.state;
        if !matches!(state, ClaimState::Editing | ClaimState::Error) {
            return Err(ConciergeError::InvalidState(format!("cannot edit input while {state}")));
        }

        inner.snapshot.edit_buffer = value.into();
        inner.clear_messages();

        let feedback = if inner.snapshot.edit_buffer.trim().is_empty() {
            None
        } else {
            validate_local_part(&inner.snapshot.edit_buffer, &self.shared.settings.stage).err()
        };
        if let Some(err) = &feedback {
            inner.snapshot.error = Some(err.to_string());
        }

        self.shared.transition(&mut inner, ClaimState::Editing);
        Ok(feedback)
    }

    /// Close the editor and return to the last committed state.
    ///
    /// Also abandons a pending check or commit: its response will be ignored.
    ///
    /// # Errors
    /// `InvalidState` when no edit is in progress.
    pub fn cancel(&self) -> Result<ClaimState> {
        let mut inner = self.lock();
        let state = inner.snapshot.state;
        if !matches!(
            state,
            ClaimState::Editing | ClaimState::Checking | ClaimState::Saving | ClaimState::Error
        ) {
            return Err(ConciergeError::InvalidState(format!("nothing to cancel while {state}")));
        }

        inner.next_generation();
        inner.stop_background();
        inner.clear_messages();
        inner.snapshot.edit_buffer = inner.committed_buffer();

        if inner.snapshot.committed.is_some() {
            self.shared.transition(&mut inner, ClaimState::HasClaim);
        } else {
            self.shared.enter_no_claim(&mut inner);
        }
        Ok(inner.snapshot.state)
    }

    /// Submit the edit buffer.
    ///
    /// Validates locally, checks availability unless the candidate equals the
    /// committed value, then commits. Every failure is recorded in the
    /// snapshot and reported through [`SubmitOutcome`]; none is returned as
    /// an error.
    ///
    /// # Errors
    /// `InvalidState` unless the editor is open.
    #[instrument(skip(self))]
    pub async fn submit(&self) -> Result<SubmitOutcome> {
        let (generation, candidate, already_committed) = {
            let mut inner = self.lock();
            let state = inner.snapshot.state;
            if !matches!(state, ClaimState::Editing | ClaimState::Error) {
                return Err(ConciergeError::InvalidState(format!("cannot submit while {state}")));
            }
            if inner.snapshot.edit_buffer.trim().is_empty() {
                return Ok(SubmitOutcome::Ignored);
            }

            inner.clear_messages();
            let generation = inner.next_generation();

            let validated = validate_local_part(
                &inner.snapshot.edit_buffer,
                &self.shared.settings.stage,
            )
            .map(str::to_string);

            match validated {
                Err(err) => {
                    info!(error = %err, "candidate rejected by validation");
                    inner.snapshot.error = Some(err.to_string());
                    self.shared.transition(&mut inner, ClaimState::Error);
                    return Ok(SubmitOutcome::Rejected(err));
                }
                Ok(candidate) => {
                    let already_committed =
                        inner.snapshot.committed_local_part() == Some(candidate.as_str());
                    let next =
                        if already_committed { ClaimState::Saving } else { ClaimState::Checking };
                    self.shared.transition(&mut inner, next);
                    (generation, candidate, already_committed)
                }
            }
        };

        if !already_committed {
            let check = self.shared.gateway.check_availability(&candidate).await;

            let mut inner = self.lock();
            if inner.generation != generation {
                debug!(candidate = %candidate, "discarding superseded availability check");
                return Ok(SubmitOutcome::Superseded);
            }

            match check {
                Ok(check) if check.available => {
                    inner.snapshot.notice = Some(Notice::Available);
                    self.shared.transition(&mut inner, ClaimState::Saving);
                }
                Ok(check) => {
                    info!(candidate = %candidate, message = ?check.message, "candidate not available");
                    inner.snapshot.notice = Some(Notice::Taken);
                    inner.snapshot.error = Some(MSG_NOT_AVAILABLE.to_string());
                    self.shared.transition(&mut inner, ClaimState::Error);
                    return Ok(SubmitOutcome::Unavailable);
                }
                Err(err) => {
                    warn!(candidate = %candidate, error = %err, "availability check failed");
                    inner.snapshot.notice = Some(Notice::CheckFailed);
                    inner.snapshot.error = Some(MSG_CHECK_FAILED.to_string());
                    self.shared.transition(&mut inner, ClaimState::Error);
                    return Ok(SubmitOutcome::Failed(MSG_CHECK_FAILED.to_string()));
                }
            }
        }

        let committed = self.shared.gateway.upsert_claim(&candidate).await;

        let claim = {
            let mut inner = self.lock();
            if inner.generation != generation {
                debug!(candidate = %candidate, "discarding superseded commit");
                return Ok(SubmitOutcome::Superseded);
            }

            match committed {
                Ok(claim) => {
                    info!(local_part = %claim.local_part, "claim saved");
                    inner.snapshot.edit_buffer = claim.local_part.clone();
                    inner.snapshot.committed = Some(claim.clone());
                    inner.snapshot.error = None;
                    inner.snapshot.notice = Some(Notice::Saved);
                    self.shared.transition(&mut inner, ClaimState::Saved);
                    inner.confirm = Shared::spawn_confirmation(&self.shared, generation);
                    claim
                }
                Err(ConciergeError::Conflict(message)) => {
                    info!(candidate = %candidate, %message, "candidate taken before commit");
                    inner.snapshot.notice = Some(Notice::Taken);
                    inner.snapshot.error = Some(MSG_NOT_AVAILABLE.to_string());
                    self.shared.transition(&mut inner, ClaimState::Error);
                    return Ok(SubmitOutcome::Unavailable);
                }
                Err(err) => {
                    warn!(candidate = %candidate, error = %err, "claim commit failed");
                    let message = format!("{MSG_SAVE_FAILED}: {err}");
                    inner.snapshot.error = Some(message.clone());
                    self.shared.transition(&mut inner, ClaimState::Error);
                    return Ok(SubmitOutcome::Failed(message));
                }
            }
        };

        self.shared.notifier.publish(ClaimChanged { local_part: claim.local_part.clone() });
        Ok(SubmitOutcome::Saved(claim))
    }
}

impl std::fmt::Debug for ClaimController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimController")
            .field("settings", &self.shared.settings)
            .field("snapshot", &self.snapshot())
            .finish_non_exhaustive()
    }
}
