//! Redirect guards
//!
//! Two guards decide where a user may stay, plus two follow-up redirects
//! after sign-out and after finishing the setup flow.

use std::time::Duration;

use concierge_domain::constants::DEFAULT_SETUP_REDIRECT_DELAY_MS;
use concierge_domain::{AuthState, ClaimState, Route};

use crate::claim::snapshot::ClaimSnapshot;

/// Whether the user is known to have a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimLookup {
    /// Lookup not finished
    Pending,
    Missing,
    Present,
}

impl ClaimLookup {
    pub fn from_snapshot(snapshot: &ClaimSnapshot) -> Self {
        if snapshot.committed.is_some() {
            Self::Present
        } else if matches!(snapshot.state, ClaimState::Unknown | ClaimState::Loading) {
            Self::Pending
        } else {
            Self::Missing
        }
    }
}

/// A navigation the front-end should perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub to: Route,
    pub delay: Duration,
}

impl Redirect {
    pub fn now(to: Route) -> Self {
        Self { to, delay: Duration::ZERO }
    }
}

/// Routing policy for authentication and setup state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedirectGate {
    setup_redirect_delay: Duration,
}

impl RedirectGate {
    pub fn new(setup_redirect_delay: Duration) -> Self {
        Self { setup_redirect_delay }
    }

    /// Guard for the route the user is currently on.
    ///
    /// - signed in on the landing page: go to the dashboard
    /// - on the dashboard without a claim: go to the setup flow
    ///
    /// Nothing happens while auth or the claim lookup is still loading.
    pub fn evaluate(&self, route: Route, auth: AuthState, claim: ClaimLookup) -> Option<Redirect> {
        match (route, auth, claim) {
            (Route::Landing, AuthState::SignedIn, _) => Some(Redirect::now(Route::Dashboard)),
            (Route::Dashboard, AuthState::SignedIn, ClaimLookup::Missing) => {
                Some(Redirect::now(Route::SetupEmail))
            }
            _ => None,
        }
    }

    /// Where to go once a claim was saved from `route`.
    pub fn after_claim_saved(&self, route: Route) -> Option<Redirect> {
        (route == Route::SetupEmail)
            .then_some(Redirect { to: Route::Dashboard, delay: self.setup_redirect_delay })
    }

    pub fn after_sign_out(&self) -> Redirect {
        Redirect::now(Route::Landing)
    }
}

impl Default for RedirectGate {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_SETUP_REDIRECT_DELAY_MS))
    }
}
