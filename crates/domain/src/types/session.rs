//! Session-level state: authentication, claim workflow and routes

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Authentication state reported by the identity provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    /// Provider has not finished initializing.
    #[default]
    Loading,
    SignedOut,
    SignedIn,
}

impl AuthState {
    pub fn is_signed_in(self) -> bool {
        matches!(self, Self::SignedIn)
    }
}

impl_domain_status_conversions!(AuthState {
    Loading => "loading",
    SignedOut => "signed_out",
    SignedIn => "signed_in",
});

/// States of the email claim workflow.
///
/// ```text
/// Unknown -> Loading -> {NoClaim, HasClaim} -> Editing -> Checking -> Saving
///         -> {Saved, Error} -> HasClaim
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimState {
    #[default]
    Unknown,
    Loading,
    NoClaim,
    HasClaim,
    Editing,
    Checking,
    Saving,
    Saved,
    Error,
}

impl ClaimState {
    /// A network request issued from this state is still outstanding.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::Loading | Self::Checking | Self::Saving)
    }

    /// States from which the user may open the editor.
    pub fn can_edit(self) -> bool {
        matches!(self, Self::NoClaim | Self::HasClaim | Self::Saved | Self::Error)
    }
}

impl_domain_status_conversions!(ClaimState {
    Unknown => "unknown",
    Loading => "loading",
    NoClaim => "no_claim",
    HasClaim => "has_claim",
    Editing => "editing",
    Checking => "checking",
    Saving => "saving",
    Saved => "saved",
    Error => "error",
});

/// Front-end routes that take part in redirects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    Landing,
    Dashboard,
    SetupEmail,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::Dashboard => "/dashboard",
            Self::SetupEmail => "/setup-email",
        }
    }
}

impl_domain_status_conversions!(Route {
    Landing => "/",
    Dashboard => "/dashboard",
    SetupEmail => "/setup-email",
});
