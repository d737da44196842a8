//! Observable state of the claim controller

use concierge_domain::constants::{MSG_ALREADY_TAKEN, MSG_AVAILABLE, MSG_CHECK_FAILED, MSG_SAVED};
use concierge_domain::{ClaimState, EmailClaim};

/// Transient status line shown next to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Available,
    Taken,
    CheckFailed,
    Saved,
}

impl Notice {
    pub fn message(self) -> &'static str {
        match self {
            Self::Available => MSG_AVAILABLE,
            Self::Taken => MSG_ALREADY_TAKEN,
            Self::CheckFailed => MSG_CHECK_FAILED,
            Self::Saved => MSG_SAVED,
        }
    }

    /// Positive notices render as success, the rest as warnings.
    pub fn is_positive(self) -> bool {
        matches!(self, Self::Available | Self::Saved)
    }
}

/// Point-in-time copy of everything a view needs to render the claim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimSnapshot {
    pub state: ClaimState,
    /// Last value the backend confirmed
    pub committed: Option<EmailClaim>,
    /// Candidate being edited
    pub edit_buffer: String,
    pub error: Option<String>,
    pub notice: Option<Notice>,
}

impl ClaimSnapshot {
    pub fn committed_local_part(&self) -> Option<&str> {
        self.committed.as_ref().map(|claim| claim.local_part.as_str())
    }

    /// Full concierge address for the committed claim, if any.
    pub fn full_address(&self, domain: &str) -> Option<String> {
        self.committed.as_ref().map(|claim| claim.full_address(domain))
    }

    /// Whether the submit action should be enabled.
    pub fn can_submit(&self) -> bool {
        matches!(self.state, ClaimState::Editing | ClaimState::Error)
            && !self.edit_buffer.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_needs_editor_and_text() {
        let mut snapshot = ClaimSnapshot { state: ClaimState::Editing, ..Default::default() };
        assert!(!snapshot.can_submit());

        snapshot.edit_buffer = "  ".to_string();
        assert!(!snapshot.can_submit());

        snapshot.edit_buffer = "alice".to_string();
        assert!(snapshot.can_submit());

        snapshot.state = ClaimState::Saving;
        assert!(!snapshot.can_submit());
    }

    #[test]
    fn address_only_for_committed_claim() {
        let mut snapshot = ClaimSnapshot::default();
        assert_eq!(snapshot.full_address("x.test"), None);

        snapshot.committed = Some(EmailClaim::new("dana"));
        assert_eq!(snapshot.full_address("x.test").as_deref(), Some("dana@x.test"));
        assert_eq!(snapshot.committed_local_part(), Some("dana"));
    }
}
