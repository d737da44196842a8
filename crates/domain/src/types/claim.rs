//! Concierge email claim types
//!
//! The backend speaks in terms of `assist_local`, the local-part of the
//! concierge address. [`ClaimPayload`] is that wire shape; [`EmailClaim`] is
//! the validated in-memory form used by the rest of the workspace.

use serde::{Deserialize, Serialize};

/// A user's committed local-part binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailClaim {
    pub local_part: String,
}

impl EmailClaim {
    /// Create a claim for `local_part` as given.
    pub fn new(local_part: impl Into<String>) -> Self {
        Self { local_part: local_part.into() }
    }

    /// Compose the full concierge address for `domain`.
    ///
    /// Plain concatenation: no case folding, punycode or IDN handling.
    pub fn full_address(&self, domain: &str) -> String {
        format!("{}@{}", self.local_part, domain)
    }
}

/// Request and response body for `/user/email`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimPayload {
    #[serde(default)]
    pub assist_local: Option<String>,
}

impl ClaimPayload {
    /// Body carrying a candidate local-part.
    pub fn for_candidate(candidate: impl Into<String>) -> Self {
        Self { assist_local: Some(candidate.into()) }
    }

    /// Interpret a lookup response; a missing or empty local-part means the
    /// user has not set up an address yet.
    pub fn into_claim(self) -> Option<EmailClaim> {
        self.assist_local.filter(|local| !local.is_empty()).map(EmailClaim::new)
    }
}

impl From<&EmailClaim> for ClaimPayload {
    fn from(claim: &EmailClaim) -> Self {
        Self::for_candidate(claim.local_part.clone())
    }
}

/// Availability response from `POST /user/email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result of asking the backend whether a candidate is free.
///
/// Transient: a positive answer does not reserve the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityCheck {
    pub candidate: String,
    pub available: bool,
    pub message: Option<String>,
}

impl AvailabilityCheck {
    /// Attach the candidate that was asked about to a backend response.
    pub fn from_response(candidate: impl Into<String>, response: AvailabilityResponse) -> Self {
        Self {
            candidate: candidate.into(),
            available: response.available,
            message: response.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_address_concatenates_without_normalizing() {
        let claim = EmailClaim::new("Alice.Dev");
        assert_eq!(claim.full_address("assist.example.com"), "Alice.Dev@assist.example.com");
    }

    #[test]
    fn payload_uses_backend_field_name() {
        let json = serde_json::to_value(ClaimPayload::for_candidate("alice")).unwrap();
        assert_eq!(json, serde_json::json!({ "assist_local": "alice" }));
    }

    #[test]
    fn empty_or_missing_local_part_is_no_claim() {
        let missing: ClaimPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.into_claim(), None);

        let empty: ClaimPayload = serde_json::from_str(r#"{"assist_local":""}"#).unwrap();
        assert_eq!(empty.into_claim(), None);

        let null: ClaimPayload = serde_json::from_str(r#"{"assist_local":null}"#).unwrap();
        assert_eq!(null.into_claim(), None);

        let set: ClaimPayload = serde_json::from_str(r#"{"assist_local":"bob"}"#).unwrap();
        assert_eq!(set.into_claim(), Some(EmailClaim::new("bob")));
    }

    #[test]
    fn availability_message_is_optional() {
        let response: AvailabilityResponse =
            serde_json::from_str(r#"{"available":false}"#).unwrap();
        let check = AvailabilityCheck::from_response("carol", response);
        assert!(!check.available);
        assert_eq!(check.message, None);
        assert_eq!(check.candidate, "carol");
    }
}
