//! Port interfaces for the claim backend
//!
//! These traits define the boundary between the claim workflow and the
//! infrastructure that talks to the backend over HTTP.

use async_trait::async_trait;
use concierge_domain::{AvailabilityCheck, EmailClaim, Result};

/// Backend operations behind `/user/email`.
///
/// Implementations fetch a fresh bearer token for every call.
#[async_trait]
pub trait ClaimGateway: Send + Sync {
    /// Fetch the caller's claim.
    ///
    /// `Ok(None)` means "not configured yet"; that is an expected state and
    /// never an error.
    async fn get_claim(&self) -> Result<Option<EmailClaim>>;

    /// Ask whether `candidate` is free. A positive answer reserves nothing.
    async fn check_availability(&self, candidate: &str) -> Result<AvailabilityCheck>;

    /// Create or replace the caller's claim.
    ///
    /// Fails with `ConciergeError::Conflict` when the backend reports that the
    /// candidate was taken between the check and the commit.
    async fn upsert_claim(&self, candidate: &str) -> Result<EmailClaim>;
}
