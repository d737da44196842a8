//! REST adapter for the claim gateway port
//!
//! All three operations share `/user/email`:
//! - `GET` returns the current claim; 404 or an empty local-part means none
//! - `POST` asks whether a candidate is available (no side effect)
//! - `PUT` commits a candidate; 409 means someone else got it first

use std::sync::Arc;

use async_trait::async_trait;
use concierge_core::ClaimGateway;
use concierge_domain::constants::USER_EMAIL_PATH;
use concierge_domain::{
    AvailabilityCheck, AvailabilityResponse, ClaimPayload, ConciergeError, EmailClaim, Result,
};
use tracing::{debug, instrument};

use super::client::ApiClient;
use super::errors::ApiError;

/// [`ClaimGateway`] backed by the concierge REST API.
#[derive(Debug, Clone)]
pub struct HttpClaimGateway {
    client: Arc<ApiClient>,
}

impl HttpClaimGateway {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ClaimGateway for HttpClaimGateway {
    #[instrument(skip(self))]
    async fn get_claim(&self) -> Result<Option<EmailClaim>> {
        match self.client.get::<Option<ClaimPayload>>(USER_EMAIL_PATH).await {
            Ok(payload) => Ok(payload.and_then(ClaimPayload::into_claim)),
            Err(ApiError::NotFound(message)) => {
                debug!(%message, "no claim on record");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    #[instrument(skip(self))]
    async fn check_availability(&self, candidate: &str) -> Result<AvailabilityCheck> {
        let response: AvailabilityResponse = self
            .client
            .post(USER_EMAIL_PATH, &ClaimPayload::for_candidate(candidate))
            .await
            .map_err(ConciergeError::from)?;

        debug!(available = response.available, "availability answered");
        Ok(AvailabilityCheck::from_response(candidate, response))
    }

    #[instrument(skip(self))]
    async fn upsert_claim(&self, candidate: &str) -> Result<EmailClaim> {
        let payload: Option<ClaimPayload> = self
            .client
            .put(USER_EMAIL_PATH, &ClaimPayload::for_candidate(candidate))
            .await
            .map_err(ConciergeError::from)?;

        // An empty echo still means the write went through.
        Ok(payload.and_then(ClaimPayload::into_claim).unwrap_or_else(|| EmailClaim::new(candidate)))
    }
}
