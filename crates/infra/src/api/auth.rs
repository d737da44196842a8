//! Bearer token sources
//!
//! The API client asks for a token before every request so that a refreshed
//! session is picked up without rebuilding the client.

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use super::errors::ApiError;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token
    async fn access_token(&self) -> Result<String, ApiError>;
}

/// Fixed token, typically from the command line or environment.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, ApiError> {
        if self.token.trim().is_empty() {
            return Err(ApiError::Auth("no access token configured".into()));
        }
        Ok(self.token.clone())
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider").field("token", &"<redacted>").finish()
    }
}

/// Token owned by the identity session.
///
/// The session layer replaces it on refresh and clears it on sign-out; calls
/// made while signed out fail with an auth error.
#[derive(Default)]
pub struct SessionTokenProvider {
    token: RwLock<Option<String>>,
}

impl SessionTokenProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write() = Some(token.into());
        debug!("session token updated");
    }

    pub fn clear(&self) {
        *self.token.write() = None;
        debug!("session token cleared");
    }

    pub fn has_token(&self) -> bool {
        self.token.read().is_some()
    }
}

#[async_trait]
impl AccessTokenProvider for SessionTokenProvider {
    async fn access_token(&self) -> Result<String, ApiError> {
        self.token.read().clone().ok_or_else(|| ApiError::Auth("not signed in".into()))
    }
}

impl std::fmt::Debug for SessionTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokenProvider").field("has_token", &self.has_token()).finish()
    }
}
