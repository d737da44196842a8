//! API-specific error types
//!
//! Provides error classification for backend calls with retry metadata.

use std::time::Duration;

use concierge_domain::ConciergeError;
use reqwest::StatusCode;
use thiserror::Error;

/// Categories of API errors for retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Authentication errors (401, 403) - retry after token refresh
    Authentication,
    /// Rate limiting errors (429) - retry with backoff
    RateLimit,
    /// Server errors (5xx) - retryable
    Server,
    /// Client errors (4xx except auth) - non-retryable
    Client,
    /// Network/connection errors - retryable
    Network,
    /// Configuration errors - non-retryable
    Config,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}

impl ApiError {
    /// Classify a non-2xx response.
    pub fn from_status(status: StatusCode, url: &str, body: &str) -> Self {
        let message = if body.is_empty() {
            format!("{url} returned status {status}")
        } else {
            format!("{url} returned status {status}: {body}")
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Auth(message),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimit(message),
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::CONFLICT => Self::Conflict(message),
            s if s.is_server_error() => Self::Server(message),
            s if s.is_client_error() => Self::Client(message),
            _ => Self::Network(message),
        }
    }

    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::RateLimit(_) => ApiErrorCategory::RateLimit,
            Self::Server(_) => ApiErrorCategory::Server,
            Self::NotFound(_) | Self::Conflict(_) | Self::Client(_) => ApiErrorCategory::Client,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// Check if this error should be retried
    pub fn should_retry(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::Authentication
                | ApiErrorCategory::RateLimit
                | ApiErrorCategory::Server
                | ApiErrorCategory::Network
        )
    }
}

impl From<ConciergeError> for ApiError {
    fn from(err: ConciergeError) -> Self {
        match err {
            ConciergeError::Network(message) | ConciergeError::Internal(message) => {
                Self::Network(message)
            }
            ConciergeError::Auth(message) => Self::Auth(message),
            ConciergeError::Config(message) => Self::Config(message),
            ConciergeError::NotFound(message) => Self::NotFound(message),
            ConciergeError::Conflict(message) => Self::Conflict(message),
            ConciergeError::InvalidInput(message) | ConciergeError::InvalidState(message) => {
                Self::Client(message)
            }
            ConciergeError::Timeout(after) => Self::Timeout(after),
        }
    }
}

impl From<ApiError> for ConciergeError {
    fn from(err: ApiError) -> Self {
        let message = err.to_string();
        match err {
            ApiError::Auth(_) => Self::Auth(message),
            ApiError::NotFound(_) => Self::NotFound(message),
            ApiError::Conflict(_) => Self::Conflict(message),
            ApiError::Client(_) => Self::InvalidInput(message),
            ApiError::Config(_) => Self::Config(message),
            ApiError::Timeout(after) => Self::Timeout(after),
            ApiError::RateLimit(_) | ApiError::Server(_) | ApiError::Network(_) => {
                Self::Network(message)
            }
        }
    }
}
