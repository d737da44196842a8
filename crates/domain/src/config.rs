//! Configuration structures
//!
//! Resolved once at boot by the infra loader (environment first, then file).

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CONFIRMATION_WINDOW_MS, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL_MS,
    DEFAULT_REFRESH_DEBOUNCE_MS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SETUP_REDIRECT_DELAY_MS,
};
use crate::types::Stage;

/// Top-level client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConciergeConfig {
    pub backend: BackendConfig,
    /// Domain appended to the local-part when displaying the full address
    pub domain: String,
    #[serde(default)]
    pub stage: Stage,
    #[serde(default)]
    pub claim: ClaimTimingConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL without trailing slash, e.g. `https://api.example.com`
    pub base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Total attempts per request (initial try + retries)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Timing knobs for the claim workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimTimingConfig {
    /// Re-poll interval while no claim exists
    pub poll_interval_ms: u64,
    /// Delay before a view refreshes after a claim-changed signal
    pub refresh_debounce_ms: u64,
    /// How long `Saved` is shown before returning to `HasClaim`
    pub confirmation_window_ms: u64,
    /// Delay before the setup flow sends the user to the dashboard
    pub setup_redirect_delay_ms: u64,
}

impl ClaimTimingConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn refresh_debounce(&self) -> Duration {
        Duration::from_millis(self.refresh_debounce_ms)
    }

    pub fn confirmation_window(&self) -> Duration {
        Duration::from_millis(self.confirmation_window_ms)
    }

    pub fn setup_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.setup_redirect_delay_ms)
    }
}

impl Default for ClaimTimingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            refresh_debounce_ms: DEFAULT_REFRESH_DEBOUNCE_MS,
            confirmation_window_ms: DEFAULT_CONFIRMATION_WINDOW_MS,
            setup_redirect_delay_ms: DEFAULT_SETUP_REDIRECT_DELAY_MS,
        }
    }
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}
