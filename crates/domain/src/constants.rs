//! Application constants
//!
//! Centralized location for domain-level constants used throughout the
//! application.

// Backend surface
pub const USER_EMAIL_PATH: &str = "/user/email";

// Validation
pub const DEV_STAGE: &str = "dev";
pub const DEFAULT_STAGE: &str = "prod";
pub const DEV_LOCAL_PART_SUFFIX: &str = ".dev";

// Claim workflow timing (milliseconds)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;
/// Polls never run closer together than this
pub const MIN_POLL_INTERVAL_MS: u64 = 100;
pub const DEFAULT_REFRESH_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_CONFIRMATION_WINDOW_MS: u64 = 3000;
pub const DEFAULT_SETUP_REDIRECT_DELAY_MS: u64 = 1500;

// Backend requests
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

// User-facing messages
pub const MSG_NOT_AVAILABLE: &str = "Email is not available";
pub const MSG_ALREADY_TAKEN: &str = "Email is already taken";
pub const MSG_AVAILABLE: &str = "Email is available";
pub const MSG_CHECK_FAILED: &str = "Error checking availability";
pub const MSG_SAVED: &str = "Email saved successfully!";
pub const MSG_SAVE_FAILED: &str = "Failed to save email";
