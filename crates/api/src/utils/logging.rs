use std::time::Duration;

use concierge_domain::ConciergeError;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` picks the default level
/// for the concierge crates (0 = info, 1 = debug, 2+ = trace).
pub fn init_tracing(verbose: u8, json: bool) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,concierge={level},concierge_app={level},concierge_core={level},concierge_infra={level}"
        ))
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);
    // Ignore the error when a subscriber is already installed (tests).
    let _ = if json { builder.json().try_init() } else { builder.try_init() };
}

/// Log the outcome of a command execution with structured fields.
///
/// Callers must avoid forwarding sensitive values in `command`.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, outcome: Result<(), &ConciergeError>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match outcome {
        Ok(()) => info!(command, duration_ms, "command_execution_success"),
        Err(err) => {
            warn!(command, duration_ms, error_kind = error_label(err), error = %err, "command_execution_failure");
        }
    }
}

/// Convert a `ConciergeError` into a stable label suitable for logging.
#[inline]
pub fn error_label(error: &ConciergeError) -> &'static str {
    match error {
        ConciergeError::Config(_) => "config",
        ConciergeError::Network(_) => "network",
        ConciergeError::Auth(_) => "auth",
        ConciergeError::NotFound(_) => "not_found",
        ConciergeError::Conflict(_) => "conflict",
        ConciergeError::InvalidInput(_) => "invalid_input",
        ConciergeError::InvalidState(_) => "invalid_state",
        ConciergeError::Timeout(_) => "timeout",
        ConciergeError::Internal(_) => "internal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(error_label(&ConciergeError::Conflict("x".into())), "conflict");
        assert_eq!(error_label(&ConciergeError::Timeout(Duration::from_secs(1))), "timeout");
        assert_eq!(error_label(&ConciergeError::Auth("x".into())), "auth");
    }

    #[test]
    fn init_is_idempotent() {
        init_tracing(0, false);
        init_tracing(2, true);
    }
}
