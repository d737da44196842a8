//! Conversions from external infrastructure errors into domain errors.

use concierge_domain::ConciergeError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ConciergeError);

impl From<InfraError> for ConciergeError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ConciergeError> for InfraError {
    fn from(value: ConciergeError) -> Self {
        InfraError(value)
    }
}

trait IntoConciergeError {
    fn into_concierge(self) -> ConciergeError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ConciergeError */
/* -------------------------------------------------------------------------- */

impl IntoConciergeError for HttpError {
    fn into_concierge(self) -> ConciergeError {
        if self.is_timeout() {
            return ConciergeError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return ConciergeError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return ConciergeError::Config(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => ConciergeError::Auth(message),
                404 => ConciergeError::NotFound(message),
                409 => ConciergeError::Conflict(message),
                400..=499 => ConciergeError::InvalidInput(message),
                _ => ConciergeError::Network(message),
            };
        }

        ConciergeError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_concierge())
    }
}
