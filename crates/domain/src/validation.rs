//! Local-part validation
//!
//! Format rules depend only on the candidate and the deployment stage. They
//! never assert uniqueness; that is the backend's call.

use thiserror::Error;

use crate::constants::DEV_LOCAL_PART_SUFFIX;
use crate::types::Stage;

/// Reasons a candidate local-part is rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Email cannot be empty")]
    Empty,

    #[error("In development mode, email must end with '{suffix}' (e.g., alice{suffix})")]
    MissingDevSuffix { suffix: &'static str },
}

/// Validate a candidate local-part for `stage`.
///
/// The candidate is trimmed first. On success the trimmed value is returned
/// so callers commit exactly what was validated.
///
/// # Errors
/// - [`ValidationError::Empty`] if nothing is left after trimming
/// - [`ValidationError::MissingDevSuffix`] on the `dev` stage when the
///   candidate does not end with `.dev`
pub fn validate_local_part<'a>(
    candidate: &'a str,
    stage: &Stage,
) -> Result<&'a str, ValidationError> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    if stage.is_dev() && !trimmed.ends_with(DEV_LOCAL_PART_SUFFIX) {
        return Err(ValidationError::MissingDevSuffix { suffix: DEV_LOCAL_PART_SUFFIX });
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_stage_requires_suffix() {
        let err = validate_local_part("alice", &Stage::Dev).unwrap_err();
        assert_eq!(
            err.to_string(),
            "In development mode, email must end with '.dev' (e.g., alice.dev)"
        );
        assert_eq!(validate_local_part("alice.dev", &Stage::Dev), Ok("alice.dev"));
    }

    #[test]
    fn other_stages_accept_any_non_empty_candidate() {
        let prod = Stage::from("prod");
        assert_eq!(validate_local_part("alice", &prod), Ok("alice"));
        assert_eq!(validate_local_part("a.dev", &prod), Ok("a.dev"));
        assert_eq!(validate_local_part("  with space  ", &prod), Ok("with space"));
    }

    #[test]
    fn whitespace_only_is_empty_on_every_stage() {
        assert_eq!(validate_local_part("   ", &Stage::Dev), Err(ValidationError::Empty));
        assert_eq!(validate_local_part("", &Stage::default()), Err(ValidationError::Empty));
    }

    #[test]
    fn suffix_check_applies_after_trimming() {
        assert_eq!(validate_local_part(" bob.dev \n", &Stage::Dev), Ok("bob.dev"));
    }
}
