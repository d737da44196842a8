use concierge_domain::constants::{MSG_ALREADY_TAKEN, MSG_AVAILABLE};
use concierge_domain::{validate_local_part, ConciergeError, EmailClaim, Result};
use tracing::instrument;

use crate::context::AppContext;

/// Validate `local_part` for the configured stage, then ask the backend.
///
/// A candidate that fails validation never reaches the network.
#[instrument(skip(ctx))]
pub async fn run(ctx: &AppContext, local_part: &str) -> Result<String> {
    let candidate = validate_local_part(local_part, &ctx.config.stage)
        .map_err(|err| ConciergeError::InvalidInput(err.to_string()))?;

    let check = ctx.gateway.check_availability(candidate).await?;
    if check.available {
        Ok(format!("{MSG_AVAILABLE}: {}", EmailClaim::new(candidate).full_address(&ctx.config.domain)))
    } else {
        let reason = check.message.unwrap_or_else(|| MSG_ALREADY_TAKEN.to_string());
        Err(ConciergeError::Conflict(reason))
    }
}
