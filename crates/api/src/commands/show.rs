use concierge_domain::Result;
use tracing::{instrument, warn};

use crate::context::AppContext;

pub const NOT_SET_UP: &str = "Email not set up yet";

/// Print the full address, or a hint when no claim exists.
///
/// A failed lookup reads as "not set up", same as the address view.
#[instrument(skip(ctx))]
pub async fn run(ctx: &AppContext) -> Result<String> {
    let claim = match ctx.gateway.get_claim().await {
        Ok(claim) => claim,
        Err(err) => {
            warn!(error = %err, "claim lookup failed; treating as not set up");
            None
        }
    };
    Ok(match claim {
        Some(claim) => claim.full_address(&ctx.config.domain),
        None => NOT_SET_UP.to_string(),
    })
}
