use std::time::Duration;

use concierge_domain::{ConciergeError, Result};
use tracing::{info, instrument};

use crate::cli::WatchArgs;
use crate::context::AppContext;

/// Sign in and wait until a claim exists.
///
/// While there is none the controller polls the backend; the poll stops as
/// soon as the claim shows up.
#[instrument(skip(ctx))]
pub async fn run(ctx: &AppContext, args: &WatchArgs) -> Result<String> {
    ctx.sign_in().await;
    if ctx.controller.is_polling() {
        info!(interval = ?ctx.config.claim.poll_interval(), "no claim yet; polling");
    }

    let mut rx = ctx.controller.subscribe();
    let found = rx.wait_for(|snapshot| snapshot.committed.is_some());

    let claim = match args.timeout.map(Duration::from_secs) {
        Some(limit) => tokio::time::timeout(limit, found).await.map_err(|_| ConciergeError::Timeout(limit))?,
        None => found.await,
    }
    .map_err(|_| ConciergeError::Internal("claim controller closed".into()))?
    .committed
    .clone();

    let address = claim
        .map(|claim| claim.full_address(&ctx.config.domain))
        .ok_or_else(|| ConciergeError::Internal("claim disappeared while watching".into()))?;
    ctx.controller.shutdown();
    Ok(address)
}
