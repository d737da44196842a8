//! `concierge claim <local>`: the full submit workflow

use std::fmt::Write as _;
use std::time::Duration;

use concierge_core::{DisplayState, SubmitOutcome};
use concierge_domain::constants::{MSG_NOT_AVAILABLE, MSG_SAVED};
use concierge_domain::{ConciergeError, Result, Route};
use tracing::{debug, info, instrument, warn};

use crate::cli::ClaimArgs;
use crate::context::AppContext;

/// Drive the controller from the editor through commit.
///
/// Waits for the display view to pick up the claim-changed signal and show
/// the new address before reporting.
#[instrument(skip(ctx, args), fields(local_part = %args.local_part))]
pub async fn run(ctx: &AppContext, args: &ClaimArgs) -> Result<String> {
    ctx.display.start(ctx.controller.notifier())?;
    ctx.sign_in().await;

    ctx.controller.begin_edit()?;
    if let Some(feedback) = ctx.controller.set_input(args.local_part.as_str())? {
        debug!(%feedback, "live validation feedback");
    }

    let outcome = ctx.controller.submit().await?;
    let claim = match outcome {
        SubmitOutcome::Saved(claim) => claim,
        SubmitOutcome::Rejected(err) => return Err(ConciergeError::InvalidInput(err.to_string())),
        SubmitOutcome::Unavailable => {
            return Err(ConciergeError::Conflict(MSG_NOT_AVAILABLE.to_string()))
        }
        SubmitOutcome::Failed(message) => return Err(ConciergeError::Network(message)),
        SubmitOutcome::Ignored => {
            return Err(ConciergeError::InvalidInput("nothing to claim".to_string()))
        }
        SubmitOutcome::Superseded => {
            return Err(ConciergeError::InvalidState("claim was superseded".to_string()))
        }
    };
    info!(local_part = %claim.local_part, "claim committed");

    let wait = ctx.config.claim.refresh_debounce() + ctx.config.backend.request_timeout();
    let address = claim.full_address(&ctx.config.domain);
    if !wait_for_display(ctx, &address, wait).await {
        warn!("address view did not show the new claim in time; showing committed value");
    }

    let mut report = format!("{MSG_SAVED}\n{address}");
    if args.setup {
        if let Some(redirect) = ctx.redirect_gate.after_claim_saved(Route::SetupEmail) {
            // Infallible for String.
            let _ = write!(report, "\nredirect: {} in {} ms", redirect.to, redirect.delay.as_millis());
        }
    }
    Ok(report)
}

/// Wait until the address view shows `expected`.
///
/// A refresh that still returns the previous claim does not count.
async fn wait_for_display(ctx: &AppContext, expected: &str, wait: Duration) -> bool {
    let mut rx = ctx.display.subscribe();
    let shown = tokio::time::timeout(wait, rx.wait_for(|state| state.address() == Some(expected)))
        .await
        .is_ok_and(|changed| changed.is_ok());
    shown
}
