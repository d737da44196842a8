use concierge_core::ClaimLookup;
use concierge_domain::{AuthState, ConciergeError, Result, Route};

use crate::cli::RouteArgs;
use crate::context::AppContext;

/// Report where the redirect guards would send the user from `args.path`.
pub async fn run(ctx: &AppContext, args: &RouteArgs) -> Result<String> {
    let route: Route = args.path.parse().map_err(ConciergeError::InvalidInput)?;

    let auth = if args.signed_out {
        AuthState::SignedOut
    } else {
        ctx.sign_in().await;
        AuthState::SignedIn
    };
    let lookup = ClaimLookup::from_snapshot(&ctx.controller.snapshot());

    Ok(match ctx.redirect_gate.evaluate(route, auth, lookup) {
        Some(redirect) => format!("{route} -> {}", redirect.to),
        None => format!("{route}: stay"),
    })
}
