//! Command handlers
//!
//! Each handler returns the text to print. Failures come back as
//! [`ConciergeError`] so the binary can map them to an exit status.

pub mod check;
pub mod claim;
pub mod route;
pub mod show;
pub mod watch;

use std::time::Instant;

use concierge_domain::Result;

use crate::cli::Command;
use crate::context::AppContext;
use crate::utils::log_command_execution;

/// Run `command` against `ctx`, installing `token` first when the command
/// talks to the backend.
pub async fn dispatch(ctx: &AppContext, command: &Command, token: Option<&str>) -> Result<String> {
    let started = Instant::now();
    let result = run(ctx, command, token).await;
    log_command_execution(command.name(), started.elapsed(), result.as_ref().map(|_| ()));
    result
}

async fn run(ctx: &AppContext, command: &Command, token: Option<&str>) -> Result<String> {
    let offline = matches!(command, Command::Route(args) if args.signed_out);
    if !offline {
        ctx.authenticate(token.unwrap_or_default())?;
    }

    match command {
        Command::Show => show::run(ctx).await,
        Command::Check(args) => check::run(ctx, &args.local_part).await,
        Command::Claim(args) => claim::run(ctx, args).await,
        Command::Watch(args) => watch::run(ctx, args).await,
        Command::Route(args) => route::run(ctx, args).await,
    }
}
