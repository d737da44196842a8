//! Command tree

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Concierge email client.
///
/// Shows, checks and claims the local-part of your concierge address.
#[derive(Parser, Debug)]
#[command(name = "concierge", version, about)]
pub struct Cli {
    /// Config file (TOML or JSON); skips environment and probing
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Bearer token for the backend
    #[arg(long, global = true, env = "CONCIERGE_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the full concierge address, if one is set up.
    Show,
    /// Validate a local-part and ask whether it is free.
    Check(CandidateArgs),
    /// Claim a local-part for the signed-in user.
    Claim(ClaimArgs),
    /// Wait until a claim exists (e.g. made from another device).
    Watch(WatchArgs),
    /// Evaluate the redirect guards for a route.
    Route(RouteArgs),
}

impl Command {
    /// Stable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Check(_) => "check",
            Self::Claim(_) => "claim",
            Self::Watch(_) => "watch",
            Self::Route(_) => "route",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CandidateArgs {
    /// Local-part to check, e.g. `alice` or `alice.dev`
    pub local_part: String,
}

#[derive(Args, Debug, Clone)]
pub struct ClaimArgs {
    /// Local-part to claim
    pub local_part: String,

    /// Claim from the setup flow and report the follow-up redirect
    #[arg(long)]
    pub setup: bool,
}

#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    /// Give up after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

#[derive(Args, Debug, Clone)]
pub struct RouteArgs {
    /// Route path: `/`, `/dashboard` or `/setup-email`
    pub path: String,

    /// Evaluate as a signed-out visitor
    #[arg(long)]
    pub signed_out: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["concierge", "claim", "alice", "--setup", "-vv", "--token", "t"])
                .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.token.as_deref(), Some("t"));
        match cli.command {
            Command::Claim(args) => {
                assert_eq!(args.local_part, "alice");
                assert!(args.setup);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn route_requires_path() {
        assert!(Cli::try_parse_from(["concierge", "route"]).is_err());
    }
}
