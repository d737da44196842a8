//! Concierge - email claim client
//!
//! Main entry point for the `concierge` binary.

use anyhow::Context as _;
use clap::Parser;
use concierge_app::commands::dispatch;
use concierge_app::utils::init_tracing;
use concierge_app::{AppContext, Cli};
use concierge_infra::config;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap so `env = ...` arguments can see it.
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.json_logs);
    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => warn!(error = %err, "could not load .env"),
    }

    let config = match &cli.config {
        Some(path) => config::load_from_file(Some(path.clone())),
        None => config::load(),
    }
    .context("failed to load configuration")?;

    let ctx = AppContext::new(config)?;
    let result = tokio::select! {
        result = dispatch(&ctx, &cli.command, cli.token.as_deref()) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted");
            ctx.shutdown().await;
            return Ok(());
        }
    };
    ctx.shutdown().await;

    let output = result?;
    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}
