//! # Concierge App
//!
//! Command-line application layer: argument parsing, wiring and commands.
//!
//! This crate contains:
//! - The `clap` command tree
//! - Application context (dependency injection)
//! - One handler per command
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture
//! - `anyhow` stays in the binary; handlers return domain errors

pub mod cli;
pub mod commands;
pub mod context;
pub mod utils;

pub use cli::{Cli, Command};
pub use context::AppContext;
