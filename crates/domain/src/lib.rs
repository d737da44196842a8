//! # Concierge Domain
//!
//! Business domain types for the concierge email claim client.
//!
//! This crate contains:
//! - Claim and availability types, plus their wire representation
//! - The stage-dependent local-part validation rule
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other Concierge crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use validation::{validate_local_part, ValidationError};
