//! # Concierge Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The reqwest-based HTTP client with retry
//! - The authenticated backend API client and the REST claim gateway
//! - Configuration loading from environment and files
//!
//! ## Architecture
//! - Implements traits defined in `concierge-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::{
    AccessTokenProvider, ApiClient, ApiClientConfig, ApiError, HttpClaimGateway,
    SessionTokenProvider, StaticTokenProvider,
};
pub use errors::InfraError;
pub use http::HttpClient;
