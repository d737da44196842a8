//! Concierge backend API
//!
//! HTTP-based adapters for the claim workflow: an authenticated JSON client
//! and the [`concierge_core::ClaimGateway`] implementation built on it.
//!
//! # Architecture
//!
//! - Uses [`crate::http::HttpClient`] for retries (no direct reqwest)
//! - Bearer token fetched per call from an [`AccessTokenProvider`]
//! - Explicit timeout on every backend call

pub mod auth;
pub mod claims;
pub mod client;
pub mod errors;

pub use auth::{AccessTokenProvider, SessionTokenProvider, StaticTokenProvider};
pub use claims::HttpClaimGateway;
pub use client::{ApiClient, ApiClientBuilder, ApiClientConfig};
pub use errors::{ApiError, ApiErrorCategory};
