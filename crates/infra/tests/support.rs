//! Shared helpers for infra integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use concierge_infra::{ApiClient, ApiClientConfig, HttpClaimGateway, StaticTokenProvider};
use wiremock::MockServer;

pub const TOKEN: &str = "integration-token";
pub const USER_EMAIL: &str = "/user/email";

/// API client pointed at `server`, single attempt, short timeout.
pub fn api_client(server: &MockServer) -> Arc<ApiClient> {
    let config = ApiClientConfig {
        base_url: server.uri(),
        timeout: Duration::from_secs(2),
        max_attempts: 1,
    };
    Arc::new(ApiClient::new(config, Arc::new(StaticTokenProvider::new(TOKEN))).expect("api client"))
}

pub fn gateway(server: &MockServer) -> HttpClaimGateway {
    HttpClaimGateway::new(api_client(server))
}

pub fn bearer() -> String {
    format!("Bearer {TOKEN}")
}
