//! Shared helpers for command integration tests.

#![allow(dead_code)]

use concierge_app::AppContext;
use concierge_domain::{BackendConfig, ClaimTimingConfig, ConciergeConfig, Stage};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "command-token";
pub const DOMAIN: &str = "concierge.test";
pub const USER_EMAIL: &str = "/user/email";

/// Config pointed at `server` with short timings and a single attempt.
pub fn config(server: &MockServer, stage: &str) -> ConciergeConfig {
    ConciergeConfig {
        backend: BackendConfig { base_url: server.uri(), request_timeout_secs: 2, max_attempts: 1 },
        domain: DOMAIN.into(),
        stage: Stage::from(stage),
        claim: ClaimTimingConfig {
            poll_interval_ms: 60_000,
            refresh_debounce_ms: 20,
            confirmation_window_ms: 50,
            setup_redirect_delay_ms: 100,
        },
    }
}

pub fn context(config: ConciergeConfig) -> AppContext {
    AppContext::new(config).expect("app context")
}

/// Lookup answering with `local` (or 404 for `None`), `times` times at most.
pub async fn mount_lookup(server: &MockServer, local: Option<&str>, times: Option<u64>) {
    let response = match local {
        Some(local) => ResponseTemplate::new(200).set_body_json(json!({ "assist_local": local })),
        None => ResponseTemplate::new(404),
    };
    let mock = Mock::given(method("GET")).and(path(USER_EMAIL)).respond_with(response);
    match times {
        Some(n) => mock.up_to_n_times(n).mount(server).await,
        None => mock.mount(server).await,
    }
}

pub async fn request_count(server: &MockServer) -> usize {
    server.received_requests().await.map_or(0, |requests| requests.len())
}
