//! End-to-end claim workflow over HTTP
//!
//! Drives the real controller through the REST gateway against a mock backend.

mod support;

use std::sync::Arc;
use std::time::Duration;

use concierge_core::{ClaimController, ClaimNotifier, ControllerSettings, SubmitOutcome};
use concierge_domain::{AuthState, ClaimState, Stage};
use serde_json::json;
use support::{gateway, USER_EMAIL};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn controller(server: &MockServer, stage: Stage) -> ClaimController {
    let settings = ControllerSettings {
        stage,
        domain: "concierge.test".into(),
        poll_interval: Duration::from_secs(60),
        confirmation_window: Duration::from_millis(50),
    };
    ClaimController::new(Arc::new(gateway(server)), ClaimNotifier::new(), settings)
}

#[tokio::test]
async fn new_user_claims_available_address() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(USER_EMAIL))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(USER_EMAIL))
        .and(body_json(json!({ "assist_local": "alice" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "available": true })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(USER_EMAIL))
        .and(body_json(json!({ "assist_local": "alice" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "assist_local": "alice" })))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller(&server, Stage::from("prod"));
    controller.set_auth_state(AuthState::SignedIn).await;
    assert_eq!(controller.state(), ClaimState::NoClaim);

    controller.begin_edit().unwrap();
    controller.set_input("alice").unwrap();
    let outcome = controller.submit().await.unwrap();

    assert!(matches!(outcome, SubmitOutcome::Saved(ref claim) if claim.local_part == "alice"));
    assert_eq!(controller.full_address().as_deref(), Some("alice@concierge.test"));

    let mut states = controller.subscribe();
    tokio::time::timeout(
        Duration::from_secs(2),
        states.wait_for(|s| s.state == ClaimState::HasClaim),
    )
    .await
    .expect("confirmation window elapsed")
    .unwrap();
    controller.shutdown();
}

#[tokio::test]
async fn conflict_on_commit_reads_as_not_available() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(USER_EMAIL))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "assist_local": "old.dev" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(USER_EMAIL))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "available": true })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(USER_EMAIL))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let controller = controller(&server, Stage::Dev);
    controller.set_auth_state(AuthState::SignedIn).await;
    assert_eq!(controller.state(), ClaimState::HasClaim);

    controller.begin_edit().unwrap();
    controller.set_input("new.dev").unwrap();

    assert_eq!(controller.submit().await.unwrap(), SubmitOutcome::Unavailable);
    let snapshot = controller.snapshot();
    assert!(snapshot.error.as_deref().unwrap_or_default().contains("not available"));
    assert_eq!(snapshot.committed_local_part(), Some("old.dev"));
}

#[tokio::test]
async fn dev_rule_blocks_request_entirely() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(USER_EMAIL))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;
    Mock::given(method("PUT")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let controller = controller(&server, Stage::Dev);
    controller.set_auth_state(AuthState::SignedIn).await;
    controller.begin_edit().unwrap();
    controller.set_input("alice").unwrap();

    assert!(matches!(controller.submit().await.unwrap(), SubmitOutcome::Rejected(_)));
    controller.shutdown();
}
