//! Shared test helpers for `concierge-core` integration tests.
//!
//! These helpers provide an in-memory backend and controller fixtures so the
//! workflow tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod gateway;

use std::sync::Arc;
use std::time::Duration;

use concierge_core::{ClaimController, ClaimNotifier, ControllerSettings};
use concierge_domain::Stage;

pub use gateway::InMemoryClaimGateway;

pub const DOMAIN: &str = "concierge.test";
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const CONFIRMATION_WINDOW: Duration = Duration::from_secs(3);

pub fn settings(stage: Stage) -> ControllerSettings {
    ControllerSettings {
        stage,
        domain: DOMAIN.to_string(),
        poll_interval: POLL_INTERVAL,
        confirmation_window: CONFIRMATION_WINDOW,
    }
}

/// Controller over `gateway` with its own notifier.
pub fn controller(gateway: &Arc<InMemoryClaimGateway>, stage: Stage) -> ClaimController {
    ClaimController::new(gateway.clone(), ClaimNotifier::new(), settings(stage))
}

pub fn prod() -> Stage {
    Stage::from("prod")
}
