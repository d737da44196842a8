//! Email claim workflow
//!
//! - `ports`: backend contract consumed by the workflow
//! - `controller`: the claim state machine
//! - `snapshot`: observable controller state
//! - `notifier`: claim-changed publish/subscribe channel
//! - `display`: read-only address view that follows the notifier

pub mod controller;
pub mod display;
pub mod notifier;
pub mod ports;
pub mod snapshot;
