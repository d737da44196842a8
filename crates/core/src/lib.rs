//! # Concierge Core
//!
//! Client-side business logic for the concierge email claim workflow.
//!
//! This crate contains:
//! - The claim gateway port (the backend contract, as a trait)
//! - The claim state machine ([`ClaimController`])
//! - The process-wide claim-changed broadcast ([`ClaimNotifier`])
//! - The read-only address view with debounced refresh ([`ClaimDisplay`])
//! - Redirect guards ([`RedirectGate`])
//!
//! ## Architecture Principles
//! - Only depends on `concierge-domain`
//! - No HTTP code; the backend is reached through [`ClaimGateway`]
//! - Background work runs as cancellable Tokio tasks owned by a component

pub mod claim;
pub mod routing;
pub mod tasks;

pub use claim::controller::{ClaimController, ControllerSettings, SubmitOutcome};
pub use claim::display::{ClaimDisplay, DisplayState};
pub use claim::notifier::{ClaimChanged, ClaimNotifier};
pub use claim::ports::ClaimGateway;
pub use claim::snapshot::{ClaimSnapshot, Notice};
pub use routing::{ClaimLookup, Redirect, RedirectGate};
pub use tasks::TaskGuard;
