//! Domain data types
//!
//! Organized by concern:
//! - `claim`: the user's concierge email claim and availability results
//! - `stage`: deployment stage tags
//! - `session`: authentication state, claim workflow states and routes

pub mod claim;
pub mod session;
pub mod stage;

pub use claim::*;
pub use session::*;
pub use stage::*;
