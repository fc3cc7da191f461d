//! Bounded integrity with a derived, change-only severity tier
//!
//! Shared by organs (wound severity) and bones (fracture severity).

pub mod severity;
pub mod state;

pub use severity::{SeverityTable, SeverityThreshold};
pub use state::{IntegrityOutcome, IntegrityState, IntegrityTransition};
