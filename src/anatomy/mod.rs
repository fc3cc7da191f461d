//! Anatomy: bodies, organs, the organ registry and pain
//!
//! A body owns an ordered list of organ slots. Organs point back at their
//! body and at the part that contains them; only the registry writes those
//! references.

pub mod body;
pub mod category;
pub mod organ;
pub mod pain;
pub mod registry;

pub use body::{Body, BodyKind};
pub use category::{OrganCategory, WoundSeverity};
pub use organ::Organ;
pub use pain::{PainConfig, PainLedger};
pub use registry::OrganRegistry;
