pub mod config;
pub mod error;
pub mod types;

pub use config::DamageConfig;
pub use error::{AnatomyError, Result};
pub use types::{BoneId, EntityId, NetId, Tick, TraumaId};
