//! Bone subsystem: fracture severity on skeletal parts
//!
//! Severity drives narration, sound cues, the interaction delay multiplier,
//! movement penalties and the deterministic fumble roll.

pub mod fumble;
pub mod skeleton;
pub mod system;

pub use fumble::{fumble_roll, CombatAction};
pub use skeleton::{Bone, BoneConfig, BoneSeverity, BoneTierEffects};
