//! Trauma: persistent qualitative injuries attached to organs
//!
//! Combines with the integrity machine: traumas are created when a tier
//! first leaves intact and cleared when integrity returns to its cap.

pub mod ledger;
pub mod system;

pub use ledger::TraumaLedger;

use crate::core::types::{EntityId, Tick, TraumaId};
use serde::{Deserialize, Serialize};

/// Kind of injury
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraumaKind {
    /// Fracture of the part's bone
    BoneDamage,
    /// Internal organ damage
    OrganDamage,
    /// Nerve damage, feeds pain
    NerveDamage,
    /// A child part was severed from this one
    Dismemberment,
}

impl TraumaKind {
    pub fn default_target_type(&self) -> TraumaTargetType {
        match self {
            TraumaKind::BoneDamage => TraumaTargetType::Bone,
            TraumaKind::OrganDamage | TraumaKind::NerveDamage => TraumaTargetType::Organ,
            TraumaKind::Dismemberment => TraumaTargetType::Part,
        }
    }
}

/// What inside the target organ the trauma refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraumaTargetType {
    Bone,
    Organ,
    Part,
}

/// A recorded injury
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trauma {
    pub id: TraumaId,
    pub target: EntityId,
    pub kind: TraumaKind,
    pub target_type: TraumaTargetType,
    pub inflicter: Option<EntityId>,
    /// Consumed fraction of the target when the trauma was inflicted
    pub severity: f32,
    pub created_tick: Tick,
}
