//! Bodies: the organ-slot container of one creature

use crate::anatomy::pain::PainLedger;
use crate::core::types::{EntityId, NetId};
use crate::damage::specifier::DamageSpecifier;
use serde::{Deserialize, Serialize};

/// How damage reaches this body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyKind {
    /// No anatomy, damage lands on the body itself
    Simple,
    /// Damage is routed through parts
    #[default]
    Complex,
}

/// Physical container of a creature's organs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: EntityId,
    pub net_id: NetId,
    pub kind: BodyKind,
    pub template: Option<String>,
    /// Damage cap for simple bodies
    pub cap: Option<f32>,
    pub modifier_set: Option<String>,
    /// Organs in insertion order
    pub(crate) slots: Vec<EntityId>,
    /// Own damage (simple) or sum of attached parts (complex)
    pub(crate) damage: DamageSpecifier,
    pub(crate) pain: PainLedger,
    pub(crate) broken_bone_alert: bool,
}

impl Body {
    pub fn new(id: EntityId, kind: BodyKind) -> Self {
        Self {
            id,
            net_id: NetId::new(),
            kind,
            template: None,
            cap: None,
            modifier_set: None,
            slots: Vec::new(),
            damage: DamageSpecifier::new(),
            pain: PainLedger::new(),
            broken_bone_alert: false,
        }
    }

    pub fn is_complex(&self) -> bool {
        self.kind == BodyKind::Complex
    }

    pub fn slots(&self) -> &[EntityId] {
        &self.slots
    }

    pub fn damage(&self) -> &DamageSpecifier {
        &self.damage
    }

    pub fn total_damage(&self) -> f32 {
        self.damage.total()
    }

    pub fn has_broken_bones(&self) -> bool {
        self.broken_bone_alert
    }

    pub fn pain(&self) -> &PainLedger {
        &self.pain
    }
}
