//! Organ records: external parts and internal organs

use crate::anatomy::category::{OrganCategory, WoundSeverity};
use crate::core::types::{BoneId, EntityId, NetId};
use crate::damage::specifier::DamageSpecifier;
use crate::ecs::world::AnatomyWorld;
use crate::events::AnatomyEvent;
use crate::integrity::{IntegrityState, IntegrityTransition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One anatomical unit.
///
/// `owner` and `parent` are relations, never ownership edges, and only the
/// registry's insert/remove contract writes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organ {
    pub id: EntityId,
    pub net_id: NetId,
    pub category: OrganCategory,
    /// Robotic parts are skipped by organic-only split policies
    pub organic: bool,
    /// Resistance set name looked up in the damage config
    pub modifier_set: Option<String>,
    pub(crate) owner: Option<EntityId>,
    pub(crate) parent: Option<EntityId>,
    pub(crate) enabled: bool,
    pub(crate) damage: DamageSpecifier,
    pub(crate) integrity: IntegrityState<WoundSeverity>,
    pub(crate) integrity_modifiers: BTreeMap<String, f32>,
    pub(crate) bone: Option<BoneId>,
}

impl Organ {
    pub fn new(id: EntityId, category: OrganCategory, cap: f32) -> Self {
        Self {
            id,
            net_id: NetId::new(),
            category,
            organic: true,
            modifier_set: None,
            owner: None,
            parent: None,
            enabled: false,
            damage: DamageSpecifier::new(),
            integrity: IntegrityState::new(cap),
            integrity_modifiers: BTreeMap::new(),
            bone: None,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.category.is_internal()
    }

    pub fn owner(&self) -> Option<EntityId> {
        self.owner
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn damage(&self) -> &DamageSpecifier {
        &self.damage
    }

    pub fn integrity(&self) -> f32 {
        self.integrity.integrity()
    }

    pub fn cap(&self) -> f32 {
        self.integrity.cap()
    }

    pub fn severity(&self) -> WoundSeverity {
        self.integrity.severity()
    }

    pub fn bone(&self) -> Option<BoneId> {
        self.bone
    }

    pub fn integrity_modifiers(&self) -> &BTreeMap<String, f32> {
        &self.integrity_modifiers
    }

    /// Sum of active integrity modifiers
    pub fn integrity_bonus(&self) -> f32 {
        self.integrity_modifiers.values().sum()
    }

    pub fn is_damaged(&self) -> bool {
        self.damage.total() > 0.0
    }
}

/// Map a wound transition onto the outbound event for `organ`
pub(crate) fn wound_event(organ: EntityId, transition: IntegrityTransition<WoundSeverity>) -> AnatomyEvent {
    match transition {
        IntegrityTransition::Integrity { old, new } => AnatomyEvent::IntegrityChanged { organ, old, new },
        IntegrityTransition::Severity { old, new } => AnatomyEvent::SeverityChanged { organ, old, new },
    }
}

impl AnatomyWorld {
    /// Add or overwrite a named integrity modifier and re-derive the tier
    pub fn add_integrity_modifier(&mut self, organ: EntityId, id: &str, amount: f32) -> bool {
        let Some(organ_rec) = self.organs.get_mut(&organ) else {
            return false;
        };
        if organ_rec.owner.is_none() {
            return false;
        }
        organ_rec.integrity_modifiers.insert(id.to_string(), amount);
        self.refresh_wound_severity(organ);
        true
    }

    pub fn remove_integrity_modifier(&mut self, organ: EntityId, id: &str) -> bool {
        let Some(organ_rec) = self.organs.get_mut(&organ) else {
            return false;
        };
        if organ_rec.integrity_modifiers.remove(id).is_none() {
            return false;
        }
        self.refresh_wound_severity(organ);
        true
    }

    fn refresh_wound_severity(&mut self, organ: EntityId) {
        let Some(organ_rec) = self.organs.get_mut(&organ) else {
            return;
        };
        let bonus = organ_rec.integrity_bonus();
        let mut transitions = Vec::new();
        organ_rec
            .integrity
            .refresh_severity(bonus, &self.content.organ_severity, |t| transitions.push(t));
        let owner = organ_rec.owner;

        for transition in transitions {
            self.publish(wound_event(organ, transition));
        }
        self.mark_dirty(organ);
        if let Some(owner) = owner {
            self.mark_dirty(owner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_organ_is_loose_and_full() {
        let organ = Organ::new(EntityId(1), OrganCategory::Heart, 60.0);
        assert!(organ.owner().is_none());
        assert!(!organ.is_enabled());
        assert!(organ.is_internal());
        assert_eq!(organ.integrity(), 60.0);
        assert_eq!(organ.severity(), WoundSeverity::Healthy);
        assert!(!organ.is_damaged());
    }

    #[test]
    fn test_integrity_bonus_sums_modifiers() {
        let mut organ = Organ::new(EntityId(1), OrganCategory::Torso, 100.0);
        organ.integrity_modifiers.insert("PainSuppressant".into(), 10.0);
        organ.integrity_modifiers.insert("Adrenaline".into(), 5.0);
        assert_eq!(organ.integrity_bonus(), 15.0);
    }

    #[test]
    fn test_modifier_masks_severity() {
        use crate::anatomy::body::BodyKind;
        use crate::damage::specifier::{DamageSpecifier, DamageType};

        let mut world = AnatomyWorld::default();
        let body = world.spawn_body(BodyKind::Complex);
        let torso = world.spawn_organ(OrganCategory::Torso, 100.0);
        assert!(world.insert_organ(body, torso));
        world.store_damage(torso, DamageSpecifier::of(DamageType::Blunt, 30.0), &DamageSpecifier::of(DamageType::Blunt, 30.0), None);
        assert_eq!(world.organ(torso).unwrap().severity(), WoundSeverity::Moderate);
        world.drain_events();

        assert!(world.add_integrity_modifier(torso, "PainSuppressant", 28.0));
        assert_eq!(world.organ(torso).unwrap().severity(), WoundSeverity::Healthy);
        assert_eq!(world.organ(torso).unwrap().integrity(), 70.0);
        assert_eq!(
            world.drain_events(),
            vec![AnatomyEvent::SeverityChanged {
                organ: torso,
                old: WoundSeverity::Moderate,
                new: WoundSeverity::Healthy,
            }]
        );

        assert!(world.remove_integrity_modifier(torso, "PainSuppressant"));
        assert_eq!(world.organ(torso).unwrap().severity(), WoundSeverity::Moderate);
    }
}
