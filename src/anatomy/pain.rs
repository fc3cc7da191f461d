//! Pain ledger: named per-nerve-group modifiers feeding an aggregate pain value
//!
//! Each anatomical category is one nerve group. Part pain is its stored
//! damage scaled by `per_damage` plus the group's modifiers, floored at 0.

use crate::anatomy::category::OrganCategory;
use crate::core::types::EntityId;
use crate::ecs::world::AnatomyWorld;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Pain and bleeding coefficients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PainConfig {
    /// Pain per point of stored damage
    pub per_damage: f32,
    /// Bleeding rate per point of stored slash/piercing damage
    pub bleed_per_damage: f32,
}

impl Default for PainConfig {
    fn default() -> Self {
        Self {
            per_damage: 0.5,
            bleed_per_damage: 0.1,
        }
    }
}

/// Named pain modifiers per nerve group
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PainLedger {
    modifiers: BTreeMap<OrganCategory, BTreeMap<String, f32>>,
}

impl PainLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a modifier
    pub fn set(&mut self, group: OrganCategory, id: &str, amount: f32) {
        self.modifiers
            .entry(group)
            .or_default()
            .insert(id.to_string(), amount);
    }

    pub fn remove(&mut self, group: OrganCategory, id: &str) -> bool {
        let Some(group_mods) = self.modifiers.get_mut(&group) else {
            return false;
        };
        let removed = group_mods.remove(id).is_some();
        if group_mods.is_empty() {
            self.modifiers.remove(&group);
        }
        removed
    }

    pub fn clear_group(&mut self, group: OrganCategory) {
        self.modifiers.remove(&group);
    }

    pub fn modifier_total(&self, group: OrganCategory) -> f32 {
        self.modifiers
            .get(&group)
            .map_or(0.0, |mods| mods.values().sum())
    }

    pub fn modifiers(&self, group: OrganCategory) -> Option<&BTreeMap<String, f32>> {
        self.modifiers.get(&group)
    }
}

impl AnatomyWorld {
    /// Add a pain modifier to a body's nerve group. Fails when the group has no organ.
    pub fn add_pain_modifier(
        &mut self,
        body: EntityId,
        group: OrganCategory,
        id: &str,
        amount: f32,
    ) -> bool {
        if self.get_organ(body, group).is_none() {
            return false;
        }
        let Some(body_rec) = self.bodies.get_mut(&body) else {
            return false;
        };
        body_rec.pain.set(group, id, amount);
        self.mark_dirty(body);
        true
    }

    pub fn remove_pain_modifier(&mut self, body: EntityId, group: OrganCategory, id: &str) -> bool {
        let Some(body_rec) = self.bodies.get_mut(&body) else {
            return false;
        };
        if !body_rec.pain.remove(group, id) {
            return false;
        }
        self.mark_dirty(body);
        true
    }

    /// Pain of one attached organ
    pub fn part_pain(&self, organ: EntityId) -> f32 {
        let Some(organ_rec) = self.organs.get(&organ) else {
            return 0.0;
        };
        let base = organ_rec.damage.total() * self.content.pain.per_damage;
        let modifiers = organ_rec
            .owner
            .and_then(|owner| self.bodies.get(&owner))
            .map_or(0.0, |b| b.pain.modifier_total(organ_rec.category));
        (base + modifiers).max(0.0)
    }

    pub fn total_pain(&self, body: EntityId) -> f32 {
        self.attached_organs(body)
            .into_iter()
            .map(|organ| self.part_pain(organ))
            .sum()
    }

    /// Bleeding rate of one organ from its open wounds
    pub fn part_bleeding(&self, organ: EntityId) -> f32 {
        let Some(organ_rec) = self.organs.get(&organ) else {
            return 0.0;
        };
        let open: f32 = organ_rec
            .damage
            .iter()
            .filter(|(damage_type, _)| damage_type.is_bleeding())
            .map(|(_, value)| value)
            .sum();
        open * self.content.pain.bleed_per_damage
    }

    pub fn total_bleeding(&self, body: EntityId) -> f32 {
        self.attached_organs(body)
            .into_iter()
            .map(|organ| self.part_bleeding(organ))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites_same_id() {
        let mut ledger = PainLedger::new();
        ledger.set(OrganCategory::ArmLeft, "Morphine", -5.0);
        ledger.set(OrganCategory::ArmLeft, "Morphine", -8.0);
        assert_eq!(ledger.modifier_total(OrganCategory::ArmLeft), -8.0);
    }

    #[test]
    fn test_groups_are_independent() {
        let mut ledger = PainLedger::new();
        ledger.set(OrganCategory::ArmLeft, "Burn", 4.0);
        ledger.set(OrganCategory::Head, "Migraine", 2.0);
        assert_eq!(ledger.modifier_total(OrganCategory::ArmLeft), 4.0);
        assert_eq!(ledger.modifier_total(OrganCategory::Torso), 0.0);
    }

    #[test]
    fn test_remove_drops_empty_group() {
        let mut ledger = PainLedger::new();
        ledger.set(OrganCategory::Torso, "Bruise", 1.0);
        assert!(ledger.remove(OrganCategory::Torso, "Bruise"));
        assert!(!ledger.remove(OrganCategory::Torso, "Bruise"));
        assert!(ledger.modifiers(OrganCategory::Torso).is_none());
    }
}
