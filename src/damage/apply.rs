//! Capped application of a damage delta and the persistence step
//!
//! `apply_capped` is pure arithmetic. `store_damage` writes the result into
//! the world and runs the integrity machine, traumas, bones and severing.

use crate::anatomy::category::WoundSeverity;
use crate::anatomy::organ::wound_event;
use crate::core::types::EntityId;
use crate::damage::specifier::DamageSpecifier;
use crate::ecs::world::AnatomyWorld;
use crate::trauma::TraumaKind;

/// Apply `delta` on top of `current` under an optional total cap.
///
/// Harm per type is clamped to the room left under the cap, with room
/// computed once from `current` and consumed in type order. Heal per type
/// is floored at zero stored damage and never makes room for harm.
/// Returns the new stored damage and the realized delta.
pub fn apply_capped(
    current: &DamageSpecifier,
    delta: &DamageSpecifier,
    cap: Option<f32>,
) -> (DamageSpecifier, DamageSpecifier) {
    let mut room = cap.map(|cap| (cap - current.total()).max(0.0));
    let mut next = current.clone();
    let mut realized = delta.zeroed();

    for (damage_type, value) in delta.iter() {
        let applied = if value > 0.0 {
            match room.as_mut() {
                Some(room) => {
                    let applied = value.min(*room);
                    *room -= applied;
                    applied
                }
                None => value,
            }
        } else if value < 0.0 {
            let stored = next.get(damage_type);
            if stored <= 0.0 {
                0.0
            } else {
                value.max(-stored)
            }
        } else {
            0.0
        };

        tracing::trace!(?damage_type, requested = value, applied, "capped damage entry");
        if applied != 0.0 {
            next.add(damage_type, applied);
        }
        realized.set(damage_type, applied);
    }

    (next.trimmed(), realized)
}

impl AnatomyWorld {
    /// Stored damage and cap of a damageable entity
    pub(crate) fn damage_state(&self, entity: EntityId) -> Option<(DamageSpecifier, Option<f32>)> {
        if let Some(organ) = self.organs.get(&entity) {
            return Some((organ.damage.clone(), Some(organ.cap())));
        }
        self.bodies
            .get(&entity)
            .map(|body| (body.damage.clone(), body.cap))
    }

    /// Resistance set name that applies to an entity
    pub(crate) fn modifier_set_name(&self, entity: EntityId) -> Option<String> {
        if let Some(organ) = self.organs.get(&entity) {
            return organ.modifier_set.clone();
        }
        self.bodies.get(&entity).and_then(|b| b.modifier_set.clone())
    }

    /// Persist a new damage total on an organ or a simple body.
    ///
    /// `realized` is the delta that produced `damage`; it feeds the owner's
    /// aggregate and the bone transfer.
    pub(crate) fn store_damage(
        &mut self,
        entity: EntityId,
        damage: DamageSpecifier,
        realized: &DamageSpecifier,
        origin: Option<EntityId>,
    ) {
        if !self.organs.contains_key(&entity) {
            if let Some(body) = self.bodies.get_mut(&entity) {
                body.damage = damage;
                self.mark_dirty(entity);
            }
            return;
        }

        let Some(organ) = self.organs.get_mut(&entity) else {
            return;
        };
        organ.damage = damage;
        let integrity = organ.cap() - organ.damage.total();
        let bonus = organ.integrity_bonus();
        let mut transitions = Vec::new();
        let outcome = organ.integrity.set_integrity(
            integrity,
            bonus,
            &self.content.organ_severity,
            |t| transitions.push(t),
        );
        let owner = organ.owner;
        let category = organ.category;
        let consumed = organ.integrity.consumed_fraction();
        let bone = organ.bone;

        for transition in transitions {
            self.publish(wound_event(entity, transition));
        }
        self.mark_dirty(entity);

        if let Some(owner) = owner {
            if let Some(body) = self.bodies.get_mut(&owner) {
                body.damage += realized;
                body.damage = body.damage.trimmed();
            }
            self.mark_dirty(owner);
        }

        if outcome.restored {
            let cleared = self.clear_traumas(entity, |_| true);
            tracing::debug!(organ = ?entity, cleared, "organ restored, traumas cleared");
        }

        if let Some((old, new)) = outcome.severity {
            if category.is_internal()
                && old == WoundSeverity::Healthy
                && !self.traumas.has(entity, TraumaKind::OrganDamage)
            {
                self.add_trauma(entity, TraumaKind::OrganDamage, origin, consumed);
            }
            tracing::debug!(organ = ?entity, ?category, ?old, ?new, "wound severity changed");
        }

        if let Some(bone) = bone {
            let bones = &self.content.bones;
            let bone_delta: f32 = bones
                .damage_types
                .iter()
                .map(|t| realized.get(*t))
                .sum::<f32>()
                * bones.damage_ratio;
            if bone_delta != 0.0 {
                self.damage_bone(bone, bone_delta);
            }
        }

        let lost = matches!(outcome.severity, Some((_, WoundSeverity::Loss)));
        if self.content.sever_on_loss && lost && realized.has_harm() {
            if let Some(owner) = owner {
                self.sever(owner, entity, origin);
            }
        }
    }
}
