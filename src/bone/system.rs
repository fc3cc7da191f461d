//! Bone integrity changes and their gameplay reactions

use crate::anatomy::category::OrganCategory;
use crate::bone::fumble::{fumble_roll, CombatAction};
use crate::bone::skeleton::BoneSeverity;
use crate::core::types::{BoneId, EntityId};
use crate::ecs::world::AnatomyWorld;
use crate::events::AnatomyEvent;
use crate::integrity::IntegrityTransition;
use crate::trauma::{TraumaKind, TraumaTargetType};

fn bone_event(
    bone: BoneId,
    organ: EntityId,
    transition: IntegrityTransition<BoneSeverity>,
) -> AnatomyEvent {
    match transition {
        IntegrityTransition::Integrity { old, new } => AnatomyEvent::BoneIntegrityChanged {
            bone,
            organ,
            old,
            new,
        },
        IntegrityTransition::Severity { old, new } => AnatomyEvent::BoneSeverityChanged {
            bone,
            organ,
            old,
            new,
        },
    }
}

impl AnatomyWorld {
    /// Move a bone's integrity by `-delta`; negative deltas mend
    pub(crate) fn damage_bone(&mut self, bone: BoneId, delta: f32) -> bool {
        let Some(current) = self.bones.get(&bone).map(|b| b.integrity()) else {
            return false;
        };
        self.set_bone_integrity(bone, current - delta)
    }

    /// Set a bone's integrity directly, e.g. when a bone is set.
    ///
    /// Returns false when the bone no longer belongs to an organ.
    pub fn set_bone_integrity(&mut self, bone: BoneId, value: f32) -> bool {
        let Some(bone_rec) = self.bones.get_mut(&bone) else {
            return false;
        };
        let Some(organ) = bone_rec.woundable else {
            return false;
        };
        if !self.organs.contains_key(&organ) {
            return false;
        }

        let mut transitions = Vec::new();
        let outcome = bone_rec.integrity.set_integrity(
            value,
            0.0,
            &self.content.bones.thresholds,
            |t| transitions.push(t),
        );
        let consumed = bone_rec.integrity.consumed_fraction();
        for transition in transitions {
            self.publish(bone_event(bone, organ, transition));
        }
        if !outcome.changed {
            return true;
        }

        let (owner, category) = match self.organs.get(&organ) {
            Some(rec) => (rec.owner, rec.category),
            None => return true,
        };
        self.mark_dirty(organ);
        if let Some(owner) = owner {
            self.mark_dirty(owner);
        }

        if outcome.restored {
            self.clear_traumas(organ, |t| {
                t.kind == TraumaKind::BoneDamage && t.target_type == TraumaTargetType::Bone
            });
        }

        if let Some((old, new)) = outcome.severity {
            tracing::debug!(?bone, ?organ, ?old, ?new, "bone severity changed");
            if old == BoneSeverity::Normal && !self.traumas.has(organ, TraumaKind::BoneDamage) {
                self.add_trauma_with_type(
                    organ,
                    TraumaKind::BoneDamage,
                    TraumaTargetType::Bone,
                    None,
                    consumed,
                );
            }
            self.narrate_bone_change(organ, owner, category, old, new);
            if let Some(owner) = owner {
                self.refresh_broken_bone_alert(owner);
            }
        }
        true
    }

    fn narrate_bone_change(
        &mut self,
        organ: EntityId,
        owner: Option<EntityId>,
        category: OrganCategory,
        old: BoneSeverity,
        new: BoneSeverity,
    ) {
        let Some(effects) = self.content.bones.effects(new).cloned() else {
            return;
        };
        if let Some(owner) = owner {
            if new > old {
                if let Some(key) = effects.popup {
                    self.publish(AnatomyEvent::Popup {
                        recipient: owner,
                        key,
                        category: Some(category),
                    });
                }
            }
        }
        if let Some(sound) = effects.sound {
            self.publish(AnatomyEvent::SoundCue {
                source: owner.unwrap_or(organ),
                sound,
                volume: effects.volume,
            });
        }
    }

    /// Rescan a body's bones and flip the alert when it changes
    pub(crate) fn refresh_broken_bone_alert(&mut self, body: EntityId) {
        let broken = self
            .bones_of(body)
            .iter()
            .any(|(_, bone)| bone.severity() == BoneSeverity::Broken);
        let Some(body_rec) = self.bodies.get_mut(&body) else {
            return;
        };
        if body_rec.broken_bone_alert == broken {
            return;
        }
        body_rec.broken_bone_alert = broken;
        self.publish(AnatomyEvent::BrokenBoneAlert {
            body,
            active: broken,
        });
        self.mark_dirty(body);
    }

    /// Worst bone tier among parts matching `filter`
    pub fn worst_bone(&self, body: EntityId, filter: impl Fn(OrganCategory) -> bool) -> BoneSeverity {
        self.bones_of(body)
            .into_iter()
            .filter(|(organ, _)| self.organs.get(organ).map_or(false, |o| filter(o.category)))
            .map(|(_, bone)| bone.severity())
            .max()
            .unwrap_or_default()
    }

    /// Multiplier on interaction delays from the worst arm or hand bone
    pub fn interaction_delay_multiplier(&self, body: EntityId) -> f32 {
        let worst = self.worst_bone(body, |c| c.is_upper_limb());
        let penalty = self.content.bones.delay_penalty(worst);
        if penalty <= 0.0 {
            return 1.0;
        }
        1.0 / (1.0 - penalty)
    }

    /// Walk speed modifier from the worst leg or foot bone
    pub fn movement_speed_modifier(&self, body: EntityId) -> f32 {
        let worst = self.worst_bone(body, |c| c.is_leg());
        1.0 - self.content.bones.delay_penalty(worst)
    }

    pub fn fumble_chance(&self, body: EntityId) -> f32 {
        let worst = self.worst_bone(body, |c| c.is_upper_limb());
        self.content.bones.fumble_chance(worst)
    }

    /// Roll whether an attack this tick is fumbled; narrates a fumble
    pub fn check_fumble(&mut self, body: EntityId, action: CombatAction) -> bool {
        let Some(net_id) = self.net_id(body) else {
            return false;
        };
        let chance = self.fumble_chance(body);
        let fumbled = fumble_roll(self.current_tick, net_id, chance);
        if fumbled {
            tracing::debug!(?body, ?action, chance, "attack fumbled");
            self.publish(AnatomyEvent::Popup {
                recipient: body,
                key: action.fumble_popup().to_string(),
                category: None,
            });
        }
        fumbled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anatomy::body::BodyKind;

    fn body_with_arm(world: &mut AnatomyWorld) -> (EntityId, EntityId, BoneId) {
        let body = world.spawn_body(BodyKind::Complex);
        let arm = world.spawn_organ(OrganCategory::ArmLeft, 70.0);
        let bone = world.attach_bone(arm, 100.0).unwrap();
        assert!(world.insert_organ(body, arm));
        world.drain_events();
        (body, arm, bone)
    }

    #[test]
    fn test_break_then_set() {
        let mut world = AnatomyWorld::default();
        let (body, arm, bone) = body_with_arm(&mut world);

        assert!(world.set_bone_integrity(bone, 10.0));
        assert_eq!(world.bone(bone).unwrap().severity(), BoneSeverity::Broken);
        assert!(world.body(body).unwrap().has_broken_bones());
        assert_eq!(world.traumas_of(arm, Some(TraumaKind::BoneDamage)).len(), 1);

        let events = world.drain_events();
        assert!(events.contains(&AnatomyEvent::BrokenBoneAlert { body, active: true }));
        assert!(events.iter().any(|e| matches!(e, AnatomyEvent::Popup { key, .. } if key == "bone-broken")));

        assert!(world.set_bone_integrity(bone, 100.0));
        assert_eq!(world.bone(bone).unwrap().severity(), BoneSeverity::Normal);
        assert!(!world.body(body).unwrap().has_broken_bones());
        assert!(world.traumas_of(arm, None).is_empty());
    }

    #[test]
    fn test_mending_within_normal_tier_keeps_trauma() {
        let mut world = AnatomyWorld::default();
        let (_, arm, bone) = body_with_arm(&mut world);
        assert!(world.set_bone_integrity(bone, 90.0));
        assert_eq!(world.bone(bone).unwrap().severity(), BoneSeverity::Normal);
        world
            .add_trauma_with_type(arm, TraumaKind::BoneDamage, TraumaTargetType::Bone, None, 0.1)
            .unwrap();

        assert!(world.set_bone_integrity(bone, 100.0));
        assert_eq!(world.traumas_of(arm, Some(TraumaKind::BoneDamage)).len(), 1);
    }

    #[test]
    fn test_improving_tier_has_no_popup() {
        let mut world = AnatomyWorld::default();
        let (_, _, bone) = body_with_arm(&mut world);
        world.set_bone_integrity(bone, 10.0);
        world.drain_events();

        world.set_bone_integrity(bone, 40.0);
        let events = world.drain_events();
        assert!(!events.iter().any(|e| matches!(e, AnatomyEvent::Popup { .. })));
        assert!(events.iter().any(|e| matches!(e, AnatomyEvent::SoundCue { sound, .. } if sound == "bone-cracked")));
    }

    #[test]
    fn test_delay_multiplier_from_upper_limb() {
        let mut world = AnatomyWorld::default();
        let (body, _, bone) = body_with_arm(&mut world);
        assert_eq!(world.interaction_delay_multiplier(body), 1.0);

        world.set_bone_integrity(bone, 10.0);
        let expected = 1.0 / (1.0 - 0.4);
        assert!((world.interaction_delay_multiplier(body) - expected).abs() < 1e-6);
        assert_eq!(world.movement_speed_modifier(body), 1.0);
        assert_eq!(world.fumble_chance(body), 0.25);
    }

    #[test]
    fn test_orphan_bone_is_noop() {
        let mut world = AnatomyWorld::default();
        let (_, arm, bone) = body_with_arm(&mut world);
        world.destroy_organ(arm);
        assert!(!world.set_bone_integrity(bone, 0.0));
    }

    #[test]
    fn test_check_fumble_is_deterministic() {
        let mut world = AnatomyWorld::default();
        let (body, _, bone) = body_with_arm(&mut world);
        assert!(!world.check_fumble(body, CombatAction::Melee));

        world.set_bone_integrity(bone, 0.0);
        let first = world.check_fumble(body, CombatAction::Melee);
        let second = world.check_fumble(body, CombatAction::Melee);
        assert_eq!(first, second);
    }
}
