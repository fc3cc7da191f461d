//! Read-only medical snapshot of one creature

use crate::anatomy::category::{OrganCategory, WoundSeverity};
use crate::bone::BoneSeverity;
use crate::core::types::{EntityId, TraumaId};
use crate::damage::specifier::DamageSpecifier;
use crate::ecs::world::AnatomyWorld;
use crate::trauma::{TraumaKind, TraumaTargetType};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoneReadout {
    pub integrity: f32,
    pub cap: f32,
    pub severity: BoneSeverity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraumaReadout {
    pub id: TraumaId,
    pub kind: TraumaKind,
    pub target_type: TraumaTargetType,
    pub severity: f32,
    /// Present for bone traumas on parts with a skeleton
    pub bone_severity: Option<BoneSeverity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrganReadout {
    pub organ: EntityId,
    pub category: OrganCategory,
    pub internal: bool,
    pub enabled: bool,
    pub integrity: f32,
    pub cap: f32,
    pub severity: WoundSeverity,
    pub damage: DamageSpecifier,
    pub bone: Option<BoneReadout>,
    pub traumas: Vec<TraumaReadout>,
    pub pain: f32,
    pub bleeding: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicalReadout {
    pub body: EntityId,
    pub template: Option<String>,
    pub organs: Vec<OrganReadout>,
    pub total_damage: f32,
    pub total_pain: f32,
    pub total_bleeding: f32,
    pub broken_bones: bool,
    pub interaction_delay_multiplier: f32,
    pub movement_speed_modifier: f32,
    pub pain_by_category: BTreeMap<OrganCategory, f32>,
    pub bleeding_by_category: BTreeMap<OrganCategory, f32>,
}

impl AnatomyWorld {
    /// Snapshot every attached organ of a body
    pub fn medical_scan(&self, body: EntityId) -> Option<MedicalReadout> {
        let body_rec = self.body(body)?;

        let mut organs = Vec::new();
        let mut pain_by_category = BTreeMap::new();
        let mut bleeding_by_category = BTreeMap::new();
        for organ_id in self.attached_organs(body) {
            let Some(organ) = self.organ(organ_id) else {
                continue;
            };
            let bone = organ.bone().and_then(|id| self.bone(id));
            let traumas = self
                .traumas_of(organ_id, None)
                .into_iter()
                .map(|t| TraumaReadout {
                    id: t.id,
                    kind: t.kind,
                    target_type: t.target_type,
                    severity: t.severity,
                    bone_severity: match t.kind {
                        TraumaKind::BoneDamage => bone.map(|b| b.severity()),
                        _ => None,
                    },
                })
                .collect();
            let pain = self.part_pain(organ_id);
            let bleeding = self.part_bleeding(organ_id);
            pain_by_category.insert(organ.category, pain);
            bleeding_by_category.insert(organ.category, bleeding);

            organs.push(OrganReadout {
                organ: organ_id,
                category: organ.category,
                internal: organ.is_internal(),
                enabled: organ.is_enabled(),
                integrity: organ.integrity(),
                cap: organ.cap(),
                severity: organ.severity(),
                damage: organ.damage().clone(),
                bone: bone.map(|b| BoneReadout {
                    integrity: b.integrity(),
                    cap: b.cap(),
                    severity: b.severity(),
                }),
                traumas,
                pain,
                bleeding,
            });
        }

        Some(MedicalReadout {
            body,
            template: body_rec.template.clone(),
            organs,
            total_damage: body_rec.total_damage(),
            total_pain: self.total_pain(body),
            total_bleeding: self.total_bleeding(body),
            broken_bones: body_rec.has_broken_bones(),
            interaction_delay_multiplier: self.interaction_delay_multiplier(body),
            movement_speed_modifier: self.movement_speed_modifier(body),
            pain_by_category,
            bleeding_by_category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Content;

    #[test]
    fn test_scan_reports_bone_trauma_severity() {
        let content = Content::builtin().unwrap();
        let mut world = AnatomyWorld::new(content.anatomy.clone());
        let body = world.spawn_creature("human", content.template("human").unwrap());
        let arm = world.get_organ(body, OrganCategory::ArmLeft).unwrap();
        let bone = world.organ(arm).unwrap().bone().unwrap();
        world.set_bone_integrity(bone, 5.0);

        let readout = world.medical_scan(body).unwrap();
        let arm_readout = readout
            .organs
            .iter()
            .find(|o| o.category == OrganCategory::ArmLeft)
            .unwrap();
        assert_eq!(arm_readout.traumas.len(), 1);
        assert_eq!(arm_readout.traumas[0].bone_severity, Some(BoneSeverity::Broken));
        assert!(readout.broken_bones);
        assert_eq!(readout.organs.len(), 15);
    }

    #[test]
    fn test_scan_serializes_to_json() {
        let content = Content::builtin().unwrap();
        let mut world = AnatomyWorld::new(content.anatomy.clone());
        let body = world.spawn_creature("slime", content.template("slime").unwrap());
        let json = serde_json::to_string(&world.medical_scan(body).unwrap()).unwrap();
        assert!(json.contains("\"template\":\"slime\""));
        assert!(world.medical_scan(EntityId(999)).is_none());
    }
}
