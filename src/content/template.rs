//! Body templates: the declared organ layout a creature spawns with

use crate::anatomy::body::BodyKind;
use crate::anatomy::category::OrganCategory;
use crate::core::config::DamageConfig;
use crate::core::error::{AnatomyError, Result};
use crate::core::types::EntityId;
use crate::ecs::world::AnatomyWorld;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

fn default_organic() -> bool {
    true
}

/// One organ or part in a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartTemplate {
    pub category: OrganCategory,
    /// Integrity cap
    pub cap: f32,
    #[serde(default = "default_organic")]
    pub organic: bool,
    #[serde(default)]
    pub modifier_set: Option<String>,
    /// Declares a skeleton for this part
    #[serde(default)]
    pub bone_cap: Option<f32>,
}

/// Organ layout of a creature
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyTemplate {
    pub kind: BodyKind,
    /// Damage cap for simple bodies
    pub cap: Option<f32>,
    pub modifier_set: Option<String>,
    pub parts: Vec<PartTemplate>,
}

/// Steps from a category up to the torso
fn depth(category: OrganCategory) -> usize {
    let mut depth = 0;
    let mut current = category;
    while let Some(parent) = current.parent_category() {
        current = parent;
        depth += 1;
    }
    depth
}

impl BodyTemplate {
    pub fn validate(&self, name: &str, damage: &DamageConfig) -> Result<()> {
        let invalid = |reason: String| AnatomyError::InvalidTemplate {
            template: name.to_string(),
            reason,
        };

        let known_set = |set: &Option<String>| {
            set.as_ref()
                .map_or(true, |s| damage.modifier_set(s).is_some())
        };
        if !known_set(&self.modifier_set) {
            return Err(invalid(format!(
                "unknown modifier set {:?}",
                self.modifier_set
            )));
        }

        if self.kind == BodyKind::Simple {
            if !self.parts.is_empty() {
                return Err(invalid("simple bodies cannot declare parts".into()));
            }
            return Ok(());
        }

        let mut seen = HashSet::new();
        for part in &self.parts {
            if !seen.insert(part.category) {
                return Err(invalid(format!("duplicate category {:?}", part.category)));
            }
            if part.cap <= 0.0 {
                return Err(invalid(format!("{:?} cap must be positive", part.category)));
            }
            if let Some(bone_cap) = part.bone_cap {
                if bone_cap <= 0.0 || part.category.is_internal() {
                    return Err(invalid(format!(
                        "{:?} cannot carry a bone with cap {}",
                        part.category, bone_cap
                    )));
                }
            }
            if !known_set(&part.modifier_set) {
                return Err(invalid(format!(
                    "{:?} uses unknown modifier set {:?}",
                    part.category, part.modifier_set
                )));
            }
        }

        if !seen.contains(&OrganCategory::Torso) {
            return Err(invalid("complex bodies need a Torso".into()));
        }
        for part in &self.parts {
            if let Some(parent) = part.category.parent_category() {
                if !seen.contains(&parent) {
                    return Err(invalid(format!(
                        "{:?} needs its parent {:?}",
                        part.category, parent
                    )));
                }
            }
        }
        Ok(())
    }

    /// Parts ordered so every parent is inserted before its children
    pub fn spawn_order(&self) -> Vec<&PartTemplate> {
        let mut parts: Vec<&PartTemplate> = self.parts.iter().collect();
        parts.sort_by_key(|p| depth(p.category));
        parts
    }
}

impl AnatomyWorld {
    /// Spawn a creature and insert its declared organs through the registry
    pub fn spawn_creature(&mut self, name: &str, template: &BodyTemplate) -> EntityId {
        let body = self.spawn_body(template.kind);
        if let Some(body_rec) = self.bodies.get_mut(&body) {
            body_rec.template = Some(name.to_string());
            body_rec.cap = template.cap;
            body_rec.modifier_set = template.modifier_set.clone();
        }

        for part in template.spawn_order() {
            let organ = self.spawn_organ(part.category, part.cap);
            if let Some(organ_rec) = self.organs.get_mut(&organ) {
                organ_rec.organic = part.organic;
                organ_rec.modifier_set = part
                    .modifier_set
                    .clone()
                    .or_else(|| template.modifier_set.clone());
            }
            if let Some(bone_cap) = part.bone_cap {
                self.attach_bone(organ, bone_cap);
            }
            if !self.insert_organ(body, organ) {
                tracing::warn!(
                    template = name,
                    category = ?part.category,
                    "organ insertion vetoed during spawn, leaving it loose"
                );
            }
        }

        tracing::debug!(template = name, ?body, "spawned creature");
        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(category: OrganCategory) -> PartTemplate {
        PartTemplate {
            category,
            cap: 50.0,
            organic: true,
            modifier_set: None,
            bone_cap: None,
        }
    }

    #[test]
    fn test_spawn_order_parents_first() {
        let template = BodyTemplate {
            parts: vec![
                part(OrganCategory::HandLeft),
                part(OrganCategory::Heart),
                part(OrganCategory::ArmLeft),
                part(OrganCategory::Torso),
            ],
            ..Default::default()
        };
        let order: Vec<OrganCategory> = template.spawn_order().iter().map(|p| p.category).collect();
        assert_eq!(order[0], OrganCategory::Torso);
        let arm = order.iter().position(|c| *c == OrganCategory::ArmLeft).unwrap();
        let hand = order.iter().position(|c| *c == OrganCategory::HandLeft).unwrap();
        assert!(arm < hand);
    }

    #[test]
    fn test_missing_parent_rejected() {
        let template = BodyTemplate {
            parts: vec![part(OrganCategory::Torso), part(OrganCategory::HandLeft)],
            ..Default::default()
        };
        assert!(template.validate("t", &DamageConfig::default()).is_err());
    }

    #[test]
    fn test_simple_body_cannot_have_parts() {
        let template = BodyTemplate {
            kind: BodyKind::Simple,
            parts: vec![part(OrganCategory::Torso)],
            ..Default::default()
        };
        assert!(template.validate("t", &DamageConfig::default()).is_err());
    }

    #[test]
    fn test_internal_bone_rejected() {
        let mut heart = part(OrganCategory::Heart);
        heart.bone_cap = Some(10.0);
        let template = BodyTemplate {
            parts: vec![part(OrganCategory::Torso), heart],
            ..Default::default()
        };
        assert!(template.validate("t", &DamageConfig::default()).is_err());
    }

    #[test]
    fn test_unknown_modifier_set_rejected() {
        let mut torso = part(OrganCategory::Torso);
        torso.modifier_set = Some("mithril".into());
        let template = BodyTemplate {
            parts: vec![torso],
            ..Default::default()
        };
        assert!(template.validate("t", &DamageConfig::default()).is_err());
    }
}
