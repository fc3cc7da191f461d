//! Bone records and fracture tier configuration

use crate::core::types::{BoneId, EntityId};
use crate::damage::specifier::DamageType;
use crate::integrity::{IntegrityState, SeverityTable, SeverityThreshold};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fracture severity (not f32)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum BoneSeverity {
    /// Intact
    #[default]
    Normal,
    /// Bruised bone, no functional loss
    Damaged,
    /// Hairline fracture
    Cracked,
    /// Clean break
    Broken,
}

impl BoneSeverity {
    pub fn all() -> [BoneSeverity; 4] {
        [
            BoneSeverity::Normal,
            BoneSeverity::Damaged,
            BoneSeverity::Cracked,
            BoneSeverity::Broken,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Damaged => "damaged",
            Self::Cracked => "cracked",
            Self::Broken => "broken",
        }
    }
}

/// Skeleton of one woundable part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub id: BoneId,
    /// Owning part; `None` once the part is gone
    pub(crate) woundable: Option<EntityId>,
    pub(crate) integrity: IntegrityState<BoneSeverity>,
}

impl Bone {
    pub fn new(id: BoneId, woundable: EntityId, cap: f32) -> Self {
        Self {
            id,
            woundable: Some(woundable),
            integrity: IntegrityState::new(cap),
        }
    }

    pub fn woundable(&self) -> Option<EntityId> {
        self.woundable
    }

    pub fn integrity(&self) -> f32 {
        self.integrity.integrity()
    }

    pub fn cap(&self) -> f32 {
        self.integrity.cap()
    }

    pub fn severity(&self) -> BoneSeverity {
        self.integrity.severity()
    }
}

/// Side effects tied to one fracture tier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoneTierEffects {
    /// Fraction of action speed lost; delay multiplier is 1 / (1 - penalty)
    pub delay_penalty: f32,
    /// Chance to fumble a melee or ranged attack
    pub fumble_chance: f32,
    pub sound: Option<String>,
    /// Volume offset for the tier's sound
    pub volume: f32,
    /// Localization key narrated when the bone worsens into this tier
    pub popup: Option<String>,
}

/// Bone content data
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoneConfig {
    pub thresholds: SeverityTable<BoneSeverity>,
    /// Damage types on the owning part that also hit the bone
    pub damage_types: Vec<DamageType>,
    /// Fraction of realized part damage transferred to the bone
    pub damage_ratio: f32,
    pub tiers: BTreeMap<BoneSeverity, BoneTierEffects>,
}

impl Default for BoneConfig {
    fn default() -> Self {
        let mut tiers = BTreeMap::new();
        tiers.insert(
            BoneSeverity::Damaged,
            BoneTierEffects {
                delay_penalty: 0.1,
                fumble_chance: 0.0,
                sound: Some("bone-damaged".into()),
                volume: -4.0,
                popup: Some("bone-damaged".into()),
            },
        );
        tiers.insert(
            BoneSeverity::Cracked,
            BoneTierEffects {
                delay_penalty: 0.25,
                fumble_chance: 0.10,
                sound: Some("bone-cracked".into()),
                volume: -2.0,
                popup: Some("bone-cracked".into()),
            },
        );
        tiers.insert(
            BoneSeverity::Broken,
            BoneTierEffects {
                delay_penalty: 0.4,
                fumble_chance: 0.25,
                sound: Some("bone-broken".into()),
                volume: 0.0,
                popup: Some("bone-broken".into()),
            },
        );

        Self {
            thresholds: SeverityTable::new(vec![
                SeverityThreshold::new(BoneSeverity::Damaged, 0.25),
                SeverityThreshold::new(BoneSeverity::Cracked, 0.5),
                SeverityThreshold::new(BoneSeverity::Broken, 0.75),
            ]),
            damage_types: vec![DamageType::Blunt],
            damage_ratio: 0.5,
            tiers,
        }
    }
}

impl BoneConfig {
    /// Effects for a tier; intact bones have none
    pub fn effects(&self, severity: BoneSeverity) -> Option<&BoneTierEffects> {
        self.tiers.get(&severity)
    }

    pub fn delay_penalty(&self, severity: BoneSeverity) -> f32 {
        self.effects(severity).map_or(0.0, |e| e.delay_penalty)
    }

    pub fn fumble_chance(&self, severity: BoneSeverity) -> f32 {
        self.effects(severity).map_or(0.0, |e| e.fumble_chance)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.thresholds.validate()?;
        if self.damage_ratio < 0.0 {
            return Err(format!("bone damage_ratio ({}) must be >= 0", self.damage_ratio));
        }
        for (tier, effects) in &self.tiers {
            if !(0.0..1.0).contains(&effects.delay_penalty) {
                return Err(format!(
                    "delay_penalty for {:?} ({}) must be within [0, 1)",
                    tier, effects.delay_penalty
                ));
            }
            if !(0.0..=1.0).contains(&effects.fumble_chance) {
                return Err(format!(
                    "fumble_chance for {:?} ({}) must be within [0, 1]",
                    tier, effects.fumble_chance
                ));
            }
        }
        Ok(())
    }
}
