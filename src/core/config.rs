//! Damage router tunables
//!
//! Owned by the router and swapped wholesale through `DamageRouter::reload`.
//! Nothing reads these through global state.

use crate::damage::modifiers::DamageModifierSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for damage routing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageConfig {
    /// Multiplier applied to every harmful entry
    ///
    /// 1.0 skips the pass entirely.
    pub all_damage_multiplier: f32,

    /// Multiplier applied to every healing entry
    pub all_healing_multiplier: f32,

    /// Chance that a called shot with `can_miss` lands on another part
    ///
    /// The fallback part is drawn by hit weight from the remaining enabled parts.
    pub called_shot_miss_chance: f32,

    /// Named resistance sets referenced by organs and templates
    pub modifier_sets: BTreeMap<String, DamageModifierSet>,
}

impl Default for DamageConfig {
    fn default() -> Self {
        Self {
            all_damage_multiplier: 1.0,
            all_healing_multiplier: 1.0,
            called_shot_miss_chance: 0.2,
            modifier_sets: BTreeMap::new(),
        }
    }
}

impl DamageConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// True when either universal multiplier differs from identity
    pub fn has_universal_modifiers(&self) -> bool {
        self.all_damage_multiplier != 1.0 || self.all_healing_multiplier != 1.0
    }

    pub fn modifier_set(&self, name: &str) -> Option<&DamageModifierSet> {
        self.modifier_sets.get(name)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.all_damage_multiplier < 0.0 || self.all_healing_multiplier < 0.0 {
            return Err(format!(
                "universal multipliers must be non-negative (damage {}, healing {})",
                self.all_damage_multiplier, self.all_healing_multiplier
            ));
        }

        if !(0.0..=1.0).contains(&self.called_shot_miss_chance) {
            return Err(format!(
                "called_shot_miss_chance ({}) must be within [0, 1]",
                self.called_shot_miss_chance
            ));
        }

        for (name, set) in &self.modifier_sets {
            if set.coefficients.values().any(|c| *c < 0.0) {
                return Err(format!("modifier set {name} has a negative coefficient"));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let config = DamageConfig::default();
        assert!(!config.has_universal_modifiers());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_healing_multiplier_alone_counts() {
        let config = DamageConfig {
            all_healing_multiplier: 0.5,
            ..Default::default()
        };
        assert!(config.has_universal_modifiers());
    }

    #[test]
    fn test_validate_rejects_bad_miss_chance() {
        let config = DamageConfig {
            called_shot_miss_chance: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
