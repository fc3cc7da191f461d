//! Resistance sets applied to harmful damage
//!
//! Coefficients scale first, flat reduction subtracts second. Armor
//! penetration pulls both back toward no resistance.

use crate::damage::specifier::{DamageSpecifier, DamageType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-type resistance profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageModifierSet {
    /// Multiplier per type (1.0 = unresisted, 0.5 = halved, 2.0 = vulnerable)
    pub coefficients: BTreeMap<DamageType, f32>,
    /// Amount subtracted after scaling
    pub flat_reduction: BTreeMap<DamageType, f32>,
}

impl DamageModifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_coefficient(mut self, damage_type: DamageType, coefficient: f32) -> Self {
        self.coefficients.insert(damage_type, coefficient);
        self
    }

    pub fn with_flat_reduction(mut self, damage_type: DamageType, amount: f32) -> Self {
        self.flat_reduction.insert(damage_type, amount);
        self
    }

    /// Resist harmful entries of a specifier. Healing passes through.
    ///
    /// `penetration` in [0, 1]: 0 = full resistance, 1 = resistance ignored.
    /// Vulnerabilities (coefficient > 1) are not reduced by penetration.
    pub fn apply(&self, damage: &DamageSpecifier, penetration: f32) -> DamageSpecifier {
        let penetration = penetration.clamp(0.0, 1.0);
        let mut resisted = damage.clone();
        resisted.map_values(|damage_type, value| {
            if value <= 0.0 {
                return value;
            }
            let mut coefficient = self.coefficients.get(&damage_type).copied().unwrap_or(1.0);
            if coefficient < 1.0 {
                coefficient += (1.0 - coefficient) * penetration;
            }
            let flat = self.flat_reduction.get(&damage_type).copied().unwrap_or(0.0)
                * (1.0 - penetration);
            (value * coefficient - flat).max(0.0)
        });
        resisted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficient_then_flat() {
        let set = DamageModifierSet::new()
            .with_coefficient(DamageType::Slash, 0.5)
            .with_flat_reduction(DamageType::Slash, 2.0);
        let out = set.apply(&DamageSpecifier::of(DamageType::Slash, 10.0), 0.0);
        assert_eq!(out.get(DamageType::Slash), 3.0);
    }

    #[test]
    fn test_flat_never_turns_harm_into_heal() {
        let set = DamageModifierSet::new().with_flat_reduction(DamageType::Blunt, 50.0);
        let out = set.apply(&DamageSpecifier::of(DamageType::Blunt, 10.0), 0.0);
        assert_eq!(out.get(DamageType::Blunt), 0.0);
    }

    #[test]
    fn test_healing_not_resisted() {
        let set = DamageModifierSet::new().with_coefficient(DamageType::Heat, 0.1);
        let out = set.apply(&DamageSpecifier::of(DamageType::Heat, -10.0), 0.0);
        assert_eq!(out.get(DamageType::Heat), -10.0);
    }

    #[test]
    fn test_full_penetration_ignores_resistance() {
        let set = DamageModifierSet::new()
            .with_coefficient(DamageType::Piercing, 0.2)
            .with_flat_reduction(DamageType::Piercing, 5.0);
        let out = set.apply(&DamageSpecifier::of(DamageType::Piercing, 10.0), 1.0);
        assert!((out.get(DamageType::Piercing) - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_vulnerability_kept_under_penetration() {
        let set = DamageModifierSet::new().with_coefficient(DamageType::Cold, 2.0);
        let out = set.apply(&DamageSpecifier::of(DamageType::Cold, 5.0), 0.5);
        assert_eq!(out.get(DamageType::Cold), 10.0);
    }
}
