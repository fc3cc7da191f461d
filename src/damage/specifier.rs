//! Damage types and the damage specifier value object
//!
//! A specifier maps damage type to a signed magnitude: positive harms,
//! negative heals. An empty specifier is a no-op; a specifier holding a
//! zero-valued entry is not empty and still flows through the router.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::AddAssign;

/// Kinds of damage an organ can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DamageType {
    Blunt,
    Slash,
    Piercing,
    Heat,
    Cold,
    Shock,
    Caustic,
    Poison,
    Radiation,
    Asphyxiation,
    Bloodloss,
    Cellular,
}

impl DamageType {
    pub fn all() -> [DamageType; 12] {
        use DamageType::*;
        [
            Blunt, Slash, Piercing, Heat, Cold, Shock, Caustic, Poison, Radiation,
            Asphyxiation, Bloodloss, Cellular,
        ]
    }

    /// Does this damage open the skin?
    pub fn is_bleeding(&self) -> bool {
        matches!(self, DamageType::Slash | DamageType::Piercing)
    }
}

/// Signed per-type damage amounts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DamageSpecifier {
    values: BTreeMap<DamageType, f32>,
}

impl DamageSpecifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-type specifier
    pub fn of(damage_type: DamageType, amount: f32) -> Self {
        let mut spec = Self::new();
        spec.set(damage_type, amount);
        spec
    }

    pub fn from_pairs(pairs: &[(DamageType, f32)]) -> Self {
        let mut spec = Self::new();
        for &(damage_type, amount) in pairs {
            spec.add(damage_type, amount);
        }
        spec
    }

    /// True when no type is present at all
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, damage_type: DamageType) -> f32 {
        self.values.get(&damage_type).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, damage_type: DamageType, amount: f32) {
        self.values.insert(damage_type, amount);
    }

    /// Add to a type, creating the entry if absent
    pub fn add(&mut self, damage_type: DamageType, amount: f32) {
        *self.values.entry(damage_type).or_insert(0.0) += amount;
    }

    pub fn iter(&self) -> impl Iterator<Item = (DamageType, f32)> + '_ {
        self.values.iter().map(|(t, v)| (*t, *v))
    }

    pub fn types(&self) -> impl Iterator<Item = DamageType> + '_ {
        self.values.keys().copied()
    }

    /// Net sum of all entries
    pub fn total(&self) -> f32 {
        self.values.values().sum()
    }

    /// Sum of positive entries only
    pub fn harm_total(&self) -> f32 {
        self.values.values().filter(|v| **v > 0.0).sum()
    }

    /// Sum of negative entries only (as a negative number)
    pub fn heal_total(&self) -> f32 {
        self.values.values().filter(|v| **v < 0.0).sum()
    }

    pub fn has_harm(&self) -> bool {
        self.values.values().any(|v| *v > 0.0)
    }

    pub fn has_heal(&self) -> bool {
        self.values.values().any(|v| *v < 0.0)
    }

    /// True when any entry carries a non-zero magnitude
    pub fn any_nonzero(&self) -> bool {
        self.values.values().any(|v| *v != 0.0)
    }

    /// Same types, every magnitude zero
    pub fn zeroed(&self) -> Self {
        Self {
            values: self.values.keys().map(|t| (*t, 0.0)).collect(),
        }
    }

    /// Multiply every entry by a factor
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            values: self.values.iter().map(|(t, v)| (*t, v * factor)).collect(),
        }
    }

    /// Apply a function to every entry in place
    pub fn map_values(&mut self, mut f: impl FnMut(DamageType, f32) -> f32) {
        for (damage_type, value) in self.values.iter_mut() {
            *value = f(*damage_type, *value);
        }
    }

    /// Drop zero entries
    pub fn trimmed(&self) -> Self {
        Self {
            values: self
                .values
                .iter()
                .filter(|(_, v)| **v != 0.0)
                .map(|(t, v)| (*t, *v))
                .collect(),
        }
    }
}

impl AddAssign<&DamageSpecifier> for DamageSpecifier {
    fn add_assign(&mut self, rhs: &DamageSpecifier) {
        for (damage_type, amount) in rhs.iter() {
            self.add(damage_type, amount);
        }
    }
}

impl FromIterator<(DamageType, f32)> for DamageSpecifier {
    fn from_iter<I: IntoIterator<Item = (DamageType, f32)>>(iter: I) -> Self {
        let mut spec = Self::new();
        for (damage_type, amount) in iter {
            spec.add(damage_type, amount);
        }
        spec
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_vs_zero_entry() {
        let empty = DamageSpecifier::new();
        assert!(empty.is_empty());

        let touched = DamageSpecifier::of(DamageType::Blunt, 0.0);
        assert!(!touched.is_empty());
        assert!(!touched.any_nonzero());
    }

    #[test]
    fn test_totals_split_harm_and_heal() {
        let spec = DamageSpecifier::from_pairs(&[
            (DamageType::Slash, 10.0),
            (DamageType::Heat, -4.0),
            (DamageType::Blunt, 2.0),
        ]);
        assert_eq!(spec.harm_total(), 12.0);
        assert_eq!(spec.heal_total(), -4.0);
        assert_eq!(spec.total(), 8.0);
        assert!(spec.has_harm() && spec.has_heal());
    }

    #[test]
    fn test_add_assign_merges_types() {
        let mut a = DamageSpecifier::of(DamageType::Slash, 3.0);
        let b = DamageSpecifier::from_pairs(&[(DamageType::Slash, 2.0), (DamageType::Cold, 1.0)]);
        a += &b;
        assert_eq!(a.get(DamageType::Slash), 5.0);
        assert_eq!(a.get(DamageType::Cold), 1.0);
    }

    #[test]
    fn test_zeroed_keeps_types() {
        let spec = DamageSpecifier::from_pairs(&[(DamageType::Slash, 3.0), (DamageType::Cold, -1.0)]);
        let zero = spec.zeroed();
        assert_eq!(zero.types().count(), 2);
        assert_eq!(zero.total(), 0.0);
    }

    #[test]
    fn test_deserializes_from_toml_table() {
        let spec: DamageSpecifier = toml::from_str("Slash = 5.0\nBlunt = -2.5").unwrap();
        assert_eq!(spec.get(DamageType::Slash), 5.0);
        assert_eq!(spec.get(DamageType::Blunt), -2.5);
    }
}
