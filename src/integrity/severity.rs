//! Threshold tables mapping consumed integrity to a severity tier

use serde::{Deserialize, Deserializer};

/// One row of a severity table
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct SeverityThreshold<T> {
    pub tier: T,
    /// Minimum consumed fraction (damage / cap) for this tier
    pub min_fraction: f32,
}

impl<T> SeverityThreshold<T> {
    pub fn new(tier: T, min_fraction: f32) -> Self {
        Self { tier, min_fraction }
    }
}

/// Step function from consumed fraction to tier.
///
/// Rows are kept sorted highest-fraction-first; the first row whose minimum
/// is reached wins and the default tier is `T::default()`.
#[derive(Debug, Clone, PartialEq)]
pub struct SeverityTable<T> {
    thresholds: Vec<SeverityThreshold<T>>,
}

impl<T: Copy + Default> SeverityTable<T> {
    pub fn new(mut thresholds: Vec<SeverityThreshold<T>>) -> Self {
        thresholds.sort_by(|a, b| b.min_fraction.total_cmp(&a.min_fraction));
        Self { thresholds }
    }

    pub fn tier_for(&self, consumed_fraction: f32) -> T {
        self.thresholds
            .iter()
            .find(|row| consumed_fraction >= row.min_fraction)
            .map(|row| row.tier)
            .unwrap_or_default()
    }

    pub fn thresholds(&self) -> &[SeverityThreshold<T>] {
        &self.thresholds
    }
}

impl<T: Copy + Default + Ord + std::fmt::Debug> SeverityTable<T> {
    /// Fractions must lie in (0, 1] and worse tiers need more damage
    pub fn validate(&self) -> Result<(), String> {
        for row in &self.thresholds {
            if !(row.min_fraction > 0.0 && row.min_fraction <= 1.0) {
                return Err(format!(
                    "threshold for {:?} ({}) must be within (0, 1]",
                    row.tier, row.min_fraction
                ));
            }
            if row.tier == T::default() {
                return Err(format!("intact tier {:?} cannot have a threshold", row.tier));
            }
        }
        for pair in self.thresholds.windows(2) {
            if pair[0].tier <= pair[1].tier {
                return Err(format!(
                    "tier {:?} at {} must be worse than {:?} at {}",
                    pair[0].tier, pair[0].min_fraction, pair[1].tier, pair[1].min_fraction
                ));
            }
        }
        Ok(())
    }
}

impl<'de, T> Deserialize<'de> for SeverityTable<T>
where
    T: Deserialize<'de> + Copy + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<SeverityThreshold<T>>::deserialize(deserializer).map(Self::new)
    }
}
