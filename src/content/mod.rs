//! Content configuration: externally authored data consumed read-only
//!
//! Severity thresholds, bone tier effects, pain coefficients and body
//! templates all come from TOML; the engine hard-codes none of them.

pub mod loader;
pub mod template;

pub use loader::{load_content, Content};
pub use template::{BodyTemplate, PartTemplate};

use crate::anatomy::category::WoundSeverity;
use crate::anatomy::pain::PainConfig;
use crate::bone::BoneConfig;
use crate::integrity::{SeverityTable, SeverityThreshold};
use serde::Deserialize;

/// Anatomy tunables shared by every body in a world
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Wound severity by consumed fraction of an organ's cap
    pub organ_severity: SeverityTable<WoundSeverity>,
    pub bones: BoneConfig,
    pub pain: PainConfig,
    /// Sever external parts whose wound severity reaches `Loss`
    pub sever_on_loss: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            organ_severity: SeverityTable::new(vec![
                SeverityThreshold::new(WoundSeverity::Minor, 0.05),
                SeverityThreshold::new(WoundSeverity::Moderate, 0.25),
                SeverityThreshold::new(WoundSeverity::Severe, 0.5),
                SeverityThreshold::new(WoundSeverity::Critical, 0.8),
                SeverityThreshold::new(WoundSeverity::Loss, 1.0),
            ]),
            bones: BoneConfig::default(),
            pain: PainConfig::default(),
            sever_on_loss: false,
        }
    }
}

impl ContentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<(), String> {
        self.organ_severity.validate()?;
        self.bones.validate()?;
        if self.pain.per_damage < 0.0 || self.pain.bleed_per_damage < 0.0 {
            return Err("pain coefficients must be non-negative".into());
        }
        Ok(())
    }
}
