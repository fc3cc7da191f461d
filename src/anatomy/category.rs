//! Anatomical categories and wound severity tiers
//!
//! A category is the stable slot identifier used for lookup, never a
//! free-form name. External parts can be hit; internal organs sit inside a
//! host part's cavity.

use serde::{Deserialize, Serialize};

/// Wound severity of an organ, derived from consumed integrity
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum WoundSeverity {
    /// Intact
    #[default]
    Healthy,
    /// Cosmetic only
    Minor,
    /// Painful but functional
    Moderate,
    /// Impaired function
    Severe,
    /// Barely holding together
    Critical,
    /// Integrity exhausted
    Loss,
}

impl WoundSeverity {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Minor => "minor",
            Self::Moderate => "moderate",
            Self::Severe => "severe",
            Self::Critical => "critical",
            Self::Loss => "loss",
        }
    }
}

/// Anatomical slot identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OrganCategory {
    Head,
    Torso,
    ArmLeft,
    ArmRight,
    HandLeft,
    HandRight,
    LegLeft,
    LegRight,
    FootLeft,
    FootRight,
    Brain,
    Eyes,
    Heart,
    Lungs,
    Stomach,
    Liver,
    Kidneys,
}

impl OrganCategory {
    /// External body parts (hit locations)
    pub fn external() -> [OrganCategory; 10] {
        [
            OrganCategory::Head,
            OrganCategory::Torso,
            OrganCategory::ArmLeft,
            OrganCategory::ArmRight,
            OrganCategory::HandLeft,
            OrganCategory::HandRight,
            OrganCategory::LegLeft,
            OrganCategory::LegRight,
            OrganCategory::FootLeft,
            OrganCategory::FootRight,
        ]
    }

    /// Organs living inside a part's cavity
    pub fn internal() -> [OrganCategory; 7] {
        [
            OrganCategory::Brain,
            OrganCategory::Eyes,
            OrganCategory::Heart,
            OrganCategory::Lungs,
            OrganCategory::Stomach,
            OrganCategory::Liver,
            OrganCategory::Kidneys,
        ]
    }

    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            OrganCategory::Brain
                | OrganCategory::Eyes
                | OrganCategory::Heart
                | OrganCategory::Lungs
                | OrganCategory::Stomach
                | OrganCategory::Liver
                | OrganCategory::Kidneys
        )
    }

    /// The part that contains this one. Torso is the root.
    pub fn parent_category(&self) -> Option<OrganCategory> {
        use OrganCategory::*;
        match self {
            Torso => None,
            Head | ArmLeft | ArmRight | LegLeft | LegRight => Some(Torso),
            HandLeft => Some(ArmLeft),
            HandRight => Some(ArmRight),
            FootLeft => Some(LegLeft),
            FootRight => Some(LegRight),
            Brain | Eyes => Some(Head),
            Heart | Lungs | Stomach | Liver | Kidneys => Some(Torso),
        }
    }

    /// Relative probability of being hit when standing (external parts sum to 1.0)
    pub fn hit_weight(&self) -> f32 {
        use OrganCategory::*;
        match self {
            Torso => 0.38,
            ArmLeft | ArmRight => 0.10,
            LegLeft | LegRight => 0.12,
            Head => 0.08,
            HandLeft | HandRight => 0.03,
            FootLeft | FootRight => 0.02,
            _ => 0.0,
        }
    }

    /// Is this a leg zone?
    pub fn is_leg(&self) -> bool {
        matches!(
            self,
            OrganCategory::LegLeft
                | OrganCategory::LegRight
                | OrganCategory::FootLeft
                | OrganCategory::FootRight
        )
    }

    /// Is this an arm zone?
    pub fn is_arm(&self) -> bool {
        matches!(self, OrganCategory::ArmLeft | OrganCategory::ArmRight)
    }

    /// Is this a hand zone?
    pub fn is_hand(&self) -> bool {
        matches!(self, OrganCategory::HandLeft | OrganCategory::HandRight)
    }

    /// Parts used to swing or aim a weapon
    pub fn is_upper_limb(&self) -> bool {
        self.is_arm() || self.is_hand()
    }

    pub fn display_name(&self) -> &'static str {
        use OrganCategory::*;
        match self {
            Head => "head",
            Torso => "torso",
            ArmLeft => "left arm",
            ArmRight => "right arm",
            HandLeft => "left hand",
            HandRight => "right hand",
            LegLeft => "left leg",
            LegRight => "right leg",
            FootLeft => "left foot",
            FootRight => "right foot",
            Brain => "brain",
            Eyes => "eyes",
            Heart => "heart",
            Lungs => "lungs",
            Stomach => "stomach",
            Liver => "liver",
            Kidneys => "kidneys",
        }
    }
}
