//! Outbound notifications and cancellable hooks
//!
//! Notifications are delivered synchronously, in registration order, within
//! the call that caused them. Hooks carry a `cancelled` flag; the first
//! listener to set it stops the remaining listeners.

pub mod bus;

pub use bus::{EventBus, SubscriptionId};

use crate::anatomy::category::{OrganCategory, WoundSeverity};
use crate::bone::BoneSeverity;
use crate::core::types::{BoneId, EntityId, TraumaId};
use crate::damage::specifier::DamageSpecifier;
use crate::trauma::{TraumaKind, TraumaTargetType};
use serde::Serialize;

/// Events emitted by the anatomy core
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AnatomyEvent {
    IntegrityChanged {
        organ: EntityId,
        old: f32,
        new: f32,
    },
    SeverityChanged {
        organ: EntityId,
        old: WoundSeverity,
        new: WoundSeverity,
    },
    BoneIntegrityChanged {
        bone: BoneId,
        organ: EntityId,
        old: f32,
        new: f32,
    },
    BoneSeverityChanged {
        bone: BoneId,
        organ: EntityId,
        old: BoneSeverity,
        new: BoneSeverity,
    },
    /// Realized (post-modifier, post-cap) delta on a part or a body
    DamageChanged {
        entity: EntityId,
        delta: DamageSpecifier,
        origin: Option<EntityId>,
        interrupts_do_after: bool,
    },
    TraumaAdded {
        trauma: TraumaId,
        target: EntityId,
        kind: TraumaKind,
        target_type: TraumaTargetType,
    },
    TraumaRemoved {
        trauma: TraumaId,
        target: EntityId,
        kind: TraumaKind,
        target_type: TraumaTargetType,
    },
    OrganInserted {
        body: EntityId,
        organ: EntityId,
        category: OrganCategory,
    },
    OrganRemoved {
        body: EntityId,
        organ: EntityId,
        category: OrganCategory,
    },
    PartSevered {
        body: EntityId,
        organ: EntityId,
        category: OrganCategory,
    },
    /// Narrated notice for the creature; `key` is a localization key
    Popup {
        recipient: EntityId,
        key: String,
        category: Option<OrganCategory>,
    },
    SoundCue {
        source: EntityId,
        sound: String,
        volume: f32,
    },
    BrokenBoneAlert {
        body: EntityId,
        active: bool,
    },
}

/// Discriminant used to filter subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    IntegrityChanged,
    SeverityChanged,
    BoneIntegrityChanged,
    BoneSeverityChanged,
    DamageChanged,
    TraumaAdded,
    TraumaRemoved,
    OrganInserted,
    OrganRemoved,
    PartSevered,
    Popup,
    SoundCue,
    BrokenBoneAlert,
}

impl AnatomyEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::IntegrityChanged { .. } => EventKind::IntegrityChanged,
            Self::SeverityChanged { .. } => EventKind::SeverityChanged,
            Self::BoneIntegrityChanged { .. } => EventKind::BoneIntegrityChanged,
            Self::BoneSeverityChanged { .. } => EventKind::BoneSeverityChanged,
            Self::DamageChanged { .. } => EventKind::DamageChanged,
            Self::TraumaAdded { .. } => EventKind::TraumaAdded,
            Self::TraumaRemoved { .. } => EventKind::TraumaRemoved,
            Self::OrganInserted { .. } => EventKind::OrganInserted,
            Self::OrganRemoved { .. } => EventKind::OrganRemoved,
            Self::PartSevered { .. } => EventKind::PartSevered,
            Self::Popup { .. } => EventKind::Popup,
            Self::SoundCue { .. } => EventKind::SoundCue,
            Self::BrokenBoneAlert { .. } => EventKind::BrokenBoneAlert,
        }
    }

    /// The entity this event is raised on
    pub fn entity(&self) -> EntityId {
        match self {
            Self::IntegrityChanged { organ, .. }
            | Self::SeverityChanged { organ, .. }
            | Self::BoneIntegrityChanged { organ, .. }
            | Self::BoneSeverityChanged { organ, .. } => *organ,
            Self::DamageChanged { entity, .. } => *entity,
            Self::TraumaAdded { target, .. } | Self::TraumaRemoved { target, .. } => *target,
            Self::OrganInserted { body, .. }
            | Self::OrganRemoved { body, .. }
            | Self::PartSevered { body, .. }
            | Self::BrokenBoneAlert { body, .. } => *body,
            Self::Popup { recipient, .. } => *recipient,
            Self::SoundCue { source, .. } => *source,
        }
    }
}

/// "Before damage" hook payload
#[derive(Debug, Clone)]
pub struct DamageAttempt {
    pub target: EntityId,
    pub damage: DamageSpecifier,
    pub origin: Option<EntityId>,
    pub cancelled: bool,
}

/// "Damage modify" hook payload; listeners may rewrite `damage`
#[derive(Debug, Clone)]
pub struct DamageModify {
    pub target: EntityId,
    pub damage: DamageSpecifier,
    pub origin: Option<EntityId>,
    pub cancelled: bool,
}

/// Insert/remove attempt hook payload
#[derive(Debug, Clone)]
pub struct OrganAttempt {
    pub body: EntityId,
    pub organ: EntityId,
    pub category: OrganCategory,
    pub cancelled: bool,
}
