//! Organ registry: (body, category) index and the insert/remove contract
//!
//! The index is a pure derived view of the organ back-references. It is
//! rewritten inside the same call that mutates ownership, never lazily.

use crate::anatomy::category::OrganCategory;
use crate::core::types::EntityId;
use crate::damage::specifier::DamageSpecifier;
use crate::ecs::world::AnatomyWorld;
use crate::events::{AnatomyEvent, OrganAttempt};
use crate::trauma::TraumaKind;
use ahash::AHashMap;

/// Slot index keyed by body and category
#[derive(Debug, Clone, Default)]
pub struct OrganRegistry {
    index: AHashMap<(EntityId, OrganCategory), EntityId>,
}

impl OrganRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, body: EntityId, category: OrganCategory) -> Option<EntityId> {
        self.index.get(&(body, category)).copied()
    }

    pub(crate) fn set(&mut self, body: EntityId, category: OrganCategory, organ: EntityId) {
        self.index.insert((body, category), organ);
    }

    pub(crate) fn unset(&mut self, body: EntityId, category: OrganCategory) {
        self.index.remove(&(body, category));
    }

    pub(crate) fn clear_body(&mut self, body: EntityId) {
        self.index.retain(|(owner, _), _| *owner != body);
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl AnatomyWorld {
    /// Organ occupying a category slot of a body
    pub fn get_organ(&self, body: EntityId, category: OrganCategory) -> Option<EntityId> {
        let organ = self.registry.get(body, category)?;
        match self.organs.get(&organ) {
            Some(rec) if rec.owner == Some(body) && rec.category == category => Some(organ),
            _ => {
                tracing::error!(?body, ?category, ?organ, "organ index entry without matching back-reference");
                None
            }
        }
    }

    /// Organs whose parent part is `organ`
    pub fn children_of(&self, organ: EntityId) -> Vec<EntityId> {
        let Some(owner) = self.organs.get(&organ).and_then(|o| o.owner) else {
            return Vec::new();
        };
        self.attached_organs(owner)
            .into_iter()
            .filter(|child| self.organs.get(child).and_then(|c| c.parent) == Some(organ))
            .collect()
    }

    fn insert_vetoed(&mut self, body: EntityId, organ: EntityId, category: OrganCategory) -> bool {
        let mut attempt = OrganAttempt {
            body,
            organ,
            category,
            cancelled: false,
        };
        self.bus.run_insert_attempt(&mut attempt)
    }

    fn remove_vetoed(&mut self, body: EntityId, organ: EntityId, category: OrganCategory) -> bool {
        let mut attempt = OrganAttempt {
            body,
            organ,
            category,
            cancelled: false,
        };
        self.bus.run_remove_attempt(&mut attempt)
    }

    /// Attach a loose organ to a body slot.
    ///
    /// Fails without mutation when the organ is owned, the slot is taken or
    /// a listener vetoes the insertion.
    pub fn insert_organ(&mut self, body: EntityId, organ: EntityId) -> bool {
        if !self.bodies.contains_key(&body) {
            return false;
        }
        let Some(organ_rec) = self.organs.get(&organ) else {
            return false;
        };
        if organ_rec.owner.is_some() {
            return false;
        }
        let category = organ_rec.category;
        if self.get_organ(body, category).is_some() {
            return false;
        }
        if self.insert_vetoed(body, organ, category) {
            tracing::debug!(?body, ?organ, ?category, "organ insertion vetoed");
            return false;
        }
        self.attach(body, organ);
        true
    }

    fn attach(&mut self, body: EntityId, organ: EntityId) {
        let Some(category) = self.organs.get(&organ).map(|o| o.category) else {
            return;
        };
        let parent = category
            .parent_category()
            .and_then(|parent| self.get_organ(body, parent));

        let Some(organ_rec) = self.organs.get_mut(&organ) else {
            return;
        };
        organ_rec.owner = Some(body);
        organ_rec.parent = parent;
        organ_rec.enabled = true;
        let damage = organ_rec.damage.clone();

        if let Some(body_rec) = self.bodies.get_mut(&body) {
            body_rec.slots.push(organ);
            body_rec.damage += &damage;
        }
        self.registry.set(body, category, organ);

        // Children inserted before their parent part pick it up now
        let orphans: Vec<EntityId> = self
            .attached_organs(body)
            .into_iter()
            .filter(|child| {
                self.organs.get(child).map_or(false, |c| {
                    c.parent.is_none() && c.category.parent_category() == Some(category)
                })
            })
            .collect();
        for child in orphans {
            if let Some(child_rec) = self.organs.get_mut(&child) {
                child_rec.parent = Some(organ);
            }
        }

        self.publish(AnatomyEvent::OrganInserted {
            body,
            organ,
            category,
        });
        self.mark_dirty(body);
        self.mark_dirty(organ);
        self.refresh_broken_bone_alert(body);
    }

    /// Detach an organ and everything it contains.
    ///
    /// Succeeds without effect when the organ is not in the body. A veto on
    /// the organ itself aborts the whole removal.
    pub fn remove_organ(&mut self, body: EntityId, organ: EntityId) -> bool {
        let Some(organ_rec) = self.organs.get(&organ) else {
            return true;
        };
        if organ_rec.owner != Some(body) {
            return true;
        }
        let category = organ_rec.category;
        if self.remove_vetoed(body, organ, category) {
            tracing::debug!(?body, ?organ, ?category, "organ removal vetoed");
            return false;
        }
        self.detach(body, organ);
        true
    }

    /// Unconditional detach used by removal, severing and destruction
    pub(crate) fn detach(&mut self, body: EntityId, organ: EntityId) {
        for child in self.children_of(organ) {
            self.detach(body, child);
        }
        self.detach_single(body, organ);
    }

    /// Detach one organ, leaving the parts it contains in the body
    fn detach_single(&mut self, body: EntityId, organ: EntityId) {
        let Some(organ_rec) = self.organs.get_mut(&organ) else {
            return;
        };
        let category = organ_rec.category;
        organ_rec.owner = None;
        organ_rec.enabled = false;

        self.registry.unset(body, category);
        if let Some(body_rec) = self.bodies.get_mut(&body) {
            body_rec.slots.retain(|slot| *slot != organ);
            body_rec.pain.clear_group(category);
        }
        self.rebuild_body_damage(body);
        self.clear_traumas(organ, |_| true);

        self.publish(AnatomyEvent::OrganRemoved {
            body,
            organ,
            category,
        });
        self.mark_dirty(body);
        self.mark_dirty(organ);
        self.refresh_broken_bone_alert(body);
    }

    /// Swap the occupant of the organ's category slot for `organ`.
    ///
    /// Both vetoes are consulted before anything moves. Only the occupant
    /// leaves; the parts it contained stay attached under `organ`.
    pub fn replace_organ(&mut self, body: EntityId, organ: EntityId) -> bool {
        if !self.bodies.contains_key(&body) {
            return false;
        }
        let Some(organ_rec) = self.organs.get(&organ) else {
            return false;
        };
        if organ_rec.owner.is_some() {
            return false;
        }
        let category = organ_rec.category;
        let occupant = self.get_organ(body, category);

        if let Some(old) = occupant {
            if self.remove_vetoed(body, old, category) {
                return false;
            }
        }
        if self.insert_vetoed(body, organ, category) {
            return false;
        }

        let mut children = Vec::new();
        if let Some(old) = occupant {
            children = self.children_of(old);
            self.detach_single(body, old);
        }
        self.attach(body, organ);
        for child in children {
            if let Some(child_rec) = self.organs.get_mut(&child) {
                child_rec.parent = Some(organ);
            }
            self.mark_dirty(child);
        }
        tracing::debug!(?body, ?organ, ?category, replaced = ?occupant, "organ replaced");
        true
    }

    /// Recompute a complex body's total from its attached parts
    pub(crate) fn rebuild_body_damage(&mut self, body: EntityId) {
        let is_complex = self.bodies.get(&body).map_or(false, |b| b.is_complex());
        if !is_complex {
            return;
        }
        let mut total = DamageSpecifier::new();
        for organ in self.attached_organs(body) {
            if let Some(rec) = self.organs.get(&organ) {
                total += &rec.damage;
            }
        }
        if let Some(body_rec) = self.bodies.get_mut(&body) {
            body_rec.damage = total.trimmed();
        }
    }

    /// Sever an external part from its body, leaving a stump trauma on the parent
    pub(crate) fn sever(&mut self, body: EntityId, organ: EntityId, inflicter: Option<EntityId>) -> bool {
        let Some((category, parent)) = self.organs.get(&organ).map(|o| (o.category, o.parent)) else {
            return false;
        };
        if category.parent_category().is_none() || category.is_internal() {
            return false;
        }
        if !self.remove_organ(body, organ) {
            return false;
        }

        if let Some(parent) = parent {
            let severity = self
                .organs
                .get(&parent)
                .map_or(0.0, |p| p.integrity.consumed_fraction());
            self.add_trauma(parent, TraumaKind::Dismemberment, inflicter, severity);
        }
        self.publish(AnatomyEvent::PartSevered {
            body,
            organ,
            category,
        });
        self.publish(AnatomyEvent::Popup {
            recipient: body,
            key: "part-severed".into(),
            category: Some(category),
        });
        tracing::debug!(?body, ?organ, ?category, "part severed");
        true
    }
}
