//! Trauma operations on the world: creation, removal and queries

use crate::core::types::{EntityId, TraumaId};
use crate::ecs::world::AnatomyWorld;
use crate::events::AnatomyEvent;
use crate::trauma::{Trauma, TraumaKind, TraumaTargetType};

impl AnatomyWorld {
    /// Record a trauma on an attached organ.
    ///
    /// Creation is unconditional; duplicates of a kind may coexist. Targets
    /// without an owning body are skipped.
    pub fn add_trauma(
        &mut self,
        target: EntityId,
        kind: TraumaKind,
        inflicter: Option<EntityId>,
        severity: f32,
    ) -> Option<TraumaId> {
        self.add_trauma_with_type(target, kind, kind.default_target_type(), inflicter, severity)
    }

    pub fn add_trauma_with_type(
        &mut self,
        target: EntityId,
        kind: TraumaKind,
        target_type: TraumaTargetType,
        inflicter: Option<EntityId>,
        severity: f32,
    ) -> Option<TraumaId> {
        let owner = self.organs.get(&target)?.owner?;
        let id = self.traumas.add(
            target,
            kind,
            target_type,
            inflicter,
            severity.clamp(0.0, 1.0),
            self.current_tick,
        );
        self.publish(AnatomyEvent::TraumaAdded {
            trauma: id,
            target,
            kind,
            target_type,
        });
        self.mark_dirty(target);
        self.mark_dirty(owner);
        tracing::debug!(?target, ?kind, ?id, "trauma added");
        Some(id)
    }

    /// Remove one trauma. Fails when it is unknown or its target is loose.
    pub fn remove_trauma(&mut self, id: TraumaId) -> bool {
        let Some(target) = self.traumas.get(id).map(|t| t.target) else {
            return false;
        };
        let Some(owner) = self.organs.get(&target).and_then(|o| o.owner) else {
            return false;
        };
        if !self.remove_trauma_record(id) {
            return false;
        }
        self.mark_dirty(owner);
        true
    }

    /// Traumas on a target in creation order, optionally filtered by kind
    pub fn traumas_of(&self, target: EntityId, kind: Option<TraumaKind>) -> Vec<&Trauma> {
        self.traumas.of(target, kind)
    }

    pub fn trauma(&self, id: TraumaId) -> Option<&Trauma> {
        self.traumas.get(id)
    }

    fn remove_trauma_record(&mut self, id: TraumaId) -> bool {
        let Some(trauma) = self.traumas.remove(id) else {
            return false;
        };
        self.publish(AnatomyEvent::TraumaRemoved {
            trauma: id,
            target: trauma.target,
            kind: trauma.kind,
            target_type: trauma.target_type,
        });
        self.mark_dirty(trauma.target);
        true
    }

    /// Remove every trauma on a target matching `pred`; returns the count
    pub(crate) fn clear_traumas(&mut self, target: EntityId, pred: impl Fn(&Trauma) -> bool) -> usize {
        let ids = self.traumas.matching(target, pred);
        ids.into_iter()
            .filter(|id| self.remove_trauma_record(*id))
            .count()
    }
}
