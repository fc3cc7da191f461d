//! Storage for trauma records, indexed by target

use crate::core::types::{EntityId, Tick, TraumaId};
use crate::trauma::{Trauma, TraumaKind, TraumaTargetType};
use ahash::AHashMap;

/// All live traumas. Duplicates of one kind may coexist on a target.
#[derive(Debug, Clone, Default)]
pub struct TraumaLedger {
    records: AHashMap<TraumaId, Trauma>,
    by_target: AHashMap<EntityId, Vec<TraumaId>>,
    next_id: u32,
}

impl TraumaLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        target: EntityId,
        kind: TraumaKind,
        target_type: TraumaTargetType,
        inflicter: Option<EntityId>,
        severity: f32,
        tick: Tick,
    ) -> TraumaId {
        let id = TraumaId(self.next_id);
        self.next_id += 1;

        self.records.insert(
            id,
            Trauma {
                id,
                target,
                kind,
                target_type,
                inflicter,
                severity,
                created_tick: tick,
            },
        );
        self.by_target.entry(target).or_default().push(id);
        id
    }

    pub fn remove(&mut self, id: TraumaId) -> Option<Trauma> {
        let trauma = self.records.remove(&id)?;
        if let Some(ids) = self.by_target.get_mut(&trauma.target) {
            ids.retain(|t| *t != id);
            if ids.is_empty() {
                self.by_target.remove(&trauma.target);
            }
        }
        Some(trauma)
    }

    pub fn get(&self, id: TraumaId) -> Option<&Trauma> {
        self.records.get(&id)
    }

    /// Traumas on a target in creation order, optionally filtered by kind
    pub fn of(&self, target: EntityId, kind: Option<TraumaKind>) -> Vec<&Trauma> {
        self.by_target
            .get(&target)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.records.get(id))
                    .filter(|t| kind.map_or(true, |k| t.kind == k))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn has(&self, target: EntityId, kind: TraumaKind) -> bool {
        self.by_target.get(&target).map_or(false, |ids| {
            ids.iter()
                .filter_map(|id| self.records.get(id))
                .any(|t| t.kind == kind)
        })
    }

    /// Ids on a target matching a predicate, in creation order
    pub fn matching(&self, target: EntityId, pred: impl Fn(&Trauma) -> bool) -> Vec<TraumaId> {
        self.of(target, None)
            .into_iter()
            .filter(|t| pred(t))
            .map(|t| t.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicates_coexist() {
        let mut ledger = TraumaLedger::new();
        let target = EntityId(3);
        let a = ledger.add(target, TraumaKind::BoneDamage, TraumaTargetType::Bone, None, 0.3, 1);
        let b = ledger.add(target, TraumaKind::BoneDamage, TraumaTargetType::Bone, None, 0.6, 2);
        assert_ne!(a, b);
        assert_eq!(ledger.of(target, Some(TraumaKind::BoneDamage)).len(), 2);
    }

    #[test]
    fn test_filter_by_kind_and_order() {
        let mut ledger = TraumaLedger::new();
        let target = EntityId(3);
        ledger.add(target, TraumaKind::OrganDamage, TraumaTargetType::Organ, None, 0.1, 1);
        ledger.add(target, TraumaKind::BoneDamage, TraumaTargetType::Bone, None, 0.2, 2);
        ledger.add(target, TraumaKind::NerveDamage, TraumaTargetType::Organ, None, 0.3, 3);

        let all: Vec<TraumaKind> = ledger.of(target, None).iter().map(|t| t.kind).collect();
        assert_eq!(
            all,
            vec![TraumaKind::OrganDamage, TraumaKind::BoneDamage, TraumaKind::NerveDamage]
        );
        assert_eq!(ledger.of(target, Some(TraumaKind::BoneDamage)).len(), 1);
        assert!(ledger.has(target, TraumaKind::NerveDamage));
        assert!(!ledger.has(target, TraumaKind::Dismemberment));
    }

    #[test]
    fn test_remove_cleans_index() {
        let mut ledger = TraumaLedger::new();
        let target = EntityId(5);
        let id = ledger.add(target, TraumaKind::BoneDamage, TraumaTargetType::Bone, None, 0.5, 0);
        assert!(ledger.remove(id).is_some());
        assert!(ledger.remove(id).is_none());
        assert!(ledger.of(target, None).is_empty());
        assert!(ledger.is_empty());
    }
}
