//! Anatomy world - arena of bodies, organs and bones
//!
//! All state for one simulation lives here and is mutated only by the tick
//! that currently runs. Every mutator marks the touched entity dirty for
//! replication.

use ahash::{AHashMap, AHashSet};

use crate::anatomy::body::{Body, BodyKind};
use crate::anatomy::category::OrganCategory;
use crate::anatomy::organ::Organ;
use crate::anatomy::registry::OrganRegistry;
use crate::bone::Bone;
use crate::content::ContentConfig;
use crate::core::types::{BoneId, EntityId, NetId, Tick};
use crate::events::{AnatomyEvent, EventBus};
use crate::trauma::TraumaLedger;

/// The simulation state of the anatomy core
#[derive(Debug)]
pub struct AnatomyWorld {
    pub current_tick: Tick,
    pub(crate) content: ContentConfig,
    pub(crate) bodies: AHashMap<EntityId, Body>,
    pub(crate) organs: AHashMap<EntityId, Organ>,
    pub(crate) bones: AHashMap<BoneId, Bone>,
    pub(crate) registry: OrganRegistry,
    pub(crate) traumas: TraumaLedger,
    pub(crate) bus: EventBus,
    dirty: AHashSet<EntityId>,
    next_entity: u32,
    next_bone: u32,
}

impl AnatomyWorld {
    pub fn new(content: ContentConfig) -> Self {
        Self {
            current_tick: 0,
            content,
            bodies: AHashMap::new(),
            organs: AHashMap::new(),
            bones: AHashMap::new(),
            registry: OrganRegistry::new(),
            traumas: TraumaLedger::new(),
            bus: EventBus::new(),
            dirty: AHashSet::new(),
            next_entity: 0,
            next_bone: 0,
        }
    }

    pub fn content(&self) -> &ContentConfig {
        &self.content
    }

    /// Swap in reloaded content. Stored tiers refresh on their next change.
    pub fn set_content(&mut self, content: ContentConfig) {
        self.content = content;
    }

    pub fn tick(&mut self) {
        self.current_tick += 1;
    }

    fn allocate_entity(&mut self) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        id
    }

    pub fn spawn_body(&mut self, kind: BodyKind) -> EntityId {
        let id = self.allocate_entity();
        self.bodies.insert(id, Body::new(id, kind));
        self.mark_dirty(id);
        id
    }

    /// Spawn a loose organ; attach it with `insert_organ`
    pub fn spawn_organ(&mut self, category: OrganCategory, cap: f32) -> EntityId {
        let id = self.allocate_entity();
        self.organs.insert(id, Organ::new(id, category, cap));
        self.mark_dirty(id);
        id
    }

    /// Give an organ a skeleton. Fails if it already has one.
    pub fn attach_bone(&mut self, organ: EntityId, cap: f32) -> Option<BoneId> {
        let bone_id = BoneId(self.next_bone);
        let organ_rec = self.organs.get_mut(&organ)?;
        if organ_rec.bone.is_some() {
            return None;
        }
        self.next_bone += 1;
        organ_rec.bone = Some(bone_id);
        self.bones.insert(bone_id, Bone::new(bone_id, organ, cap));
        self.mark_dirty(organ);
        Some(bone_id)
    }

    /// Destroy an organ, detaching it first. Destruction cannot be vetoed.
    pub fn destroy_organ(&mut self, organ: EntityId) -> bool {
        let Some(owner) = self.organs.get(&organ).map(|o| o.owner) else {
            return false;
        };
        if let Some(body) = owner {
            self.detach(body, organ);
        }
        self.clear_traumas(organ, |_| true);

        let Some(organ_rec) = self.organs.remove(&organ) else {
            return false;
        };
        if let Some(bone_id) = organ_rec.bone {
            self.bones.remove(&bone_id);
        }
        for child in self.organs.values_mut() {
            if child.parent == Some(organ) {
                child.parent = None;
            }
        }
        self.mark_dirty(organ);
        true
    }

    /// Destroy a creature together with every organ it owns
    pub fn destroy_body(&mut self, body: EntityId) -> bool {
        let Some(slots) = self.bodies.get(&body).map(|b| b.slots.clone()) else {
            return false;
        };
        for organ in slots {
            self.destroy_organ(organ);
        }
        self.registry.clear_body(body);
        self.bodies.remove(&body);
        self.mark_dirty(body);
        tracing::debug!(?body, "destroyed body");
        true
    }

    pub fn body(&self, id: EntityId) -> Option<&Body> {
        self.bodies.get(&id)
    }

    pub fn organ(&self, id: EntityId) -> Option<&Organ> {
        self.organs.get(&id)
    }

    pub fn bone(&self, id: BoneId) -> Option<&Bone> {
        self.bones.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.bodies.contains_key(&id) || self.organs.contains_key(&id)
    }

    /// Does damage to this entity route through parts?
    pub fn is_complex(&self, id: EntityId) -> bool {
        self.bodies.get(&id).map_or(false, |b| b.is_complex())
    }

    pub fn net_id(&self, id: EntityId) -> Option<NetId> {
        self.bodies
            .get(&id)
            .map(|b| b.net_id)
            .or_else(|| self.organs.get(&id).map(|o| o.net_id))
    }

    /// Pin the stable network id, e.g. when restoring replicated state
    pub fn set_net_id(&mut self, id: EntityId, net_id: NetId) -> bool {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.net_id = net_id;
        } else if let Some(organ) = self.organs.get_mut(&id) {
            organ.net_id = net_id;
        } else {
            return false;
        }
        self.mark_dirty(id);
        true
    }

    /// Organs in a body's slots whose back-reference agrees, in slot order
    pub fn attached_organs(&self, body: EntityId) -> Vec<EntityId> {
        let Some(body_rec) = self.bodies.get(&body) else {
            return Vec::new();
        };
        body_rec
            .slots
            .iter()
            .copied()
            .filter(|organ| match self.organs.get(organ) {
                Some(rec) if rec.owner == Some(body) => true,
                _ => {
                    tracing::error!(?body, ?organ, "body slot without matching organ back-reference");
                    false
                }
            })
            .collect()
    }

    /// Bones of every attached organ, in slot order
    pub fn bones_of(&self, body: EntityId) -> Vec<(EntityId, &Bone)> {
        self.attached_organs(body)
            .into_iter()
            .filter_map(|organ| {
                let bone_id = self.organs.get(&organ)?.bone?;
                self.bones.get(&bone_id).map(|bone| (organ, bone))
            })
            .collect()
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Register listeners and hooks
    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    pub(crate) fn publish(&mut self, event: AnatomyEvent) {
        self.bus.publish(event);
    }

    pub fn drain_events(&mut self) -> Vec<AnatomyEvent> {
        self.bus.drain()
    }

    pub fn mark_dirty(&mut self, id: EntityId) {
        self.dirty.insert(id);
    }

    pub fn is_dirty(&self, id: EntityId) -> bool {
        self.dirty.contains(&id)
    }

    /// Entities needing replication, sorted by id
    pub fn take_dirty(&mut self) -> Vec<EntityId> {
        let mut dirty: Vec<EntityId> = self.dirty.drain().collect();
        dirty.sort();
        dirty
    }
}

impl Default for AnatomyWorld {
    fn default() -> Self {
        Self::new(ContentConfig::default())
    }
}
