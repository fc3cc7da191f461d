//! Synchronous event bus keyed by (entity, event kind)

use crate::core::types::EntityId;
use crate::events::{AnatomyEvent, DamageAttempt, DamageModify, EventKind, OrganAttempt};
use std::fmt;

type Listener = Box<dyn FnMut(&AnatomyEvent)>;
type Hook<P> = Box<dyn FnMut(&mut P)>;

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u32);

struct Subscription {
    id: SubscriptionId,
    entity: Option<EntityId>,
    kind: Option<EventKind>,
    listener: Listener,
}

struct HookEntry<P> {
    entity: Option<EntityId>,
    hook: Hook<P>,
}

/// Dispatches events to listeners and keeps an outbound queue for draining
#[derive(Default)]
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    before_damage: Vec<HookEntry<DamageAttempt>>,
    damage_modify: Vec<HookEntry<DamageModify>>,
    insert_attempt: Vec<HookEntry<OrganAttempt>>,
    remove_attempt: Vec<HookEntry<OrganAttempt>>,
    queue: Vec<AnatomyEvent>,
    next_id: u32,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen for events, optionally narrowed to one entity and/or one kind
    pub fn subscribe(
        &mut self,
        entity: Option<EntityId>,
        kind: Option<EventKind>,
        listener: impl FnMut(&AnatomyEvent) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            entity,
            kind,
            listener: Box::new(listener),
        });
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    pub fn on_before_damage(
        &mut self,
        entity: Option<EntityId>,
        hook: impl FnMut(&mut DamageAttempt) + 'static,
    ) {
        self.before_damage.push(HookEntry {
            entity,
            hook: Box::new(hook),
        });
    }

    pub fn on_damage_modify(
        &mut self,
        entity: Option<EntityId>,
        hook: impl FnMut(&mut DamageModify) + 'static,
    ) {
        self.damage_modify.push(HookEntry {
            entity,
            hook: Box::new(hook),
        });
    }

    /// Hook keyed by body
    pub fn on_insert_attempt(
        &mut self,
        body: Option<EntityId>,
        hook: impl FnMut(&mut OrganAttempt) + 'static,
    ) {
        self.insert_attempt.push(HookEntry {
            entity: body,
            hook: Box::new(hook),
        });
    }

    /// Hook keyed by body
    pub fn on_remove_attempt(
        &mut self,
        body: Option<EntityId>,
        hook: impl FnMut(&mut OrganAttempt) + 'static,
    ) {
        self.remove_attempt.push(HookEntry {
            entity: body,
            hook: Box::new(hook),
        });
    }

    /// Deliver to matching listeners, then queue for draining
    pub fn publish(&mut self, event: AnatomyEvent) {
        let entity = event.entity();
        let kind = event.kind();
        for sub in self.subscriptions.iter_mut() {
            let entity_match = sub.entity.map_or(true, |e| e == entity);
            let kind_match = sub.kind.map_or(true, |k| k == kind);
            if entity_match && kind_match {
                (sub.listener)(&event);
            }
        }
        self.queue.push(event);
    }

    /// Returns true when a hook cancelled the damage
    pub fn run_before_damage(&mut self, attempt: &mut DamageAttempt) -> bool {
        let target = attempt.target;
        run_hooks(&mut self.before_damage, target, attempt, |a| a.cancelled)
    }

    /// Returns true when a hook cancelled the damage
    pub fn run_damage_modify(&mut self, modify: &mut DamageModify) -> bool {
        let target = modify.target;
        run_hooks(&mut self.damage_modify, target, modify, |m| m.cancelled)
    }

    /// Returns true when a hook vetoed the insertion
    pub fn run_insert_attempt(&mut self, attempt: &mut OrganAttempt) -> bool {
        let body = attempt.body;
        run_hooks(&mut self.insert_attempt, body, attempt, |a| a.cancelled)
    }

    /// Returns true when a hook vetoed the removal
    pub fn run_remove_attempt(&mut self, attempt: &mut OrganAttempt) -> bool {
        let body = attempt.body;
        run_hooks(&mut self.remove_attempt, body, attempt, |a| a.cancelled)
    }

    /// Take every queued event
    pub fn drain(&mut self) -> Vec<AnatomyEvent> {
        std::mem::take(&mut self.queue)
    }

    pub fn queued(&self) -> &[AnatomyEvent] {
        &self.queue
    }
}

fn run_hooks<P>(
    hooks: &mut [HookEntry<P>],
    entity: EntityId,
    payload: &mut P,
    cancelled: impl Fn(&P) -> bool,
) -> bool {
    for entry in hooks.iter_mut() {
        if entry.entity.map_or(true, |e| e == entity) {
            (entry.hook)(payload);
            if cancelled(payload) {
                return true;
            }
        }
    }
    false
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .field("before_damage", &self.before_damage.len())
            .field("damage_modify", &self.damage_modify.len())
            .field("insert_attempt", &self.insert_attempt.len())
            .field("remove_attempt", &self.remove_attempt.len())
            .field("queued", &self.queue.len())
            .finish()
    }
}
