//! Damage router: single entry point for every damage and heal event

use crate::anatomy::category::OrganCategory;
use crate::core::config::DamageConfig;
use crate::core::error::{AnatomyError, Result};
use crate::core::types::{roll_seed, EntityId};
use crate::damage::apply::apply_capped;
use crate::damage::specifier::DamageSpecifier;
use crate::ecs::world::AnatomyWorld;
use crate::events::{AnatomyEvent, DamageAttempt, DamageModify};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// How untargeted damage spreads over a complex body
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SplitDamageBehavior {
    /// One external part, drawn by hit weight
    None,
    /// Evenly across enabled external parts
    #[default]
    Split,
    /// Evenly across enabled organic external parts
    SplitEnsureAllOrganic,
    /// Healing spreads over damaged parts; harm behaves as `Split`
    SplitEnsureAllDamaged,
}

/// Per-call routing options
#[derive(Debug, Clone, PartialEq)]
pub struct DamageOptions {
    pub ignore_resistances: bool,
    pub interrupts_do_after: bool,
    pub origin: Option<EntityId>,
    /// Called shot
    pub target_part: Option<OrganCategory>,
    pub split: SplitDamageBehavior,
    /// Called shots may land on another part
    pub can_miss: bool,
    /// 0 = full resistance, 1 = resistance ignored
    pub armor_penetration: f32,
}

impl Default for DamageOptions {
    fn default() -> Self {
        Self {
            ignore_resistances: false,
            interrupts_do_after: true,
            origin: None,
            target_part: None,
            split: SplitDamageBehavior::default(),
            can_miss: false,
            armor_penetration: 0.0,
        }
    }
}

impl DamageOptions {
    pub fn targeted(category: OrganCategory) -> Self {
        Self {
            target_part: Some(category),
            ..Default::default()
        }
    }

    pub fn with_origin(mut self, origin: EntityId) -> Self {
        self.origin = Some(origin);
        self
    }
}

/// Routes damage to entities and parts. Owns the damage tunables.
#[derive(Debug, Clone, Default)]
pub struct DamageRouter {
    config: DamageConfig,
}

impl DamageRouter {
    pub fn new(config: DamageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DamageConfig {
        &self.config
    }

    /// Swap in new tunables. Invalid configs are rejected and the old one kept.
    pub fn reload(&mut self, config: DamageConfig) -> Result<()> {
        config.validate().map_err(AnatomyError::InvalidConfig)?;
        tracing::info!(
            damage_multiplier = config.all_damage_multiplier,
            healing_multiplier = config.all_healing_multiplier,
            modifier_sets = config.modifier_sets.len(),
            "damage config reloaded"
        );
        self.config = config;
        Ok(())
    }

    /// Apply a damage specifier to an entity and return the realized delta.
    ///
    /// Positive entries harm, negative entries heal. Complex bodies route
    /// through their parts; everything else takes the damage directly.
    pub fn apply_damage(
        &self,
        world: &mut AnatomyWorld,
        target: EntityId,
        damage: &DamageSpecifier,
        options: &DamageOptions,
    ) -> DamageSpecifier {
        self.apply_to_entity(world, target, damage, options, false)
    }

    fn apply_to_entity(
        &self,
        world: &mut AnatomyWorld,
        target: EntityId,
        damage: &DamageSpecifier,
        options: &DamageOptions,
        via_body: bool,
    ) -> DamageSpecifier {
        if damage.is_empty() || !world.contains(target) {
            return DamageSpecifier::new();
        }

        let mut attempt = DamageAttempt {
            target,
            damage: damage.clone(),
            origin: options.origin,
            cancelled: false,
        };
        if world.bus.run_before_damage(&mut attempt) {
            tracing::debug!(?target, "damage cancelled before application");
            return damage.zeroed();
        }

        if world.is_complex(target) {
            self.route_to_parts(world, target, damage, options)
        } else {
            self.apply_direct(world, target, damage, options, via_body)
        }
    }

    fn route_to_parts(
        &self,
        world: &mut AnatomyWorld,
        body: EntityId,
        damage: &DamageSpecifier,
        options: &DamageOptions,
    ) -> DamageSpecifier {
        let targets = self.resolve_targets(world, body, damage, options);
        let mut realized = damage.zeroed();
        if targets.is_empty() {
            tracing::debug!(?body, "no parts to route damage to");
            return realized;
        }

        let share = damage.scaled(1.0 / targets.len() as f32);
        let part_options = DamageOptions {
            target_part: None,
            can_miss: false,
            ..options.clone()
        };
        for part in targets {
            // Earlier parts in this call may have severed this one
            if world.organ(part).and_then(|o| o.owner()) != Some(body) {
                continue;
            }
            let part_realized = self.apply_to_entity(world, part, &share, &part_options, true);
            realized += &part_realized;
        }

        world.publish(AnatomyEvent::DamageChanged {
            entity: body,
            delta: realized.clone(),
            origin: options.origin,
            interrupts_do_after: options.interrupts_do_after && realized.has_harm(),
        });
        world.mark_dirty(body);
        realized
    }

    /// Pick the parts a body-level hit lands on
    fn resolve_targets(
        &self,
        world: &AnatomyWorld,
        body: EntityId,
        damage: &DamageSpecifier,
        options: &DamageOptions,
    ) -> Vec<EntityId> {
        let seed = world
            .net_id(body)
            .map_or(world.current_tick, |net_id| roll_seed(world.current_tick, net_id));
        let mut rng = ChaCha8Rng::seed_from_u64(seed ^ roll_salt(world, options));

        let parts: Vec<EntityId> = world
            .attached_organs(body)
            .into_iter()
            .filter(|organ| world.organ(*organ).map_or(false, |o| o.is_enabled()))
            .collect();

        if let Some(category) = options.target_part {
            let called = world
                .get_organ(body, category)
                .filter(|organ| parts.contains(organ));
            if let Some(called) = called {
                if options.can_miss && rng.gen::<f32>() < self.config.called_shot_miss_chance {
                    let others: Vec<EntityId> =
                        external(world, &parts).into_iter().filter(|p| *p != called).collect();
                    if let Some(stray) = weighted_pick(world, &others, &mut rng) {
                        tracing::debug!(?body, ?category, ?stray, "called shot missed");
                        return vec![stray];
                    }
                }
                return vec![called];
            }
            tracing::debug!(?body, ?category, "called shot target missing, using split policy");
        }

        let external = external(world, &parts);
        match options.split {
            SplitDamageBehavior::None => weighted_pick(world, &external, &mut rng).into_iter().collect(),
            SplitDamageBehavior::Split => external,
            SplitDamageBehavior::SplitEnsureAllOrganic => external
                .into_iter()
                .filter(|p| world.organ(*p).map_or(false, |o| o.organic))
                .collect(),
            SplitDamageBehavior::SplitEnsureAllDamaged => {
                if damage.has_harm() {
                    return external;
                }
                let damaged: Vec<EntityId> = external
                    .iter()
                    .copied()
                    .filter(|p| world.organ(*p).map_or(false, |o| o.is_damaged()))
                    .collect();
                if damaged.is_empty() {
                    external
                } else {
                    damaged
                }
            }
        }
    }

    fn apply_direct(
        &self,
        world: &mut AnatomyWorld,
        target: EntityId,
        damage: &DamageSpecifier,
        options: &DamageOptions,
        via_body: bool,
    ) -> DamageSpecifier {
        let mut damage = damage.clone();

        if !options.ignore_resistances {
            let set = world
                .modifier_set_name(target)
                .and_then(|name| self.config.modifier_set(&name));
            if let Some(set) = set {
                damage = set.apply(&damage, options.armor_penetration);
            }

            let mut modify = DamageModify {
                target,
                damage,
                origin: options.origin,
                cancelled: false,
            };
            if world.bus.run_damage_modify(&mut modify) {
                tracing::debug!(?target, "damage cancelled while modifying");
                return modify.damage.zeroed();
            }
            damage = modify.damage;
        }

        if self.config.has_universal_modifiers() {
            let harm = self.config.all_damage_multiplier;
            let heal = self.config.all_healing_multiplier;
            damage.map_values(|_, value| if value > 0.0 { value * harm } else { value * heal });
        }

        let Some((current, cap)) = world.damage_state(target) else {
            return damage.zeroed();
        };
        let owner = world.organ(target).and_then(|o| o.owner());

        let (stored, realized) = apply_capped(&current, &damage, cap);
        if realized.any_nonzero() {
            world.store_damage(target, stored, &realized, options.origin);
        }

        let interrupts = options.interrupts_do_after && realized.has_harm();
        world.publish(AnatomyEvent::DamageChanged {
            entity: target,
            delta: realized.clone(),
            origin: options.origin,
            interrupts_do_after: interrupts,
        });

        if !via_body {
            if let Some(owner) = owner {
                world.publish(AnatomyEvent::DamageChanged {
                    entity: owner,
                    delta: realized.clone(),
                    origin: options.origin,
                    interrupts_do_after: interrupts,
                });
                world.mark_dirty(owner);
            }
        }
        realized
    }
}

fn external(world: &AnatomyWorld, parts: &[EntityId]) -> Vec<EntityId> {
    parts
        .iter()
        .copied()
        .filter(|p| world.organ(*p).map_or(false, |o| !o.is_internal()))
        .collect()
}

/// Draw one part by hit weight, uniformly when no part carries weight
fn weighted_pick(world: &AnatomyWorld, parts: &[EntityId], rng: &mut ChaCha8Rng) -> Option<EntityId> {
    if parts.is_empty() {
        return None;
    }
    let weights: Vec<f32> = parts
        .iter()
        .map(|p| world.organ(*p).map_or(0.0, |o| o.category.hit_weight()))
        .collect();
    let total: f32 = weights.iter().sum();
    if total <= 0.0 {
        return parts.get(rng.gen_range(0..parts.len())).copied();
    }

    let mut roll = rng.gen::<f32>() * total;
    for (part, weight) in parts.iter().zip(&weights) {
        if roll < *weight {
            return Some(*part);
        }
        roll -= weight;
    }
    parts.last().copied()
}

/// Per-hit seed component so separate attackers in one tick roll apart
fn roll_salt(world: &AnatomyWorld, options: &DamageOptions) -> u64 {
    let origin = options.origin.map_or(0, |origin| {
        world
            .net_id(origin)
            .map_or(u64::from(origin.0) + 1, |net_id| net_id.seed_bits())
    });
    let category = options.target_part.map_or(0, |c| c as u64 + 1);
    origin
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(category.wrapping_mul(0xC2B2_AE3D_27D4_EB4F))
}
