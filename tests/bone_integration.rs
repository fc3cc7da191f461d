//! Bone subsystem integration tests

use anatomy_sim::anatomy::category::OrganCategory;
use anatomy_sim::bone::{fumble_roll, BoneSeverity, CombatAction};
use anatomy_sim::content::Content;
use anatomy_sim::core::types::{EntityId, NetId};
use anatomy_sim::damage::{DamageOptions, DamageRouter, DamageSpecifier, DamageType};
use anatomy_sim::ecs::world::AnatomyWorld;
use anatomy_sim::events::{AnatomyEvent, EventKind};
use anatomy_sim::trauma::TraumaKind;

fn human() -> (AnatomyWorld, DamageRouter, EntityId) {
    let content = Content::builtin().expect("builtin content");
    let mut world = AnatomyWorld::new(content.anatomy.clone());
    let router = DamageRouter::new(content.damage.clone());
    let body = world.spawn_creature("human", content.template("human").unwrap());
    world.drain_events();
    (world, router, body)
}

fn blunt_at(category: OrganCategory, amount: f32) -> (DamageSpecifier, DamageOptions) {
    (
        DamageSpecifier::of(DamageType::Blunt, amount),
        DamageOptions {
            ignore_resistances: true,
            target_part: Some(category),
            ..Default::default()
        },
    )
}

#[test]
fn test_blunt_damage_cracks_arm_bone() {
    let (mut world, router, body) = human();
    let arm = world.get_organ(body, OrganCategory::ArmLeft).unwrap();
    let bone = world.organ(arm).unwrap().bone().unwrap();

    // Arm cap 70 absorbs 70; half reaches the 50-cap bone
    let (damage, options) = blunt_at(OrganCategory::ArmLeft, 100.0);
    router.apply_damage(&mut world, body, &damage, &options);

    let bone_rec = world.bone(bone).unwrap();
    assert_eq!(bone_rec.integrity(), 15.0);
    assert_eq!(bone_rec.severity(), BoneSeverity::Cracked);
    assert_eq!(world.traumas_of(arm, Some(TraumaKind::BoneDamage)).len(), 1);
    assert!((world.interaction_delay_multiplier(body) - 1.0 / 0.75).abs() < 1e-5);
    assert_eq!(world.fumble_chance(body), 0.10);
    assert!(!world.body(body).unwrap().has_broken_bones());

    let events = world.drain_events();
    assert!(events.iter().any(|e| matches!(
        e,
        AnatomyEvent::Popup { recipient, key, .. } if *recipient == body && key == "bone-cracked"
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        AnatomyEvent::SoundCue { sound, volume, .. } if sound == "bone-cracked" && *volume == -2.0
    )));
}

#[test]
fn test_healing_mends_bone_and_clears_trauma_once() {
    let (mut world, router, body) = human();
    let arm = world.get_organ(body, OrganCategory::ArmLeft).unwrap();
    let bone = world.organ(arm).unwrap().bone().unwrap();
    let (damage, options) = blunt_at(OrganCategory::ArmLeft, 70.0);
    router.apply_damage(&mut world, body, &damage, &options);
    world.drain_events();

    let heal = DamageSpecifier::of(DamageType::Blunt, -70.0);
    router.apply_damage(&mut world, body, &heal, &options);

    assert_eq!(world.bone(bone).unwrap().severity(), BoneSeverity::Normal);
    assert_eq!(world.bone(bone).unwrap().integrity(), 50.0);
    assert!(world.traumas_of(arm, None).is_empty());
    let removed = world
        .drain_events()
        .into_iter()
        .filter(|e| e.kind() == EventKind::TraumaRemoved)
        .count();
    assert_eq!(removed, 1);
    assert_eq!(world.interaction_delay_multiplier(body), 1.0);
}

#[test]
fn test_broken_torso_raises_alert() {
    let (mut world, router, body) = human();
    let (damage, options) = blunt_at(OrganCategory::Torso, 150.0);
    router.apply_damage(&mut world, body, &damage, &options);

    assert!(world.body(body).unwrap().has_broken_bones());
    let alerts: Vec<AnatomyEvent> = world
        .drain_events()
        .into_iter()
        .filter(|e| e.kind() == EventKind::BrokenBoneAlert)
        .collect();
    assert_eq!(alerts, vec![AnatomyEvent::BrokenBoneAlert { body, active: true }]);

    // Torso is neither an arm nor a leg
    assert_eq!(world.interaction_delay_multiplier(body), 1.0);
    assert_eq!(world.movement_speed_modifier(body), 1.0);
}

#[test]
fn test_leg_bone_slows_movement() {
    let (mut world, router, body) = human();
    let (damage, options) = blunt_at(OrganCategory::LegRight, 80.0);
    router.apply_damage(&mut world, body, &damage, &options);

    // 40 into a 60-cap bone is two thirds consumed
    assert!((world.movement_speed_modifier(body) - 0.75).abs() < 1e-6);
    assert_eq!(world.interaction_delay_multiplier(body), 1.0);
}

#[test]
fn test_bone_setting_surgery() {
    let (mut world, _, body) = human();
    let hand = world.get_organ(body, OrganCategory::HandRight).unwrap();
    let bone = world.organ(hand).unwrap().bone().unwrap();

    assert!(world.set_bone_integrity(bone, 0.0));
    assert!(world.body(body).unwrap().has_broken_bones());
    assert_eq!(world.fumble_chance(body), 0.25);

    assert!(world.set_bone_integrity(bone, 30.0));
    assert!(!world.body(body).unwrap().has_broken_bones());
    assert!(world.traumas_of(hand, Some(TraumaKind::BoneDamage)).is_empty());
}

#[test]
fn test_fumble_roll_determinism() {
    let net_id = NetId::from_u128(0x1234_5678_9ABC);
    for tick in [0, 1, 17, 9_999, u64::MAX] {
        let first = fumble_roll(tick, net_id, 0.25);
        let second = fumble_roll(tick, net_id, 0.25);
        assert_eq!(first, second, "tick {}", tick);
    }
}

#[test]
fn test_check_fumble_same_tick_same_outcome() {
    let (mut world, _, body) = human();
    world.set_net_id(body, NetId::from_u128(99));
    let hand = world.get_organ(body, OrganCategory::HandLeft).unwrap();
    let bone = world.organ(hand).unwrap().bone().unwrap();
    world.set_bone_integrity(bone, 0.0);

    let mut outcomes = Vec::new();
    for tick in 0..64 {
        world.current_tick = tick;
        let first = world.check_fumble(body, CombatAction::Ranged);
        let second = world.check_fumble(body, CombatAction::Ranged);
        assert_eq!(first, second);
        assert_eq!(first, fumble_roll(tick, NetId::from_u128(99), 0.25));
        outcomes.push(first);
    }
    assert!(outcomes.iter().any(|f| *f));
    assert!(outcomes.iter().any(|f| !*f));
}
