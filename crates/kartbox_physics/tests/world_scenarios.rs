//! Deterministic scenario tests driven through `single_step`
//!
//! These exercise the public facade the way the game layer uses it:
//! mutations from outside, fixed stepping, and pose observation through the
//! change buffer only.

use kartbox_physics::{translation, translation_of, PhysicsWorld};

const FLOOR: u64 = 0;
const BOX: u64 = 1;
const CAR: u64 = 2;

/// World with a large static slab whose top surface sits at y = -9
fn world_with_floor() -> PhysicsWorld {
    let world = PhysicsWorld::new();
    world.add_box(FLOOR, translation(0.0, -10.0, -30.0), 0.0, [50.0, 1.0, 50.0]);
    world
}

#[test]
fn test_box_drops_onto_floor_and_settles() {
    let world = world_with_floor();
    world.add_box(BOX, translation(0.0, 15.0, -30.0), 1.0, [1.0, 1.0, 1.0]);

    for _ in 0..300 {
        world.single_step();
    }

    let changes = world.get_and_reset_changes();
    let transform = changes.get(&BOX).expect("falling box must report changes");
    let height = translation_of(transform).y;

    assert!(height < 15.0, "box must have fallen, got y={height}");
    // Resting on the slab: floor top (-9) plus the box half-extent (1)
    assert!(
        (height + 8.0).abs() < 0.5,
        "box should rest near y=-8, got y={height}"
    );
    // The static floor never reports
    assert!(!changes.contains_key(&FLOOR));
}

#[test]
fn test_static_box_never_reports_changes() {
    let world = world_with_floor();
    for _ in 0..50 {
        world.single_step();
    }
    assert!(world.get_and_reset_changes().is_empty());
}

#[test]
fn test_change_delivered_exactly_once() {
    let world = PhysicsWorld::new();
    world.add_box(BOX, translation(0.0, 15.0, 0.0), 1.0, [1.0, 1.0, 1.0]);
    world.single_step();

    let changes = world.get_and_reset_changes();
    assert_eq!(changes.len(), 1);
    assert!(changes.contains_key(&BOX));

    // No further motion has been simulated, so nothing new to report
    assert!(world.get_and_reset_changes().is_empty());
}

#[test]
fn test_removal_before_first_step_leaves_no_trace() {
    let world = world_with_floor();
    world.add_box(BOX, translation(0.0, 15.0, -30.0), 1.0, [1.0, 1.0, 1.0]);
    world.remove(BOX);
    world.single_step();

    assert!(!world.get_and_reset_changes().contains_key(&BOX));
    assert!(!world.debug_dump().contains("#1 "));
}

#[test]
fn test_removal_purges_earlier_changes() {
    let world = world_with_floor();
    world.add_box(BOX, translation(0.0, 15.0, -30.0), 1.0, [1.0, 1.0, 1.0]);
    world.single_step();
    // The box moved and recorded a change; remove it before consuming
    world.remove(BOX);
    world.single_step();

    assert!(!world.get_and_reset_changes().contains_key(&BOX));
}

#[test]
fn test_vehicle_settles_on_its_wheels() {
    let world = PhysicsWorld::new();
    // Slab top surface at y = 0
    world.add_box(FLOOR, translation(0.0, -1.0, 0.0), 0.0, [50.0, 1.0, 50.0]);
    world.add_vehicle(CAR, translation(0.0, 3.0, 0.0));

    for _ in 0..300 {
        world.single_step();
    }

    let changes = world.get_and_reset_changes();
    let transform = changes.get(&CAR).expect("vehicle must report changes");
    let height = translation_of(transform).y;

    // Suspension holds the chassis above the slab without launching it
    assert!(height > 0.3, "chassis sank into the floor, y={height}");
    assert!(height < 2.8, "chassis did not settle, y={height}");
}

#[test]
fn test_engine_force_drives_the_vehicle() {
    let world = PhysicsWorld::new();
    world.add_box(FLOOR, translation(0.0, -1.0, 0.0), 0.0, [50.0, 1.0, 50.0]);
    world.add_vehicle(CAR, translation(0.0, 1.5, 0.0));

    // Give the wheels a moment to find the ground before powering them.
    // Only horizontal displacement is compared, so it does not matter
    // whether the suspension has fully settled yet.
    for _ in 0..20 {
        world.single_step();
    }
    let rest = world.get_and_reset_changes();
    let start = translation_of(rest.get(&CAR).expect("vehicle must report while settling"));

    world.set_engine_force(CAR, true);
    for _ in 0..300 {
        world.single_step();
    }

    let driven = world.get_and_reset_changes();
    let end = translation_of(driven.get(&CAR).expect("vehicle must keep reporting"));
    let horizontal = ((end.x - start.x).powi(2) + (end.z - start.z).powi(2)).sqrt();

    assert!(
        horizontal > 0.5,
        "engine force should move the vehicle, moved {horizontal}"
    );
}

#[test]
fn test_mutating_unknown_ids_is_harmless() {
    let world = PhysicsWorld::new();
    world.remove(99);
    world.set_engine_force(99, true);
    world.set_steering(99, 0.5);
    world.single_step();

    assert!(world.get_and_reset_changes().is_empty());
}
