//! Integration tests for the parent-child transform hierarchy.
//!
//! Stuck projectiles and grenade pins are re-parented at runtime, so world
//! placement must survive every parent change.
//!
//! # Usage
//!
//! ```sh
//! cargo test --test hierarchy_integration
//! ```

use bevy_ecs::hierarchy::{ChildOf, Children};
use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};

use ricochet::components::transform::Transform;
use ricochet::systems::hierarchy::{
    clear_parent_keep_world, set_parent_keep_world, set_world_position, world_position,
    world_transform,
};

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn approx_vec(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

// =============================================================================
// World composition
// =============================================================================

#[test]
fn entity_without_transform_is_identity() {
    let mut world = World::new();
    let e = world.spawn_empty().id();
    assert_eq!(world_transform(&world, e), Transform::IDENTITY);
}

#[test]
fn grandchild_composes_the_whole_chain() {
    let mut world = World::new();
    let root = world
        .spawn(Transform::from_translation_rotation(
            Vec3::new(10.0, 0.0, 0.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        ))
        .id();
    let mid = world
        .spawn((
            Transform::from_translation(Vec3::new(0.0, 0.0, 2.0)).with_scale(Vec3::splat(2.0)),
            ChildOf(root),
        ))
        .id();
    let leaf = world
        .spawn((Transform::from_translation(Vec3::Y), ChildOf(mid)))
        .id();

    // root yaw maps local +Z to world +X.
    assert!(approx_vec(world_position(&world, mid), Vec3::new(12.0, 0.0, 0.0)));
    assert!(approx_vec(world_position(&world, leaf), Vec3::new(12.0, 2.0, 0.0)));
}

#[test]
fn set_world_position_accounts_for_parent() {
    let mut world = World::new();
    let parent = world
        .spawn(Transform::from_translation(Vec3::new(1.0, 1.0, 1.0)).with_scale(Vec3::splat(0.5)))
        .id();
    let child = world.spawn((Transform::IDENTITY, ChildOf(parent))).id();

    set_world_position(&mut world, child, Vec3::new(2.0, 1.0, 1.0));
    assert!(approx_vec(world_position(&world, child), Vec3::new(2.0, 1.0, 1.0)));
    assert!(approx_vec(
        world.get::<Transform>(child).unwrap().translation,
        Vec3::new(2.0, 0.0, 0.0)
    ));
}

// =============================================================================
// Re-parenting
// =============================================================================

#[test]
fn reparent_keeps_world_placement() {
    let mut world = World::new();
    let parent = world
        .spawn(
            Transform::from_translation_rotation(Vec3::new(0.0, 0.0, 5.0), Quat::from_rotation_x(0.4))
                .with_scale(Vec3::splat(3.0)),
        )
        .id();
    let rotation = Quat::from_rotation_z(0.9);
    let child = world
        .spawn(Transform::from_translation_rotation(Vec3::new(1.0, 2.0, 3.0), rotation))
        .id();

    set_parent_keep_world(&mut world, child, parent);

    assert_eq!(world.get::<ChildOf>(child).map(|c| c.parent()), Some(parent));
    assert!(world.get::<Children>(parent).is_some_and(|c| c.contains(&child)));
    let placed = world_transform(&world, child);
    assert!(approx_vec(placed.translation, Vec3::new(1.0, 2.0, 3.0)));
    assert!(placed.rotation.angle_between(rotation) < 1e-3);
    assert!(approx_vec(placed.scale, Vec3::ONE));
}

#[test]
fn reparent_onto_itself_is_ignored() {
    let mut world = World::new();
    let e = world.spawn(Transform::from_translation(Vec3::X)).id();
    set_parent_keep_world(&mut world, e, e);
    assert!(world.get::<ChildOf>(e).is_none());
}

#[test]
fn clearing_the_parent_bakes_the_world_transform() {
    let mut world = World::new();
    let parent = world
        .spawn(Transform::from_translation(Vec3::new(0.0, 3.0, 0.0)))
        .id();
    let child = world
        .spawn((Transform::from_translation(Vec3::X), ChildOf(parent)))
        .id();

    clear_parent_keep_world(&mut world, child);

    assert!(world.get::<ChildOf>(child).is_none());
    assert!(approx_vec(
        world.get::<Transform>(child).unwrap().translation,
        Vec3::new(1.0, 3.0, 0.0)
    ));
}

#[test]
fn moving_between_parents_round_trips() {
    let mut world = World::new();
    let a = world
        .spawn(Transform::from_translation(Vec3::new(-4.0, 0.0, 0.0)))
        .id();
    let b = world
        .spawn(Transform::from_translation_rotation(
            Vec3::new(4.0, 1.0, 0.0),
            Quat::from_rotation_y(2.0),
        ))
        .id();
    let child = world
        .spawn((Transform::from_translation(Vec3::new(0.5, 0.5, 0.5)), ChildOf(a)))
        .id();
    let start = world_position(&world, child);

    set_parent_keep_world(&mut world, child, b);
    assert!(approx_vec(world_position(&world, child), start));
    assert!(world.get::<Children>(a).is_none_or(|c| !c.contains(&child)));

    set_parent_keep_world(&mut world, child, a);
    assert!(approx_vec(world_position(&world, child), start));
    assert!(approx_vec(
        world.get::<Transform>(child).unwrap().translation,
        Vec3::new(0.5, 0.5, 0.5)
    ));
}
