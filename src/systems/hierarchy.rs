//! World-space transforms for parent-child hierarchies.
//!
//! Entities with a [`ChildOf`] parent store their [`Transform`] relative to the
//! parent. World-space values are composed on demand by walking up the
//! parent chain, so re-parenting takes effect immediately without a
//! propagation pass.

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;
use glam::{Affine3A, Vec3};

use crate::components::transform::Transform;

/// Guard against malformed (cyclic) hierarchies.
const MAX_DEPTH: usize = 64;

/// Compose the entity's world matrix from its own and its ancestors' transforms.
///
/// Entities without a [`Transform`] contribute the identity.
pub fn world_affine(world: &World, entity: Entity) -> Affine3A {
    let local = |e: Entity| {
        world
            .get::<Transform>(e)
            .map(Transform::to_affine)
            .unwrap_or(Affine3A::IDENTITY)
    };

    let mut affine = local(entity);
    let mut current = entity;
    for _ in 0..MAX_DEPTH {
        let Some(parent) = world.get::<ChildOf>(current).map(|c| c.parent()) else {
            break;
        };
        affine = local(parent) * affine;
        current = parent;
    }
    affine
}

pub fn world_transform(world: &World, entity: Entity) -> Transform {
    Transform::from_affine(world_affine(world, entity))
}

pub fn world_position(world: &World, entity: Entity) -> Vec3 {
    world_affine(world, entity).translation.into()
}

/// Move an entity to a world-space position, whatever its parent.
pub fn set_world_position(world: &mut World, entity: Entity, position: Vec3) {
    let parent_affine = parent_affine(world, entity);
    let local = parent_affine.inverse().transform_point3(position);
    if let Some(mut transform) = world.get_mut::<Transform>(entity) {
        transform.translation = local;
    }
}

fn parent_affine(world: &World, entity: Entity) -> Affine3A {
    world
        .get::<ChildOf>(entity)
        .map(|c| world_affine(world, c.parent()))
        .unwrap_or(Affine3A::IDENTITY)
}

/// Parent `child` under `parent` while keeping its world placement.
pub fn set_parent_keep_world(world: &mut World, child: Entity, parent: Entity) {
    if child == parent {
        return;
    }
    let child_world = world_affine(world, child);
    let parent_world = world_affine(world, parent);
    let local = Transform::from_affine(parent_world.inverse() * child_world);
    let Ok(mut entity) = world.get_entity_mut(child) else {
        return;
    };
    entity.insert((local, ChildOf(parent)));
}

/// Detach `child` from its parent while keeping its world placement.
pub fn clear_parent_keep_world(world: &mut World, child: Entity) {
    if world.get::<ChildOf>(child).is_none() {
        return;
    }
    let child_world = world_transform(world, child);
    let Ok(mut entity) = world.get_entity_mut(child) else {
        return;
    };
    entity.remove::<ChildOf>();
    entity.insert(child_world);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn child_world_position_composes_parent() {
        let mut world = World::new();
        let parent = world
            .spawn(Transform::from_translation(Vec3::new(10.0, 0.0, 0.0)).with_scale(Vec3::splat(2.0)))
            .id();
        let child = world
            .spawn((Transform::from_translation(Vec3::new(1.0, 0.0, 0.0)), ChildOf(parent)))
            .id();

        let p = world_position(&world, child);
        assert!((p - Vec3::new(12.0, 0.0, 0.0)).length() < EPSILON);
    }

    #[test]
    fn reparent_keeps_world_placement() {
        let mut world = World::new();
        let parent = world
            .spawn(Transform::from_translation_rotation(
                Vec3::new(0.0, 5.0, 0.0),
                Quat::from_rotation_y(1.0),
            ))
            .id();
        let child = world
            .spawn(Transform::from_translation(Vec3::new(3.0, 1.0, -2.0)))
            .id();

        set_parent_keep_world(&mut world, child, parent);
        assert_eq!(world.get::<ChildOf>(child).map(|c| c.parent()), Some(parent));
        let p = world_position(&world, child);
        assert!((p - Vec3::new(3.0, 1.0, -2.0)).length() < EPSILON);

        clear_parent_keep_world(&mut world, child);
        assert!(world.get::<ChildOf>(child).is_none());
        let p = world.get::<Transform>(child).unwrap().translation;
        assert!((p - Vec3::new(3.0, 1.0, -2.0)).length() < EPSILON);
    }

    #[test]
    fn set_world_position_under_parent() {
        let mut world = World::new();
        let parent = world
            .spawn(Transform::from_translation(Vec3::new(1.0, 1.0, 1.0)))
            .id();
        let child = world.spawn((Transform::IDENTITY, ChildOf(parent))).id();

        set_world_position(&mut world, child, Vec3::new(4.0, 1.0, 1.0));
        assert!((world.get::<Transform>(child).unwrap().translation - Vec3::X * 3.0).length() < EPSILON);
        assert!((world_position(&world, child) - Vec3::new(4.0, 1.0, 1.0)).length() < EPSILON);
    }
}
