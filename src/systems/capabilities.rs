//! Capability lookup for the object on the other side of a hit.
//!
//! A collision only names a collider entity. What the hit can do to that
//! object depends on which components it, or one of its ancestors, carries:
//!
//! - [`Shield`] is looked up on the collider entity itself
//! - [`Health`], [`PhysicsBody`] and [`ForceReceiver`] are looked up on the
//!   collider entity or its nearest ancestor that has one
//! - [`CharacterLocomotion`] is looked up on the hit transform entity
//!
//! The lookup runs once per collision; missing capabilities are simply
//! skipped by the caller.

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;
use glam::Vec3;

use crate::components::forcereceiver::ForceReceiver;
use crate::components::health::{DamageRecord, Health};
use crate::components::locomotion::CharacterLocomotion;
use crate::components::physicsbody::PhysicsBody;
use crate::components::shield::Shield;

/// Scale applied to impact forces pushed into a physics body.
pub const RIGIDBODY_FORCE_MULTIPLIER: f32 = 40.0;

const MAX_ANCESTOR_DEPTH: usize = 64;

/// Entities owning each capability of a hit object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitCapabilities {
    pub shield: Option<Entity>,
    pub health: Option<Entity>,
    pub body: Option<Entity>,
    pub force_receiver: Option<Entity>,
    pub locomotion: Option<Entity>,
}

impl HitCapabilities {
    pub fn resolve(world: &World, collider: Entity, transform: Option<Entity>) -> Self {
        Self {
            shield: world.get::<Shield>(collider).map(|_| collider),
            health: find_in_ancestors::<Health>(world, collider),
            body: find_in_ancestors::<PhysicsBody>(world, collider),
            force_receiver: find_in_ancestors::<ForceReceiver>(world, collider),
            locomotion: transform.filter(|t| world.get::<CharacterLocomotion>(*t).is_some()),
        }
    }
}

/// The entity itself or its nearest ancestor carrying `T`.
pub fn find_in_ancestors<T: Component>(world: &World, entity: Entity) -> Option<Entity> {
    let mut current = entity;
    for _ in 0..MAX_ANCESTOR_DEPTH {
        if world.get::<T>(current).is_some() {
            return Some(current);
        }
        current = world.get::<ChildOf>(current)?.parent();
    }
    None
}

/// Push a hit into whatever physical capability the object has.
///
/// A non-kinematic body gets `-normal * force * RIGIDBODY_FORCE_MULTIPLIER`
/// at `point`. Failing that, a force receiver gets `direction * force` spread
/// over `frames`; callers pass the travel direction of whatever hit it.
/// Returns true if some capability took the force.
pub fn apply_impact_force(
    world: &mut World,
    caps: &HitCapabilities,
    point: Vec3,
    normal: Vec3,
    direction: Vec3,
    force: f32,
    frames: u32,
) -> bool {
    if let Some(body_entity) = caps.body
        && let Some(mut body) = world.get_mut::<PhysicsBody>(body_entity)
        && !body.kinematic
    {
        body.add_force_at_position(-normal * force * RIGIDBODY_FORCE_MULTIPLIER, point);
        return true;
    }

    if let Some(receiver_entity) = caps.force_receiver
        && let Some(mut receiver) = world.get_mut::<ForceReceiver>(receiver_entity)
    {
        receiver.add_force(direction * force, frames);
        return true;
    }
    false
}

/// Damage the health owner and push it back along the damage direction.
///
/// Returns the damage actually removed.
pub fn apply_knockback(world: &mut World, health_entity: Entity, record: DamageRecord) -> f32 {
    let removed = {
        let Some(mut health) = world.get_mut::<Health>(health_entity) else {
            return 0.0;
        };
        health.damage(record)
    };

    if record.force > 0.0 {
        let push = record.direction.normalize_or_zero() * record.force;
        if let Some(mut receiver) = world.get_mut::<ForceReceiver>(health_entity) {
            receiver.add_force(push, record.force_frames);
        } else if let Some(mut body) = world.get_mut::<PhysicsBody>(health_entity)
            && !body.kinematic
        {
            body.add_force_at_position(push * RIGIDBODY_FORCE_MULTIPLIER, record.position);
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capabilities_come_from_nearest_ancestor() {
        let mut world = World::new();
        let root = world.spawn((Health::new(100.0), PhysicsBody::new(1.0))).id();
        let mid = world.spawn((ForceReceiver::default(), ChildOf(root))).id();
        let leaf = world.spawn((Shield::new(10.0), ChildOf(mid))).id();

        let caps = HitCapabilities::resolve(&world, leaf, Some(leaf));
        assert_eq!(caps.shield, Some(leaf));
        assert_eq!(caps.health, Some(root));
        assert_eq!(caps.body, Some(root));
        assert_eq!(caps.force_receiver, Some(mid));
        assert_eq!(caps.locomotion, None);
    }

    #[test]
    fn shield_only_counts_on_the_collider_itself() {
        let mut world = World::new();
        let root = world.spawn(Shield::new(10.0)).id();
        let leaf = world.spawn(ChildOf(root)).id();
        assert_eq!(HitCapabilities::resolve(&world, leaf, None).shield, None);
    }

    #[test]
    fn body_force_uses_multiplier_and_reversed_normal() {
        let mut world = World::new();
        let e = world.spawn(PhysicsBody::new(2.0)).id();
        let caps = HitCapabilities::resolve(&world, e, None);
        assert!(apply_impact_force(&mut world, &caps, Vec3::ONE, Vec3::Y, Vec3::Z, 2.0, 1));
        let body = world.get::<PhysicsBody>(e).unwrap();
        assert_eq!(body.total_force(), Vec3::new(0.0, -80.0, 0.0));
        assert_eq!(body.pending[0].position, Vec3::ONE);
    }

    #[test]
    fn kinematic_body_falls_through_to_receiver() {
        let mut world = World::new();
        let e = world
            .spawn((PhysicsBody::new(2.0).kinematic(), ForceReceiver::default()))
            .id();
        let caps = HitCapabilities::resolve(&world, e, None);
        assert!(apply_impact_force(&mut world, &caps, Vec3::ZERO, Vec3::Y, Vec3::Z, 3.0, 4));
        let receiver = world.get::<ForceReceiver>(e).unwrap();
        assert_eq!(receiver.pending[0].force, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(receiver.pending[0].frames, 4);
        assert_eq!(world.get::<PhysicsBody>(e).unwrap().total_force(), Vec3::ZERO);
    }

    #[test]
    fn knockback_damages_and_pushes() {
        let mut world = World::new();
        let e = world.spawn((Health::new(50.0), ForceReceiver::default())).id();
        let removed = apply_knockback(
            &mut world,
            e,
            DamageRecord {
                amount: 20.0,
                position: Vec3::ZERO,
                direction: Vec3::new(0.0, 0.0, -2.0),
                force: 5.0,
                force_frames: 3,
                radius: 0.0,
                originator: None,
                collider: Some(e),
            },
        );
        assert_eq!(removed, 20.0);
        assert_eq!(world.get::<Health>(e).unwrap().value, 30.0);
        let receiver = world.get::<ForceReceiver>(e).unwrap();
        assert_eq!(receiver.pending[0].force, Vec3::new(0.0, 0.0, -5.0));
    }
}
