//! Fixed-step trajectory integration with swept collision.
//!
//! Each moving [`Trajectory`] is advanced by one fixed step: gravity and drag
//! update the velocity, torque spins the rotation, and the segment travelled
//! this step is swept (as a sphere of the object's collider radius) against
//! every enabled collider in the trajectory's impact mask. The first contact
//! along the segment wins.
//!
//! The object's own collider is switched on by its first motion step, so a
//! freshly fired projectile never collides with whatever it spawned inside.
//! The originator and the originator's sub-colliders are never hit.

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};
use log::trace;

use crate::components::collider::Collider;
use crate::components::destructible::Destructible;
use crate::components::effects::Trail;
use crate::components::locomotion::CharacterLocomotion;
use crate::components::trajectory::{BounceMode, Trajectory};
use crate::components::transform::Transform;
use crate::events::collision::HitRecord;
use crate::systems::destructible::on_collision;
use crate::systems::hierarchy::{set_world_position, world_position};

#[derive(Debug, Clone, Copy)]
struct Obstacle {
    entity: Entity,
    center: Vec3,
    radius: f32,
    layer: u32,
}

/// Parametric `t` in `[0, 1]` at which a sphere of radius `radius` moving from
/// `p0` to `p1` first touches a sphere at `center`. Zero if already touching.
pub fn swept_sphere_enter_t(p0: Vec3, p1: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let d = p1 - p0;
    let m = p0 - center;
    let c = m.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    let a = d.length_squared();
    if a <= 1e-12 {
        return None;
    }
    let b = m.dot(d);
    if b >= 0.0 {
        return None;
    }
    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    let t = (-b - disc.sqrt()) / a;
    (t <= 1.0).then_some(t.max(0.0))
}

/// Advance every moving trajectory by `dt` seconds.
pub fn trajectory_step(world: &mut World, dt: f32) {
    let movers: Vec<Entity> = {
        let mut query = world.query::<(Entity, &Trajectory)>();
        query
            .iter(world)
            .filter(|(_, t)| t.moving)
            .map(|(e, _)| e)
            .collect()
    };
    if movers.is_empty() {
        return;
    }

    let obstacles: Vec<Obstacle> = {
        let mut query = world.query::<(Entity, &Collider)>();
        query
            .iter(world)
            .filter(|(_, c)| c.enabled)
            .map(|(e, c)| Obstacle {
                entity: e,
                center: world_position(world, e),
                radius: c.radius,
                layer: c.layer,
            })
            .collect()
    };

    for entity in movers {
        step_one(world, entity, dt, &obstacles);
    }
}

fn step_one(world: &mut World, entity: Entity, dt: f32, obstacles: &[Obstacle]) {
    let Some(mut trajectory) = world.get::<Trajectory>(entity).cloned() else {
        return;
    };
    if !trajectory.moving {
        return;
    }
    if !trajectory.started {
        trajectory.started = true;
        if let Some(mut collider) = world.get_mut::<Collider>(entity) {
            collider.enabled = true;
        }
    }

    let own_radius = world.get::<Collider>(entity).map(|c| c.radius).unwrap_or(0.0);
    let ignored: Vec<Entity> = trajectory
        .originator
        .and_then(|o| world.get::<CharacterLocomotion>(o))
        .map(|l| l.sub_colliders().to_vec())
        .unwrap_or_default();

    let p0 = world_position(world, entity);
    let velocity = trajectory.integrate_velocity(dt);
    let p1 = p0 + velocity * dt;

    let hit = obstacles
        .iter()
        .filter(|o| {
            o.entity != entity
                && Some(o.entity) != trajectory.originator
                && !ignored.contains(&o.entity)
                && trajectory.impact_layers.contains(o.layer)
        })
        .filter_map(|o| {
            swept_sphere_enter_t(p0, p1, o.center, o.radius + own_radius).map(|t| (t, o))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0));

    let spin = Quat::from_scaled_axis(trajectory.torque * dt);
    if let Some(mut transform) = world.get_mut::<Transform>(entity) {
        transform.rotation = (spin * transform.rotation).normalize();
    }

    let Some((t, obstacle)) = hit else {
        trajectory.velocity = velocity;
        write_back(world, entity, trajectory, p1);
        return;
    };

    let contact_center = p0 + (p1 - p0) * t;
    let normal = (contact_center - obstacle.center).normalize_or(-velocity.normalize_or(Vec3::Y));
    let record = HitRecord {
        point: obstacle.center + normal * obstacle.radius,
        normal,
        collider: Some(obstacle.entity),
        transform: Some(obstacle.entity),
    };
    trace!("{:?} hit {:?} at t={:.3}", entity, obstacle.entity, t);

    match trajectory.bounce_mode {
        BounceMode::Reflect => trajectory.velocity = trajectory.reflect(velocity, normal),
        BounceMode::None => trajectory.stop(),
    }
    write_back(world, entity, trajectory, contact_center);

    if world.get::<Destructible>(entity).is_some() {
        on_collision(world, entity, Some(record));
    }
}

fn write_back(world: &mut World, entity: Entity, trajectory: Trajectory, position: Vec3) {
    set_world_position(world, entity, position);
    if let Some(mut trail) = world.get_mut::<Trail>(entity) {
        trail.push(position);
    }
    if let Some(mut current) = world.get_mut::<Trajectory>(entity) {
        *current = trajectory;
    }
}
