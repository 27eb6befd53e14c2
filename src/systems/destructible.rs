//! Destructible lifecycle: arming, collision handling and destruction.
//!
//! These are exclusive functions over the [`World`]: each one reads the
//! destructible's own components, resolves the capabilities of whatever it
//! hit once, and then mutates both sides.
//!
//! # Collision pipeline
//!
//! ```text
//! hit ──► snap / stick ──► shield ──► ImpactEvent + callback
//!                                          │
//!                       health (damage + knockback)  or  body / force receiver
//!                                          │
//!                                   impact state ──► schedule destruct
//! ```
//!
//! Destruction is always deferred to the fixed lane of the [`Scheduler`], so a
//! zero delay still waits for the next fixed step.

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};
use log::{debug, warn};
use smallvec::SmallVec;

use crate::components::collider::Collider;
use crate::components::destructible::{
    ArmedImpact, Destructible, DestructibleState, ImpactCallback, ImpactParams, ImpactStateTimer,
    Launch,
};
use crate::components::effects::{ParticleEmitter, Trail};
use crate::components::explosion::{Explosion, ExplosionParams};
use crate::components::grenade::Grenade;
use crate::components::health::DamageRecord;
use crate::components::locomotion::CharacterLocomotion;
use crate::components::pooled::LifetimeToken;
use crate::components::shield::Shield;
use crate::components::trajectory::{BounceMode, Trajectory};
use crate::components::transform::Transform;
use crate::error::SimError;
use crate::events::collision::HitRecord;
use crate::events::destructed::DestructedEvent;
use crate::events::impact::ImpactEvent;
use crate::resources::rng::SimRng;
use crate::resources::scheduler::Scheduler;
use crate::systems::capabilities::{HitCapabilities, apply_impact_force, apply_knockback};
use crate::systems::explosion::explode;
use crate::systems::hierarchy::{set_parent_keep_world, set_world_position, world_transform};
use crate::systems::pool::{destroy_with_strategy, instantiate};
use crate::systems::states::{deactivate_state_timer, set_state};

/// Arm a destructible for a new use.
///
/// Fails with [`SimError::InvalidImpactStateTimer`] before touching anything
/// if the disable timer is neither `-1` nor non-negative.
pub fn initialize(
    world: &mut World,
    entity: Entity,
    launch: Launch,
    params: ImpactParams,
) -> Result<(), SimError> {
    let timer = ImpactStateTimer::from_seconds(params.impact_state_disable_timer)?;
    let Some(mut destructible) = world.get_mut::<Destructible>(entity) else {
        return Err(SimError::missing::<Destructible>(entity));
    };

    let previous_sticky = destructible.sticky_locomotion.take();
    let stale_destruction = destructible.pending_destruction.take();
    let surface_impact = destructible
        .surface_impact
        .clone()
        .or(params.surface_impact);
    destructible.armed = ArmedImpact {
        damage: params.damage,
        impact_force: params.impact_force,
        impact_force_frames: params.impact_force_frames,
        impact_state: params
            .impact_state_name
            .filter(|name| !name.is_empty())
            .map(|name| (name, timer)),
        surface_impact,
    };
    destructible.originator = launch.originator;
    destructible.state = DestructibleState::Armed;
    destructible.enabled = true;

    if let Some(handle) = stale_destruction
        && let Some(mut scheduler) = world.get_resource_mut::<Scheduler>()
    {
        scheduler.cancel(handle);
    }

    if let Some(character) = previous_sticky
        && let Some(mut locomotion) = world.get_mut::<CharacterLocomotion>(character)
    {
        locomotion.remove_sub_collider(entity);
        debug!("{:?} unstuck from {:?}", entity, character);
    }

    let mut e = world.entity_mut(entity);
    if let Some(mut trail) = e.get_mut::<Trail>() {
        trail.clear();
        trail.enabled = true;
    }
    if let Some(mut particles) = e.get_mut::<ParticleEmitter>() {
        particles.play();
    }
    if let Some(mut collider) = e.get_mut::<Collider>() {
        collider.enabled = false;
    }
    if let Some(mut trajectory) = e.get_mut::<Trajectory>() {
        trajectory.impact_layers = params.impact_layers;
        trajectory.launch(launch.velocity, launch.torque, launch.originator);
    }
    Ok(())
}

/// Handle the first collision after arming.
///
/// Returns false if the destructible is not armed (already collided,
/// destroyed or never initialized).
pub fn on_collision(world: &mut World, entity: Entity, hit: Option<HitRecord>) -> bool {
    let (armed, originator, on_impact, destroy_on_collision, delay) = {
        let Some(mut destructible) = world.get_mut::<Destructible>(entity) else {
            return false;
        };
        if !destructible.enabled || destructible.state != DestructibleState::Armed {
            debug!("{:?} ignored collision in state {:?}", entity, destructible.state);
            return false;
        }
        destructible.state = DestructibleState::Collided;
        (
            destructible.armed.clone(),
            destructible.originator,
            destructible.on_impact,
            destructible.destroy_on_collision,
            destructible.destruction_delay,
        )
    };

    let caps = hit
        .as_ref()
        .and_then(|h| h.collider.map(|c| HitCapabilities::resolve(world, c, h.transform)))
        .unwrap_or_default();

    let bounce = world
        .get::<Trajectory>(entity)
        .map(|t| t.bounce_mode)
        .unwrap_or_default();
    if bounce == BounceMode::None {
        if let Some(mut trajectory) = world.get_mut::<Trajectory>(entity) {
            trajectory.stop();
        }
        if let Some(hit) = &hit {
            stick_to_hit(world, entity, hit, caps.locomotion);
        }
    }

    if let Some(mut trail) = world.get_mut::<Trail>(entity) {
        trail.enabled = false;
    }
    if let Some(mut particles) = world.get_mut::<ParticleEmitter>(entity) {
        particles.stop();
    }

    if let Some(hit) = &hit {
        apply_hit(world, entity, hit, &caps, &armed, originator, on_impact);
    }

    if destroy_on_collision {
        let token = LifetimeToken::current(world, entity);
        let handle = world.get_resource_or_init::<Scheduler>().schedule_fixed(
            delay,
            scheduled_destruct,
            (token, hit),
        );
        if let Some(mut destructible) = world.get_mut::<Destructible>(entity) {
            destructible.pending_destruction = Some(handle);
            destructible.state = DestructibleState::PendingDestruction;
        }
    }
    true
}

/// Move the object onto the hit point and, on uniformly scaled targets, parent it there.
fn stick_to_hit(world: &mut World, entity: Entity, hit: &HitRecord, locomotion: Option<Entity>) {
    let Some(collider) = world.get::<Collider>(entity).copied() else {
        return;
    };
    let position = world_transform(world, entity).translation;
    let closest = collider.closest_point(position, hit.point);
    set_world_position(world, entity, position + (hit.point - closest));

    let Some(target) = hit.transform else {
        return;
    };
    let uniform = world
        .get::<Transform>(target)
        .is_none_or(Transform::is_uniform_scale);
    if !uniform {
        debug!("{:?} not parented to non-uniform {:?}", entity, target);
        return;
    }
    set_parent_keep_world(world, entity, target);

    let Some(character) = locomotion else {
        return;
    };
    if let Some(mut locomotion) = world.get_mut::<CharacterLocomotion>(character) {
        locomotion.add_sub_collider(entity);
    }
    if let Some(mut destructible) = world.get_mut::<Destructible>(entity) {
        destructible.sticky_locomotion = Some(character);
    }
}

fn apply_hit(
    world: &mut World,
    entity: Entity,
    hit: &HitRecord,
    caps: &HitCapabilities,
    armed: &ArmedImpact,
    originator: Option<Entity>,
    on_impact: Option<ImpactCallback>,
) {
    let mut damage = armed.damage;
    if let Some(shield_entity) = caps.shield
        && let Some(mut shield) = world.get_mut::<Shield>(shield_entity)
    {
        damage = shield.damage(damage, false);
    }

    let event = ImpactEvent {
        source: entity,
        target: hit.collider,
        damage,
        point: hit.point,
        normal: hit.normal,
        force: hit.normal * armed.impact_force,
        originator,
        surface_impact: armed.surface_impact.clone(),
        explosion: false,
    };
    world.trigger(event.clone());
    if let Some(callback) = on_impact {
        callback(world, &event);
    }

    if damage > 0.0 {
        if let Some(health_entity) = caps.health {
            apply_knockback(
                world,
                health_entity,
                DamageRecord {
                    amount: damage,
                    position: hit.point,
                    direction: -hit.normal,
                    force: armed.impact_force,
                    force_frames: armed.impact_force_frames,
                    radius: 0.0,
                    originator,
                    collider: hit.collider,
                },
            );
        } else if armed.impact_force > 0.0 {
            let forward = world_transform(world, entity).forward();
            apply_impact_force(
                world,
                caps,
                hit.point,
                hit.normal,
                forward,
                armed.impact_force,
                armed.impact_force_frames,
            );
        }
    }

    if let (Some((name, timer)), Some(target)) = (&armed.impact_state, hit.collider) {
        set_state(world, target, name, true);
        if let ImpactStateTimer::After(seconds) = timer {
            deactivate_state_timer(world, target, name, *seconds);
        }
    }
}

fn scheduled_destruct(world: &mut World, (token, hit): (LifetimeToken, Option<HitRecord>)) {
    if !token.is_current(world) {
        debug!("skipping destruct of stale {:?}", token.entity);
        return;
    }
    if let Some(mut destructible) = world.get_mut::<Destructible>(token.entity) {
        destructible.pending_destruction = None;
    }
    destruct(world, token.entity, hit);
}

/// Destroy the object: spawn its leftovers, then return it to the pool.
///
/// Without a hit the object's own position and up vector are used. Returns
/// false if destruction already ran for this use.
pub fn destruct(world: &mut World, entity: Entity, hit: Option<HitRecord>) -> bool {
    let (armed, originator, spawns, pending) = {
        let Some(mut destructible) = world.get_mut::<Destructible>(entity) else {
            return false;
        };
        if !destructible.enabled {
            debug!("{:?} already destructed", entity);
            return false;
        }
        destructible.enabled = false;
        (
            destructible.armed.clone(),
            destructible.originator,
            destructible.spawned_objects_on_destruction.clone(),
            destructible.pending_destruction.take(),
        )
    };

    let (point, normal) = match hit {
        Some(hit) => (hit.point, hit.normal),
        None => {
            let transform = world_transform(world, entity);
            (transform.translation, transform.up())
        }
    };

    let mut spawned: SmallVec<[Entity; 4]> = SmallVec::new();
    for info in &spawns {
        let (keep, spin) = {
            let mut rng = world.get_resource_or_init::<SimRng>();
            let keep = rng.chance(info.probability);
            (keep, if info.random_spin { rng.angle() } else { 0.0 })
        };
        if !keep {
            continue;
        }
        let up = normal.normalize_or(Vec3::Y);
        let rotation = Quat::from_axis_angle(up, spin) * Quat::from_rotation_arc(Vec3::Y, up);
        let object = match instantiate(world, &info.prefab, point, rotation) {
            Ok(object) => object,
            Err(err) => {
                warn!("{:?} could not spawn '{}': {}", entity, info.prefab, err);
                continue;
            }
        };
        if world.get::<Explosion>(object).is_some() {
            explode(
                world,
                object,
                ExplosionParams {
                    damage: armed.damage,
                    impact_force: armed.impact_force,
                    impact_force_frames: armed.impact_force_frames,
                    originator,
                },
            );
        }
        spawned.push(object);
    }

    if let Some(mut collider) = world.get_mut::<Collider>(entity) {
        collider.enabled = false;
    }
    let grenade_timer = world
        .get_mut::<Grenade>(entity)
        .and_then(|mut g| g.scheduled_deactivation.take());
    if let Some(mut scheduler) = world.get_resource_mut::<Scheduler>() {
        for handle in pending.into_iter().chain(grenade_timer) {
            scheduler.cancel(handle);
        }
    }
    if let Some(mut destructible) = world.get_mut::<Destructible>(entity) {
        destructible.state = DestructibleState::Inactive;
    }

    world.trigger(DestructedEvent {
        entity,
        point,
        normal,
        spawned,
    });
    destroy_with_strategy(world, entity);
    true
}
