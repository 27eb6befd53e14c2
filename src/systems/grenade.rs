//! Grenade cooking, detonation and pin handling.
//!
//! A grenade is an entity carrying both [`Grenade`] and [`Destructible`].
//! Cooking schedules [`deactivate`] on the frame lane; deactivation destroys
//! the grenade without a hit while its collider sits on the ignore-raycast
//! layer, so the explosion it spawns does not find the grenade itself.

use bevy_ecs::hierarchy::ChildOf;
use bevy_ecs::prelude::*;
use log::debug;

use crate::components::collider::{Collider, layers};
use crate::components::destructible::Destructible;
use crate::components::grenade::Grenade;
use crate::components::pooled::LifetimeToken;
use crate::components::transform::Transform;
use crate::error::SimError;
use crate::resources::scheduler::{ScheduleHandle, Scheduler};
use crate::systems::destructible::destruct;
use crate::systems::hierarchy::set_parent_keep_world;

/// Start the cook timer. A grenade that was already cooking restarts.
pub fn start_cooking(
    world: &mut World,
    entity: Entity,
    originator: Option<Entity>,
) -> Result<ScheduleHandle, SimError> {
    if world.get::<Grenade>(entity).is_none() {
        return Err(SimError::missing::<Grenade>(entity));
    }
    let Some(mut destructible) = world.get_mut::<Destructible>(entity) else {
        return Err(SimError::missing::<Destructible>(entity));
    };
    destructible.originator = originator;

    let (lifespan, previous) = world
        .get_mut::<Grenade>(entity)
        .map(|mut g| (g.lifespan, g.scheduled_deactivation.take()))
        .unwrap_or_default();

    let token = LifetimeToken::current(world, entity);
    let handle = {
        let mut scheduler = world.get_resource_or_init::<Scheduler>();
        if let Some(previous) = previous {
            scheduler.cancel(previous);
        }
        scheduler.schedule(lifespan, move |world| {
            if token.is_current(world) {
                deactivate(world, token.entity);
            } else {
                debug!("grenade {:?} was recycled before its fuse ran out", token.entity);
            }
        })
    };
    if let Some(mut grenade) = world.get_mut::<Grenade>(entity) {
        grenade.scheduled_deactivation = Some(handle);
    }
    debug!("grenade {:?} cooking for {}s", entity, lifespan);
    Ok(handle)
}

/// Detonate now. Returns false if the grenade was already destroyed.
pub fn deactivate(world: &mut World, entity: Entity) -> bool {
    let pending = world
        .get_mut::<Grenade>(entity)
        .and_then(|mut g| g.scheduled_deactivation.take());
    if let Some(handle) = pending
        && let Some(mut scheduler) = world.get_resource_mut::<Scheduler>()
    {
        scheduler.cancel(handle);
    }

    let previous_layer = world.get_mut::<Collider>(entity).map(|mut collider| {
        let layer = collider.layer;
        collider.layer = layers::IGNORE_RAYCAST;
        layer
    });
    let destroyed = destruct(world, entity, None);
    if let Some(layer) = previous_layer
        && let Some(mut collider) = world.get_mut::<Collider>(entity)
    {
        collider.layer = layer;
    }
    destroyed
}

/// Move the pin to `attach_to`, or put it back where it started when `None`.
///
/// Reattaching restores the recorded local translation and rotation exactly.
/// Does nothing if the grenade has no pin.
pub fn detach_attach_pin(world: &mut World, entity: Entity, attach_to: Option<Entity>) {
    let Some((pin, origin)) = world
        .get::<Grenade>(entity)
        .and_then(|g| Some((g.pin?, g.pin_origin?)))
    else {
        return;
    };
    if world.get_entity(pin).is_err() {
        return;
    }

    match attach_to {
        Some(target) => set_parent_keep_world(world, pin, target),
        None => {
            let mut pin_entity = world.entity_mut(pin);
            let scale = pin_entity
                .get::<Transform>()
                .map(|t| t.scale)
                .unwrap_or(glam::Vec3::ONE);
            pin_entity.insert((
                ChildOf(origin.parent),
                Transform {
                    translation: origin.local_translation,
                    rotation: origin.local_rotation,
                    scale,
                },
            ));
        }
    }
}
