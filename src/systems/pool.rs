//! World-facing object pool operations.
//!
//! [`instantiate`] draws an instance of a prefab, building a fresh one from
//! the [`PrefabLibrary`] when nothing is parked. Every draw runs the reacquire
//! reset, so an instance never carries state from its previous use:
//!
//! - the [`Pooled`] generation is bumped, invalidating old [`LifetimeToken`]s
//! - the grenade pin is reattached before anything else moves
//! - parent link, transform, collider, trail and particles are reset
//! - the destructible is re-enabled in `Inactive`, shields are recharged
//!
//! [`destroy_with_strategy`] is the only way pipeline code returns objects;
//! the [`PoolStrategy`] resource decides whether the despawn is also queued
//! for replication.
//!
//! [`LifetimeToken`]: crate::components::pooled::LifetimeToken

use bevy_ecs::hierarchy::{ChildOf, Children};
use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};
use log::{debug, info, warn};

use crate::components::collider::Collider;
use crate::components::destructible::{ArmedImpact, Destructible, DestructibleState};
use crate::components::effects::{ParticleEmitter, Trail};
use crate::components::explosion::Explosion;
use crate::components::grenade::{Grenade, PinOrigin};
use crate::components::pooled::Pooled;
use crate::components::shield::Shield;
use crate::components::trajectory::Trajectory;
use crate::components::transform::Transform;
use crate::error::SimError;
use crate::resources::network::{NetworkDespawn, NetworkObjectPool, PoolStrategy};
use crate::resources::objectpool::ObjectPool;
use crate::resources::prefabs::{PrefabDef, PrefabLibrary};
use crate::resources::scheduler::Scheduler;
use crate::systems::grenade::detach_attach_pin;
use crate::systems::hierarchy::clear_parent_keep_world;

/// Draw an instance of `prefab` placed at `position` / `rotation`.
pub fn instantiate(
    world: &mut World,
    prefab: &str,
    position: Vec3,
    rotation: Quat,
) -> Result<Entity, SimError> {
    let def = world
        .get_resource::<PrefabLibrary>()
        .and_then(|library| library.get(prefab))
        .cloned()
        .ok_or_else(|| SimError::UnknownPrefab(prefab.to_string()))?;

    let acquired = world.get_resource_or_init::<ObjectPool>().acquire(prefab);
    if let Some(entity) = acquired {
        reacquire(world, entity, position, rotation);
        debug!("reused pooled '{}' as {:?}", prefab, entity);
        return Ok(entity);
    }

    let pool = world.resource::<ObjectPool>();
    if !pool.can_grow(prefab) {
        let capacity = pool.capacity().unwrap_or(0);
        warn!("pool for '{}' is exhausted ({} instances)", prefab, capacity);
        return Err(SimError::PoolExhausted {
            prefab: prefab.to_string(),
            capacity,
        });
    }

    let entity = spawn_prefab(world, &def, position, rotation);
    world.resource_mut::<ObjectPool>().register(entity, prefab);
    debug!("built new '{}' as {:?}", prefab, entity);
    Ok(entity)
}

/// Build `count` parked instances of `prefab` ahead of time.
///
/// Stops early at the pool capacity. Returns how many were built.
pub fn prewarm(world: &mut World, prefab: &str, count: usize) -> Result<usize, SimError> {
    let def = world
        .get_resource::<PrefabLibrary>()
        .and_then(|library| library.get(prefab))
        .cloned()
        .ok_or_else(|| SimError::UnknownPrefab(prefab.to_string()))?;

    let mut built = 0;
    for _ in 0..count {
        if !world.get_resource_or_init::<ObjectPool>().can_grow(prefab) {
            warn!("prewarm of '{}' stopped at pool capacity", prefab);
            break;
        }
        let entity = spawn_prefab(world, &def, Vec3::ZERO, Quat::IDENTITY);
        {
            let mut pool = world.resource_mut::<ObjectPool>();
            pool.register(entity, prefab);
            pool.release(entity);
        }
        if let Some(mut pooled) = world.get_mut::<Pooled>(entity) {
            pooled.active = false;
        }
        built += 1;
    }
    info!("prewarmed {} x '{}'", built, prefab);
    Ok(built)
}

/// Build a fresh instance from its definition. The collider starts disabled.
fn spawn_prefab(world: &mut World, def: &PrefabDef, position: Vec3, rotation: Quat) -> Entity {
    let id = {
        let mut entity = world.spawn((
            Transform::from_translation_rotation(position, rotation),
            Collider::new(def.collider_radius)
                .with_layer(def.layer)
                .disabled(),
            Pooled {
                prefab: def.name.clone(),
                active: true,
                generation: 0,
            },
        ));

        if def.trail {
            entity.insert(Trail::default());
        }
        if def.particles {
            entity.insert(ParticleEmitter::default());
        }
        if let Some(t) = &def.trajectory {
            entity.insert(
                Trajectory::default()
                    .with_gravity(t.gravity)
                    .with_drag(t.drag)
                    .with_bounce(t.bounce_mode, t.bounce_multiplier),
            );
        }
        if let Some(d) = &def.destructible {
            let mut destructible = Destructible::default()
                .with_destroy_on_collision(d.destroy_on_collision)
                .with_destruction_delay(d.destruction_delay);
            destructible.spawned_objects_on_destruction = d.spawned_objects_on_destruction.clone();
            destructible.surface_impact = d.surface_impact.clone();
            entity.insert(destructible);
        }
        if let Some(e) = &def.explosion {
            entity.insert(Explosion {
                lifetime: e.lifetime.max(0.0),
                impact_layers: e.impact_layers,
                falloff: e.falloff,
                ..Explosion::new(e.radius)
            });
        }
        entity.id()
    };

    if let Some(g) = &def.grenade {
        let mut grenade = Grenade::new(g.lifespan);
        if let Some(pin) = &g.pin {
            let pin_entity = world
                .spawn((
                    Transform::from_translation_rotation(pin.local_translation, pin.local_rotation),
                    ChildOf(id),
                ))
                .id();
            grenade = grenade.with_pin(
                pin_entity,
                PinOrigin {
                    parent: id,
                    local_translation: pin.local_translation,
                    local_rotation: pin.local_rotation,
                },
            );
        }
        world.entity_mut(id).insert(grenade);
    }
    id
}

/// Reset a parked instance for its next use.
fn reacquire(world: &mut World, entity: Entity, position: Vec3, rotation: Quat) {
    detach_attach_pin(world, entity, None);

    let pending = {
        let Ok(mut e) = world.get_entity_mut(entity) else {
            return;
        };
        e.remove::<ChildOf>();

        if let Some(mut pooled) = e.get_mut::<Pooled>() {
            pooled.active = true;
            pooled.generation = pooled.generation.wrapping_add(1);
        }
        if let Some(mut transform) = e.get_mut::<Transform>() {
            transform.translation = position;
            transform.rotation = rotation;
        }
        if let Some(mut collider) = e.get_mut::<Collider>() {
            collider.enabled = false;
        }
        if let Some(mut trail) = e.get_mut::<Trail>() {
            trail.clear();
            trail.enabled = false;
        }
        if let Some(mut particles) = e.get_mut::<ParticleEmitter>() {
            particles.stop();
        }
        if let Some(mut trajectory) = e.get_mut::<Trajectory>() {
            trajectory.stop();
            trajectory.started = false;
            trajectory.originator = None;
        }
        if let Some(mut shield) = e.get_mut::<Shield>() {
            shield.reset();
        }
        if let Some(mut explosion) = e.get_mut::<Explosion>() {
            explosion.exploded = false;
        }

        let mut pending = Vec::new();
        if let Some(mut destructible) = e.get_mut::<Destructible>() {
            destructible.enabled = true;
            destructible.state = DestructibleState::Inactive;
            destructible.armed = ArmedImpact::default();
            destructible.originator = None;
            pending.extend(destructible.pending_destruction.take());
        }
        if let Some(mut grenade) = e.get_mut::<Grenade>() {
            pending.extend(grenade.scheduled_deactivation.take());
        }
        pending
    };

    if let Some(mut scheduler) = world.get_resource_mut::<Scheduler>() {
        for handle in pending {
            scheduler.cancel(handle);
        }
    }
}

/// Return an object locally.
///
/// Pooled instances are parked; returns false if the instance is already
/// parked. Entities that did not come from the pool are despawned, after
/// any pooled objects attached below them are detached and parked.
pub fn destroy(world: &mut World, entity: Entity) -> bool {
    if world.get_entity(entity).is_err() {
        debug!("destroy: {:?} no longer exists", entity);
        return false;
    }
    if world.get::<Pooled>(entity).is_none() {
        for attached in pooled_descendants(world, entity) {
            clear_parent_keep_world(world, attached);
            destroy(world, attached);
        }
        if let Ok(e) = world.get_entity_mut(entity) {
            e.despawn();
        }
        return true;
    }

    let released = world
        .get_resource_mut::<ObjectPool>()
        .is_some_and(|mut pool| pool.release(entity));
    if !released {
        debug!("destroy: {:?} is already in the pool", entity);
        return false;
    }

    if let Ok(mut e) = world.get_entity_mut(entity) {
        e.remove::<ChildOf>();
        if let Some(mut pooled) = e.get_mut::<Pooled>() {
            pooled.active = false;
        }
        if let Some(mut collider) = e.get_mut::<Collider>() {
            collider.enabled = false;
        }
        if let Some(mut trajectory) = e.get_mut::<Trajectory>() {
            trajectory.stop();
        }
    }
    true
}

/// Topmost pooled entities in the hierarchy below `root`.
///
/// The search does not descend into a pooled entity; its own children travel
/// with it into the pool.
fn pooled_descendants(world: &World, root: Entity) -> Vec<Entity> {
    let mut found = Vec::new();
    let mut stack = vec![root];
    while let Some(current) = stack.pop() {
        let Some(children) = world.get::<Children>(current) else {
            continue;
        };
        let children: &[Entity] = children;
        for &child in children {
            if world.get::<Pooled>(child).is_some() {
                found.push(child);
            } else {
                stack.push(child);
            }
        }
    }
    found
}

/// Return an object through the configured [`PoolStrategy`].
pub fn destroy_with_strategy(world: &mut World, entity: Entity) -> bool {
    let strategy = world
        .get_resource::<PoolStrategy>()
        .copied()
        .unwrap_or_default();
    let record = world.get::<Pooled>(entity).map(|p| NetworkDespawn {
        entity,
        prefab: Some(p.prefab.clone()),
        generation: p.generation,
    });

    if !destroy(world, entity) {
        return false;
    }

    if strategy == PoolStrategy::Networked {
        let record = record.unwrap_or(NetworkDespawn {
            entity,
            prefab: None,
            generation: 0,
        });
        debug!("queued network despawn for {:?}", entity);
        world
            .get_resource_or_init::<NetworkObjectPool>()
            .outbox
            .push(record);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::pooled::LifetimeToken;
    use crate::resources::prefabs::{DestructibleDef, GrenadeDef, PinDef};
    use crate::systems::hierarchy::set_parent_keep_world;

    fn setup(capacity: usize) -> World {
        let mut world = World::new();
        world.insert_resource(ObjectPool::with_capacity(capacity));
        world.insert_resource(Scheduler::new());
        let mut frag = PrefabDef::projectile("frag");
        frag.grenade = Some(GrenadeDef {
            lifespan: 3.0,
            pin: Some(PinDef {
                local_translation: Vec3::new(0.0, 0.1, 0.0),
                local_rotation: Quat::IDENTITY,
            }),
        });
        world.insert_resource(
            PrefabLibrary::new()
                .with(PrefabDef::projectile("bullet"))
                .with(frag),
        );
        world
    }

    #[test]
    fn unknown_prefab_is_an_error() {
        let mut world = setup(4);
        let err = instantiate(&mut world, "nope", Vec3::ZERO, Quat::IDENTITY).unwrap_err();
        assert!(matches!(err, SimError::UnknownPrefab(name) if name == "nope"));
    }

    #[test]
    fn built_instance_has_prefab_capabilities() {
        let mut world = setup(4);
        let e = instantiate(&mut world, "bullet", Vec3::X, Quat::IDENTITY).unwrap();
        assert!(world.get::<Trajectory>(e).is_some());
        assert!(world.get::<Destructible>(e).is_some());
        assert!(!world.get::<Collider>(e).unwrap().enabled);
        assert_eq!(world.get::<Transform>(e).unwrap().translation, Vec3::X);
    }

    #[test]
    fn capacity_is_enforced() {
        let mut world = setup(1);
        instantiate(&mut world, "bullet", Vec3::ZERO, Quat::IDENTITY).unwrap();
        let err = instantiate(&mut world, "bullet", Vec3::ZERO, Quat::IDENTITY).unwrap_err();
        assert!(matches!(err, SimError::PoolExhausted { capacity: 1, .. }));
    }

    #[test]
    fn reacquire_resets_and_bumps_generation() {
        let mut world = setup(4);
        let e = instantiate(&mut world, "bullet", Vec3::ZERO, Quat::IDENTITY).unwrap();
        let token = LifetimeToken::current(&world, e);
        world.get_mut::<Destructible>(e).unwrap().enabled = false;
        world.get_mut::<Destructible>(e).unwrap().state = DestructibleState::PendingDestruction;

        assert!(destroy(&mut world, e));
        assert!(!token.is_current(&world));
        assert!(!destroy(&mut world, e));

        let again = instantiate(&mut world, "bullet", Vec3::Y, Quat::IDENTITY).unwrap();
        assert_eq!(again, e);
        assert!(!token.is_current(&world));
        assert!(LifetimeToken::current(&world, e).is_current(&world));
        let d = world.get::<Destructible>(e).unwrap();
        assert!(d.is_enabled());
        assert_eq!(d.state(), DestructibleState::Inactive);
        assert_eq!(world.get::<Transform>(e).unwrap().translation, Vec3::Y);
    }

    #[test]
    fn grenade_gets_a_pin_child() {
        let mut world = setup(4);
        let g = instantiate(&mut world, "frag", Vec3::ZERO, Quat::IDENTITY).unwrap();
        let grenade = world.get::<Grenade>(g).unwrap();
        let pin = grenade.pin.unwrap();
        assert_eq!(grenade.pin_origin().unwrap().parent, g);
        assert_eq!(world.get::<ChildOf>(pin).map(|c| c.parent()), Some(g));
    }

    #[test]
    fn prewarm_parks_instances() {
        let mut world = setup(3);
        assert_eq!(prewarm(&mut world, "bullet", 5).unwrap(), 3);
        let pool = world.resource::<ObjectPool>();
        assert_eq!(pool.available("bullet"), 3);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn non_pooled_entities_are_despawned() {
        let mut world = setup(1);
        let e = world.spawn(Transform::IDENTITY).id();
        assert!(destroy(&mut world, e));
        assert!(world.get_entity(e).is_err());
        assert!(!destroy(&mut world, e));
    }

    #[test]
    fn despawned_target_hands_stuck_projectiles_back_to_the_pool() {
        let mut world = setup(1);
        let mut slug = PrefabDef::projectile("slug");
        slug.destructible = Some(DestructibleDef {
            destroy_on_collision: false,
            ..DestructibleDef::default()
        });
        world.resource_mut::<PrefabLibrary>().insert(slug);

        let target = world
            .spawn(Transform::from_translation(Vec3::new(0.0, 0.0, 5.0)))
            .id();
        let limb = world
            .spawn((Transform::from_translation(Vec3::Y), ChildOf(target)))
            .id();
        let e = instantiate(&mut world, "slug", Vec3::new(0.0, 1.0, 4.5), Quat::IDENTITY).unwrap();
        set_parent_keep_world(&mut world, e, limb);

        assert!(destroy(&mut world, target));
        assert!(world.get_entity(target).is_err());
        assert!(world.get_entity(limb).is_err());
        assert!(world.get::<ChildOf>(e).is_none());
        let pool = world.resource::<ObjectPool>();
        assert!(!pool.is_active(e));
        assert_eq!(pool.available("slug"), 1);
        assert_eq!(pool.active_count(), 0);

        let again = instantiate(&mut world, "slug", Vec3::ZERO, Quat::IDENTITY).unwrap();
        assert_eq!(again, e);
    }

    #[test]
    fn networked_strategy_fills_outbox() {
        let mut world = setup(2);
        world.insert_resource(PoolStrategy::Networked);
        let e = instantiate(&mut world, "bullet", Vec3::ZERO, Quat::IDENTITY).unwrap();
        assert!(destroy_with_strategy(&mut world, e));
        assert!(!destroy_with_strategy(&mut world, e));

        let outbox = world.resource_mut::<NetworkObjectPool>().drain();
        assert_eq!(outbox.len(), 1);
        assert_eq!(outbox[0].entity, e);
        assert_eq!(outbox[0].prefab.as_deref(), Some("bullet"));
    }

    #[test]
    fn destructible_def_settings_are_applied() {
        let mut world = setup(2);
        let mut def = PrefabDef::projectile("sticky");
        def.destructible = Some(DestructibleDef {
            destroy_on_collision: false,
            destruction_delay: 2.0,
            ..DestructibleDef::default()
        });
        world.resource_mut::<PrefabLibrary>().insert(def);
        let e = instantiate(&mut world, "sticky", Vec3::ZERO, Quat::IDENTITY).unwrap();
        let d = world.get::<Destructible>(e).unwrap();
        assert!(!d.destroy_on_collision);
        assert_eq!(d.destruction_delay, 2.0);
    }
}
