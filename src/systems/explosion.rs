//! Explosion overlap and damage.
//!
//! An explosion hits every enabled collider in its layer mask whose surface
//! lies within the blast radius. Colliders that share a damage owner (the
//! nearest [`Health`], physics body or force receiver up the hierarchy) are
//! hit once, through the nearest collider. Damage and force fall off linearly
//! with distance unless falloff is disabled.
//!
//! Shields see explosion damage with `is_explosion = true`, so only shields
//! that absorb explosions take part.
//!
//! [`Health`]: crate::components::health::Health

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, info};
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::components::collider::Collider;
use crate::components::explosion::{Explosion, ExplosionParams};
use crate::components::health::DamageRecord;
use crate::components::pooled::LifetimeToken;
use crate::components::shield::Shield;
use crate::events::explosion::ExplosionEvent;
use crate::events::impact::ImpactEvent;
use crate::resources::scheduler::Scheduler;
use crate::systems::capabilities::{HitCapabilities, apply_impact_force, apply_knockback};
use crate::systems::hierarchy::world_position;
use crate::systems::pool::destroy_with_strategy;

struct BlastHit {
    collider: Entity,
    center: Vec3,
    radius: f32,
    distance: f32,
}

/// Detonate an explosion-capable entity. Returns false if it already went off.
pub fn explode(world: &mut World, entity: Entity, params: ExplosionParams) -> bool {
    let explosion = {
        let Some(mut explosion) = world.get_mut::<Explosion>(entity) else {
            return false;
        };
        if explosion.exploded {
            debug!("{:?} already exploded", entity);
            return false;
        }
        explosion.exploded = true;
        explosion.clone()
    };
    let origin = world_position(world, entity);

    let mut candidates: Vec<BlastHit> = {
        let mut query = world.query::<(Entity, &Collider)>();
        query
            .iter(world)
            .filter(|(e, c)| {
                *e != entity && c.enabled && explosion.impact_layers.contains(c.layer)
            })
            .filter_map(|(e, c)| {
                let center = world_position(world, e);
                let distance = ((center - origin).length() - c.radius).max(0.0);
                (distance <= explosion.radius).then_some(BlastHit {
                    collider: e,
                    center,
                    radius: c.radius,
                    distance,
                })
            })
            .collect()
    };
    candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let mut owners: FxHashSet<Entity> = FxHashSet::default();
    let mut hits: SmallVec<[Entity; 8]> = SmallVec::new();
    for blast in candidates {
        let caps = HitCapabilities::resolve(world, blast.collider, Some(blast.collider));
        let owner = caps
            .health
            .or(caps.body)
            .or(caps.force_receiver)
            .unwrap_or(blast.collider);
        if !owners.insert(owner) {
            continue;
        }
        hits.push(blast.collider);
        apply_blast(world, entity, &explosion, &params, origin, &blast, &caps);
    }

    info!(
        "{:?} exploded at {:?}, {} hit(s)",
        entity,
        origin,
        hits.len()
    );
    world.trigger(ExplosionEvent {
        entity,
        position: origin,
        radius: explosion.radius,
        hits,
        originator: params.originator,
    });

    let token = LifetimeToken::current(world, entity);
    world
        .get_resource_or_init::<Scheduler>()
        .schedule(explosion.lifetime, move |world| {
            if token.is_current(world) {
                destroy_with_strategy(world, token.entity);
            }
        });
    true
}

fn apply_blast(
    world: &mut World,
    source: Entity,
    explosion: &Explosion,
    params: &ExplosionParams,
    origin: Vec3,
    blast: &BlastHit,
    caps: &HitCapabilities,
) {
    let scale = explosion.falloff_at(blast.distance);
    let direction = (blast.center - origin).normalize_or(Vec3::Y);
    let point = blast.center - direction * blast.radius;
    let force = params.impact_force * scale;

    let mut damage = params.damage * scale;
    if let Some(shield_entity) = caps.shield
        && let Some(mut shield) = world.get_mut::<Shield>(shield_entity)
    {
        damage = shield.damage(damage, true);
    }

    world.trigger(ImpactEvent {
        source,
        target: Some(blast.collider),
        damage,
        point,
        normal: -direction,
        force: direction * force,
        originator: params.originator,
        surface_impact: None,
        explosion: true,
    });

    if damage > 0.0
        && let Some(health_entity) = caps.health
    {
        apply_knockback(
            world,
            health_entity,
            DamageRecord {
                amount: damage,
                position: point,
                direction,
                force,
                force_frames: params.impact_force_frames,
                radius: explosion.radius,
                originator: params.originator,
                collider: Some(blast.collider),
            },
        );
    } else if force > 0.0 {
        apply_impact_force(
            world,
            caps,
            point,
            -direction,
            direction,
            force,
            params.impact_force_frames,
        );
    }
}
