//! Pool bookkeeping carried by every pooled instance.
//!
//! The [`ObjectPool`](crate::resources::objectpool::ObjectPool) bumps
//! `generation` each time an instance is drawn from the pool. Scheduled
//! callbacks capture a [`LifetimeToken`] and check it before touching the
//! entity, so a callback scheduled for one use of an instance can never act on
//! a later use of the same entity.

use bevy_ecs::prelude::{Component, Entity};
use bevy_ecs::world::World;

#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct Pooled {
    /// Prefab the instance was built from.
    pub prefab: String,
    /// False while the instance sits in the pool.
    pub active: bool,
    pub generation: u32,
}

/// Identifies one use of an entity between two pool transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LifetimeToken {
    pub entity: Entity,
    pub generation: u32,
}

impl LifetimeToken {
    /// Token for the entity's current use. Non-pooled entities get generation 0.
    pub fn current(world: &World, entity: Entity) -> Self {
        let generation = world
            .get::<Pooled>(entity)
            .map(|p| p.generation)
            .unwrap_or(0);
        Self { entity, generation }
    }

    /// True while the entity exists and, if pooled, is still the same active use.
    pub fn is_current(&self, world: &World) -> bool {
        if world.get_entity(self.entity).is_err() {
            return false;
        }
        match world.get::<Pooled>(self.entity) {
            Some(pooled) => pooled.active && pooled.generation == self.generation,
            None => self.generation == 0,
        }
    }
}
