use bevy_ecs::prelude::*;
use glam::Vec3;
use smallvec::SmallVec;

/// Emitted when a destructible has been destroyed, just before it goes back to the pool.
#[derive(Event, Debug, Clone)]
pub struct DestructedEvent {
    pub entity: Entity,
    /// Hit point, or the object's own position when destroyed without a collision.
    pub point: Vec3,
    /// Hit normal, or the object's own up vector.
    pub normal: Vec3,
    /// Objects spawned from the spawn descriptors.
    pub spawned: SmallVec<[Entity; 4]>,
}
