use bevy_ecs::prelude::*;
use glam::Vec3;
use smallvec::SmallVec;

/// Emitted once per explosion after all hits have been applied.
#[derive(Event, Debug, Clone)]
pub struct ExplosionEvent {
    pub entity: Entity,
    pub position: Vec3,
    pub radius: f32,
    /// Colliders that were inside the blast, one per damage owner.
    pub hits: SmallVec<[Entity; 8]>,
    pub originator: Option<Entity>,
}
