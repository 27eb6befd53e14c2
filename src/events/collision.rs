//! Collision hit records delivered by the physics step.
//!
//! A [`HitRecord`] describes one contact between a moving object and
//! something it ran into. The hit side may have no collider at all (e.g. a
//! ray that hit world geometry the simulation does not model); the pipeline
//! treats that as a valid hit with no capabilities.

use bevy_ecs::prelude::Entity;
use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRecord {
    /// World-space contact point.
    pub point: Vec3,
    /// Surface normal at the contact point, pointing away from the hit object.
    pub normal: Vec3,
    /// Collider that was hit, if any.
    pub collider: Option<Entity>,
    /// Transform the collider belongs to; sticky attachment parents to this.
    pub transform: Option<Entity>,
}

impl HitRecord {
    /// Hit against a collider whose own entity is also its transform.
    pub fn on(entity: Entity, point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal,
            collider: Some(entity),
            transform: Some(entity),
        }
    }

    /// Hit with nothing known about the other side.
    pub fn bare(point: Vec3, normal: Vec3) -> Self {
        Self {
            point,
            normal,
            collider: None,
            transform: None,
        }
    }
}
