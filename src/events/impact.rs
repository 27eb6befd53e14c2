//! Impact notifications.
//!
//! Every processed collision or explosion hit triggers an [`ImpactEvent`]
//! through [`World::trigger`](bevy_ecs::world::World::trigger). Observers can
//! subscribe to react in a decoupled way (surface effects, hit markers, audio).
//! The event fires even when the hit side has no collider; `target` is then
//! `None`.

use bevy_ecs::prelude::*;
use glam::Vec3;

#[derive(Event, Debug, Clone, PartialEq)]
pub struct ImpactEvent {
    /// The destructible or explosion that caused the impact.
    pub source: Entity,
    /// Hit collider, if there was one.
    pub target: Option<Entity>,
    /// Damage left after shield absorption.
    pub damage: f32,
    pub point: Vec3,
    pub normal: Vec3,
    /// Hit normal scaled by the impact force.
    pub force: Vec3,
    pub originator: Option<Entity>,
    pub surface_impact: Option<String>,
    pub explosion: bool,
}
