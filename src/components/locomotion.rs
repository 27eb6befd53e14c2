//! Character locomotion sub-collider registry.
//!
//! Objects that stick to a character (arrows, darts) register their collider
//! as a *sub collider* so the character's own collision responses skip it.
//! Trajectories fired by the character skip its sub colliders as well.

use bevy_ecs::prelude::{Component, Entity};
use smallvec::SmallVec;

#[derive(Component, Clone, Debug, Default)]
pub struct CharacterLocomotion {
    sub_colliders: SmallVec<[Entity; 4]>,
}

impl CharacterLocomotion {
    /// Register `collider`. Registering twice has no further effect.
    pub fn add_sub_collider(&mut self, collider: Entity) {
        if !self.sub_colliders.contains(&collider) {
            self.sub_colliders.push(collider);
        }
    }

    /// Returns true if the collider was registered.
    pub fn remove_sub_collider(&mut self, collider: Entity) -> bool {
        if let Some(index) = self.sub_colliders.iter().position(|c| *c == collider) {
            self.sub_colliders.swap_remove(index);
            true
        } else {
            false
        }
    }

    pub fn has_sub_collider(&self, collider: Entity) -> bool {
        self.sub_colliders.contains(&collider)
    }

    pub fn sub_colliders(&self) -> &[Entity] {
        &self.sub_colliders
    }
}
