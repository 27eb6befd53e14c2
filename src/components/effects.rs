//! Visual effect state carried by flying objects.
//!
//! Rendering is left to the host; these components only track whether the
//! effect should be visible and, for the trail, the points it passes through.
//! The destructible pipeline restarts both effects when armed and stops them
//! on collision.

use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Maximum number of points kept by a [`Trail`].
pub const MAX_TRAIL_POINTS: usize = 64;

#[derive(Component, Clone, Debug, Default)]
pub struct Trail {
    pub enabled: bool,
    pub points: Vec<Vec3>,
}

impl Trail {
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Record a point while enabled, dropping the oldest past [`MAX_TRAIL_POINTS`].
    pub fn push(&mut self, point: Vec3) {
        if !self.enabled {
            return;
        }
        if self.points.len() == MAX_TRAIL_POINTS {
            self.points.remove(0);
        }
        self.points.push(point);
    }
}

#[derive(Component, Clone, Debug, Default)]
pub struct ParticleEmitter {
    pub playing: bool,
}

impl ParticleEmitter {
    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }
}
