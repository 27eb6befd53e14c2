//! Kinematic flight state of a free-flying object.
//!
//! The [`Trajectory`] component is integrated once per fixed step by
//! [`crate::systems::trajectory::trajectory_step`]: gravity and drag change
//! the velocity, the velocity moves the transform, torque spins it. The step
//! sweeps the object's collider along its path and reports the first hit to
//! the destructible pipeline.

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::components::collider::LayerMask;

/// What happens to the velocity when the object hits something.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BounceMode {
    /// Stop at the hit point. Destructibles may stick to what they hit.
    #[default]
    None,
    /// Reflect the velocity about the hit normal.
    Reflect,
}

#[derive(Component, Clone, Debug)]
pub struct Trajectory {
    pub velocity: Vec3,
    /// Angular velocity in radians per second around each axis.
    pub torque: Vec3,
    /// Acceleration applied every step.
    pub gravity: Vec3,
    /// Linear damping: `velocity *= 1 - drag * dt`.
    pub drag: f32,
    pub bounce_mode: BounceMode,
    /// Speed kept after a reflection, in `[0, 1]`.
    pub bounce_multiplier: f32,
    /// Layers the object can collide with.
    pub impact_layers: LayerMask,
    /// Who launched the object. Its colliders are never hit.
    pub originator: Option<Entity>,
    /// True between launch and the stopping collision.
    pub moving: bool,
    /// True once the first motion step after launch has run.
    pub(crate) started: bool,
}

impl Default for Trajectory {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            torque: Vec3::ZERO,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            drag: 0.0,
            bounce_mode: BounceMode::None,
            bounce_multiplier: 0.5,
            impact_layers: LayerMask::DEFAULT_OVERLAP,
            originator: None,
            moving: false,
            started: false,
        }
    }
}

impl Trajectory {
    pub fn with_gravity(mut self, gravity: Vec3) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_drag(mut self, drag: f32) -> Self {
        self.drag = drag.max(0.0);
        self
    }

    pub fn with_bounce(mut self, mode: BounceMode, multiplier: f32) -> Self {
        self.bounce_mode = mode;
        self.bounce_multiplier = multiplier.clamp(0.0, 1.0);
        self
    }

    /// Start moving. The collider is re-enabled on the first motion step.
    pub fn launch(&mut self, velocity: Vec3, torque: Vec3, originator: Option<Entity>) {
        self.velocity = velocity;
        self.torque = torque;
        self.originator = originator;
        self.moving = true;
        self.started = false;
    }

    pub fn stop(&mut self) {
        self.velocity = Vec3::ZERO;
        self.torque = Vec3::ZERO;
        self.moving = false;
    }

    /// Velocity after one step of gravity and drag.
    pub fn integrate_velocity(&self, dt: f32) -> Vec3 {
        let v = self.velocity + self.gravity * dt;
        v * (1.0 - self.drag * dt).max(0.0)
    }

    /// Velocity leaving a surface with the given normal.
    pub fn reflect(&self, velocity: Vec3, normal: Vec3) -> Vec3 {
        let n = normal.normalize_or_zero();
        (velocity - 2.0 * velocity.dot(n) * n) * self.bounce_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gravity_and_drag_integrate() {
        let mut t = Trajectory::default()
            .with_gravity(Vec3::new(0.0, -10.0, 0.0))
            .with_drag(0.5);
        t.velocity = Vec3::new(4.0, 0.0, 0.0);
        let v = t.integrate_velocity(0.1);
        assert!((v - Vec3::new(3.8, -0.95, 0.0)).length() < 1e-5);
    }

    #[test]
    fn reflect_flips_normal_component() {
        let t = Trajectory::default().with_bounce(BounceMode::Reflect, 1.0);
        let v = t.reflect(Vec3::new(1.0, -2.0, 0.0), Vec3::Y);
        assert!((v - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-6);
    }
}
