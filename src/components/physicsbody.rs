//! Dynamic body that accumulates forces from impacts.
//!
//! Only the accumulation is modelled; integrating the forces into motion is
//! the host physics engine's job. A kinematic body ignores forces entirely,
//! which makes the impact pipeline fall through to a
//! [`ForceReceiver`](super::forcereceiver::ForceReceiver).

use bevy_ecs::prelude::Component;
use glam::Vec3;
use smallvec::SmallVec;

/// A force applied at a world-space point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointForce {
    pub force: Vec3,
    pub position: Vec3,
}

#[derive(Component, Clone, Debug)]
pub struct PhysicsBody {
    pub mass: f32,
    pub kinematic: bool,
    /// Forces received since the host last drained them.
    pub pending: SmallVec<[PointForce; 4]>,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl PhysicsBody {
    pub fn new(mass: f32) -> Self {
        Self {
            mass,
            kinematic: false,
            pending: SmallVec::new(),
        }
    }

    pub fn kinematic(mut self) -> Self {
        self.kinematic = true;
        self
    }

    pub fn add_force_at_position(&mut self, force: Vec3, position: Vec3) {
        if self.kinematic {
            return;
        }
        self.pending.push(PointForce { force, position });
    }

    /// Sum of all pending forces.
    pub fn total_force(&self) -> Vec3 {
        self.pending.iter().map(|f| f.force).sum()
    }

    pub fn drain(&mut self) -> SmallVec<[PointForce; 4]> {
        std::mem::take(&mut self.pending)
    }
}
