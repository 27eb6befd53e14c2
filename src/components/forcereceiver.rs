use bevy_ecs::prelude::Component;
use glam::Vec3;
use smallvec::SmallVec;

/// A force spread over a number of fixed steps.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameForce {
    pub force: Vec3,
    pub frames: u32,
}

/// Generic receiver for objects that move themselves (characters, kinematic
/// rigs) and want impact forces as input rather than as physics.
#[derive(Component, Clone, Debug, Default)]
pub struct ForceReceiver {
    pub pending: SmallVec<[FrameForce; 4]>,
}

impl ForceReceiver {
    pub fn add_force(&mut self, force: Vec3, frames: u32) {
        self.pending.push(FrameForce {
            force,
            frames: frames.max(1),
        });
    }

    pub fn total_force(&self) -> Vec3 {
        self.pending.iter().map(|f| f.force).sum()
    }
}
