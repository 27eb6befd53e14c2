//! Local 3D transform of an entity.
//!
//! When an entity has a [`ChildOf`](bevy_ecs::hierarchy::ChildOf) parent, its
//! [`Transform`] is interpreted as local to the parent. World-space values are
//! composed on demand by [`crate::systems::hierarchy`].

use bevy_ecs::prelude::Component;
use glam::{Affine3A, Quat, Vec3};

/// Tolerance used when deciding whether a scale is uniform.
const UNIFORM_SCALE_EPSILON: f32 = 1e-4;

/// Translation, rotation and scale relative to the parent (or the world for roots).
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn from_translation_rotation(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
            scale: Vec3::ONE,
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn to_affine(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    pub fn from_affine(affine: Affine3A) -> Self {
        let (scale, rotation, translation) = affine.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Local +Y axis.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Local +Z axis.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// True when all three scale components are (nearly) equal.
    ///
    /// Parenting under a non-uniform scale would shear the child, so sticky
    /// attachment is only allowed on uniform transforms.
    pub fn is_uniform_scale(&self) -> bool {
        let s = self.scale;
        (s.x - s.y).abs() < UNIFORM_SCALE_EPSILON && (s.x - s.z).abs() < UNIFORM_SCALE_EPSILON
    }
}
