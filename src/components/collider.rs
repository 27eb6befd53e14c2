use bevy_ecs::prelude::Component;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Well-known collision layers.
pub mod layers {
    pub const DEFAULT: u32 = 0;
    /// Colliders on this layer are skipped by overlap queries (explosions).
    pub const IGNORE_RAYCAST: u32 = 2;
    pub const CHARACTER: u32 = 8;
}

/// Bit set of collision layers (bit `n` set means layer `n` is included).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl Default for LayerMask {
    fn default() -> Self {
        Self::DEFAULT_OVERLAP
    }
}

impl LayerMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(u32::MAX);
    /// Everything except [`layers::IGNORE_RAYCAST`].
    pub const DEFAULT_OVERLAP: Self = Self(!(1 << layers::IGNORE_RAYCAST));

    pub fn from_layers(layers: &[u32]) -> Self {
        Self(layers.iter().fold(0, |mask, layer| mask | (1 << layer)))
    }

    pub fn contains(&self, layer: u32) -> bool {
        layer < 32 && self.0 & (1 << layer) != 0
    }
}

/// Sphere collider centred on the entity's world position.
///
/// A disabled collider takes no part in sweeps or overlap queries.
#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Collider {
    pub radius: f32,
    pub enabled: bool,
    pub layer: u32,
}

impl Collider {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            enabled: true,
            layer: layers::DEFAULT,
        }
    }

    pub fn with_layer(mut self, layer: u32) -> Self {
        self.layer = layer;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Closest point on the sphere surface (or inside it) to `point`.
    pub fn closest_point(&self, center: Vec3, point: Vec3) -> Vec3 {
        let offset = point - center;
        if offset.length() <= self.radius {
            return point;
        }
        center + offset.normalize_or_zero() * self.radius
    }
}
