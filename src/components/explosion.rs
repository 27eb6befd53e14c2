//! Explosion-capable object.
//!
//! Usually spawned by a destructible on destruction. When
//! [`explode`](crate::systems::explosion::explode) runs it damages and pushes
//! everything with an enabled collider inside `radius` whose layer is in
//! `impact_layers`, then returns itself to the pool after `lifetime` seconds.

use bevy_ecs::prelude::{Component, Entity};

use crate::components::collider::LayerMask;

#[derive(Component, Clone, Debug)]
pub struct Explosion {
    pub radius: f32,
    /// Seconds the explosion lingers before going back to the pool.
    pub lifetime: f32,
    /// The default mask skips `IGNORE_RAYCAST`, which is how a detonating
    /// grenade keeps itself out of its own blast.
    pub impact_layers: LayerMask,
    /// Scale damage and force down linearly with distance.
    pub falloff: bool,
    /// Set once the explosion has gone off for the current use.
    pub(crate) exploded: bool,
}

impl Default for Explosion {
    fn default() -> Self {
        Self {
            radius: 5.0,
            lifetime: 3.0,
            impact_layers: LayerMask::DEFAULT_OVERLAP,
            falloff: true,
            exploded: false,
        }
    }
}

impl Explosion {
    pub fn new(radius: f32) -> Self {
        Self {
            radius: radius.max(0.0),
            ..Self::default()
        }
    }

    pub fn has_exploded(&self) -> bool {
        self.exploded
    }

    /// Damage multiplier at `distance` from the centre, in `[0, 1]`.
    pub fn falloff_at(&self, distance: f32) -> f32 {
        if !self.falloff || self.radius <= 0.0 {
            return 1.0;
        }
        (1.0 - distance / self.radius).clamp(0.0, 1.0)
    }
}

/// What the destroyed object hands over to the explosion it spawned.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExplosionParams {
    pub damage: f32,
    pub impact_force: f32,
    pub impact_force_frames: u32,
    pub originator: Option<Entity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falloff_is_linear_and_clamped() {
        let e = Explosion::new(10.0);
        assert_eq!(e.falloff_at(0.0), 1.0);
        assert!((e.falloff_at(2.5) - 0.75).abs() < 1e-6);
        assert_eq!(e.falloff_at(15.0), 0.0);

        let flat = Explosion {
            falloff: false,
            ..Explosion::new(10.0)
        };
        assert_eq!(flat.falloff_at(9.0), 1.0);
    }
}
