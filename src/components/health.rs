//! Hit points of a damageable object.
//!
//! The impact pipeline looks for a [`Health`] on the hit collider or its
//! nearest ancestor. When one exists it takes the damage and the knockback is
//! applied to the same owner; otherwise the force goes straight to a physics
//! body or force receiver.

use bevy_ecs::prelude::{Component, Entity};
use glam::Vec3;

/// Everything known about a single damage application.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageRecord {
    pub amount: f32,
    /// World-space point of impact.
    pub position: Vec3,
    /// Direction the knockback pushes in.
    pub direction: Vec3,
    pub force: f32,
    /// Number of fixed steps the knockback is spread across.
    pub force_frames: u32,
    /// Blast radius, zero for direct hits.
    pub radius: f32,
    pub originator: Option<Entity>,
    pub collider: Option<Entity>,
}

#[derive(Component, Clone, Debug)]
pub struct Health {
    pub value: f32,
    pub max: f32,
    /// Most recent damage taken, if any.
    pub last_damage: Option<DamageRecord>,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            value: max,
            max,
            last_damage: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.value > 0.0
    }

    /// Subtract `record.amount` (never below zero) and return the amount actually removed.
    pub fn damage(&mut self, record: DamageRecord) -> f32 {
        let before = self.value;
        self.value = (self.value - record.amount.max(0.0)).max(0.0);
        self.last_damage = Some(record);
        before - self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(amount: f32) -> DamageRecord {
        DamageRecord {
            amount,
            position: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            force: 0.0,
            force_frames: 1,
            radius: 0.0,
            originator: None,
            collider: None,
        }
    }

    #[test]
    fn damage_clamps_at_zero() {
        let mut health = Health::new(30.0);
        assert_eq!(health.damage(record(20.0)), 20.0);
        assert_eq!(health.damage(record(20.0)), 10.0);
        assert_eq!(health.value, 0.0);
        assert!(!health.is_alive());
        assert_eq!(health.last_damage.map(|d| d.amount), Some(20.0));
    }
}
