//! Damage-absorbing shield.
//!
//! A [`Shield`] sits on a hit collider and is consulted by the impact pipeline
//! before any damage reaches a [`Health`](super::health::Health). It owns a
//! depletable strength pool: every absorbed point of damage is subtracted from
//! `current_strength`, and once that reaches zero the shield lets everything
//! through. An invincible shield absorbs a fixed fraction forever.
//!
//! # Related
//!
//! - [`crate::systems::destructible::on_collision`] – routes projectile damage
//!   through [`Shield::damage`] with `is_explosion = false`
//! - [`crate::systems::explosion::explode`] – routes blast damage with
//!   `is_explosion = true`

use bevy_ecs::prelude::Component;

/// Shield with a strength pool that depletes as it absorbs damage.
///
/// `current_strength` is kept private so it can only move through
/// [`Shield::damage`] and [`Shield::reset`], which keeps it in `[0, strength]`.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Shield {
    /// Fraction of incoming damage absorbed, in `[0, 1]`.
    absorption_factor: f32,
    /// An invincible shield never loses strength.
    pub invincible: bool,
    /// Strength capacity. Zero means the shield absorbs nothing.
    strength: f32,
    /// Whether explosion damage is absorbed as well.
    pub absorb_explosions: bool,
    current_strength: f32,
}

impl Default for Shield {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Shield {
    /// Full-absorption shield with the given strength, at full strength.
    pub fn new(strength: f32) -> Self {
        let strength = strength.max(0.0);
        Self {
            absorption_factor: 1.0,
            invincible: false,
            strength,
            absorb_explosions: false,
            current_strength: strength,
        }
    }

    pub fn with_absorption_factor(mut self, factor: f32) -> Self {
        self.set_absorption_factor(factor);
        self
    }

    pub fn with_invincible(mut self, invincible: bool) -> Self {
        self.invincible = invincible;
        self
    }

    pub fn with_absorb_explosions(mut self, absorb: bool) -> Self {
        self.absorb_explosions = absorb;
        self
    }

    pub fn absorption_factor(&self) -> f32 {
        self.absorption_factor
    }

    pub fn set_absorption_factor(&mut self, factor: f32) {
        self.absorption_factor = factor.clamp(0.0, 1.0);
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    pub fn current_strength(&self) -> f32 {
        self.current_strength
    }

    /// Restore the strength pool to capacity. Called on (re)activation only.
    pub fn reset(&mut self) {
        self.current_strength = self.strength;
    }

    /// Absorb part of `amount` and return what should reach the owner.
    ///
    /// - explosions pass straight through unless `absorb_explosions` is set
    /// - an invincible shield returns `amount * (1 - absorption_factor)` and
    ///   never loses strength
    /// - a depleted shield returns `amount` unchanged
    /// - otherwise `min(amount * absorption_factor, current_strength)` is
    ///   absorbed and subtracted from the pool
    pub fn damage(&mut self, amount: f32, is_explosion: bool) -> f32 {
        if is_explosion && !self.absorb_explosions {
            return amount;
        }

        if self.invincible {
            return amount * (1.0 - self.absorption_factor);
        }

        if self.current_strength == 0.0 {
            return amount;
        }

        let absorbed = (amount * self.absorption_factor).min(self.current_strength);
        self.current_strength = (self.current_strength - absorbed).max(0.0);
        amount - absorbed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn half_absorption_depletes_over_two_hits() {
        let mut shield = Shield::new(100.0).with_absorption_factor(0.5);

        let remaining = shield.damage(80.0, false);
        assert!(approx_eq(remaining, 40.0));
        assert!(approx_eq(shield.current_strength(), 60.0));

        // 150 * 0.5 = 75 would be absorbed, but only 60 strength is left.
        let remaining = shield.damage(150.0, false);
        assert!(approx_eq(remaining, 90.0));
        assert_eq!(shield.current_strength(), 0.0);
    }

    #[test]
    fn depleted_shield_passes_everything_through() {
        let mut shield = Shield::new(10.0);
        assert!(approx_eq(shield.damage(25.0, false), 15.0));
        assert_eq!(shield.current_strength(), 0.0);

        assert_eq!(shield.damage(25.0, false), 25.0);
        assert_eq!(shield.damage(0.0, false), 0.0);
        assert_eq!(shield.current_strength(), 0.0);
    }

    #[test]
    fn zero_strength_shield_absorbs_nothing() {
        let mut shield = Shield::new(0.0).with_absorption_factor(1.0);
        assert_eq!(shield.damage(42.0, false), 42.0);
        assert_eq!(shield.current_strength(), 0.0);
    }

    #[test]
    fn invincible_shield_never_loses_strength() {
        let mut shield = Shield::new(5.0)
            .with_absorption_factor(0.75)
            .with_invincible(true);
        for _ in 0..10 {
            assert!(approx_eq(shield.damage(100.0, false), 25.0));
        }
        assert_eq!(shield.current_strength(), 5.0);
    }

    #[test]
    fn explosions_bypass_unless_absorbed() {
        let mut shield = Shield::new(100.0).with_absorption_factor(0.5);
        assert_eq!(shield.damage(80.0, true), 80.0);
        assert_eq!(shield.current_strength(), 100.0);

        let mut shield = shield.with_absorb_explosions(true);
        assert!(approx_eq(shield.damage(80.0, true), 40.0));
        assert!(approx_eq(shield.current_strength(), 60.0));
    }

    #[test]
    fn explosion_check_precedes_invincibility() {
        let mut shield = Shield::new(100.0)
            .with_absorption_factor(1.0)
            .with_invincible(true);
        assert_eq!(shield.damage(30.0, true), 30.0);
        assert_eq!(shield.damage(30.0, false), 0.0);
    }

    #[test]
    fn strength_stays_within_bounds_over_many_hits() {
        let factors = [0.0, 0.1, 0.5, 0.9, 1.0];
        let amounts = [0.0, 1.0, 7.5, 33.0, 250.0];
        for &factor in &factors {
            let mut shield = Shield::new(50.0).with_absorption_factor(factor);
            for &amount in amounts.iter().cycle().take(40) {
                let before = shield.current_strength();
                let remaining = shield.damage(amount, false);
                let absorbed = before - shield.current_strength();
                let expected = (amount * factor).min(before);
                if before > 0.0 {
                    assert!(approx_eq(absorbed, expected));
                }
                assert!(approx_eq(remaining, amount - absorbed));
                assert!(shield.current_strength() >= 0.0);
                assert!(shield.current_strength() <= shield.strength());
            }
        }
    }

    #[test]
    fn reset_restores_capacity_and_factor_is_clamped() {
        let mut shield = Shield::new(20.0).with_absorption_factor(3.0);
        assert_eq!(shield.absorption_factor(), 1.0);
        shield.damage(15.0, false);
        assert!(approx_eq(shield.current_strength(), 5.0));
        shield.reset();
        assert_eq!(shield.current_strength(), 20.0);
    }
}
