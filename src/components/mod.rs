//! ECS components for entities.
//!
//! This module groups all component types that can be attached to entities in
//! the simulated world. Components define data such as placement, collision
//! shape, damage capabilities and the projectile lifecycle.
//!
//! Submodules overview:
//! - [`activestates`] – named states currently switched on for an entity
//! - [`collider`] – sphere collider, collision layers and layer masks
//! - [`destructible`] – projectile that damages what it hits and destroys itself
//! - [`effects`] – trail and particle emitter toggled by the projectile lifecycle
//! - [`explosion`] – blast radius, lifetime and falloff of an explosion
//! - [`forcereceiver`] – generic sink for impact forces
//! - [`grenade`] – cook timer and removable pin
//! - [`health`] – hit points and the last damage record
//! - [`locomotion`] – character sub-collider set
//! - [`physicsbody`] – mass body accumulating forces at points
//! - [`pooled`] – pool bookkeeping and lifetime tokens
//! - [`shield`] – depletable damage absorption
//! - [`trajectory`] – ballistic motion parameters
//! - [`transform`] – local translation, rotation and scale

pub mod activestates;
pub mod collider;
pub mod destructible;
pub mod effects;
pub mod explosion;
pub mod forcereceiver;
pub mod grenade;
pub mod health;
pub mod locomotion;
pub mod physicsbody;
pub mod pooled;
pub mod shield;
pub mod trajectory;
pub mod transform;
