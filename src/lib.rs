//! Ricochet library.
//!
//! Destructible projectiles, grenades and explosions on top of `bevy_ecs`.
//! This module exposes the components, resources, systems and events for
//! use in integration tests and by the headless demo binary.

pub mod components;
pub mod error;
pub mod events;
pub mod resources;
pub mod simulation;
pub mod systems;
