//! Simulation systems.
//!
//! Exclusive functions over the [`World`](bevy_ecs::world::World) that drive
//! the impact pipeline. Most take `&mut World` directly because they follow
//! entity links (parents, originators, hit targets) that a static query
//! signature cannot express.
//!
//! Submodules overview
//! - [`capabilities`] – resolve shield/health/body/force receiver of a hit object
//! - [`destructible`] – initialize, collision handling and destruction
//! - [`explosion`] – overlap query, falloff damage and blast events
//! - [`grenade`] – cook timer, detonation and pin reattachment
//! - [`hierarchy`] – world-space transforms and re-parenting
//! - [`pool`] – instantiate, prewarm and return pooled objects
//! - [`scheduler`] – fire due scheduled callbacks on a lane
//! - [`states`] – named states on hit objects with timed deactivation
//! - [`time`] – update simulation time and fixed step count
//! - [`trajectory`] – integrate flying objects and sweep for contacts

pub mod capabilities;
pub mod destructible;
pub mod explosion;
pub mod grenade;
pub mod hierarchy;
pub mod pool;
pub mod scheduler;
pub mod states;
pub mod time;
pub mod trajectory;
