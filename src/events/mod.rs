//! Event types exchanged across systems.
//!
//! Events are triggered with [`World::trigger`](bevy_ecs::world::World::trigger)
//! and delivered to observers registered with `World::add_observer`. They
//! decouple the impact pipeline from whatever reacts to it (effects, audio,
//! scoring, replication).
//!
//! Submodules:
//! - [`collision`] – hit records delivered to `on_collision`
//! - [`destructed`] – a destructible finished destruction
//! - [`explosion`] – an explosion went off
//! - [`impact`] – one processed hit, direct or from a blast

pub mod collision;
pub mod destructed;
pub mod explosion;
pub mod impact;
