use bevy_ecs::prelude::{Entity, Resource};
use rustc_hash::FxHashMap;

use crate::resources::scheduler::ScheduleHandle;

/// Pending auto-deactivation per (entity, state name).
///
/// A new timer for the same pair replaces the old one, so re-hitting a stunned
/// target restarts the stun instead of ending it early.
#[derive(Resource, Debug, Default)]
pub struct StateTimers {
    pub timers: FxHashMap<(Entity, String), ScheduleHandle>,
}
