//! Scheduler runner.
//!
//! Fires the [`Scheduler`] callbacks that are due on a lane. Callbacks get
//! exclusive access to the world and may schedule or cancel further callbacks;
//! anything they schedule lands in a later batch.

use bevy_ecs::prelude::*;
use log::{debug, warn};

use crate::resources::scheduler::{Lane, Scheduler};

/// Advance `lane` by `dt` seconds and run every callback that is now due.
///
/// Returns the number of callbacks that ran.
pub fn run_scheduled(world: &mut World, lane: Lane, dt: f64) -> usize {
    let due = {
        let Some(mut scheduler) = world.get_resource_mut::<Scheduler>() else {
            warn!("run_scheduled: no Scheduler resource");
            return 0;
        };
        scheduler.advance(lane, dt);
        scheduler.take_due(lane)
    };

    let mut ran = 0;
    for handle in due {
        // Re-check right before firing: an earlier callback may have cancelled it.
        let callback = world.resource_mut::<Scheduler>().take_callback(handle);
        match callback {
            Some(callback) => {
                callback(world);
                ran += 1;
            }
            None => debug!("scheduled callback {} cancelled before firing", handle.id()),
        }
    }
    if ran > 0
        && let Some(scheduler) = world.get_resource::<Scheduler>()
    {
        debug!("{:?} lane ran {} callback(s) at {:.3}s", lane, ran, scheduler.now(lane));
    }
    ran
}
