//! Time update systems.
//!
//! Updates the shared [`WorldTime`](crate::resources::worldtime::WorldTime)
//! resource once per frame and once per fixed step.

use bevy_ecs::prelude::*;

use crate::resources::worldtime::WorldTime;

/// Update elapsed and delta seconds on the `WorldTime` resource.
///
/// `dt` is expected to be the unscaled frame delta in seconds. The system
/// applies the current `time_scale` and writes both `elapsed` and `delta`.
/// Returns the scaled delta.
pub fn update_world_time(world: &mut World, dt: f32) -> f32 {
    let mut wt = world.resource_mut::<WorldTime>();
    let scaled_dt = dt.max(0.0) * wt.time_scale;
    wt.elapsed += scaled_dt;
    wt.delta = scaled_dt;
    scaled_dt
}

/// Count one fixed step.
pub fn advance_fixed_time(world: &mut World) {
    let mut wt = world.resource_mut::<WorldTime>();
    wt.fixed_steps += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_delta_is_scaled() {
        let mut world = World::new();
        world.insert_resource(WorldTime {
            time_scale: 0.5,
            ..Default::default()
        });
        assert_eq!(update_world_time(&mut world, 0.2), 0.1);
        update_world_time(&mut world, 0.2);
        let wt = world.resource::<WorldTime>();
        assert!((wt.elapsed - 0.2).abs() < 1e-6);
        assert!((wt.delta - 0.1).abs() < 1e-6);
    }

    #[test]
    fn fixed_steps_are_counted() {
        let mut world = World::new();
        world.insert_resource(WorldTime::default());
        advance_fixed_time(&mut world);
        advance_fixed_time(&mut world);
        assert_eq!(world.resource::<WorldTime>().fixed_steps, 2);
    }
}
