use bevy_ecs::prelude::Resource;

/// Simulation clock shared by the frame and fixed-step lanes.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    /// Last frame delta, already scaled by `time_scale`.
    pub delta: f32,
    pub time_scale: f32,
    /// Length of one fixed step in seconds.
    pub fixed_delta: f32,
    pub fixed_steps: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            fixed_delta: 1.0 / 60.0,
            fixed_steps: 0,
        }
    }
}

impl WorldTime {
    pub fn with_fixed_hz(hz: f32) -> Self {
        WorldTime {
            fixed_delta: 1.0 / hz.max(1.0),
            ..Default::default()
        }
    }
}
