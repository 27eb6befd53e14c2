//! Headless simulation driver.
//!
//! [`Simulation`] owns the ECS [`World`] with every resource the impact
//! pipeline needs and runs the main loop in two rates:
//!
//! - once per frame: world time, then the frame lane of the scheduler
//! - zero or more fixed steps per frame, from an accumulator: fixed time,
//!   then the fixed lane of the scheduler, then trajectory integration
//!
//! Scheduled fixed callbacks therefore run before the motion of the step they
//! are due in, so a destruction scheduled with zero delay happens at the start
//! of the next fixed step.

use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};
use log::{info, warn};

use crate::components::destructible::{ImpactParams, Launch};
use crate::error::SimError;
use crate::resources::network::NetworkObjectPool;
use crate::resources::objectpool::ObjectPool;
use crate::resources::prefabs::PrefabLibrary;
use crate::resources::rng::SimRng;
use crate::resources::scheduler::{Lane, Scheduler};
use crate::resources::simconfig::SimConfig;
use crate::resources::statetimers::StateTimers;
use crate::resources::worldtime::WorldTime;
use crate::systems::destructible::initialize;
use crate::systems::pool::instantiate;
use crate::systems::scheduler::run_scheduled;
use crate::systems::time::{advance_fixed_time, update_world_time};
use crate::systems::trajectory::trajectory_step;

/// Upper bound on fixed steps per frame so a long hitch does not stall the loop.
const MAX_FIXED_STEPS_PER_FRAME: u32 = 8;

pub struct Simulation {
    pub world: World,
    accumulator: f32,
}

impl Simulation {
    pub fn new(config: SimConfig, prefabs: PrefabLibrary) -> Self {
        let mut world = World::new();
        world.insert_resource(WorldTime {
            time_scale: config.time_scale,
            ..WorldTime::with_fixed_hz(config.fixed_hz as f32)
        });
        world.insert_resource(Scheduler::new());
        world.insert_resource(ObjectPool::with_capacity(config.pool_capacity));
        world.insert_resource(config.pool_strategy());
        world.insert_resource(NetworkObjectPool::default());
        world.insert_resource(StateTimers::default());
        world.insert_resource(SimRng::new(config.seed));
        info!(
            "simulation ready: {} prefabs, {} Hz, {:?} pool",
            prefabs.len(),
            config.fixed_hz,
            config.pool_strategy()
        );
        world.insert_resource(prefabs);
        world.insert_resource(config);

        Self {
            world,
            accumulator: 0.0,
        }
    }

    pub fn fixed_delta(&self) -> f32 {
        self.world.resource::<WorldTime>().fixed_delta
    }

    /// Advance one frame of `dt` unscaled seconds. Returns the fixed steps run.
    pub fn step(&mut self, dt: f32) -> u32 {
        let scaled = update_world_time(&mut self.world, dt);
        run_scheduled(&mut self.world, Lane::Update, f64::from(scaled));

        self.accumulator += scaled;
        let fixed = self.fixed_delta();
        let mut steps = 0;
        while self.accumulator >= fixed {
            if steps == MAX_FIXED_STEPS_PER_FRAME {
                warn!("dropping {:.3}s of simulation time", self.accumulator);
                self.accumulator = 0.0;
                break;
            }
            self.fixed_step();
            self.accumulator -= fixed;
            steps += 1;
        }
        steps
    }

    /// Run exactly one fixed step.
    pub fn fixed_step(&mut self) {
        let fixed = self.fixed_delta();
        advance_fixed_time(&mut self.world);
        run_scheduled(&mut self.world, Lane::Fixed, f64::from(fixed));
        trajectory_step(&mut self.world, fixed);
    }

    /// Draw `prefab` from the pool and arm it.
    pub fn fire(
        &mut self,
        prefab: &str,
        position: Vec3,
        rotation: Quat,
        launch: Launch,
        params: ImpactParams,
    ) -> Result<Entity, SimError> {
        let entity = instantiate(&mut self.world, prefab, position, rotation)?;
        initialize(&mut self.world, entity, launch, params)?;
        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulator_runs_whole_fixed_steps() {
        let mut config = SimConfig::new();
        config.fixed_hz = 50;
        let mut sim = Simulation::new(config, PrefabLibrary::new());

        assert_eq!(sim.step(0.03), 1);
        assert_eq!(sim.step(0.015), 1);
        assert_eq!(sim.world.resource::<WorldTime>().fixed_steps, 2);
    }

    #[test]
    fn hitches_are_capped() {
        let mut sim = Simulation::new(SimConfig::new(), PrefabLibrary::new());
        assert_eq!(sim.step(10.0), MAX_FIXED_STEPS_PER_FRAME);
        assert_eq!(sim.step(0.0), 0);
    }
}
