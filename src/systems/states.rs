//! Named-state service.
//!
//! Hits may switch a named state (for example `"stunned"`) on the object they
//! hit. States live in an [`ActiveStates`] component that is inserted on
//! demand. Timed deactivation goes through the [`Scheduler`] and is tracked in
//! [`StateTimers`], so a second timer for the same entity and state replaces
//! the first.

use bevy_ecs::prelude::*;
use log::debug;

use crate::components::activestates::ActiveStates;
use crate::resources::scheduler::{ScheduleHandle, Scheduler};
use crate::resources::statetimers::StateTimers;

/// Switch a named state on or off. Returns false if the entity does not exist.
pub fn set_state(world: &mut World, entity: Entity, name: &str, active: bool) -> bool {
    let Ok(mut entity_mut) = world.get_entity_mut(entity) else {
        debug!("set_state: entity {:?} does not exist", entity);
        return false;
    };
    match entity_mut.get_mut::<ActiveStates>() {
        Some(mut states) => states.set(name, active),
        None if active => {
            entity_mut.insert(ActiveStates::default().with_state(name));
        }
        None => {}
    }
    true
}

pub fn is_state_active(world: &World, entity: Entity, name: &str) -> bool {
    world
        .get::<ActiveStates>(entity)
        .is_some_and(|s| s.is_active(name))
}

/// Deactivate `name` on `entity` after `seconds` of frame time.
///
/// Any timer already pending for the same pair is cancelled first.
pub fn deactivate_state_timer(
    world: &mut World,
    entity: Entity,
    name: &str,
    seconds: f32,
) -> ScheduleHandle {
    let key = (entity, name.to_string());
    let previous = world.get_resource_or_init::<StateTimers>().timers.remove(&key);

    let handle = {
        let mut scheduler = world.get_resource_or_init::<Scheduler>();
        if let Some(previous) = previous {
            scheduler.cancel(previous);
        }
        let state_name = name.to_string();
        scheduler.schedule(seconds, move |world| {
            expire_state(world, entity, state_name);
        })
    };

    world.resource_mut::<StateTimers>().timers.insert(key, handle);
    handle
}

fn expire_state(world: &mut World, entity: Entity, name: String) {
    set_state(world, entity, &name, false);
    if let Some(mut timers) = world.get_resource_mut::<StateTimers>() {
        timers.timers.remove(&(entity, name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::scheduler::Lane;
    use crate::systems::scheduler::run_scheduled;

    fn setup() -> World {
        let mut world = World::new();
        world.insert_resource(Scheduler::new());
        world.insert_resource(StateTimers::default());
        world
    }

    #[test]
    fn set_state_inserts_component_on_demand() {
        let mut world = setup();
        let e = world.spawn_empty().id();
        assert!(!set_state(&mut world, e, "stunned", false));
        assert!(world.get::<ActiveStates>(e).is_none());

        assert!(set_state(&mut world, e, "stunned", true));
        assert!(is_state_active(&world, e, "stunned"));
        set_state(&mut world, e, "stunned", false);
        assert!(!is_state_active(&world, e, "stunned"));
    }

    #[test]
    fn timer_deactivates_after_delay() {
        let mut world = setup();
        let e = world.spawn_empty().id();
        set_state(&mut world, e, "stunned", true);
        deactivate_state_timer(&mut world, e, "stunned", 1.0);

        run_scheduled(&mut world, Lane::Update, 0.5);
        assert!(is_state_active(&world, e, "stunned"));
        run_scheduled(&mut world, Lane::Update, 0.5);
        assert!(!is_state_active(&world, e, "stunned"));
        assert!(world.resource::<StateTimers>().timers.is_empty());
    }

    #[test]
    fn new_timer_replaces_old_one() {
        let mut world = setup();
        let e = world.spawn_empty().id();
        set_state(&mut world, e, "stunned", true);
        let first = deactivate_state_timer(&mut world, e, "stunned", 1.0);
        run_scheduled(&mut world, Lane::Update, 0.8);

        deactivate_state_timer(&mut world, e, "stunned", 1.0);
        assert!(!world.resource::<Scheduler>().is_scheduled(first));

        run_scheduled(&mut world, Lane::Update, 0.5);
        assert!(is_state_active(&world, e, "stunned"));
        run_scheduled(&mut world, Lane::Update, 0.5);
        assert!(!is_state_active(&world, e, "stunned"));
    }
}
