//! Grenade: a destructible with a cook timer and a removable pin.
//!
//! Cooking starts explicitly (usually when the thrower pulls the pin) and ends
//! with [`deactivate`](crate::systems::grenade::deactivate) once `lifespan`
//! seconds have passed, or earlier if detonated by hand. The pin is a separate
//! child entity whose original placement is captured when the grenade is
//! built, so it can snap back after being carried off by a hand.

use bevy_ecs::prelude::{Component, Entity};
use glam::{Quat, Vec3};

use crate::resources::scheduler::ScheduleHandle;

pub const DEFAULT_LIFESPAN: f32 = 5.0;

/// Where the pin sat when the grenade was built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinOrigin {
    pub parent: Entity,
    pub local_translation: Vec3,
    pub local_rotation: Quat,
}

#[derive(Component, Clone, Debug)]
pub struct Grenade {
    /// Seconds between `start_cooking` and the automatic detonation.
    pub lifespan: f32,
    pub pin: Option<Entity>,
    pub(crate) pin_origin: Option<PinOrigin>,
    pub(crate) scheduled_deactivation: Option<ScheduleHandle>,
}

impl Default for Grenade {
    fn default() -> Self {
        Self {
            lifespan: DEFAULT_LIFESPAN,
            pin: None,
            pin_origin: None,
            scheduled_deactivation: None,
        }
    }
}

impl Grenade {
    pub fn new(lifespan: f32) -> Self {
        Self {
            lifespan: lifespan.max(0.0),
            ..Self::default()
        }
    }

    /// Attach a pin and remember its current placement for reattachment.
    pub fn with_pin(mut self, pin: Entity, origin: PinOrigin) -> Self {
        self.pin = Some(pin);
        self.pin_origin = Some(origin);
        self
    }

    pub fn pin_origin(&self) -> Option<PinOrigin> {
        self.pin_origin
    }

    pub fn scheduled_deactivation(&self) -> Option<ScheduleHandle> {
        self.scheduled_deactivation
    }
}
