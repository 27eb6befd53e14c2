//! Destructible component: an object that damages what it hits and then destroys itself.
//!
//! Projectiles and grenades are destructibles. The component holds two kinds of
//! data:
//!
//! - **prefab configuration** (`destroy_on_collision`, `destruction_delay`,
//!   spawn descriptors, prefab-level surface impact, impact callback), which
//!   survives pool round trips
//! - **per-use state** (armed impact parameters, lifecycle state, sticky
//!   character, pending destruction), which
//!   [`initialize`](crate::systems::destructible::initialize) resets completely
//!   every time the object is fired
//!
//! # Lifecycle
//!
//! ```text
//! Inactive --initialize--> Armed --on_collision--> Collided
//!     ^                                               |
//!     |                                   destroy_on_collision
//!     |                                               v
//!     +--------------destruct-------------- PendingDestruction
//! ```
//!
//! `destruct` may also run straight from `Armed` (grenade lifespan, manual
//! detonation).
//!
//! # Related
//!
//! - [`crate::systems::destructible`] – initialize / on_collision / destruct
//! - [`crate::components::grenade::Grenade`] – timed destructible with a pin

use bevy_ecs::prelude::{Component, Entity};
use bevy_ecs::world::World;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::components::collider::LayerMask;
use crate::error::SimError;
use crate::events::impact::ImpactEvent;
use crate::resources::scheduler::ScheduleHandle;

/// User hook invoked after the [`ImpactEvent`] has been triggered.
pub type ImpactCallback = fn(world: &mut World, event: &ImpactEvent);

/// Sentinel disable-timer value meaning "only deactivate manually".
pub const MANUAL_DEACTIVATION: f32 = -1.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DestructibleState {
    /// In the pool, or drawn but not yet fired. Collider disabled.
    #[default]
    Inactive,
    /// Fired and waiting for its first collision.
    Armed,
    /// The collision has been processed.
    Collided,
    /// Destruction has been scheduled.
    PendingDestruction,
}

/// When an impact state applied to the hit object switches itself off again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImpactStateTimer {
    /// The state stays until something clears it.
    Manual,
    /// The state is deactivated after this many seconds.
    After(f32),
}

impl ImpactStateTimer {
    /// Interpret a raw disable timer: `-1` is manual, `>= 0` is a delay.
    ///
    /// Any other negative value (or NaN) is rejected instead of being scheduled
    /// with a negative delay.
    pub fn from_seconds(seconds: f32) -> Result<Self, SimError> {
        if seconds == MANUAL_DEACTIVATION {
            Ok(ImpactStateTimer::Manual)
        } else if seconds >= 0.0 {
            Ok(ImpactStateTimer::After(seconds))
        } else {
            Err(SimError::InvalidImpactStateTimer(seconds))
        }
    }
}

/// Prefab to spawn where a destructible is destroyed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSpawnInfo {
    pub prefab: String,
    /// Chance in `[0, 1]` that the object spawns at all.
    #[serde(default = "default_probability")]
    pub probability: f32,
    /// Rotate the spawned object by a random angle around the hit normal.
    #[serde(default)]
    pub random_spin: bool,
}

fn default_probability() -> f32 {
    1.0
}

impl ObjectSpawnInfo {
    pub fn new(prefab: impl Into<String>) -> Self {
        Self {
            prefab: prefab.into(),
            probability: 1.0,
            random_spin: false,
        }
    }
}

/// Motion part of the arguments to `initialize`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Launch {
    pub velocity: Vec3,
    pub torque: Vec3,
    pub originator: Option<Entity>,
}

/// Impact part of the arguments to `initialize`, as supplied by the firing item.
#[derive(Debug, Clone, PartialEq)]
pub struct ImpactParams {
    pub damage: f32,
    pub impact_force: f32,
    pub impact_force_frames: u32,
    pub impact_layers: LayerMask,
    /// Empty or `None` means no impact state.
    pub impact_state_name: Option<String>,
    /// `-1` for manual deactivation, otherwise seconds (must be `>= 0`).
    pub impact_state_disable_timer: f32,
    pub surface_impact: Option<String>,
}

impl Default for ImpactParams {
    fn default() -> Self {
        Self {
            damage: 0.0,
            impact_force: 0.0,
            impact_force_frames: 1,
            impact_layers: LayerMask::DEFAULT_OVERLAP,
            impact_state_name: None,
            impact_state_disable_timer: MANUAL_DEACTIVATION,
            surface_impact: None,
        }
    }
}

/// Validated impact parameters for the current use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArmedImpact {
    pub damage: f32,
    pub impact_force: f32,
    pub impact_force_frames: u32,
    pub impact_state: Option<(String, ImpactStateTimer)>,
    pub surface_impact: Option<String>,
}

#[derive(Component, Clone, Debug)]
pub struct Destructible {
    pub destroy_on_collision: bool,
    /// Seconds between the collision and the destruction.
    pub destruction_delay: f32,
    pub spawned_objects_on_destruction: Vec<ObjectSpawnInfo>,
    /// Surface impact set on the prefab; wins over the one passed to `initialize`.
    pub surface_impact: Option<String>,
    pub on_impact: Option<ImpactCallback>,
    pub(crate) armed: ArmedImpact,
    pub(crate) state: DestructibleState,
    pub(crate) enabled: bool,
    pub(crate) originator: Option<Entity>,
    pub(crate) sticky_locomotion: Option<Entity>,
    pub(crate) pending_destruction: Option<ScheduleHandle>,
}

impl Default for Destructible {
    fn default() -> Self {
        Self {
            destroy_on_collision: true,
            destruction_delay: 0.0,
            spawned_objects_on_destruction: Vec::new(),
            surface_impact: None,
            on_impact: None,
            armed: ArmedImpact::default(),
            state: DestructibleState::Inactive,
            enabled: true,
            originator: None,
            sticky_locomotion: None,
            pending_destruction: None,
        }
    }
}

impl Destructible {
    pub fn with_destroy_on_collision(mut self, destroy: bool) -> Self {
        self.destroy_on_collision = destroy;
        self
    }

    pub fn with_destruction_delay(mut self, seconds: f32) -> Self {
        self.destruction_delay = seconds.max(0.0);
        self
    }

    pub fn with_spawn(mut self, info: ObjectSpawnInfo) -> Self {
        self.spawned_objects_on_destruction.push(info);
        self
    }

    pub fn with_impact_callback(mut self, callback: ImpactCallback) -> Self {
        self.on_impact = Some(callback);
        self
    }

    pub fn state(&self) -> DestructibleState {
        self.state
    }

    /// False once destruction has started, until the next draw from the pool.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn armed(&self) -> &ArmedImpact {
        &self.armed
    }

    /// Who fired or threw this object.
    pub fn originator(&self) -> Option<Entity> {
        self.originator
    }

    /// Character this object is currently stuck to, if any.
    pub fn sticky_locomotion(&self) -> Option<Entity> {
        self.sticky_locomotion
    }

    pub fn pending_destruction(&self) -> Option<ScheduleHandle> {
        self.pending_destruction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_minus_one_is_manual() {
        assert_eq!(
            ImpactStateTimer::from_seconds(-1.0).ok(),
            Some(ImpactStateTimer::Manual)
        );
    }

    #[test]
    fn timer_non_negative_is_delay() {
        assert_eq!(
            ImpactStateTimer::from_seconds(0.0).ok(),
            Some(ImpactStateTimer::After(0.0))
        );
        assert_eq!(
            ImpactStateTimer::from_seconds(2.5).ok(),
            Some(ImpactStateTimer::After(2.5))
        );
    }

    #[test]
    fn timer_other_negatives_are_rejected() {
        for bad in [-0.5, -2.0, -1.0001, f32::NAN, f32::NEG_INFINITY] {
            assert!(matches!(
                ImpactStateTimer::from_seconds(bad),
                Err(SimError::InvalidImpactStateTimer(_))
            ));
        }
    }

    #[test]
    fn spawn_info_defaults_from_json() {
        let info: ObjectSpawnInfo = serde_json::from_str(r#"{ "prefab": "explosion" }"#).unwrap();
        assert_eq!(info, ObjectSpawnInfo::new("explosion"));
    }
}
