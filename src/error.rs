//! Error type shared by the fallible pipeline operations.
//!
//! Missing optional capabilities (no shield, no health, no force receiver) are
//! never reported here; they are skipped silently by the impact pipeline.

use bevy_ecs::prelude::Entity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// The impact-state disable timer must be `-1` (manual) or non-negative.
    #[error("impact state disable timer must be -1 or >= 0, got {0}")]
    InvalidImpactStateTimer(f32),

    #[error("entity {entity:?} has no {component} component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },

    #[error("unknown prefab '{0}'")]
    UnknownPrefab(String),

    #[error("pool for prefab '{prefab}' is exhausted (capacity {capacity})")]
    PoolExhausted { prefab: String, capacity: usize },

    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    #[error("failed to parse prefab library: {0}")]
    PrefabParse(#[from] serde_json::Error),
}

impl SimError {
    pub(crate) fn missing<T>(entity: Entity) -> Self {
        let full = std::any::type_name::<T>();
        SimError::MissingComponent {
            entity,
            component: full.rsplit("::").next().unwrap_or(full),
        }
    }
}
