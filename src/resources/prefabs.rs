//! Prefab definitions the object pool builds instances from.
//!
//! A prefab is plain data: which capabilities an instance gets and how they
//! are configured. The library is loaded from JSON:
//!
//! ```json
//! {
//!   "prefabs": [
//!     {
//!       "name": "rocket",
//!       "collider_radius": 0.1,
//!       "trail": true,
//!       "trajectory": { "gravity": [0.0, 0.0, 0.0] },
//!       "destructible": {
//!         "spawned_objects_on_destruction": [ { "prefab": "blast" } ]
//!       }
//!     },
//!     { "name": "blast", "explosion": { "radius": 4.0, "lifetime": 1.5 } }
//!   ]
//! }
//! ```

use bevy_ecs::prelude::Resource;
use glam::{Quat, Vec3};
use log::info;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::components::collider::{LayerMask, layers};
use crate::components::destructible::ObjectSpawnInfo;
use crate::components::trajectory::BounceMode;
use crate::error::SimError;

fn default_radius() -> f32 {
    0.1
}

fn default_true() -> bool {
    true
}

fn default_gravity() -> Vec3 {
    Vec3::new(0.0, -9.81, 0.0)
}

fn default_bounce_multiplier() -> f32 {
    0.5
}

fn default_lifespan() -> f32 {
    crate::components::grenade::DEFAULT_LIFESPAN
}

fn default_explosion_radius() -> f32 {
    5.0
}

fn default_explosion_lifetime() -> f32 {
    3.0
}

fn default_layer() -> u32 {
    layers::DEFAULT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryDef {
    #[serde(default = "default_gravity")]
    pub gravity: Vec3,
    #[serde(default)]
    pub drag: f32,
    #[serde(default)]
    pub bounce_mode: BounceMode,
    #[serde(default = "default_bounce_multiplier")]
    pub bounce_multiplier: f32,
}

impl Default for TrajectoryDef {
    fn default() -> Self {
        Self {
            gravity: default_gravity(),
            drag: 0.0,
            bounce_mode: BounceMode::None,
            bounce_multiplier: default_bounce_multiplier(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestructibleDef {
    #[serde(default = "default_true")]
    pub destroy_on_collision: bool,
    #[serde(default)]
    pub destruction_delay: f32,
    #[serde(default)]
    pub spawned_objects_on_destruction: Vec<ObjectSpawnInfo>,
    #[serde(default)]
    pub surface_impact: Option<String>,
}

impl Default for DestructibleDef {
    fn default() -> Self {
        Self {
            destroy_on_collision: true,
            destruction_delay: 0.0,
            spawned_objects_on_destruction: Vec::new(),
            surface_impact: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinDef {
    #[serde(default)]
    pub local_translation: Vec3,
    #[serde(default = "identity_rotation")]
    pub local_rotation: Quat,
}

fn identity_rotation() -> Quat {
    Quat::IDENTITY
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrenadeDef {
    #[serde(default = "default_lifespan")]
    pub lifespan: f32,
    #[serde(default)]
    pub pin: Option<PinDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplosionDef {
    #[serde(default = "default_explosion_radius")]
    pub radius: f32,
    #[serde(default = "default_explosion_lifetime")]
    pub lifetime: f32,
    #[serde(default)]
    pub impact_layers: LayerMask,
    #[serde(default = "default_true")]
    pub falloff: bool,
}

/// Everything the pool needs to build a fresh instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefabDef {
    pub name: String,
    #[serde(default = "default_radius")]
    pub collider_radius: f32,
    #[serde(default = "default_layer")]
    pub layer: u32,
    #[serde(default)]
    pub trail: bool,
    #[serde(default)]
    pub particles: bool,
    #[serde(default)]
    pub trajectory: Option<TrajectoryDef>,
    #[serde(default)]
    pub destructible: Option<DestructibleDef>,
    #[serde(default)]
    pub grenade: Option<GrenadeDef>,
    #[serde(default)]
    pub explosion: Option<ExplosionDef>,
}

impl PrefabDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collider_radius: default_radius(),
            layer: default_layer(),
            trail: false,
            particles: false,
            trajectory: None,
            destructible: None,
            grenade: None,
            explosion: None,
        }
    }

    /// A flying destructible with default trajectory and destructible settings.
    pub fn projectile(name: impl Into<String>) -> Self {
        Self {
            trajectory: Some(TrajectoryDef::default()),
            destructible: Some(DestructibleDef::default()),
            ..Self::new(name)
        }
    }
}

#[derive(Debug, Deserialize)]
struct PrefabFile {
    prefabs: Vec<PrefabDef>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct PrefabLibrary {
    prefabs: FxHashMap<String, PrefabDef>,
}

impl PrefabLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let file: PrefabFile = serde_json::from_str(json)?;
        let mut library = Self::new();
        for def in file.prefabs {
            library.insert(def);
        }
        Ok(library)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SimError::ConfigLoad(format!("{}: {}", path.display(), e)))?;
        let library = Self::from_json_str(&json)?;
        info!("Loaded {} prefabs from {:?}", library.len(), path);
        Ok(library)
    }

    /// Add or replace a prefab definition.
    pub fn insert(&mut self, def: PrefabDef) {
        self.prefabs.insert(def.name.clone(), def);
    }

    pub fn with(mut self, def: PrefabDef) -> Self {
        self.insert(def);
        self
    }

    pub fn get(&self, name: &str) -> Option<&PrefabDef> {
        self.prefabs.get(name)
    }

    pub fn len(&self) -> usize {
        self.prefabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefabs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_defaults_fill_in() {
        let json = r#"{
            "prefabs": [
                { "name": "arrow", "trajectory": {}, "destructible": {} },
                { "name": "frag", "grenade": { "pin": { "local_translation": [0.0, 0.1, 0.0] } } },
                { "name": "blast", "explosion": { "radius": 3.0 } }
            ]
        }"#;
        let library = PrefabLibrary::from_json_str(json).unwrap();
        assert_eq!(library.len(), 3);

        let arrow = library.get("arrow").unwrap();
        assert_eq!(arrow.collider_radius, 0.1);
        assert_eq!(arrow.trajectory.as_ref().unwrap().gravity, Vec3::new(0.0, -9.81, 0.0));
        assert!(arrow.destructible.as_ref().unwrap().destroy_on_collision);

        let frag = library.get("frag").unwrap().grenade.as_ref().unwrap();
        assert_eq!(frag.lifespan, 5.0);
        assert_eq!(frag.pin.as_ref().unwrap().local_rotation, Quat::IDENTITY);

        let blast = library.get("blast").unwrap().explosion.as_ref().unwrap();
        assert_eq!(blast.radius, 3.0);
        assert_eq!(blast.impact_layers, LayerMask::DEFAULT_OVERLAP);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = PrefabLibrary::from_json_str("{ \"prefabs\": 3 }").unwrap_err();
        assert!(matches!(err, SimError::PrefabParse(_)));
    }
}
