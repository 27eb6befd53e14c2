//! Simulation configuration resource.
//!
//! Manages simulation settings loaded from an INI configuration file. Provides
//! defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [simulation]
//! fixed_hz = 60
//! time_scale = 1.0
//! seed = 42
//!
//! [pool]
//! capacity = 64
//!
//! [network]
//! multiplayer = false
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;

use crate::error::SimError;
use crate::resources::network::PoolStrategy;

/// Default safe values for startup
const DEFAULT_FIXED_HZ: u32 = 60;
const DEFAULT_TIME_SCALE: f32 = 1.0;
const DEFAULT_SEED: u64 = 42;
const DEFAULT_POOL_CAPACITY: usize = 64;
const DEFAULT_MULTIPLAYER: bool = false;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Simulation configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct SimConfig {
    /// Fixed simulation steps per second.
    pub fixed_hz: u32,
    /// Multiplier applied to frame deltas.
    pub time_scale: f32,
    /// Seed for [`SimRng`](crate::resources::rng::SimRng).
    pub seed: u64,
    /// Maximum live + pooled instances per prefab.
    pub pool_capacity: usize,
    /// Selects the networked pool strategy.
    pub multiplayer: bool,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            fixed_hz: DEFAULT_FIXED_HZ,
            time_scale: DEFAULT_TIME_SCALE,
            seed: DEFAULT_SEED,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            multiplayer: DEFAULT_MULTIPLAYER,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), SimError> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| SimError::ConfigLoad(format!("{:?}: {}", self.config_path, e)))?;
        self.apply(&config);
        Ok(())
    }

    /// Load configuration from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), SimError> {
        let mut config = Ini::new();
        config.read(text.to_string()).map_err(SimError::ConfigLoad)?;
        self.apply(&config);
        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [simulation] section
        if let Some(hz) = config.getuint("simulation", "fixed_hz").ok().flatten() {
            self.fixed_hz = (hz as u32).max(1);
        }
        if let Some(scale) = config.getfloat("simulation", "time_scale").ok().flatten() {
            self.time_scale = scale.max(0.0) as f32;
        }
        if let Some(seed) = config.getuint("simulation", "seed").ok().flatten() {
            self.seed = seed;
        }

        // [pool] section
        if let Some(capacity) = config.getuint("pool", "capacity").ok().flatten() {
            self.pool_capacity = capacity as usize;
        }

        // [network] section
        if let Some(multiplayer) = config.getbool("network", "multiplayer").ok().flatten() {
            self.multiplayer = multiplayer;
        }

        info!(
            "Loaded config: fixed_hz={}, time_scale={}, seed={}, pool_capacity={}, multiplayer={}",
            self.fixed_hz, self.time_scale, self.seed, self.pool_capacity, self.multiplayer
        );
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), SimError> {
        let mut config = Ini::new();

        config.set("simulation", "fixed_hz", Some(self.fixed_hz.to_string()));
        config.set("simulation", "time_scale", Some(self.time_scale.to_string()));
        config.set("simulation", "seed", Some(self.seed.to_string()));
        config.set("pool", "capacity", Some(self.pool_capacity.to_string()));
        config.set("network", "multiplayer", Some(self.multiplayer.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| SimError::ConfigLoad(format!("failed to save config file: {}", e)))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Length of one fixed step in seconds.
    pub fn fixed_delta(&self) -> f32 {
        1.0 / self.fixed_hz.max(1) as f32
    }

    pub fn pool_strategy(&self) -> PoolStrategy {
        PoolStrategy::from_multiplayer(self.multiplayer)
    }
}
