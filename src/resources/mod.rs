//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems during execution: timing, scheduling, pooling,
//! configuration and randomness. Each submodule documents the semantics and
//! intended usage of its resource(s).
//!
//! Overview
//! - `network` – pool strategy selection and the network despawn outbox
//! - `objectpool` – slot arena and per-prefab free lists
//! - `prefabs` – prefab definitions loaded from JSON
//! - `rng` – seeded random source
//! - `scheduler` – delayed callbacks on the frame and fixed lanes
//! - `simconfig` – INI-backed simulation settings
//! - `statetimers` – pending named-state deactivations
//! - `worldtime` – simulation time and delta
pub mod network;
pub mod objectpool;
pub mod prefabs;
pub mod rng;
pub mod scheduler;
pub mod simconfig;
pub mod statetimers;
pub mod worldtime;
