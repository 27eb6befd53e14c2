//! Pool strategy selection and the network despawn outbox.
//!
//! Destroying a pooled object goes through [`PoolStrategy`], chosen once at
//! configuration time. In `Networked` mode each destruction is also queued in
//! [`NetworkObjectPool::outbox`] for the host's replication layer to send;
//! the transport itself is not part of this crate.

use bevy_ecs::prelude::{Entity, Resource};

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PoolStrategy {
    #[default]
    Local,
    Networked,
}

impl PoolStrategy {
    pub fn from_multiplayer(multiplayer: bool) -> Self {
        if multiplayer {
            PoolStrategy::Networked
        } else {
            PoolStrategy::Local
        }
    }
}

/// A pooled object destroyed while networked, waiting to be replicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDespawn {
    pub entity: Entity,
    pub prefab: Option<String>,
    pub generation: u32,
}

#[derive(Resource, Debug, Default)]
pub struct NetworkObjectPool {
    pub outbox: Vec<NetworkDespawn>,
}

impl NetworkObjectPool {
    pub fn drain(&mut self) -> Vec<NetworkDespawn> {
        std::mem::take(&mut self.outbox)
    }
}
