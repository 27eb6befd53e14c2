// Named states currently active on an entity (e.g. "Stunned" after an impact)

use bevy_ecs::prelude::Component;
use rustc_hash::FxHashSet;

#[derive(Debug, Clone, Default, Component)]
pub struct ActiveStates {
    pub states: FxHashSet<String>,
}

impl ActiveStates {
    pub fn with_state(mut self, name: impl Into<String>) -> Self {
        self.states.insert(name.into());
        self
    }
    pub fn set(&mut self, name: impl Into<String>, active: bool) {
        let name = name.into();
        if active {
            self.states.insert(name);
        } else {
            self.states.remove(&name);
        }
    }
    pub fn is_active(&self, name: &str) -> bool {
        self.states.contains(name)
    }
    pub fn len(&self) -> usize {
        self.states.len()
    }
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
