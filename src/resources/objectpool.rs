//! Object pool bookkeeping.
//!
//! The [`ObjectPool`] resource is an arena of slots, one per instance ever
//! built, plus a free list of slot indices per prefab. Drawing an instance pops
//! a free index (or reports that a new one must be built); returning it pushes
//! the index back. Entities are never despawned by the pool, only parked.
//!
//! The world-facing operations (building from prefabs, resetting state on
//! reacquire) live in [`crate::systems::pool`].

use bevy_ecs::prelude::*;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone)]
struct PoolSlot {
    entity: Entity,
    prefab: String,
    active: bool,
}

#[derive(Resource, Debug, Default)]
pub struct ObjectPool {
    slots: Vec<PoolSlot>,
    free: FxHashMap<String, Vec<usize>>,
    index_of: FxHashMap<Entity, usize>,
    /// Instances built per prefab, active or parked.
    built: FxHashMap<String, usize>,
    /// Maximum number of instances per prefab. `None` means unbounded.
    capacity: Option<usize>,
}

impl ObjectPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Take a parked instance of `prefab`, marking its slot active.
    pub fn acquire(&mut self, prefab: &str) -> Option<Entity> {
        let index = self.free.get_mut(prefab)?.pop()?;
        let slot = &mut self.slots[index];
        slot.active = true;
        Some(slot.entity)
    }

    /// True if another instance of `prefab` may be built.
    pub fn can_grow(&self, prefab: &str) -> bool {
        match self.capacity {
            Some(capacity) => self.count(prefab) < capacity,
            None => true,
        }
    }

    /// Track a newly built instance. It starts out active.
    pub fn register(&mut self, entity: Entity, prefab: &str) {
        let index = self.slots.len();
        self.slots.push(PoolSlot {
            entity,
            prefab: prefab.to_string(),
            active: true,
        });
        self.index_of.insert(entity, index);
        *self.built.entry(prefab.to_string()).or_default() += 1;
    }

    /// Park an active instance. Returns false if it is unknown or already parked.
    pub fn release(&mut self, entity: Entity) -> bool {
        let Some(&index) = self.index_of.get(&entity) else {
            return false;
        };
        let slot = &mut self.slots[index];
        if !slot.active {
            return false;
        }
        slot.active = false;
        self.free.entry(slot.prefab.clone()).or_default().push(index);
        true
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.index_of.contains_key(&entity)
    }

    pub fn is_active(&self, entity: Entity) -> bool {
        self.index_of
            .get(&entity)
            .map(|&i| self.slots[i].active)
            .unwrap_or(false)
    }

    /// Instances of `prefab` built so far, active or parked.
    pub fn count(&self, prefab: &str) -> usize {
        self.built.get(prefab).copied().unwrap_or(0)
    }

    /// Parked instances of `prefab`.
    pub fn available(&self, prefab: &str) -> usize {
        self.free.get(prefab).map(Vec::len).unwrap_or(0)
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_then_acquire_reuses_the_slot() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        let mut pool = ObjectPool::new();

        assert_eq!(pool.acquire("bullet"), None);
        pool.register(e, "bullet");
        assert!(pool.is_active(e));

        assert!(pool.release(e));
        assert!(!pool.release(e));
        assert_eq!(pool.available("bullet"), 1);

        assert_eq!(pool.acquire("bullet"), Some(e));
        assert!(pool.is_active(e));
        assert_eq!(pool.available("bullet"), 0);
        assert_eq!(pool.count("bullet"), 1);
    }

    #[test]
    fn free_lists_are_per_prefab() {
        let mut world = World::new();
        let a = world.spawn_empty().id();
        let b = world.spawn_empty().id();
        let mut pool = ObjectPool::new();
        pool.register(a, "bullet");
        pool.register(b, "grenade");
        pool.release(a);
        pool.release(b);

        assert_eq!(pool.acquire("grenade"), Some(b));
        assert_eq!(pool.acquire("grenade"), None);
        assert_eq!(pool.acquire("bullet"), Some(a));
    }

    #[test]
    fn capacity_limits_growth() {
        let mut world = World::new();
        let mut pool = ObjectPool::with_capacity(2);
        for _ in 0..2 {
            assert!(pool.can_grow("bullet"));
            let e = world.spawn_empty().id();
            pool.register(e, "bullet");
        }
        assert!(!pool.can_grow("bullet"));
        assert!(pool.can_grow("grenade"));
    }

    #[test]
    fn unknown_entities_are_not_released() {
        let mut world = World::new();
        let stranger = world.spawn_empty().id();
        let mut pool = ObjectPool::new();
        assert!(!pool.release(stranger));
        assert!(!pool.contains(stranger));
    }
}
