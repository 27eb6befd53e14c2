//! Delayed callback scheduler.
//!
//! The [`Scheduler`] resource keeps two independent lanes:
//!
//! - [`Lane::Update`] advances once per rendered frame (`Simulation::step`)
//! - [`Lane::Fixed`] advances once per fixed simulation step
//!
//! Each lane is a min-heap ordered by `(due time, sequence number)`, so
//! callbacks due at the same time fire in the order they were scheduled.
//! Callbacks live in a side table keyed by handle id; cancelling removes the
//! entry from the table and the heap entry is skipped when it surfaces.
//!
//! Callbacks never run from inside `schedule`. They run from
//! [`run_scheduled`](crate::systems::scheduler::run_scheduled), which only
//! fires entries that were already due when it started, so a zero delay means
//! "on the next step of that lane".

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::*;
use rustc_hash::FxHashMap;

/// Slack used when comparing accumulated lane time against due times.
const TIME_EPSILON: f64 = 1e-9;

pub type ScheduledCallback = Box<dyn FnOnce(&mut World) + Send + Sync>;

/// Which clock a callback is keyed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    Update,
    Fixed,
}

/// Handle returned by the scheduling calls. Cancelling it twice is harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScheduleHandle(u64);

impl ScheduleHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    due: f64,
    seq: u64,
    id: u64,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Reversed so BinaryHeap (a max-heap) pops the earliest entry first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .total_cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Default)]
struct LaneQueue {
    now: f64,
    queue: BinaryHeap<Entry>,
}

#[derive(Resource, Default)]
pub struct Scheduler {
    update: LaneQueue,
    fixed: LaneQueue,
    callbacks: FxHashMap<u64, ScheduledCallback>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lane(&self, lane: Lane) -> &LaneQueue {
        match lane {
            Lane::Update => &self.update,
            Lane::Fixed => &self.fixed,
        }
    }

    fn lane_mut(&mut self, lane: Lane) -> &mut LaneQueue {
        match lane {
            Lane::Update => &mut self.update,
            Lane::Fixed => &mut self.fixed,
        }
    }

    /// Current time of a lane in seconds.
    pub fn now(&self, lane: Lane) -> f64 {
        self.lane(lane).now
    }

    /// Run `callback` after `delay` seconds on the given lane.
    ///
    /// Negative delays are treated as zero.
    pub fn schedule_on(
        &mut self,
        lane: Lane,
        delay: f32,
        callback: impl FnOnce(&mut World) + Send + Sync + 'static,
    ) -> ScheduleHandle {
        let id = self.next_id;
        self.next_id += 1;
        let queue = self.lane_mut(lane);
        queue.queue.push(Entry {
            due: queue.now + f64::from(delay.max(0.0)),
            seq: id,
            id,
        });
        self.callbacks.insert(id, Box::new(callback));
        ScheduleHandle(id)
    }

    /// Run `callback` after `delay` seconds of frame time.
    pub fn schedule(
        &mut self,
        delay: f32,
        callback: impl FnOnce(&mut World) + Send + Sync + 'static,
    ) -> ScheduleHandle {
        self.schedule_on(Lane::Update, delay, callback)
    }

    /// Run `callback(world, payload)` after `delay` seconds of fixed-step time.
    pub fn schedule_fixed<P>(
        &mut self,
        delay: f32,
        callback: fn(&mut World, P),
        payload: P,
    ) -> ScheduleHandle
    where
        P: Send + Sync + 'static,
    {
        self.schedule_on(Lane::Fixed, delay, move |world| callback(world, payload))
    }

    /// Cancel a pending callback. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: ScheduleHandle) -> bool {
        self.callbacks.remove(&handle.0).is_some()
    }

    pub fn is_scheduled(&self, handle: ScheduleHandle) -> bool {
        self.callbacks.contains_key(&handle.0)
    }

    /// Number of callbacks still waiting to fire, across both lanes.
    pub fn pending(&self) -> usize {
        self.callbacks.len()
    }

    /// Advance a lane clock by `dt` seconds.
    pub fn advance(&mut self, lane: Lane, dt: f64) {
        self.lane_mut(lane).now += dt.max(0.0);
    }

    /// Pop every live entry due at the lane's current time, in firing order.
    ///
    /// Only ids are returned; the callback is taken with
    /// [`Scheduler::take_callback`] right before it runs so that a callback
    /// cancelled by an earlier one in the same batch is skipped.
    pub fn take_due(&mut self, lane: Lane) -> Vec<ScheduleHandle> {
        let mut due = Vec::new();
        let callbacks = &self.callbacks;
        let queue = match lane {
            Lane::Update => &mut self.update,
            Lane::Fixed => &mut self.fixed,
        };
        while queue
            .queue
            .peek()
            .is_some_and(|top| top.due <= queue.now + TIME_EPSILON)
        {
            let Some(entry) = queue.queue.pop() else {
                break;
            };
            if callbacks.contains_key(&entry.id) {
                due.push(ScheduleHandle(entry.id));
            }
        }
        due
    }

    pub fn take_callback(&mut self, handle: ScheduleHandle) -> Option<ScheduledCallback> {
        self.callbacks.remove(&handle.0)
    }
}
