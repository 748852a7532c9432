//! Virtual-time event scheduler
//!
//! A min-ordered queue of scheduled callbacks keyed by target cycle,
//! with FIFO ordering among entries scheduled for the same cycle.
//! Draining advances `now` to the caller's target and reports every due
//! event along with how late it fired, so periodic callbacks can
//! compensate for drift.

use std::collections::BTreeMap;
use std::fmt;

/// Identity of a registered callback kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimingEventId(usize);

impl fmt::Display for TimingEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimingEvent({})", self.0)
    }
}

/// One due event reported by a drain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredEvent {
    /// Which registered callback this is
    pub id: TimingEventId,
    /// Opaque user data supplied at scheduling time
    pub userdata: u64,
    /// How many cycles past the target the drain overshot (non-negative)
    pub cycles_late: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    id: TimingEventId,
    userdata: u64,
}

/// Deterministic scheduler over the emulated cycle counter.
///
/// Two entries with the same callback and userdata are distinct unless
/// one is removed with [`EventScheduler::unschedule_event`], which
/// cancels only the first pending match.
pub struct EventScheduler {
    now: u64,
    /// Monotonic insertion counter; breaks ties among equal target cycles
    seq: u64,
    queue: BTreeMap<(u64, u64), Pending>,
    event_names: Vec<&'static str>,
}

impl EventScheduler {
    /// Creates a scheduler at cycle 0 with no registered callbacks
    pub fn new() -> Self {
        Self {
            now: 0,
            seq: 0,
            queue: BTreeMap::new(),
            event_names: Vec::new(),
        }
    }

    /// Registers a named callback kind and returns its identity
    pub fn register_event(&mut self, name: &'static str) -> TimingEventId {
        let id = TimingEventId(self.event_names.len());
        self.event_names.push(name);
        id
    }

    /// Returns the human-readable name a callback was registered with
    pub fn event_name(&self, id: TimingEventId) -> &'static str {
        self.event_names.get(id.0).copied().unwrap_or("<unknown>")
    }

    /// Current virtual cycle
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Number of pending entries
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Inserts an entry due `delay_cycles` from now
    pub fn schedule_event(&mut self, delay_cycles: u64, id: TimingEventId, userdata: u64) {
        let target = self.now + delay_cycles;
        let key = (target, self.seq);
        self.seq += 1;
        self.queue.insert(key, Pending { id, userdata });
    }

    /// Removes the first pending entry matching (callback, userdata).
    ///
    /// Returns whether anything was removed; unscheduling an entry that
    /// already fired or was never scheduled is a no-op.
    pub fn unschedule_event(&mut self, id: TimingEventId, userdata: u64) -> bool {
        let key = self
            .queue
            .iter()
            .find(|(_, p)| p.id == id && p.userdata == userdata)
            .map(|(k, _)| *k);
        match key {
            Some(k) => {
                self.queue.remove(&k);
                true
            }
            None => false,
        }
    }

    /// Advances `now` to `target_cycle` and returns every due event in
    /// (target cycle, insertion) order.
    ///
    /// Each returned event carries `cycles_late = now - target`, the
    /// drain overshoot a periodic callback subtracts from its next
    /// nominal interval to avoid accumulating drift.
    ///
    /// # Panics
    ///
    /// Panics if `target_cycle` is in the past; virtual time is
    /// monotonic.
    pub fn advance_to(&mut self, target_cycle: u64) -> Vec<FiredEvent> {
        assert!(
            target_cycle >= self.now,
            "Cannot advance backwards: {} < {}",
            target_cycle,
            self.now
        );
        self.now = target_cycle;

        let mut fired = Vec::new();
        while let Some((&(target, seq), &pending)) = self.queue.iter().next() {
            if target > self.now {
                break;
            }
            self.queue.remove(&(target, seq));
            fired.push(FiredEvent {
                id: pending.id,
                userdata: pending.userdata,
                cycles_late: self.now - target,
            });
        }
        fired
    }
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new()
    }
}
