//! Synchronization events
//!
//! Events are the wait/signal primitive services hand to guest code.
//! Waiters are not OS threads: they are cooperative continuations,
//! represented here as opaque tokens parked on the object and returned
//! to the caller when a signal wakes them.

use std::fmt;

/// Opaque token identifying a parked continuation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WaiterId(u64);

impl WaiterId {
    /// Creates a waiter token from a raw value
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw token value
    pub const fn as_raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WaiterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Waiter({})", self.0)
    }
}

/// Reset policy chosen per event at creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetType {
    /// Auto-clears after waking exactly the waiters present at signal
    /// time; with no waiters present the signal latches until consumed
    OneShot,
    /// Stays signaled until explicitly cleared; repeated signals are
    /// idempotent
    Sticky,
}

/// A signalable kernel event
#[derive(Debug)]
pub struct Event {
    name: String,
    reset_type: ResetType,
    signaled: bool,
    parked: Vec<WaiterId>,
}

impl Event {
    /// Creates an unsignaled event
    pub fn new(reset_type: ResetType, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reset_type,
            signaled: false,
            parked: Vec::new(),
        }
    }

    /// The event's debugging name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The reset policy chosen at creation
    pub fn reset_type(&self) -> ResetType {
        self.reset_type
    }

    /// Whether the event is currently signaled
    pub fn is_signaled(&self) -> bool {
        self.signaled
    }

    /// Parks a continuation on this event.
    ///
    /// A OneShot event that is already signaled consumes the signal and
    /// wakes the waiter immediately (returns true). A signaled Sticky
    /// event wakes immediately without clearing.
    pub fn park(&mut self, waiter: WaiterId) -> bool {
        if self.signaled {
            if self.reset_type == ResetType::OneShot {
                self.signaled = false;
            }
            return true;
        }
        self.parked.push(waiter);
        false
    }

    /// Signals the event, returning the continuations to resume.
    ///
    /// OneShot: wakes exactly the waiters parked right now and
    /// auto-clears; with nobody parked, the signal latches. Sticky:
    /// wakes everyone parked and stays signaled; signaling again is
    /// idempotent.
    pub fn signal(&mut self) -> Vec<WaiterId> {
        let woken = std::mem::take(&mut self.parked);
        match self.reset_type {
            ResetType::OneShot => {
                self.signaled = woken.is_empty();
            }
            ResetType::Sticky => {
                self.signaled = true;
            }
        }
        woken
    }

    /// Explicitly clears the signaled state
    pub fn clear(&mut self) {
        self.signaled = false;
    }

    /// Number of continuations currently parked
    pub fn parked_count(&self) -> usize {
        self.parked.len()
    }
}
