//! # Core Timing
//!
//! Deterministic, cycle-driven event scheduling.
//!
//! ## Philosophy
//!
//! **Virtual time, not wall-clock time.**
//!
//! Services model timed behavior (periodic beacons, deferred work)
//! against the emulated CPU's cycle counter. Time only advances when the
//! host's main loop says so, which makes every timed interaction
//! reproducible under `cargo test`.
//!
//! The scheduler never calls back into services itself: draining returns
//! the fired events and the single-threaded driver routes them, so
//! scheduled work and synchronous IPC stay strictly ordered on one
//! timeline.

pub mod clock;
pub mod scheduler;

pub use clock::{ms_to_cycles, BASE_CLOCK_RATE};
pub use scheduler::{EventScheduler, FiredEvent, TimingEventId};
