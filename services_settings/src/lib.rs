//! # Settings Surface
//!
//! The read-only configuration snapshot the emulator core consumes.
//!
//! ## Philosophy
//!
//! The core never writes configuration: a UI (out of scope here) edits
//! values and fires a one-shot apply notification; the core observes
//! the notification and re-reads the snapshot at a point of its own
//! choosing. This crate therefore carries only the snapshot type, its
//! JSON persistence, and the notification latch; there is no editing
//! surface.

pub mod apply;
pub mod settings;
pub mod store;

pub use apply::ApplyNotifier;
pub use settings::{ResolutionFactor, ScreenLayout, Settings};
pub use store::{load_or_default, save, SettingsError};
