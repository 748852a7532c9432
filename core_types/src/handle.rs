//! Guest-visible handles to kernel objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque 32-bit reference to a kernel object.
///
/// Handles are unique among currently-live objects and are never reused
/// while the object they reference is still alive. The zero value is
/// reserved as an "invalid handle" sentinel, matching the guest ABI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Handle(u32);

impl Handle {
    /// Creates a handle from its raw guest representation
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw guest representation
    pub const fn as_raw(&self) -> u32 {
        self.0
    }

    /// The invalid-handle sentinel (raw value 0)
    pub const fn invalid() -> Self {
        Self(0)
    }

    /// Checks whether this is the invalid-handle sentinel
    pub fn is_invalid(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle(0x{:08X})", self.0)
    }
}
