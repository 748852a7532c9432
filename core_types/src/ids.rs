//! Unique identifiers for host-side entities

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an installed service instance.
///
/// Guest code never sees these; they tag server sessions and registry
/// entries on the host side so a request arriving on a session can be
/// routed to the service instance that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceInstanceId(Uuid);

impl ServiceInstanceId {
    /// Creates a new random instance ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an instance ID from a UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ServiceInstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ServiceInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceInstance({})", self.0)
    }
}
