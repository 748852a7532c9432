//! Kernel object variants

use crate::event::Event;
use crate::session::{ClientSession, ServerSession};
use crate::shared_memory::SharedMemory;

/// A kernel object reachable through the handle table.
///
/// Objects are created through the factory calls on
/// [`crate::Kernel`] (one per kind) and destroyed exactly once when
/// their last handle is closed.
#[derive(Debug)]
pub enum KernelObject {
    /// A signalable synchronization event
    Event(Event),
    /// A guest-provided shared memory block
    SharedMemory(SharedMemory),
    /// The guest-facing endpoint of a session
    ClientSession(ClientSession),
    /// The service-facing endpoint of a session
    ServerSession(ServerSession),
}

impl KernelObject {
    /// Human-readable kind, for logs and errors
    pub fn type_name(&self) -> &'static str {
        match self {
            KernelObject::Event(_) => "Event",
            KernelObject::SharedMemory(_) => "SharedMemory",
            KernelObject::ClientSession(_) => "ClientSession",
            KernelObject::ServerSession(_) => "ServerSession",
        }
    }

    /// Debugging name given at creation
    pub fn name(&self) -> &str {
        match self {
            KernelObject::Event(event) => event.name(),
            KernelObject::SharedMemory(shmem) => shmem.name(),
            KernelObject::ClientSession(session) => session.name(),
            KernelObject::ServerSession(session) => session.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::ResetType;

    #[test]
    fn test_type_names() {
        let event = KernelObject::Event(Event::new(ResetType::OneShot, "ev"));
        assert_eq!(event.type_name(), "Event");
        assert_eq!(event.name(), "ev");

        let shmem = KernelObject::SharedMemory(SharedMemory::new(16, "shm"));
        assert_eq!(shmem.type_name(), "SharedMemory");
    }
}
