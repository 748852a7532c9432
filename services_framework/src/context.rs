//! Handler execution context

use core_timing::EventScheduler;
use hle_kernel::Kernel;
use services_logger::Logger;

/// Everything a handler may touch besides its own service state.
///
/// Injected per call rather than reached through globals, so a service
/// instance owns exactly its own mutable state and tests can assemble
/// a context from scratch.
pub struct ServiceContext<'a> {
    /// The emulated kernel (handle table, sessions, guest memory)
    pub kernel: &'a mut Kernel,
    /// The virtual-time event scheduler
    pub scheduler: &'a mut EventScheduler,
    /// The structured log sink
    pub logger: &'a mut Logger,
}

impl<'a> ServiceContext<'a> {
    /// Assembles a context from its parts
    pub fn new(
        kernel: &'a mut Kernel,
        scheduler: &'a mut EventScheduler,
        logger: &'a mut Logger,
    ) -> Self {
        Self {
            kernel,
            scheduler,
            logger,
        }
    }
}
