//! Service manager
//!
//! Owns the kernel, the scheduler, and the logger, plus every
//! installed service instance. Services never hold references into the
//! kernel; each call receives a fresh [`ServiceContext`] borrowing the
//! manager's subsystems, which keeps all mutation single-threaded and
//! borrow-checked at the call boundary.

use std::collections::HashMap;

use core_timing::{EventScheduler, TimingEventId};
use core_types::{Handle, ResultCode, ServiceInstanceId, ERR_SESSION_CLOSED};
use hle_kernel::{CloseOutcome, Kernel, WaiterId};
use ipc::CommandBuffer;
use services_logger::Logger;

use crate::context::ServiceContext;
use crate::dispatch::ErasedService;
use crate::error::HleError;

/// Hosts service instances and routes guest requests to them
pub struct ServiceManager {
    kernel: Kernel,
    scheduler: EventScheduler,
    logger: Logger,
    services: HashMap<ServiceInstanceId, Box<dyn ErasedService>>,
    ports: HashMap<&'static str, ServiceInstanceId>,
    timing_owners: HashMap<TimingEventId, ServiceInstanceId>,
}

impl ServiceManager {
    /// Creates an empty manager with a fresh kernel and scheduler
    pub fn new() -> Self {
        Self {
            kernel: Kernel::new(),
            scheduler: EventScheduler::new(),
            logger: Logger::new(),
            services: HashMap::new(),
            ports: HashMap::new(),
            timing_owners: HashMap::new(),
        }
    }

    /// The kernel
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// The kernel, mutably
    pub fn kernel_mut(&mut self) -> &mut Kernel {
        &mut self.kernel
    }

    /// The event scheduler
    pub fn scheduler(&self) -> &EventScheduler {
        &self.scheduler
    }

    /// The event scheduler, mutably
    pub fn scheduler_mut(&mut self) -> &mut EventScheduler {
        &mut self.scheduler
    }

    /// The log sink
    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// The log sink, mutably
    pub fn logger_mut(&mut self) -> &mut Logger {
        &mut self.logger
    }

    /// Constructs and installs a service, registering its port name and
    /// claiming ownership of its scheduler events.
    ///
    /// The constructor runs with a [`ServiceContext`] so services can
    /// allocate kernel objects and register timing events up front.
    pub fn install_with<S, F>(&mut self, build: F) -> ServiceInstanceId
    where
        S: ErasedService + 'static,
        F: FnOnce(&mut ServiceContext<'_>) -> S,
    {
        let service = {
            let mut ctx =
                ServiceContext::new(&mut self.kernel, &mut self.scheduler, &mut self.logger);
            build(&mut ctx)
        };
        let instance = ServiceInstanceId::new();
        self.ports.insert(service.port_name(), instance);
        for event in service.timing_events() {
            self.timing_owners.insert(event, instance);
        }
        self.services.insert(instance, Box::new(service));
        instance
    }

    /// Opens a session to a named port and returns the client handle
    pub fn connect(&mut self, port: &str) -> Result<Handle, HleError> {
        let instance = *self
            .ports
            .get(port)
            .ok_or_else(|| HleError::UnknownPort(port.to_string()))?;
        let (client, server) = self.kernel.create_session_pair(port);
        self.kernel
            .handle_table_mut()
            .get_server_session_mut(server)?
            .install_service(instance);
        self.logger
            .debug("svc:manager", format!("session opened to '{}'", port));
        Ok(client)
    }

    /// Performs one synchronous request over a client session.
    ///
    /// Returns `Ok(ERR_SESSION_CLOSED)` when the server endpoint is
    /// already gone; a request over a dead session is a cancellation,
    /// not a host bug.
    pub fn send_sync_request(
        &mut self,
        client: Handle,
        cmd: &mut CommandBuffer,
    ) -> Result<ResultCode, HleError> {
        let server = match self.kernel.server_for_client(client)? {
            Some(server) => server,
            None => return Ok(ERR_SESSION_CLOSED),
        };
        let instance = self
            .kernel
            .handle_table()
            .get_server_session(server)?
            .service()
            .ok_or(HleError::NoServiceInstalled(server))?;

        // Take the instance out of the map so the service and the
        // context can be borrowed mutably at the same time.
        let mut service = self
            .services
            .remove(&instance)
            .ok_or(HleError::NoServiceInstalled(server))?;
        let result = {
            let mut ctx =
                ServiceContext::new(&mut self.kernel, &mut self.scheduler, &mut self.logger);
            service.handle_sync_request(&mut ctx, cmd)
        };
        self.services.insert(instance, service);
        result?;
        Ok(ResultCode::SUCCESS)
    }

    /// Closes a handle, running disconnect notification when the client
    /// end of a live session dies.
    ///
    /// Returns the waiters woken by the teardown, each paired with the
    /// cancellation code to deliver to its resumed continuation.
    pub fn close_handle(
        &mut self,
        handle: Handle,
    ) -> Result<Vec<(WaiterId, ResultCode)>, HleError> {
        match self.kernel.close_handle(handle)? {
            CloseOutcome::Released | CloseOutcome::Destroyed => Ok(Vec::new()),
            CloseOutcome::ClientDisconnected { service, woken } => {
                if let Some(instance) = service {
                    if let Some(mut service) = self.services.remove(&instance) {
                        {
                            let mut ctx = ServiceContext::new(
                                &mut self.kernel,
                                &mut self.scheduler,
                                &mut self.logger,
                            );
                            service.client_disconnected(&mut ctx);
                        }
                        self.services.insert(instance, service);
                    }
                }
                Ok(woken
                    .into_iter()
                    .map(|waiter| (waiter, ERR_SESSION_CLOSED))
                    .collect())
            }
        }
    }

    /// Advances emulated time, routing fired events to the services
    /// that own them
    pub fn advance_to(&mut self, cycle: u64) {
        for fired in self.scheduler.advance_to(cycle) {
            match self.timing_owners.get(&fired.id).copied() {
                Some(instance) => {
                    if let Some(mut service) = self.services.remove(&instance) {
                        {
                            let mut ctx = ServiceContext::new(
                                &mut self.kernel,
                                &mut self.scheduler,
                                &mut self.logger,
                            );
                            service.timing_event(&mut ctx, fired);
                        }
                        self.services.insert(instance, service);
                    }
                }
                None => {
                    self.logger.warn(
                        "svc:manager",
                        format!(
                            "event '{}' fired with no owning service",
                            self.scheduler.event_name(fired.id)
                        ),
                    );
                }
            }
        }
    }
}

impl Default for ServiceManager {
    fn default() -> Self {
        Self::new()
    }
}
