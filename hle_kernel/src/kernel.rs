//! Kernel facade
//!
//! Owns the handle table, the session arena, and the emulated guest
//! memory, and provides the factory calls (one per object kind) plus
//! the teardown flow that keeps session-pair semantics in one place.

use core_types::{Handle, KernelError, ServiceInstanceId};

use crate::event::{Event, ResetType, WaiterId};
use crate::handle_table::HandleTable;
use crate::memory::GuestMemory;
use crate::object::KernelObject;
use crate::session::{ClientSession, ConnectionId, ConnectionRecord, ServerSession};
use crate::shared_memory::SharedMemory;

/// What closing a handle amounted to.
///
/// Woken waiter tokens are returned to the caller, which is responsible
/// for delivering the session-closed cancellation code to each resumed
/// continuation; the kernel itself does not model result delivery.
#[derive(Debug)]
pub enum CloseOutcome {
    /// The handle is gone but other handles keep the object alive
    Released,
    /// The object was destroyed with no session teardown to run
    Destroyed,
    /// A client session died while its server endpoint still lives:
    /// the installed service (if any) must be notified of the
    /// disconnect, and the waiters parked on the server session have
    /// been woken
    ClientDisconnected {
        /// Service instance installed on the surviving server session
        service: Option<ServiceInstanceId>,
        /// Continuations that were blocked on the server session
        woken: Vec<WaiterId>,
    },
}

/// The emulated kernel for one guest process context
#[derive(Debug)]
pub struct Kernel {
    handle_table: HandleTable,
    connections: Vec<Option<ConnectionRecord>>,
    memory: GuestMemory,
}

impl Kernel {
    /// Creates a kernel with the default guest memory region
    pub fn new() -> Self {
        Self::with_memory(GuestMemory::default())
    }

    /// Creates a kernel over a caller-supplied guest memory region
    pub fn with_memory(memory: GuestMemory) -> Self {
        Self {
            handle_table: HandleTable::new(),
            connections: Vec::new(),
            memory,
        }
    }

    /// The handle table
    pub fn handle_table(&self) -> &HandleTable {
        &self.handle_table
    }

    /// The handle table, mutably
    pub fn handle_table_mut(&mut self) -> &mut HandleTable {
        &mut self.handle_table
    }

    /// Emulated guest memory
    pub fn memory(&self) -> &GuestMemory {
        &self.memory
    }

    /// Emulated guest memory, mutably
    pub fn memory_mut(&mut self) -> &mut GuestMemory {
        &mut self.memory
    }

    /// Factory: creates an event and returns its handle
    pub fn create_event(&mut self, reset_type: ResetType, name: impl Into<String>) -> Handle {
        self.handle_table
            .create(KernelObject::Event(Event::new(reset_type, name)))
    }

    /// Factory: creates a shared memory block and returns its handle
    pub fn create_shared_memory(&mut self, size: u32, name: impl Into<String>) -> Handle {
        self.handle_table
            .create(KernelObject::SharedMemory(SharedMemory::new(size, name)))
    }

    /// Factory: creates a connected client/server session pair.
    ///
    /// Both endpoints share a fresh arena record; the record outlives
    /// whichever endpoint dies first and is freed when both are gone.
    pub fn create_session_pair(&mut self, name: &str) -> (Handle, Handle) {
        let connection = ConnectionId(self.connections.len());
        self.connections.push(Some(ConnectionRecord::new()));

        let client = self
            .handle_table
            .create(KernelObject::ClientSession(ClientSession::new(
                format!("{}:client", name),
                connection,
            )));
        let server = self
            .handle_table
            .create(KernelObject::ServerSession(ServerSession::new(
                format!("{}:server", name),
                connection,
            )));

        let record = self.connections[connection.0]
            .as_mut()
            .expect("fresh record");
        record.client_handle = Some(client);
        record.server_handle = Some(server);
        (client, server)
    }

    /// Looks up a connection record
    pub fn connection(&self, id: ConnectionId) -> Option<&ConnectionRecord> {
        self.connections.get(id.0).and_then(|slot| slot.as_ref())
    }

    fn connection_mut(&mut self, id: ConnectionId) -> Result<&mut ConnectionRecord, KernelError> {
        self.connections
            .get_mut(id.0)
            .and_then(|slot| slot.as_mut())
            .ok_or(KernelError::StaleConnection(id.0))
    }

    /// Peer-liveness query for a client endpoint: is the server side of
    /// this session still reachable?
    pub fn server_alive(&self, client: Handle) -> Result<bool, KernelError> {
        let connection = self.handle_table.get_client_session(client)?.connection();
        Ok(self
            .connection(connection)
            .map(|record| record.server_alive())
            .unwrap_or(false))
    }

    /// Resolves the server session handle paired with a client endpoint
    pub fn server_for_client(&self, client: Handle) -> Result<Option<Handle>, KernelError> {
        let connection = self.handle_table.get_client_session(client)?.connection();
        Ok(self
            .connection(connection)
            .filter(|record| record.server_alive())
            .and_then(|record| record.server_handle))
    }

    /// Closes a handle, running session teardown when the last handle
    /// to a session endpoint goes away.
    pub fn close_handle(&mut self, handle: Handle) -> Result<CloseOutcome, KernelError> {
        let destroyed = match self.handle_table.close(handle)? {
            Some(object) => object,
            None => return Ok(CloseOutcome::Released),
        };
        match destroyed {
            KernelObject::ClientSession(session) => self.teardown_client(session.connection()),
            KernelObject::ServerSession(session) => self.teardown_server(session.connection()),
            _ => Ok(CloseOutcome::Destroyed),
        }
    }

    fn teardown_client(&mut self, connection: ConnectionId) -> Result<CloseOutcome, KernelError> {
        let record = self.connection_mut(connection)?;
        record.client_alive = false;
        record.client_handle = None;

        if !record.server_alive {
            // Both sides gone: free the record.
            self.connections[connection.0] = None;
            return Ok(CloseOutcome::Destroyed);
        }

        let server_handle = record.server_handle.expect("server endpoint alive");
        let server = self.handle_table.get_server_session_mut(server_handle)?;
        let service = server.service();
        let woken = server.drain_parked();
        Ok(CloseOutcome::ClientDisconnected { service, woken })
    }

    fn teardown_server(&mut self, connection: ConnectionId) -> Result<CloseOutcome, KernelError> {
        let record = self.connection_mut(connection)?;
        record.server_alive = false;
        record.server_handle = None;
        if !record.client_alive {
            self.connections[connection.0] = None;
        }
        Ok(CloseOutcome::Destroyed)
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_factory() {
        let mut kernel = Kernel::new();
        let handle = kernel.create_event(ResetType::OneShot, "ev");
        assert!(kernel.handle_table().get_event(handle).is_ok());
    }

    #[test]
    fn test_session_pair_is_connected() {
        let mut kernel = Kernel::new();
        let (client, server) = kernel.create_session_pair("net:host");

        assert!(kernel.server_alive(client).unwrap());
        assert_eq!(kernel.server_for_client(client).unwrap(), Some(server));

        let client_session = kernel.handle_table().get_client_session(client).unwrap();
        let server_session = kernel.handle_table().get_server_session(server).unwrap();
        assert_eq!(client_session.connection(), server_session.connection());
    }

    #[test]
    fn test_client_close_notifies_and_wakes() {
        let mut kernel = Kernel::new();
        let (client, server) = kernel.create_session_pair("svc");

        let instance = ServiceInstanceId::new();
        kernel
            .handle_table_mut()
            .get_server_session_mut(server)
            .unwrap()
            .install_service(instance);
        kernel
            .handle_table_mut()
            .get_server_session_mut(server)
            .unwrap()
            .park(WaiterId::from_raw(42));

        match kernel.close_handle(client).unwrap() {
            CloseOutcome::ClientDisconnected { service, woken } => {
                assert_eq!(service, Some(instance));
                assert_eq!(woken, vec![WaiterId::from_raw(42)]);
            }
            other => panic!("Expected ClientDisconnected, got {:?}", other),
        }

        // The record survives for the server's peer queries.
        let connection = kernel
            .handle_table()
            .get_server_session(server)
            .unwrap()
            .connection();
        let record = kernel.connection(connection).unwrap();
        assert!(!record.client_alive());
        assert!(record.server_alive());
    }

    #[test]
    fn test_server_close_leaves_client_queryable() {
        let mut kernel = Kernel::new();
        let (client, server) = kernel.create_session_pair("svc");

        assert!(matches!(
            kernel.close_handle(server).unwrap(),
            CloseOutcome::Destroyed
        ));
        assert!(!kernel.server_alive(client).unwrap());
        assert_eq!(kernel.server_for_client(client).unwrap(), None);
    }

    #[test]
    fn test_record_freed_when_both_sides_gone() {
        let mut kernel = Kernel::new();
        let (client, server) = kernel.create_session_pair("svc");
        let connection = kernel
            .handle_table()
            .get_client_session(client)
            .unwrap()
            .connection();

        kernel.close_handle(server).unwrap();
        assert!(kernel.connection(connection).is_some());
        kernel.close_handle(client).unwrap();
        assert!(kernel.connection(connection).is_none());
    }

    #[test]
    fn test_duplicated_client_handle_defers_teardown() {
        let mut kernel = Kernel::new();
        let (client, _server) = kernel.create_session_pair("svc");
        let extra = kernel.handle_table_mut().duplicate(client).unwrap();

        assert!(matches!(
            kernel.close_handle(client).unwrap(),
            CloseOutcome::Released
        ));
        // The session is still alive through the duplicate.
        assert!(kernel.server_alive(extra).unwrap());

        assert!(matches!(
            kernel.close_handle(extra).unwrap(),
            CloseOutcome::ClientDisconnected { .. }
        ));
    }

    #[test]
    fn test_close_plain_object() {
        let mut kernel = Kernel::new();
        let handle = kernel.create_event(ResetType::Sticky, "ev");
        assert!(matches!(
            kernel.close_handle(handle).unwrap(),
            CloseOutcome::Destroyed
        ));
        assert!(kernel.handle_table().get_event(handle).is_err());
    }
}
