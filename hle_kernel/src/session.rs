//! Session pairs
//!
//! A session is a kernel-mediated synchronous channel between one
//! client endpoint and one server endpoint. The two endpoints are
//! ordinary kernel objects; what ties them together is an arena-owned
//! connection record addressed by index, so neither side owns the
//! other and each can be torn down independently. The record itself is
//! freed only once both sides are gone, but stays queryable ("is the
//! peer still alive") while either side lives.

use core_types::ServiceInstanceId;
use std::fmt;

use crate::event::WaiterId;

/// Index of a connection record in the session arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub(crate) usize);

impl ConnectionId {
    /// Returns the arena index
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Connection({})", self.0)
    }
}

/// Shared connection state for one client/server pair.
///
/// Each side's aliveness flag is cleared when that endpoint object is
/// destroyed; the handles let the kernel reach the surviving endpoint
/// during the other side's teardown.
#[derive(Debug)]
pub struct ConnectionRecord {
    pub(crate) client_alive: bool,
    pub(crate) server_alive: bool,
    pub(crate) client_handle: Option<core_types::Handle>,
    pub(crate) server_handle: Option<core_types::Handle>,
}

impl ConnectionRecord {
    pub(crate) fn new() -> Self {
        Self {
            client_alive: true,
            server_alive: true,
            client_handle: None,
            server_handle: None,
        }
    }

    /// Whether the client endpoint still exists
    pub fn client_alive(&self) -> bool {
        self.client_alive
    }

    /// Whether the server endpoint still exists
    pub fn server_alive(&self) -> bool {
        self.server_alive
    }
}

/// The guest-facing endpoint of a session
#[derive(Debug)]
pub struct ClientSession {
    name: String,
    connection: ConnectionId,
}

impl ClientSession {
    pub(crate) fn new(name: impl Into<String>, connection: ConnectionId) -> Self {
        Self {
            name: name.into(),
            connection,
        }
    }

    /// The session's debugging name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The connection record this endpoint belongs to
    pub fn connection(&self) -> ConnectionId {
        self.connection
    }
}

/// The service-facing endpoint of a session.
///
/// A server session optionally carries an installed service instance
/// (the dispatcher that answers requests arriving here), and tracks
/// continuations blocked waiting on it so a peer disconnect can wake
/// them with the cancellation code.
#[derive(Debug)]
pub struct ServerSession {
    name: String,
    connection: ConnectionId,
    service: Option<ServiceInstanceId>,
    parked: Vec<WaiterId>,
}

impl ServerSession {
    pub(crate) fn new(name: impl Into<String>, connection: ConnectionId) -> Self {
        Self {
            name: name.into(),
            connection,
            service: None,
            parked: Vec::new(),
        }
    }

    /// The session's debugging name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The connection record this endpoint belongs to
    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    /// The installed service instance, if any
    pub fn service(&self) -> Option<ServiceInstanceId> {
        self.service
    }

    /// Installs the service instance that answers requests here
    pub fn install_service(&mut self, instance: ServiceInstanceId) {
        self.service = Some(instance);
    }

    /// Parks a continuation waiting on this session
    pub fn park(&mut self, waiter: WaiterId) {
        self.parked.push(waiter);
    }

    /// Number of continuations currently parked
    pub fn parked_count(&self) -> usize {
        self.parked.len()
    }

    pub(crate) fn drain_parked(&mut self) -> Vec<WaiterId> {
        std::mem::take(&mut self.parked)
    }
}
