//! Framework error types

use core_types::{Handle, KernelError};
use ipc::IpcError;
use thiserror::Error;

/// Errors that abort an HLE call on the host side.
///
/// These never reach guest code as values: wire violations and kernel
/// lookup failures mean the call itself cannot be answered. Guest-
/// visible failures travel as `ResultCode`s in the reply instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HleError {
    /// The wire contract was violated (protocol-fatal)
    #[error(transparent)]
    Ipc(#[from] IpcError),

    /// A kernel object lookup or teardown failed
    #[error(transparent)]
    Kernel(#[from] KernelError),

    /// No service is registered under the requested port name
    #[error("Unknown service port: {0}")]
    UnknownPort(String),

    /// The server session has no installed service instance
    #[error("No service installed on server session {0}")]
    NoServiceInstalled(Handle),

    /// A guest-provided shared memory block disagrees with its declared
    /// size (protocol-fatal, like a static-buffer size mismatch)
    #[error("Shared memory size mismatch: declared {declared:#X}, object is {actual:#X}")]
    SharedMemorySizeMismatch { declared: u32, actual: u32 },
}
