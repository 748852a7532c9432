//! Host-side kernel error types

use crate::Handle;
use thiserror::Error;

/// Errors produced by kernel object machinery.
///
/// These are host-side errors. Guest-visible failures travel as
/// [`crate::ResultCode`] values through the reply path instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KernelError {
    /// The handle does not reference a live object, or references an
    /// object of a different kind than the caller asked for
    #[error("No such object: {0}")]
    NotFound(Handle),

    /// A guest memory access fell outside the mapped region
    #[error("Invalid guest address: 0x{0:08X} (+{1} bytes)")]
    InvalidAddress(u32, usize),

    /// A session operation referenced a connection record that is gone
    #[error("Stale connection record: {0}")]
    StaleConnection(usize),
}
