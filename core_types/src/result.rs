//! Guest-visible result codes
//!
//! Every service call answers with a structured outcome carrying a
//! description, the module that produced it, a summary, and a severity
//! level. These codes travel through the normal reply path of the command
//! buffer; guest code inspects them and branches. They are plain data,
//! never Rust errors.
//!
//! The packed encoding is a fixed guest ABI convention:
//!
//! ```text
//! bits  0..10  description
//! bits 10..18  module
//! bits 21..27  summary
//! bits 27..32  level
//! ```
//!
//! A code is an error exactly when the top bit of the raw word is set,
//! which is true for every non-success level.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Detailed description of what happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum ErrorDescription {
    /// Nothing went wrong
    Success = 0,
    /// A size argument did not match the expected size
    InvalidSize = 10,
    /// The remote end of a session is gone
    SessionClosedByRemote = 26,
    /// The caller is not allowed to perform the operation
    NotAuthorized = 56,
    /// A supplied payload exceeds the fixed maximum
    TooLarge = 58,
    /// The referenced object does not exist
    NotFound = 120,
}

/// Subsystem that produced the code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum ErrorModule {
    /// Shared / unattributed
    Common = 0,
    /// Kernel object machinery
    Kernel = 1,
    /// OS-level session plumbing
    Os = 2,
    /// Local wireless network service
    Wlan = 27,
}

/// Coarse category of the outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum ErrorSummary {
    /// Nothing went wrong
    Success = 0,
    /// The referenced object does not exist
    NotFound = 4,
    /// An invalid or disallowed argument was supplied
    WrongArgument = 8,
    /// The operation was canceled, e.g. by a peer disconnect
    Canceled = 9,
    /// Status-change notification
    StatusChanged = 10,
}

/// Severity of the outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum ErrorLevel {
    /// Nothing went wrong
    Success = 0,
    /// Informational
    Info = 1,
    /// The state of the world changed underneath the caller
    Status = 25,
    /// The caller misused the interface
    Usage = 28,
    /// Unrecoverable
    Fatal = 31,
}

/// A packed guest-visible result code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCode(u32);

impl ResultCode {
    /// The canonical success code (raw 0)
    pub const SUCCESS: ResultCode = ResultCode(0);

    /// Packs the four components into a raw code
    pub const fn new(
        description: ErrorDescription,
        module: ErrorModule,
        summary: ErrorSummary,
        level: ErrorLevel,
    ) -> Self {
        Self(
            description as u32
                | (module as u32) << 10
                | (summary as u32) << 21
                | (level as u32) << 27,
        )
    }

    /// Creates a code from its raw guest representation
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw guest representation
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// True when this code signals an error
    pub fn is_error(&self) -> bool {
        self.0 & 0x8000_0000 != 0
    }

    /// True when this code signals success
    pub fn is_success(&self) -> bool {
        !self.is_error()
    }

    /// Extracts the description bits
    pub fn description_bits(&self) -> u32 {
        self.0 & 0x3FF
    }

    /// Extracts the module bits
    pub fn module_bits(&self) -> u32 {
        (self.0 >> 10) & 0xFF
    }

    /// Extracts the summary bits
    pub fn summary_bits(&self) -> u32 {
        (self.0 >> 21) & 0x3F
    }

    /// Extracts the level bits
    pub fn level_bits(&self) -> u32 {
        (self.0 >> 27) & 0x1F
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResultCode(0x{:08X})", self.0)
    }
}

/// Code returned when a session's peer has vanished mid-call
pub const ERR_SESSION_CLOSED: ResultCode = ResultCode::new(
    ErrorDescription::SessionClosedByRemote,
    ErrorModule::Os,
    ErrorSummary::Canceled,
    ErrorLevel::Status,
);
