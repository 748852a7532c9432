//! # Core Types
//!
//! Shared vocabulary types for the HLE IPC substrate.
//!
//! ## Philosophy
//!
//! - **Opaque handles**: guest code only ever sees `Handle` values, never
//!   object addresses or table indices
//! - **Typed results**: guest-visible outcomes are structured `ResultCode`
//!   values, not bare integers
//! - **Host errors are separate**: bugs in the host or malformed wire data
//!   surface as `KernelError`, never as a guest-visible code

pub mod error;
pub mod handle;
pub mod ids;
pub mod result;

pub use error::KernelError;
pub use handle::Handle;
pub use ids::ServiceInstanceId;
pub use result::{
    ErrorDescription, ErrorLevel, ErrorModule, ErrorSummary, ResultCode, ERR_SESSION_CLOSED,
};
