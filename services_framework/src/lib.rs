//! # Service Framework
//!
//! Dispatch and lifecycle plumbing for HLE services.
//!
//! ## Philosophy
//!
//! - **One table per service**: each service declares a static table of
//!   (command id, handler-or-stub, readable name) rows; the name is
//!   documentation, never parsed
//! - **Stubs are explicit**: an unimplemented command is a tagged table
//!   variant, not a null pointer, and its log-and-succeed behavior is a
//!   testable branch
//! - **No ambient state**: handlers receive the kernel, scheduler, and
//!   logger through an injected context; a process-wide registry only
//!   maps port names to service instances
//!
//! ## Control flow
//!
//! A guest request travels: client session → paired server session →
//! the installed service's dispatch table → handler. The handler
//! mutates service state, may create or signal kernel objects, may
//! schedule future callbacks, and writes its reply into the same
//! command buffer. Everything happens synchronously on one logical
//! thread; handlers can never interleave.

pub mod context;
pub mod dispatch;
pub mod error;
pub mod manager;

pub use context::ServiceContext;
pub use dispatch::{ErasedService, FunctionEntry, FunctionInfo, Handler, HleService};
pub use error::HleError;
pub use manager::ServiceManager;
