//! # HLE Kernel
//!
//! Emulated kernel objects for the HLE IPC substrate.
//!
//! ## Purpose
//!
//! Guest binaries written against a microkernel-style synchronous
//! message-passing model interact with the kernel through small integer
//! handles. This crate implements that surface in-process:
//! - a handle-indexed, reference-counted object table
//! - synchronization objects (events with one-shot and sticky reset)
//! - kernel-mediated session pairs with independent teardown
//! - a flat emulated guest memory for the raw-copy IPC path
//!
//! ## Philosophy
//!
//! All state is directly inspectable; nothing hides behind real OS
//! threads or handles. Waiting "threads" are cooperative continuations
//! represented as opaque tokens, so blocking semantics can be tested
//! without concurrency.

pub mod event;
pub mod handle_table;
pub mod kernel;
pub mod memory;
pub mod object;
pub mod session;
pub mod shared_memory;

pub use event::{Event, ResetType, WaiterId};
pub use handle_table::HandleTable;
pub use kernel::{CloseOutcome, Kernel};
pub use memory::GuestMemory;
pub use object::KernelObject;
pub use session::{ClientSession, ConnectionId, ConnectionRecord, ServerSession};
pub use shared_memory::SharedMemory;
