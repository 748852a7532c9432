//! # Command Buffer IPC
//!
//! This crate implements the binary command-buffer protocol that guest
//! code uses to invoke host-implemented services.
//!
//! ## Philosophy
//!
//! - **The wire format is law**: word counts declared in the header must
//!   match what is actually consumed, exactly
//! - **Malformed data is fatal**: a mismatched header or buffer descriptor
//!   means the guest or the host violated the contract; there is no
//!   recovery path, only an aborted call
//! - **Round-trip by construction**: a reply built with counts (N, H)
//!   parses back under a parser declared for the same (N, H)
//!
//! ## Wire format
//!
//! Word 0 is the header: bits 0..16 carry the command id, bits 16..22 the
//! normal-parameter word count, bits 22..28 the translate word count
//! (handle words plus two words per static-buffer descriptor). Payload
//! words follow in declared order.

pub mod buffer;
pub mod header;
pub mod request;

pub use buffer::{CommandBuffer, COMMAND_BUFFER_WORDS};
pub use header::Header;
pub use request::{IpcError, RequestBuilder, RequestParser};
