//! # Local Wireless Host Service
//!
//! The worked-example protocol service: emulates the local wireless
//! networking daemon guests use to host ad-hoc networks.
//!
//! ## Scope
//!
//! Hosting only. A guest can initialize the service, begin hosting a
//! network, bind data channels, publish application data, and tear the
//! network down. No frames leave the host; the periodic beacon is a
//! virtual-time callback whose payload generation is unmodeled. Client
//! and spectator connection states are represented in the status
//! record but have no join path.
//!
//! ## Philosophy
//!
//! The service is a plain state machine over the substrate crates:
//! kernel objects come from the handle table, timed behavior from the
//! event scheduler, and every guest interaction is one synchronous
//! command-buffer exchange. All state is per-instance; two installed
//! instances share nothing.

pub mod records;
pub mod service;

pub use records::{
    ConnectionStatus, NetworkInfo, NetworkStatus, NodeInfo, APPLICATION_DATA_SIZE,
    CONNECTION_STATUS_SIZE, DEFAULT_NETWORK_CHANNEL, NETWORK_INFO_SIZE, NODE_INFO_SIZE,
};
pub use service::{beacon_interval_cycles, WlanHostService};
