//! Local wireless host service
//!
//! Protocol state machine for hosting a local wireless network:
//! connection lifecycle, per-node bind events, and periodic beacon
//! scheduling. Nothing leaves the host; the beacon exists only as a
//! virtual-time callback.

use std::collections::HashMap;

use core_timing::{ms_to_cycles, FiredEvent, TimingEventId};
use core_types::{
    ErrorDescription, ErrorLevel, ErrorModule, ErrorSummary, Handle, ResultCode,
};
use hle_kernel::ResetType;
use ipc::{CommandBuffer, RequestParser};
use services_framework::{
    FunctionEntry, FunctionInfo, HleError, HleService, ServiceContext,
};

use crate::records::{
    ConnectionStatus, NetworkInfo, NetworkStatus, NodeInfo, APPLICATION_DATA_SIZE,
    DEFAULT_NETWORK_CHANNEL, NETWORK_INFO_SIZE, NODE_INFO_SIZE,
};

/// Beacon interval in time units; 1 TU = 1.024 ms, so 100 TU = 102.4 ms
const DEFAULT_BEACON_INTERVAL_TU: u16 = 100;
const MILLISECONDS_PER_TU: f64 = 1.024;

/// Cycle count between consecutive beacon frames
pub fn beacon_interval_cycles() -> u64 {
    ms_to_cycles(f64::from(DEFAULT_BEACON_INTERVAL_TU) * MILLISECONDS_PER_TU)
}

const PORT_NAME: &str = "nwm::UDS";

/// Local wireless network host service
pub struct WlanHostService {
    /// Signaled every time the connection status changes; a duplicate
    /// handle is handed to the guest at initialization
    status_event: Handle,
    /// Scheduler identity of the beacon broadcast callback
    beacon_event: TimingEventId,
    /// Shared memory block the guest provides for its receive buffer.
    /// Resolved and size-checked at initialization, not otherwise used.
    recv_buffer: Option<Handle>,
    connection_status: ConnectionStatus,
    /// This station's identity, as supplied at initialization
    node_info: NodeInfo,
    network_info: NetworkInfo,
    /// Channel the hosted network transmits on. A dummy value, there
    /// are no physical radio waves to agree with.
    network_channel: u8,
    /// Bind-node id to data-available event
    bind_node_events: HashMap<u32, Handle>,
}

impl WlanHostService {
    /// Creates the service, allocating its status event and registering
    /// its beacon callback with the scheduler
    pub fn new(ctx: &mut ServiceContext<'_>) -> Self {
        let status_event = ctx
            .kernel
            .create_event(ResetType::OneShot, "wlan:connection-status");
        let beacon_event = ctx.scheduler.register_event("wlan::beacon_broadcast");
        Self {
            status_event,
            beacon_event,
            recv_buffer: None,
            connection_status: ConnectionStatus::default(),
            node_info: NodeInfo::default(),
            network_info: NetworkInfo::default(),
            network_channel: DEFAULT_NETWORK_CHANNEL,
            bind_node_events: HashMap::new(),
        }
    }

    /// The current connection status record
    pub fn connection_status(&self) -> &ConnectionStatus {
        &self.connection_status
    }

    /// The current network metadata record
    pub fn network_info(&self) -> &NetworkInfo {
        &self.network_info
    }

    fn is_hosting(&self) -> bool {
        self.connection_status.status == NetworkStatus::ConnectedAsHost as u32
    }
}

/// Pops shared-memory size, the caller's NodeInfo, the wire version,
/// and the shared-memory handle; resolves and size-checks the block,
/// then resets the connection status and replies with a duplicate of
/// the status event handle.
fn initialize_with_version(
    service: &mut WlanHostService,
    ctx: &mut ServiceContext<'_>,
    cmd: &mut CommandBuffer,
) -> Result<(), HleError> {
    let mut rp = RequestParser::new(cmd, 0x1B, 12, 1)?;
    let sharedmem_size = rp.pop()?;
    let node_bytes = rp.pop_raw(NODE_INFO_SIZE)?;
    let version = rp.pop()? as u16;
    let sharedmem_handle = rp.pop_handle()?;

    let block = ctx.kernel.handle_table().get_shared_memory(sharedmem_handle)?;
    if block.size() != sharedmem_size {
        return Err(HleError::SharedMemorySizeMismatch {
            declared: sharedmem_size,
            actual: block.size(),
        });
    }
    service.recv_buffer = Some(sharedmem_handle);

    // Keep what the guest told us about itself; retransmitted in
    // beacon frames once those carry payloads.
    let node_array: [u8; NODE_INFO_SIZE] = node_bytes
        .as_slice()
        .try_into()
        .expect("pop_raw returns the requested length");
    service.node_info = NodeInfo::from_bytes(&node_array);

    // All zeros after initialization except the status value itself.
    service.connection_status = ConnectionStatus::default();

    let status_handle = ctx.kernel.handle_table_mut().duplicate(service.status_event)?;

    ctx.logger.debug(
        PORT_NAME,
        format!(
            "called sharedmem_size=0x{:08X}, version=0x{:04X}",
            sharedmem_size, version
        ),
    );

    let mut rb = rp.make_builder(cmd, 1, 1)?;
    rb.push_result(ResultCode::SUCCESS)?;
    rb.push_copy_handles(&[status_handle])?;
    Ok(())
}

/// Replies with the raw ConnectionStatus record
fn get_connection_status(
    service: &mut WlanHostService,
    ctx: &mut ServiceContext<'_>,
    cmd: &mut CommandBuffer,
) -> Result<(), HleError> {
    let rp = RequestParser::new(cmd, 0x0B, 0, 0)?;
    ctx.logger.debug(PORT_NAME, "called");

    let mut rb = rp.make_builder(cmd, 13, 0)?;
    rb.push_result(ResultCode::SUCCESS)?;
    rb.push_raw(&service.connection_status.to_bytes())?;
    Ok(())
}

/// Binds a node id to a data channel and returns a fresh data event.
///
/// Channel 0 is rejected with a usage error and no event is created;
/// a rebind of an existing node id replaces its tracked event.
fn bind(
    service: &mut WlanHostService,
    ctx: &mut ServiceContext<'_>,
    cmd: &mut CommandBuffer,
) -> Result<(), HleError> {
    let mut rp = RequestParser::new(cmd, 0x12, 4, 0)?;
    let bind_node_id = rp.pop()?;
    let _recv_buffer_size = rp.pop()?;
    let data_channel = rp.pop()? as u8;
    let _network_node_id = rp.pop()? as u16;

    ctx.logger.debug(PORT_NAME, "called");

    if data_channel == 0 {
        let mut rb = rp.make_builder(cmd, 1, 0)?;
        rb.push_result(ResultCode::new(
            ErrorDescription::NotAuthorized,
            ErrorModule::Wlan,
            ErrorSummary::WrongArgument,
            ErrorLevel::Usage,
        ))?;
        return Ok(());
    }

    let event = ctx.kernel.create_event(
        ResetType::OneShot,
        format!("wlan:bind-node-{}", bind_node_id),
    );
    if let Some(previous) = service.bind_node_events.insert(bind_node_id, event) {
        ctx.kernel.close_handle(previous)?;
    }

    let mut rb = rp.make_builder(cmd, 1, 1)?;
    rb.push_result(ResultCode::SUCCESS)?;
    rb.push_copy_handles(&[event])?;
    Ok(())
}

/// Copies the network metadata out of guest memory, transitions to
/// ConnectedAsHost, signals the status event, and schedules the first
/// beacon frame
fn begin_hosting_network(
    service: &mut WlanHostService,
    ctx: &mut ServiceContext<'_>,
    cmd: &mut CommandBuffer,
) -> Result<(), HleError> {
    let mut rp = RequestParser::new(cmd, 0x1D, 1, 4)?;
    let passphrase_size = rp.pop()?;
    let network_info_address = rp.pop_static_buffer(NETWORK_INFO_SIZE as u32)?;
    let _passphrase_address = rp.pop_static_buffer(passphrase_size)?;

    // TODO(wlan): store the passphrase and verify it when a join path
    // exists.

    ctx.logger.debug(PORT_NAME, "called");

    let info_bytes: [u8; NETWORK_INFO_SIZE] = ctx
        .kernel
        .memory()
        .read_block(network_info_address, NETWORK_INFO_SIZE)?
        .as_slice()
        .try_into()
        .expect("read_block returns the requested length");
    service.network_info = NetworkInfo::from_bytes(&info_bytes);

    service.connection_status.status = NetworkStatus::ConnectedAsHost as u32;
    service.connection_status.max_nodes = service.network_info.max_nodes;
    // The host is the only node so far, and always node 1.
    service.connection_status.total_nodes = 1;
    service.connection_status.network_node_id = 1;
    service.connection_status.node_bitmask |= 1;

    if service.network_info.channel != 0 {
        service.network_channel = service.network_info.channel;
    }

    ctx.kernel
        .handle_table_mut()
        .get_event_mut(service.status_event)?
        .signal();

    ctx.scheduler
        .schedule_event(beacon_interval_cycles(), service.beacon_event, 0);

    ctx.logger.warn(
        PORT_NAME,
        "A network has been created, but broadcasting it is unimplemented",
    );

    let mut rb = rp.make_builder(cmd, 1, 0)?;
    rb.push_result(ResultCode::SUCCESS)?;
    Ok(())
}

/// Stops hosting: cancels the pending beacon and returns to
/// NotConnected. Destroying while not hosting is a success no-op.
fn destroy_network(
    service: &mut WlanHostService,
    ctx: &mut ServiceContext<'_>,
    cmd: &mut CommandBuffer,
) -> Result<(), HleError> {
    let rp = RequestParser::new(cmd, 0x08, 0, 0)?;

    ctx.scheduler.unschedule_event(service.beacon_event, 0);
    service.connection_status.status = NetworkStatus::NotConnected as u32;

    ctx.logger.debug(PORT_NAME, "called");

    let mut rb = rp.make_builder(cmd, 1, 0)?;
    rb.push_result(ResultCode::SUCCESS)?;
    Ok(())
}

/// Reports the current channel, or 0 while not connected
fn get_channel(
    service: &mut WlanHostService,
    ctx: &mut ServiceContext<'_>,
    cmd: &mut CommandBuffer,
) -> Result<(), HleError> {
    let rp = RequestParser::new(cmd, 0x1A, 0, 0)?;
    ctx.logger.debug(PORT_NAME, "called");

    let channel = if service.connection_status.status == NetworkStatus::NotConnected as u32 {
        0
    } else {
        service.network_channel
    };

    let mut rb = rp.make_builder(cmd, 2, 0)?;
    rb.push_result(ResultCode::SUCCESS)?;
    rb.push(u32::from(channel))?;
    Ok(())
}

/// Updates the application payload broadcast in beacon frames.
///
/// An oversized payload is a recoverable TooLarge error and leaves the
/// stored data untouched.
fn set_application_data(
    service: &mut WlanHostService,
    ctx: &mut ServiceContext<'_>,
    cmd: &mut CommandBuffer,
) -> Result<(), HleError> {
    let mut rp = RequestParser::new(cmd, 0x10, 1, 2)?;
    let size = rp.pop()?;
    let address = rp.pop_static_buffer(size)?;

    ctx.logger.debug(PORT_NAME, "called");

    let mut rb = rp.make_builder(cmd, 1, 0)?;

    if size as usize > APPLICATION_DATA_SIZE {
        rb.push_result(ResultCode::new(
            ErrorDescription::TooLarge,
            ErrorModule::Wlan,
            ErrorSummary::WrongArgument,
            ErrorLevel::Usage,
        ))?;
        return Ok(());
    }

    let data = ctx.kernel.memory().read_block(address, size as usize)?;
    service.network_info.application_data_size = size as u8;
    service.network_info.application_data = [0; APPLICATION_DATA_SIZE];
    service.network_info.application_data[..data.len()].copy_from_slice(&data);

    rb.push_result(ResultCode::SUCCESS)?;
    Ok(())
}

fn shutdown(
    _service: &mut WlanHostService,
    ctx: &mut ServiceContext<'_>,
    cmd: &mut CommandBuffer,
) -> Result<(), HleError> {
    let rp = RequestParser::new(cmd, 0x03, 0, 0)?;
    ctx.logger.warn(PORT_NAME, "(stubbed) called");

    let mut rb = rp.make_builder(cmd, 1, 0)?;
    rb.push_result(ResultCode::SUCCESS)?;
    Ok(())
}

const FUNCTIONS: &[FunctionInfo<WlanHostService>] = &[
    FunctionInfo {
        id: 0x03,
        entry: FunctionEntry::Implemented(shutdown),
        name: "Shutdown",
    },
    FunctionInfo {
        id: 0x05,
        entry: FunctionEntry::Stub,
        name: "EjectClient",
    },
    FunctionInfo {
        id: 0x06,
        entry: FunctionEntry::Stub,
        name: "EjectSpectator",
    },
    FunctionInfo {
        id: 0x07,
        entry: FunctionEntry::Stub,
        name: "UpdateNetworkAttribute",
    },
    FunctionInfo {
        id: 0x08,
        entry: FunctionEntry::Implemented(destroy_network),
        name: "DestroyNetwork",
    },
    FunctionInfo {
        id: 0x0A,
        entry: FunctionEntry::Stub,
        name: "DisconnectNetwork",
    },
    FunctionInfo {
        id: 0x0B,
        entry: FunctionEntry::Implemented(get_connection_status),
        name: "GetConnectionStatus",
    },
    FunctionInfo {
        id: 0x0D,
        entry: FunctionEntry::Stub,
        name: "GetNodeInformation",
    },
    FunctionInfo {
        id: 0x0F,
        entry: FunctionEntry::Stub,
        name: "RecvBeaconBroadcastData",
    },
    FunctionInfo {
        id: 0x10,
        entry: FunctionEntry::Implemented(set_application_data),
        name: "SetApplicationData",
    },
    FunctionInfo {
        id: 0x11,
        entry: FunctionEntry::Stub,
        name: "GetApplicationData",
    },
    FunctionInfo {
        id: 0x12,
        entry: FunctionEntry::Implemented(bind),
        name: "Bind",
    },
    FunctionInfo {
        id: 0x13,
        entry: FunctionEntry::Stub,
        name: "Unbind",
    },
    FunctionInfo {
        id: 0x14,
        entry: FunctionEntry::Stub,
        name: "PullPacket",
    },
    FunctionInfo {
        id: 0x15,
        entry: FunctionEntry::Stub,
        name: "SetMaxSendDelay",
    },
    FunctionInfo {
        id: 0x17,
        entry: FunctionEntry::Stub,
        name: "SendTo",
    },
    FunctionInfo {
        id: 0x1A,
        entry: FunctionEntry::Implemented(get_channel),
        name: "GetChannel",
    },
    FunctionInfo {
        id: 0x1B,
        entry: FunctionEntry::Implemented(initialize_with_version),
        name: "InitializeWithVersion",
    },
    FunctionInfo {
        id: 0x1D,
        entry: FunctionEntry::Implemented(begin_hosting_network),
        name: "BeginHostingNetwork",
    },
    FunctionInfo {
        id: 0x1E,
        entry: FunctionEntry::Stub,
        name: "ConnectToNetwork",
    },
    FunctionInfo {
        id: 0x1F,
        entry: FunctionEntry::Stub,
        name: "DecryptBeaconData",
    },
    FunctionInfo {
        id: 0x20,
        entry: FunctionEntry::Stub,
        name: "Flush",
    },
    FunctionInfo {
        id: 0x21,
        entry: FunctionEntry::Stub,
        name: "SetProbeResponseParam",
    },
    FunctionInfo {
        id: 0x22,
        entry: FunctionEntry::Stub,
        name: "ScanOnConnection",
    },
];

impl HleService for WlanHostService {
    fn port_name(&self) -> &'static str {
        PORT_NAME
    }

    fn functions(&self) -> &'static [FunctionInfo<Self>] {
        FUNCTIONS
    }

    /// The guest went away: release bound-node events, cancel the
    /// beacon, and fall back to NotConnected
    fn client_disconnected(&mut self, ctx: &mut ServiceContext<'_>) {
        for (_, handle) in self.bind_node_events.drain() {
            if ctx.kernel.close_handle(handle).is_err() {
                ctx.logger
                    .warn(PORT_NAME, format!("stale bind-node event {}", handle));
            }
        }
        ctx.scheduler.unschedule_event(self.beacon_event, 0);
        self.network_info = NetworkInfo::default();
        self.connection_status = ConnectionStatus::default();
        self.recv_buffer = None;
    }

    /// Beacon broadcast callback. Frame generation is unmodeled; the
    /// callback's job is keeping the schedule alive, drift-compensated,
    /// while hosting.
    fn timing_event(&mut self, ctx: &mut ServiceContext<'_>, fired: FiredEvent) {
        if !self.is_hosting() {
            return;
        }
        let interval = beacon_interval_cycles();
        ctx.scheduler.schedule_event(
            interval.saturating_sub(fired.cycles_late),
            self.beacon_event,
            0,
        );
    }

    fn timing_events(&self) -> Vec<TimingEventId> {
        vec![self.beacon_event]
    }
}
