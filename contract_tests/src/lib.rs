//! # Substrate Contract Tests
//!
//! "Golden" tests for the cross-crate contracts of the IPC substrate,
//! to ensure they don't drift accidentally over time.
//!
//! ## Philosophy
//!
//! - **Explicit over implicit**: wire layouts and lifecycle rules are
//!   written down as assertions, not prose
//! - **Testability first**: these tests fail when a guest-visible
//!   contract changes, before any guest does
//! - **Whole-stack paths**: everything here drives the public surface
//!   (manager, sessions, command buffers); per-crate internals are
//!   covered by the crates' own unit tests
//!
//! ## Structure
//!
//! - `wire`: header encoding, reply layouts, full request round trips
//! - `session_lifecycle`: teardown, cancellation, and waiter wake-up
//! - `beacon_timing`: virtual-time scheduling through the manager
//! - `settings_surface`: the persisted configuration snapshot's shape

pub mod beacon_timing;
pub mod session_lifecycle;
pub mod settings_surface;
pub mod wire;

/// Common helpers for driving the wireless host service end to end
pub mod test_helpers {
    use core_types::Handle;
    use ipc::{CommandBuffer, Header};
    use services_framework::ServiceManager;
    use services_wlan::{NodeInfo, WlanHostService, NETWORK_INFO_SIZE};

    /// Guest addresses used by the hosting fixtures
    pub const NETWORK_INFO_ADDR: u32 = 0x1000_0000;
    pub const PASSPHRASE_ADDR: u32 = 0x1000_0400;

    /// Builds a request buffer from its header fields and payload
    pub fn request(command_id: u16, normal: u32, translate: u32, payload: &[u32]) -> CommandBuffer {
        let mut cmd = CommandBuffer::new();
        cmd.set_word(0, Header::new(command_id, normal, translate).encode());
        for (i, word) in payload.iter().enumerate() {
            cmd.set_word(1 + i, *word);
        }
        cmd
    }

    /// Creates a manager with the wireless host service installed and a
    /// session opened to it
    pub fn wlan_manager() -> (ServiceManager, Handle) {
        let mut manager = ServiceManager::new();
        manager.install_with(WlanHostService::new);
        let client = manager.connect("nwm::UDS").unwrap();
        (manager, client)
    }

    /// Runs InitializeWithVersion over the session, returning the
    /// connection-status event handle from the reply
    pub fn initialize(manager: &mut ServiceManager, client: Handle) -> Handle {
        let block = manager.kernel_mut().create_shared_memory(0x4000, "recv");

        let mut payload = vec![0x4000u32];
        for chunk in NodeInfo::default().to_bytes().chunks(4) {
            let mut word = [0u8; 4];
            word.copy_from_slice(chunk);
            payload.push(u32::from_le_bytes(word));
        }
        payload.push(0x0100);
        payload.push(block.as_raw());

        let mut cmd = request(0x1B, 12, 1, &payload);
        let result = manager.send_sync_request(client, &mut cmd).unwrap();
        assert!(result.is_success());

        let mut reply = ipc::RequestParser::new(&cmd, 0x1B, 1, 1).unwrap();
        reply.pop().unwrap();
        reply.pop_handle().unwrap()
    }

    /// Runs BeginHostingNetwork over the session with the given
    /// preferred channel and node capacity
    pub fn begin_hosting(manager: &mut ServiceManager, client: Handle, channel: u8, max_nodes: u8) {
        let info = services_wlan::NetworkInfo {
            channel,
            max_nodes,
            ..services_wlan::NetworkInfo::default()
        };
        let passphrase = b"contract";
        manager
            .kernel_mut()
            .memory_mut()
            .write_block(NETWORK_INFO_ADDR, &info.to_bytes())
            .unwrap();
        manager
            .kernel_mut()
            .memory_mut()
            .write_block(PASSPHRASE_ADDR, passphrase)
            .unwrap();

        let mut cmd = request(
            0x1D,
            1,
            4,
            &[
                passphrase.len() as u32,
                NETWORK_INFO_ADDR,
                NETWORK_INFO_SIZE as u32,
                PASSPHRASE_ADDR,
                passphrase.len() as u32,
            ],
        );
        let result = manager.send_sync_request(client, &mut cmd).unwrap();
        assert!(result.is_success());
    }
}
