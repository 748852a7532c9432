//! Guest-facing wire records
//!
//! These structs cross the command-buffer raw-copy path verbatim, so
//! their byte layout is a wire ABI. Each carries an explicit
//! `to_bytes`/`from_bytes` codec with the exact offsets, rather than a
//! serde derive, and the byte sizes are pinned by constants and tests.
//! Multi-byte fields are little-endian except where noted.

/// Maximum application payload advertised in beacon frames, in bytes
pub const APPLICATION_DATA_SIZE: usize = 0xC8;

/// Channel a hosted network transmits on when the guest expresses no
/// preference
pub const DEFAULT_NETWORK_CHANNEL: u8 = 11;

/// Serialized size of [`NodeInfo`]
pub const NODE_INFO_SIZE: usize = 40;

/// Serialized size of [`ConnectionStatus`]
pub const CONNECTION_STATUS_SIZE: usize = 0x30;

/// Serialized size of [`NetworkInfo`]
pub const NETWORK_INFO_SIZE: usize = 0x108;

/// State of this station's network connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum NetworkStatus {
    NotConnected = 3,
    ConnectedAsHost = 6,
    ConnectedAsClient = 9,
    ConnectedAsSpectator = 10,
}

impl NetworkStatus {
    /// Decodes a raw status word; unknown values read as NotConnected
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            6 => Self::ConnectedAsHost,
            9 => Self::ConnectedAsClient,
            10 => Self::ConnectedAsSpectator,
            _ => Self::NotConnected,
        }
    }
}

/// One network participant's identity.
///
/// Layout (40 bytes): seed u64 at 0, username 10 x u16 at 8, 4 reserved
/// at 28, node id u16 at 32, 6 reserved at 34.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub friend_code_seed: u64,
    pub username: [u16; 10],
    pub network_node_id: u16,
}

impl Default for NodeInfo {
    fn default() -> Self {
        Self {
            friend_code_seed: 0,
            username: [0; 10],
            network_node_id: 0,
        }
    }
}

impl NodeInfo {
    pub fn to_bytes(&self) -> [u8; NODE_INFO_SIZE] {
        let mut bytes = [0u8; NODE_INFO_SIZE];
        bytes[0..8].copy_from_slice(&self.friend_code_seed.to_le_bytes());
        for (i, ch) in self.username.iter().enumerate() {
            bytes[8 + i * 2..10 + i * 2].copy_from_slice(&ch.to_le_bytes());
        }
        bytes[32..34].copy_from_slice(&self.network_node_id.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8; NODE_INFO_SIZE]) -> Self {
        let mut username = [0u16; 10];
        for (i, ch) in username.iter_mut().enumerate() {
            *ch = u16::from_le_bytes([bytes[8 + i * 2], bytes[9 + i * 2]]);
        }
        Self {
            friend_code_seed: u64::from_le_bytes(bytes[0..8].try_into().expect("8 bytes")),
            username,
            network_node_id: u16::from_le_bytes([bytes[32], bytes[33]]),
        }
    }
}

/// The live connection state machine's public view.
///
/// Layout (0x30 bytes): status u32 at 0, 4 reserved at 4, node id u16
/// at 8, 2 reserved at 10, 32 reserved at 12, total nodes u8 at 44,
/// max nodes u8 at 45, node bitmask u16 at 46.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub status: u32,
    pub network_node_id: u16,
    pub total_nodes: u8,
    pub max_nodes: u8,
    pub node_bitmask: u16,
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        Self {
            status: NetworkStatus::NotConnected as u32,
            network_node_id: 0,
            total_nodes: 0,
            max_nodes: 0,
            node_bitmask: 0,
        }
    }
}

impl ConnectionStatus {
    pub fn to_bytes(&self) -> [u8; CONNECTION_STATUS_SIZE] {
        let mut bytes = [0u8; CONNECTION_STATUS_SIZE];
        bytes[0..4].copy_from_slice(&self.status.to_le_bytes());
        bytes[8..10].copy_from_slice(&self.network_node_id.to_le_bytes());
        bytes[44] = self.total_nodes;
        bytes[45] = self.max_nodes;
        bytes[46..48].copy_from_slice(&self.node_bitmask.to_le_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8; CONNECTION_STATUS_SIZE]) -> Self {
        Self {
            status: u32::from_le_bytes(bytes[0..4].try_into().expect("4 bytes")),
            network_node_id: u16::from_le_bytes([bytes[8], bytes[9]]),
            total_nodes: bytes[44],
            max_nodes: bytes[45],
            node_bitmask: u16::from_le_bytes([bytes[46], bytes[47]]),
        }
    }
}

/// A network's advertised metadata.
///
/// Layout (0x108 bytes): MAC at 0, channel at 6, 1 reserved at 7,
/// initialized at 8, 3 reserved at 9, OUI value at 12, OUI type at 15,
/// comm id u32 big-endian at 16, id at 20, 1 reserved at 21, attributes
/// u16 big-endian at 22, network id u32 big-endian at 24, total nodes at
/// 28, max nodes at 29, 2 + 0x1F reserved, application data size at
/// 0x3F, application data at 0x40. The comm/network identifiers arrive
/// big-endian from the guest and are kept that way on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInfo {
    pub host_mac_address: [u8; 6],
    pub channel: u8,
    pub initialized: u8,
    pub oui_value: [u8; 3],
    pub oui_type: u8,
    pub wlan_comm_id: u32,
    pub id: u8,
    pub attributes: u16,
    pub network_id: u32,
    pub total_nodes: u8,
    pub max_nodes: u8,
    pub application_data_size: u8,
    pub application_data: [u8; APPLICATION_DATA_SIZE],
}

impl Default for NetworkInfo {
    fn default() -> Self {
        Self {
            host_mac_address: [0; 6],
            channel: 0,
            initialized: 0,
            oui_value: [0; 3],
            oui_type: 0,
            wlan_comm_id: 0,
            id: 0,
            attributes: 0,
            network_id: 0,
            total_nodes: 0,
            max_nodes: 0,
            application_data_size: 0,
            application_data: [0; APPLICATION_DATA_SIZE],
        }
    }
}

impl NetworkInfo {
    pub fn to_bytes(&self) -> [u8; NETWORK_INFO_SIZE] {
        let mut bytes = [0u8; NETWORK_INFO_SIZE];
        bytes[0..6].copy_from_slice(&self.host_mac_address);
        bytes[6] = self.channel;
        bytes[8] = self.initialized;
        bytes[12..15].copy_from_slice(&self.oui_value);
        bytes[15] = self.oui_type;
        bytes[16..20].copy_from_slice(&self.wlan_comm_id.to_be_bytes());
        bytes[20] = self.id;
        bytes[22..24].copy_from_slice(&self.attributes.to_be_bytes());
        bytes[24..28].copy_from_slice(&self.network_id.to_be_bytes());
        bytes[28] = self.total_nodes;
        bytes[29] = self.max_nodes;
        bytes[0x3F] = self.application_data_size;
        bytes[0x40..NETWORK_INFO_SIZE].copy_from_slice(&self.application_data);
        bytes
    }

    pub fn from_bytes(bytes: &[u8; NETWORK_INFO_SIZE]) -> Self {
        Self {
            host_mac_address: bytes[0..6].try_into().expect("6 bytes"),
            channel: bytes[6],
            initialized: bytes[8],
            oui_value: bytes[12..15].try_into().expect("3 bytes"),
            oui_type: bytes[15],
            wlan_comm_id: u32::from_be_bytes(bytes[16..20].try_into().expect("4 bytes")),
            id: bytes[20],
            attributes: u16::from_be_bytes([bytes[22], bytes[23]]),
            network_id: u32::from_be_bytes(bytes[24..28].try_into().expect("4 bytes")),
            total_nodes: bytes[28],
            max_nodes: bytes[29],
            application_data_size: bytes[0x3F],
            application_data: bytes[0x40..NETWORK_INFO_SIZE].try_into().expect("0xC8 bytes"),
        }
    }
}
