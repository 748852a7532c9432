//! Wire-format contract tests
//!
//! The header encoding and the reply layouts of the implemented
//! wireless commands are guest ABI. The golden words below must never
//! change silently.

#[cfg(test)]
mod tests {
    use crate::test_helpers::*;
    use core_types::ResultCode;
    use ipc::{Header, RequestParser};
    use services_logger::LogLevel;
    use services_wlan::{
        ConnectionStatus, NetworkStatus, CONNECTION_STATUS_SIZE, DEFAULT_NETWORK_CHANNEL,
    };

    #[test]
    fn test_header_bit_layout_is_stable() {
        // command id in bits 0..16, normal count in 16..22, translate
        // count in 22..28
        assert_eq!(Header::new(0x1B, 12, 1).encode(), 0x004C_001B);
        assert_eq!(Header::new(0x0B, 0, 0).encode(), 0x0000_000B);
        assert_eq!(Header::new(0x12, 4, 0).encode(), 0x0004_0012);
        assert_eq!(Header::new(0x1D, 1, 4).encode(), 0x0101_001D);

        let decoded = Header::decode(0x004C_001B);
        assert_eq!(decoded.command_id, 0x1B);
        assert_eq!(decoded.normal_params, 12);
        assert_eq!(decoded.translate_params, 1);
    }

    #[test]
    fn test_round_trip_spans_the_whole_stack() {
        // A reply built with counts (N, H) parses back under a parser
        // declared for (N, H), through a real dispatch.
        let (mut manager, client) = wlan_manager();
        initialize(&mut manager, client);
        begin_hosting(&mut manager, client, 4, 2);

        let mut cmd = request(0x1A, 0, 0, &[]);
        manager.send_sync_request(client, &mut cmd).unwrap();

        let mut reply = RequestParser::new(&cmd, 0x1A, 2, 0).unwrap();
        assert_eq!(reply.pop().unwrap(), ResultCode::SUCCESS.raw());
        assert_eq!(reply.pop().unwrap(), 4);
    }

    #[test]
    fn test_connection_status_reply_layout() {
        let (mut manager, client) = wlan_manager();
        initialize(&mut manager, client);
        begin_hosting(&mut manager, client, 0, 16);

        let mut cmd = request(0x0B, 0, 0, &[]);
        manager.send_sync_request(client, &mut cmd).unwrap();

        // Result word, then the raw 0x30-byte record in 12 words.
        let mut reply = RequestParser::new(&cmd, 0x0B, 13, 0).unwrap();
        assert_eq!(reply.pop().unwrap(), ResultCode::SUCCESS.raw());
        let raw: [u8; CONNECTION_STATUS_SIZE] = reply
            .pop_raw(CONNECTION_STATUS_SIZE)
            .unwrap()
            .try_into()
            .unwrap();
        let status = ConnectionStatus::from_bytes(&raw);
        assert_eq!(status.status, NetworkStatus::ConnectedAsHost as u32);
        assert_eq!(status.total_nodes, 1);
        assert_eq!(status.max_nodes, 16);
        assert_eq!(status.node_bitmask & 1, 1);
    }

    #[test]
    fn test_initialize_reply_carries_live_event_handle() {
        let (mut manager, client) = wlan_manager();
        let status_event = initialize(&mut manager, client);
        assert!(manager
            .kernel()
            .handle_table()
            .get_event(status_event)
            .is_ok());
    }

    #[test]
    fn test_stubbed_command_is_wire_visible_success() {
        let (mut manager, client) = wlan_manager();

        // RecvBeaconBroadcastData is a stub row.
        let mut cmd = request(0x0F, 0, 0, &[]);
        let result = manager.send_sync_request(client, &mut cmd).unwrap();
        assert!(result.is_success());

        let mut reply = RequestParser::new(&cmd, 0x0F, 1, 0).unwrap();
        assert_eq!(reply.pop().unwrap(), ResultCode::SUCCESS.raw());
        assert!(manager
            .logger()
            .has_entry(|e| e.level == LogLevel::Warn && e.message.contains("stubbed")));
    }

    #[test]
    fn test_default_channel_contract() {
        // A network hosted with no channel preference transmits on the
        // default channel.
        let (mut manager, client) = wlan_manager();
        initialize(&mut manager, client);
        begin_hosting(&mut manager, client, 0, 2);

        let mut cmd = request(0x1A, 0, 0, &[]);
        manager.send_sync_request(client, &mut cmd).unwrap();
        let mut reply = RequestParser::new(&cmd, 0x1A, 2, 0).unwrap();
        reply.pop().unwrap();
        assert_eq!(reply.pop().unwrap(), u32::from(DEFAULT_NETWORK_CHANNEL));
    }
}
