//! Session lifecycle contract tests
//!
//! Teardown ordering and cancellation semantics for the session pair,
//! driven through the manager the way a guest-facing frontend would.

#[cfg(test)]
mod tests {
    use crate::test_helpers::*;
    use core_types::{ResultCode, ERR_SESSION_CLOSED};
    use hle_kernel::WaiterId;
    use ipc::RequestParser;
    use services_wlan::{beacon_interval_cycles, ConnectionStatus, NetworkStatus,
        CONNECTION_STATUS_SIZE};

    #[test]
    fn test_send_after_server_close_is_canceled() {
        let (mut manager, client) = wlan_manager();
        let server = manager.kernel().server_for_client(client).unwrap().unwrap();
        manager.close_handle(server).unwrap();

        let mut cmd = request(0x0B, 0, 0, &[]);
        let result = manager.send_sync_request(client, &mut cmd).unwrap();
        assert_eq!(result, ERR_SESSION_CLOSED);
        assert!(result.is_error());
    }

    #[test]
    fn test_client_close_wakes_parked_waiters_with_cancellation() {
        let (mut manager, client) = wlan_manager();
        let server = manager.kernel().server_for_client(client).unwrap().unwrap();
        manager
            .kernel_mut()
            .handle_table_mut()
            .get_server_session_mut(server)
            .unwrap()
            .park(WaiterId::from_raw(1));
        manager
            .kernel_mut()
            .handle_table_mut()
            .get_server_session_mut(server)
            .unwrap()
            .park(WaiterId::from_raw(2));

        let woken = manager.close_handle(client).unwrap();
        assert_eq!(
            woken,
            vec![
                (WaiterId::from_raw(1), ERR_SESSION_CLOSED),
                (WaiterId::from_raw(2), ERR_SESSION_CLOSED),
            ]
        );
    }

    #[test]
    fn test_client_close_resets_the_service() {
        // The disconnect hook tears down hosting state; a new session
        // to the same instance observes NotConnected and no beacon.
        let (mut manager, client) = wlan_manager();
        initialize(&mut manager, client);
        begin_hosting(&mut manager, client, 3, 2);
        manager.close_handle(client).unwrap();

        let client = manager.connect("nwm::UDS").unwrap();
        let mut cmd = request(0x0B, 0, 0, &[]);
        manager.send_sync_request(client, &mut cmd).unwrap();
        let mut reply = RequestParser::new(&cmd, 0x0B, 13, 0).unwrap();
        assert_eq!(reply.pop().unwrap(), ResultCode::SUCCESS.raw());
        let raw: [u8; CONNECTION_STATUS_SIZE] = reply
            .pop_raw(CONNECTION_STATUS_SIZE)
            .unwrap()
            .try_into()
            .unwrap();
        let status = ConnectionStatus::from_bytes(&raw);
        assert_eq!(status.status, NetworkStatus::NotConnected as u32);

        // The pending beacon was unscheduled with the old session.
        assert_eq!(manager.scheduler().pending_count(), 0);
        manager.advance_to(beacon_interval_cycles() * 2);
        assert_eq!(manager.scheduler().pending_count(), 0);
    }

    #[test]
    fn test_closed_handle_lookups_fail() {
        let (mut manager, client) = wlan_manager();
        let status_event = initialize(&mut manager, client);

        manager.close_handle(status_event).unwrap();
        assert!(manager
            .kernel()
            .handle_table()
            .get_event(status_event)
            .is_err());
    }

    #[test]
    fn test_duplicated_status_event_outlives_one_close() {
        // InitializeWithVersion hands out a duplicate of the service's
        // own event; closing the guest's copy must not destroy it.
        let (mut manager, client) = wlan_manager();
        let first = initialize(&mut manager, client);
        manager.close_handle(first).unwrap();

        let second = initialize(&mut manager, client);
        assert!(manager.kernel().handle_table().get_event(second).is_ok());
    }
}
