//! Beacon timing contract tests
//!
//! The hosted network's beacon rides the virtual-time scheduler through
//! the manager's routing: firings must land on exact multiples of the
//! interval regardless of how sloppily the drain targets overshoot.

#[cfg(test)]
mod tests {
    use crate::test_helpers::*;
    use core_timing::{ms_to_cycles, BASE_CLOCK_RATE};
    use services_wlan::beacon_interval_cycles;

    #[test]
    fn test_interval_is_100_tu() {
        // 100 TU at 1.024 ms per TU = 102.4 ms of virtual time. Allow
        // one cycle of float slack between the two computations.
        assert!(beacon_interval_cycles().abs_diff(ms_to_cycles(102.4)) <= 1);
        // Sanity against the base clock: a bit over a tenth of a second.
        assert!(beacon_interval_cycles() > BASE_CLOCK_RATE / 10);
        assert!(beacon_interval_cycles() < BASE_CLOCK_RATE / 9);
    }

    #[test]
    fn test_beacon_stays_periodic_through_the_manager() {
        let (mut manager, client) = wlan_manager();
        initialize(&mut manager, client);
        begin_hosting(&mut manager, client, 1, 2);

        let interval = beacon_interval_cycles();

        // Overshooting drains: the compensated reschedules keep the next
        // due cycle on an exact multiple of the interval.
        manager.advance_to(interval + 1000);
        assert_eq!(manager.scheduler().pending_count(), 1);
        manager.advance_to(interval * 2);
        manager.advance_to(interval * 3 + 5);
        assert_eq!(manager.scheduler().pending_count(), 1);

        // No due event is left behind at an off-multiple cycle.
        manager.advance_to(interval * 4 - 1);
        assert_eq!(manager.scheduler().pending_count(), 1);
        manager.advance_to(interval * 4);
        assert_eq!(manager.scheduler().pending_count(), 1);
    }

    #[test]
    fn test_destroy_network_cancels_the_beacon() {
        let (mut manager, client) = wlan_manager();
        initialize(&mut manager, client);
        begin_hosting(&mut manager, client, 1, 2);
        assert_eq!(manager.scheduler().pending_count(), 1);

        let mut cmd = request(0x08, 0, 0, &[]);
        manager.send_sync_request(client, &mut cmd).unwrap();

        assert_eq!(manager.scheduler().pending_count(), 0);
        manager.advance_to(beacon_interval_cycles() * 3);
        assert_eq!(manager.scheduler().pending_count(), 0);
    }

    #[test]
    fn test_rehosting_restarts_the_schedule() {
        let (mut manager, client) = wlan_manager();
        initialize(&mut manager, client);
        begin_hosting(&mut manager, client, 1, 2);

        let mut cmd = request(0x08, 0, 0, &[]);
        manager.send_sync_request(client, &mut cmd).unwrap();
        manager.advance_to(beacon_interval_cycles() * 2);

        begin_hosting(&mut manager, client, 1, 2);
        assert_eq!(manager.scheduler().pending_count(), 1);
        manager.advance_to(beacon_interval_cycles() * 3);
        assert_eq!(manager.scheduler().pending_count(), 1);
    }
}
