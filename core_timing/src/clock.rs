//! Virtual clock rate conversions

/// Emulated CPU clock rate in Hz
pub const BASE_CLOCK_RATE: u64 = 268_111_856;

/// Converts milliseconds of virtual time to cycles
pub fn ms_to_cycles(ms: f64) -> u64 {
    (BASE_CLOCK_RATE as f64 * ms / 1000.0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_second() {
        assert_eq!(ms_to_cycles(1000.0), BASE_CLOCK_RATE);
    }

    #[test]
    fn test_fractional_milliseconds() {
        // 102.4ms is the canonical beacon interval.
        let cycles = ms_to_cycles(102.4);
        assert!(cycles > ms_to_cycles(102.0));
        assert!(cycles < ms_to_cycles(103.0));
    }

    #[test]
    fn test_zero() {
        assert_eq!(ms_to_cycles(0.0), 0);
    }
}
