// src/common/timing.rs

// Values follow the SPS30 datasheet, section "SHDLC commands overview".
// Every command in scope has the same maximum response time.

// === Link Settings (configured by the caller, documented here) ===

/// UART baud rate of the SPS30.
pub const BAUD_RATE: u32 = 115_200;

// === Command/Response Timing ===

/// Mandatory wait after sending a command before the response is ready.
pub const SETTLE_TIME_MS: u32 = 20;

/// Sleep between two polls of the receive buffer.
pub const POLL_INTERVAL_MS: u32 = 10;

/// Default upper bound for waiting on a complete response after the settle delay.
pub const DEFAULT_RESPONSE_TIMEOUT_MS: u32 = 500;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_timeout_covers_polling() {
        assert!(DEFAULT_RESPONSE_TIMEOUT_MS > SETTLE_TIME_MS);
        assert_eq!(DEFAULT_RESPONSE_TIMEOUT_MS % POLL_INTERVAL_MS, 0);
    }
}
