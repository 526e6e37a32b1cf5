// src/device/config.rs

use crate::common::response::DEFAULT_PRECISION;
use crate::common::timing;

/// Tunables of a command session.
///
/// The settle delay is not configurable: it is the device's processing time.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Upper bound on waiting for a complete response once the settle delay is over.
    pub response_timeout_ms: u32,
    /// Sleep between two polls of the receive buffer. Zero is treated as 1 ms.
    pub poll_interval_ms: u32,
    /// Decimal places kept on measured values.
    pub precision: u8,
    /// Check markers, command echo, length, checksum and device state of every response.
    pub verify_frames: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            response_timeout_ms: timing::DEFAULT_RESPONSE_TIMEOUT_MS,
            poll_interval_ms: timing::POLL_INTERVAL_MS,
            precision: DEFAULT_PRECISION,
            verify_frames: false,
        }
    }
}

impl SessionConfig {
    pub fn with_response_timeout_ms(mut self, ms: u32) -> Self {
        self.response_timeout_ms = ms;
        self
    }

    pub fn with_poll_interval_ms(mut self, ms: u32) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    pub fn with_precision(mut self, precision: u8) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_frame_verification(mut self, enabled: bool) -> Self {
        self.verify_frames = enabled;
        self
    }

    /// Poll interval actually slept, never zero so the wait always progresses.
    pub(crate) fn effective_poll_interval_ms(&self) -> u32 {
        self.poll_interval_ms.max(1)
    }
}
