// src/device/sync_device/transaction.rs

use super::Sps30;
use crate::common::{
    command::Command,
    error::Sps30Error,
    frame::{self, FrameBuffer},
    hal_traits::{Sps30Serial, Sps30Timer},
};
use core::fmt::Debug;
use log::{debug, trace, warn};

impl<IF> Sps30<IF>
where
    IF: Sps30Serial + Sps30Timer,
    IF::Error: Debug,
{
    /// Executes one command-response exchange and returns the trimmed payload.
    ///
    /// Send, settle, await the expected byte count, receive. No retries: every
    /// failure is reported to the caller.
    pub(super) fn execute_transaction(
        &mut self,
        command: Command,
    ) -> Result<FrameBuffer, Sps30Error<IF::Error>> {
        debug!("sps30: {}", command);

        // 1. Send Command
        self.discard_stale_input()?;
        self.send_frame(frame::build_frame(command))?;

        // 2. Settle (device processing time, not a timeout)
        self.interface.delay_ms(command.response_time_ms());

        // 3. Await the expected byte count, bounded by the response timeout
        let expected = command.expected_response_len();
        let mut waited_ms = 0u32;
        self.await_available(expected, &mut waited_ms)?;

        // 4. Receive and unwrap
        let raw = self.receive_frame(expected, &mut waited_ms)?;
        trace!("sps30: received {:02x?}", raw.as_slice());

        if self.config.verify_frames {
            let unstuffed = frame::reverse_byte_stuffing(&raw)?;
            frame::verify_response(&unstuffed, command.id()).map_err(|e| {
                warn!("sps30: {} rejected: {}", command, e);
                e
            })?;
        }

        let payload = frame::transform_data(&raw)?;
        debug!(
            "sps30: {} done, {} payload bytes after {} ms",
            command,
            payload.len(),
            waited_ms
        );
        Ok(payload)
    }
}
