// src/device/sync_device/io_helpers.rs

use super::Sps30; // Access Sps30 definition
use crate::common::{
    error::{FrameError, Sps30Error},
    frame::{FrameBuffer, FRAME_BOUNDARY, MAX_FRAME_LEN},
    hal_traits::{Sps30Serial, Sps30Timer},
};
use core::fmt::Debug;
use log::{debug, trace, warn};

/// Upper bound on bytes dropped while clearing the line before a send.
const MAX_STALE_BYTES: usize = 2 * MAX_FRAME_LEN;

// Implementation block for I/O related helpers
impl<IF> Sps30<IF>
where
    IF: Sps30Serial + Sps30Timer,
    IF::Error: Debug,
{
    /// Drops bytes left over from an earlier, aborted exchange.
    ///
    /// Gives up with `LineBusy` once more than `MAX_STALE_BYTES` have been
    /// dropped, so a line that never goes quiet cannot stall the session.
    pub(super) fn discard_stale_input(&mut self) -> Result<(), Sps30Error<IF::Error>> {
        let mut scratch = [0u8; MAX_FRAME_LEN];
        let mut discarded = 0usize;
        loop {
            let available = self.interface.read_available().map_err(Sps30Error::Io)?;
            if available == 0 {
                return Ok(());
            }
            let n = self
                .interface
                .read(&mut scratch)
                .map_err(Sps30Error::Io)?
                .min(scratch.len());
            if n == 0 {
                return Ok(());
            }
            discarded += n;
            debug!("sps30: discarded {} stale bytes", n);
            if discarded > MAX_STALE_BYTES {
                warn!("sps30: receive line still busy after {} bytes", discarded);
                return Err(Sps30Error::LineBusy { discarded });
            }
        }
    }

    /// Writes a complete frame. A partial or zero-length write is an error, never retried.
    pub(super) fn send_frame(&mut self, frame: &[u8]) -> Result<(), Sps30Error<IF::Error>> {
        let written = self.interface.write(frame).map_err(Sps30Error::Io)?;
        if written != frame.len() {
            warn!("sps30: short write, {} of {} bytes sent", written, frame.len());
            return Err(Sps30Error::ShortWrite {
                written,
                expected: frame.len(),
            });
        }
        trace!("sps30: sent {:02x?}", frame);
        Ok(())
    }

    /// Polls the receive buffer until `expected` bytes are waiting.
    pub(super) fn await_available(
        &mut self,
        expected: usize,
        waited_ms: &mut u32,
    ) -> Result<usize, Sps30Error<IF::Error>> {
        loop {
            let available = self.interface.read_available().map_err(Sps30Error::Io)?;
            trace!("sps30: {} of {} bytes available", available, expected);
            if available >= expected {
                return Ok(available);
            }
            self.wait_for_more(waited_ms, available, expected)?;
        }
    }

    /// Reads until at least `expected` bytes ending in the stop marker have arrived.
    ///
    /// Stuffed frames are longer than `expected`, so the read keeps polling
    /// (within the same time budget) until the closing 0x7E shows up. Bytes
    /// after the closing marker make the frame malformed.
    pub(super) fn receive_frame(
        &mut self,
        expected: usize,
        waited_ms: &mut u32,
    ) -> Result<FrameBuffer, Sps30Error<IF::Error>> {
        let mut frame = FrameBuffer::new();
        let mut chunk = [0u8; MAX_FRAME_LEN];

        loop {
            let room = frame.remaining_capacity();
            if room == 0 {
                return Err(FrameError::BufferOverflow { capacity: MAX_FRAME_LEN }.into());
            }

            let n = self
                .interface
                .read(&mut chunk[..room])
                .map_err(Sps30Error::Io)?
                .min(room);
            frame
                .try_extend_from_slice(&chunk[..n])
                .map_err(|_| FrameError::BufferOverflow { capacity: MAX_FRAME_LEN })?;

            if let Some(end) = closing_marker(&frame) {
                let trailing = frame.len() - end - 1;
                if trailing > 0 {
                    warn!("sps30: {} bytes after the closing marker", trailing);
                    return Err(FrameError::TrailingBytes { count: trailing }.into());
                }
                if frame.len() >= expected {
                    return Ok(frame);
                }
            }
            self.wait_for_more(waited_ms, frame.len(), expected)?;
        }
    }

    // --- Timeout Helper ---
    fn wait_for_more(
        &mut self,
        waited_ms: &mut u32,
        available: usize,
        expected: usize,
    ) -> Result<(), Sps30Error<IF::Error>> {
        if *waited_ms >= self.config.response_timeout_ms {
            warn!(
                "sps30: timed out after {} ms with {} of {} bytes",
                waited_ms, available, expected
            );
            return Err(Sps30Error::Timeout {
                waited_ms: *waited_ms,
                available,
                expected,
            });
        }
        let interval = self.config.effective_poll_interval_ms();
        self.interface.delay_ms(interval);
        *waited_ms = waited_ms.saturating_add(interval);
        Ok(())
    }
}

/// Index of the first 0x7E after the start marker.
fn closing_marker(frame: &[u8]) -> Option<usize> {
    frame
        .iter()
        .skip(1)
        .position(|&b| b == FRAME_BOUNDARY)
        .map(|pos| pos + 1)
}
