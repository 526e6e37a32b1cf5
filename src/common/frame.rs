// src/common/frame.rs

//! SHDLC frame codec.
//!
//! Request (MOSI) frame: `7E <addr> <cmd> <len> <data..> <chk> 7E`
//! Response (MISO) frame: `7E <addr> <cmd> <state> <len> <data..> <chk> 7E`
//!
//! The checksum is the inverted low byte of the sum over every byte between
//! the boundary markers. Bytes colliding with the markers are stuffed.

use super::command::Command;
use super::error::FrameError;
use arrayvec::ArrayVec;

/// Start and stop marker.
pub const FRAME_BOUNDARY: u8 = 0x7E;
/// Escape byte introducing a stuffed pair.
pub const ESCAPE: u8 = 0x7D;

/// Reserved byte and the continuation byte it is stuffed to, in substitution order.
pub const ESCAPE_TABLE: [(u8, u8); 4] = [(0x7E, 0x5E), (0x7D, 0x5D), (0x11, 0x31), (0x13, 0x33)];

/// Response bytes in front of the payload: start, address, command, state, length.
pub const RESPONSE_HEADER_LEN: usize = 5;
/// Response bytes after the payload: checksum, stop.
pub const RESPONSE_TRAILER_LEN: usize = 2;
/// Smallest possible response frame (no payload).
pub const MIN_RESPONSE_LEN: usize = RESPONSE_HEADER_LEN + RESPONSE_TRAILER_LEN;

/// Capacity of a frame buffer. The largest response in scope is 47 bytes
/// unstuffed, so even a fully stuffed one fits.
pub const MAX_FRAME_LEN: usize = 128;

/// Fixed-capacity buffer used for frames and payloads.
pub type FrameBuffer = ArrayVec<u8, MAX_FRAME_LEN>;

// --- Internal Helpers ---
#[inline]
fn push(buffer: &mut FrameBuffer, byte: u8) -> Result<(), FrameError> {
    buffer
        .try_push(byte)
        .map_err(|_| FrameError::BufferOverflow { capacity: MAX_FRAME_LEN })
}

#[inline]
fn unescape(continuation: u8) -> Option<u8> {
    ESCAPE_TABLE
        .iter()
        .find(|(_, escaped)| *escaped == continuation)
        .map(|(raw, _)| *raw)
}

#[inline]
fn escape(byte: u8) -> Option<u8> {
    ESCAPE_TABLE
        .iter()
        .find(|(raw, _)| *raw == byte)
        .map(|(_, escaped)| *escaped)
}

// --- Public Codec Functions ---

/// Returns the pre-encoded request frame for `command`.
#[inline]
pub fn build_frame(command: Command) -> &'static [u8] {
    command.frame()
}

/// Replaces every escape pair (`7D 5E`, `7D 5D`, `7D 31`, `7D 33`) by the byte it stands for.
///
/// Input is scanned once from the left, so a de-stuffed `0x7D` is never
/// re-read as the start of another pair. An escape byte followed by any other
/// byte, or standing last, makes the frame malformed.
pub fn reverse_byte_stuffing(raw: &[u8]) -> Result<FrameBuffer, FrameError> {
    let mut out = FrameBuffer::new();
    let mut bytes = raw.iter().copied().enumerate();

    while let Some((offset, byte)) = bytes.next() {
        if byte != ESCAPE {
            push(&mut out, byte)?;
            continue;
        }
        let (_, continuation) = bytes.next().ok_or(FrameError::TruncatedEscape)?;
        let unescaped = unescape(continuation).ok_or(FrameError::InvalidEscape {
            byte: continuation,
            offset: offset + 1,
        })?;
        push(&mut out, unescaped)?;
    }

    Ok(out)
}

/// Stuffs every reserved byte in `data` into its two-byte escape pair.
pub fn stuff_bytes(data: &[u8]) -> Result<FrameBuffer, FrameError> {
    let mut out = FrameBuffer::new();
    for &byte in data {
        match escape(byte) {
            Some(escaped) => {
                push(&mut out, ESCAPE)?;
                push(&mut out, escaped)?;
            }
            None => push(&mut out, byte)?,
        }
    }
    Ok(out)
}

/// Strips the response header (5 bytes) and trailer (2 bytes), leaving the payload.
pub fn trim_data(raw: &[u8]) -> Result<&[u8], FrameError> {
    if raw.len() < MIN_RESPONSE_LEN {
        return Err(FrameError::TooShort {
            min: MIN_RESPONSE_LEN,
            len: raw.len(),
        });
    }
    Ok(&raw[RESPONSE_HEADER_LEN..raw.len() - RESPONSE_TRAILER_LEN])
}

/// De-stuffs a raw response and trims it down to its payload.
pub fn transform_data(raw: &[u8]) -> Result<FrameBuffer, FrameError> {
    let unstuffed = reverse_byte_stuffing(raw)?;
    let payload = trim_data(&unstuffed)?;
    // Capacity is shared, the payload is always shorter than its frame.
    Ok(payload.iter().copied().collect())
}

/// SHDLC checksum: inverted low byte of the byte sum.
pub fn checksum(bytes: &[u8]) -> u8 {
    !bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b))
}

/// Appends the checksum to `body`, stuffs it and wraps it in boundary markers.
fn wrap_frame(body: &[u8]) -> Result<FrameBuffer, FrameError> {
    let mut frame = FrameBuffer::new();
    push(&mut frame, FRAME_BOUNDARY)?;
    let stuffed = stuff_bytes(body)?;
    frame
        .try_extend_from_slice(&stuffed)
        .map_err(|_| FrameError::BufferOverflow { capacity: MAX_FRAME_LEN })?;
    for &byte in stuff_bytes(&[checksum(body)])?.iter() {
        push(&mut frame, byte)?;
    }
    push(&mut frame, FRAME_BOUNDARY)?;
    Ok(frame)
}

/// Encodes a request (MOSI) frame.
pub fn encode_request(address: u8, command_id: u8, data: &[u8]) -> Result<FrameBuffer, FrameError> {
    let len = u8::try_from(data.len())
        .map_err(|_| FrameError::BufferOverflow { capacity: MAX_FRAME_LEN })?;
    let mut body = FrameBuffer::new();
    for byte in [address, command_id, len] {
        push(&mut body, byte)?;
    }
    body.try_extend_from_slice(data)
        .map_err(|_| FrameError::BufferOverflow { capacity: MAX_FRAME_LEN })?;
    wrap_frame(&body)
}

/// Encodes a response (MISO) frame, as the device would send it.
pub fn encode_response(
    address: u8,
    command_id: u8,
    state: u8,
    data: &[u8],
) -> Result<FrameBuffer, FrameError> {
    let len = u8::try_from(data.len())
        .map_err(|_| FrameError::BufferOverflow { capacity: MAX_FRAME_LEN })?;
    let mut body = FrameBuffer::new();
    for byte in [address, command_id, state, len] {
        push(&mut body, byte)?;
    }
    body.try_extend_from_slice(data)
        .map_err(|_| FrameError::BufferOverflow { capacity: MAX_FRAME_LEN })?;
    wrap_frame(&body)
}

/// Validates a de-stuffed response frame against the command that was sent.
///
/// Checks, in order: length, boundary markers, echoed command id, length
/// field, checksum and finally the device state byte.
pub fn verify_response(frame: &[u8], command_id: u8) -> Result<(), FrameError> {
    if frame.len() < MIN_RESPONSE_LEN {
        return Err(FrameError::TooShort {
            min: MIN_RESPONSE_LEN,
            len: frame.len(),
        });
    }
    let last = frame.len() - 1;
    if frame[0] != FRAME_BOUNDARY || frame[last] != FRAME_BOUNDARY {
        return Err(FrameError::MissingBoundary);
    }

    let got = frame[2];
    if got != command_id {
        return Err(FrameError::UnexpectedCommand { expected: command_id, got });
    }

    let declared = frame[4] as usize;
    let actual = frame.len() - MIN_RESPONSE_LEN;
    if declared != actual {
        return Err(FrameError::LengthMismatch { declared, actual });
    }

    let expected = frame[last - 1];
    let calculated = checksum(&frame[1..last - 1]);
    if expected != calculated {
        return Err(FrameError::ChecksumMismatch { expected, calculated });
    }

    match frame[3] {
        0 => Ok(()),
        state => Err(FrameError::DeviceState(state)),
    }
}
