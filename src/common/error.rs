// src/common/error.rs

/// Errors raised while de-stuffing, trimming or validating an SHDLC frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum FrameError {
    /// Frame is shorter than header + checksum + stop marker.
    #[error("Frame too short: need at least {min} bytes, got {len}")]
    TooShort { min: usize, len: usize },

    /// An escape byte (0x7D) was followed by a byte outside the escape table.
    #[error("Invalid escape sequence 0x7d {byte:#04x} at offset {offset}")]
    InvalidEscape { byte: u8, offset: usize },

    /// The frame ended directly after an escape byte.
    #[error("Frame ends with a dangling escape byte")]
    TruncatedEscape,

    /// Frame does not fit in the fixed-capacity buffer.
    #[error("Frame buffer overflow: capacity is {capacity} bytes")]
    BufferOverflow { capacity: usize },

    /// Missing 0x7E start or stop marker.
    #[error("Missing frame boundary marker")]
    MissingBoundary,

    /// The response echoes a different command id than the one sent.
    #[error("Unexpected command id: expected {expected:#04x}, got {got:#04x}")]
    UnexpectedCommand { expected: u8, got: u8 },

    /// Length field disagrees with the number of data bytes present.
    #[error("Length field mismatch: header says {declared}, frame carries {actual}")]
    LengthMismatch { declared: usize, actual: usize },

    /// Received checksum does not match calculated checksum.
    #[error("Checksum mismatch: expected {expected:#04x}, calculated {calculated:#04x}")]
    ChecksumMismatch { expected: u8, calculated: u8 },

    /// Device reported an execution error in the state byte.
    #[error("Device reported error state {0:#04x}")]
    DeviceState(u8),

    /// Bytes followed the closing 0x7E of a complete frame.
    #[error("{count} unexpected bytes after the closing frame marker")]
    TrailingBytes { count: usize },
}

/// Errors raised while interpreting a trimmed payload.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// Payload has the wrong number of bytes for the decoder.
    #[error("Invalid payload length: expected {expected}, got {got}")]
    InvalidLength { expected: usize, got: usize },

    /// A byte outside the ASCII range where text was expected.
    #[error("Non-ASCII byte {byte:#04x} at offset {offset}")]
    NonAscii { byte: u8, offset: usize },

    /// Text longer than the protocol allows.
    #[error("Identifier too long: max {max} characters, got {got}")]
    TooLong { max: usize, got: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum Sps30Error<E = ()>
where
    E: core::fmt::Debug, // Still need Debug for the generic Io error
{
    /// Underlying I/O error from the transport.
    #[error("I/O error: {0:?}")] // Format string requires Debug on E
    Io(E),

    /// Transport accepted fewer bytes than the frame holds (zero means transmit timeout).
    #[error("Short write: {written} of {expected} bytes sent")]
    ShortWrite { written: usize, expected: usize },

    /// Device did not deliver the expected bytes within the response timeout.
    #[error("Operation timed out after {waited_ms} ms ({available} of {expected} bytes available)")]
    Timeout {
        waited_ms: u32,
        available: usize,
        expected: usize,
    },

    /// Receive line kept delivering data while it was being cleared before a send.
    #[error("Receive line busy: discarded {discarded} bytes without reaching idle")]
    LineBusy { discarded: usize },

    /// Received frame could not be de-stuffed, trimmed or validated.
    #[error("Malformed frame: {0}")]
    MalformedFrame(#[from] FrameError),

    /// Trimmed payload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

// No blanket From<E> here: it would overlap with the #[from] conversions above.
// Map transport errors explicitly with `.map_err(Sps30Error::Io)`.

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct MockIoError;

    #[test]
    fn test_frame_error_converts_into_sps30_error() {
        let err: Sps30Error<MockIoError> = FrameError::TruncatedEscape.into();
        assert!(matches!(err, Sps30Error::MalformedFrame(FrameError::TruncatedEscape)));
    }

    #[test]
    fn test_decode_error_converts_into_sps30_error() {
        let err: Sps30Error<MockIoError> =
            DecodeError::InvalidLength { expected: 40, got: 39 }.into();
        assert!(matches!(
            err,
            Sps30Error::Decode(DecodeError::InvalidLength { expected: 40, got: 39 })
        ));
    }

    #[test]
    fn test_error_messages() {
        let err: Sps30Error<MockIoError> = Sps30Error::Timeout {
            waited_ms: 500,
            available: 3,
            expected: 47,
        };
        assert_eq!(
            err.to_string(),
            "Operation timed out after 500 ms (3 of 47 bytes available)"
        );

        let err: Sps30Error<MockIoError> = Sps30Error::Io(MockIoError);
        assert_eq!(err.to_string(), "I/O error: MockIoError");

        let frame_err = FrameError::InvalidEscape { byte: 0x42, offset: 7 };
        assert_eq!(frame_err.to_string(), "Invalid escape sequence 0x7d 0x42 at offset 7");

        let err: Sps30Error<MockIoError> = Sps30Error::LineBusy { discarded: 257 };
        assert_eq!(
            err.to_string(),
            "Receive line busy: discarded 257 bytes without reaching idle"
        );

        let frame_err = FrameError::TrailingBytes { count: 1 };
        assert_eq!(frame_err.to_string(), "1 unexpected bytes after the closing frame marker");
    }
}
