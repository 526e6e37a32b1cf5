//! SPS30 SHDLC command definitions.
//!
//! See the SPS30 datasheet, section "SHDLC commands overview". Every request
//! frame in scope carries a fixed body, so the frames are stored pre-encoded.

use core::fmt;

use super::timing;

/// Represents an SPS30 command supported by this driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Command {
    /// Start Measurement (`0x00`), output format big-endian IEEE754 float.
    StartMeasurement,
    /// Stop Measurement (`0x01`).
    StopMeasurement,
    /// Read Measured Values (`0x03`).
    ReadMeasurement,
    /// Device Information (`0xD0`), subcommand `0x00`: product type.
    ReadProductType,
    /// Device Information (`0xD0`), subcommand `0x03`: serial number.
    ReadSerialNumber,
    /// Read Version (`0xD1`).
    ReadFirmwareVersion,
    /// Read Device Status Register (`0xD2`), without clearing it.
    ReadStatusRegister,
}

impl Command {
    /// All supported commands, in table order.
    pub const ALL: [Command; 7] = [
        Command::StartMeasurement,
        Command::StopMeasurement,
        Command::ReadMeasurement,
        Command::ReadProductType,
        Command::ReadSerialNumber,
        Command::ReadFirmwareVersion,
        Command::ReadStatusRegister,
    ];

    /// The complete, already stuffed request frame.
    pub const fn frame(&self) -> &'static [u8] {
        match self {
            Command::StartMeasurement => &[0x7E, 0x00, 0x00, 0x02, 0x01, 0x03, 0xF9, 0x7E],
            Command::StopMeasurement => &[0x7E, 0x00, 0x01, 0x00, 0xFE, 0x7E],
            Command::ReadMeasurement => &[0x7E, 0x00, 0x03, 0x00, 0xFC, 0x7E],
            Command::ReadProductType => &[0x7E, 0x00, 0xD0, 0x01, 0x00, 0x2E, 0x7E],
            Command::ReadSerialNumber => &[0x7E, 0x00, 0xD0, 0x01, 0x03, 0x2B, 0x7E],
            Command::ReadFirmwareVersion => &[0x7E, 0x00, 0xD1, 0x00, 0x2E, 0x7E],
            Command::ReadStatusRegister => &[0x7E, 0x00, 0xD2, 0x01, 0x00, 0x2C, 0x7E],
        }
    }

    /// SHDLC command id byte.
    pub const fn id(&self) -> u8 {
        match self {
            Command::StartMeasurement => 0x00,
            Command::StopMeasurement => 0x01,
            Command::ReadMeasurement => 0x03,
            Command::ReadProductType | Command::ReadSerialNumber => 0xD0,
            Command::ReadFirmwareVersion => 0xD1,
            Command::ReadStatusRegister => 0xD2,
        }
    }

    /// Request data bytes (between length field and checksum).
    pub const fn data(&self) -> &'static [u8] {
        match self {
            Command::StartMeasurement => &[0x01, 0x03],
            Command::ReadProductType => &[0x00],
            Command::ReadSerialNumber => &[0x03],
            Command::ReadStatusRegister => &[0x00],
            Command::StopMeasurement | Command::ReadMeasurement | Command::ReadFirmwareVersion => &[],
        }
    }

    /// Number of (unstuffed) bytes the device answers with, markers included.
    pub const fn expected_response_len(&self) -> usize {
        match self {
            Command::StartMeasurement | Command::StopMeasurement => 7,
            Command::ReadMeasurement => 47,
            Command::ReadProductType => 16,
            Command::ReadSerialNumber => 24,
            Command::ReadFirmwareVersion => 14,
            Command::ReadStatusRegister => 12,
        }
    }

    /// Number of payload bytes left once the frame is trimmed.
    pub const fn expected_payload_len(&self) -> usize {
        self.expected_response_len() - 7
    }

    /// Maximum response time of the device, waited out after every send.
    pub const fn response_time_ms(&self) -> u32 {
        // Identical for the whole command set.
        timing::SETTLE_TIME_MS
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Command::StartMeasurement => "start_measurement",
            Command::StopMeasurement => "stop_measurement",
            Command::ReadMeasurement => "read_measurement",
            Command::ReadProductType => "read_product_type",
            Command::ReadSerialNumber => "read_serial_number",
            Command::ReadFirmwareVersion => "read_firmware_version",
            Command::ReadStatusRegister => "read_status_register",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#04x})", self.name(), self.id())
    }
}
