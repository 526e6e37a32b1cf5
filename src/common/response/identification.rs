// src/common/response/identification.rs

use core::fmt;

/// Longest product type / serial number the device may report.
pub const MAX_IDENTIFIER_LEN: usize = 32;

/// ASCII identifier returned by the Device Information command.
pub type Identifier = heapless::String<MAX_IDENTIFIER_LEN>;

/// Firmware version reported by Read Version. Only major and minor are meaningful.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FirmwareVersion {
    pub major: i8,
    pub minor: i8,
}

impl FirmwareVersion {
    pub const fn new(major: i8, minor: i8) -> Self {
        FirmwareVersion { major, minor }
    }
}

impl From<FirmwareVersion> for (i8, i8) {
    fn from(version: FirmwareVersion) -> Self {
        (version.major, version.minor)
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
