// src/common/response/mod.rs

// Typed results of the read commands and the decoders producing them
mod identification;
mod measurement;
mod status;
pub mod parse; // Make decode functions public

// Re-export items for external use
pub use identification::{FirmwareVersion, Identifier, MAX_IDENTIFIER_LEN};
pub use measurement::{round_to_precision, Measurement, DEFAULT_PRECISION};
pub use status::{parse_status_register, StatusRegister};
// Re-export decode functions
pub use parse::{decode_ascii, decode_firmware_version, decode_measurement, decode_status_register};
