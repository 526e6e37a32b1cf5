// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod command;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod response;
pub mod timing;

// --- Re-export key types/traits/functions for easier access ---

// From command.rs
pub use command::Command;

// From error.rs
pub use error::{DecodeError, FrameError, Sps30Error};

// From frame.rs
pub use frame::{
    build_frame, reverse_byte_stuffing, stuff_bytes, trim_data, transform_data,
    checksum, encode_request, encode_response, verify_response, FrameBuffer,
};

// From hal_traits.rs
pub use hal_traits::{Interface, Sps30Serial, Sps30Timer};

// From response/mod.rs (and its sub-modules via its own `pub use`)
pub use response::{
    decode_ascii, decode_firmware_version, decode_measurement, decode_status_register,
    parse_status_register, FirmwareVersion, Identifier, Measurement, StatusRegister,
};

// timing.rs constants stay under common::timing::*

// --- Feature-gated re-exports ---

#[cfg(feature = "std")]
pub use hal_traits::SystemTimer;

#[cfg(feature = "impl-native")]
pub use hal_traits::DelayTimer;
