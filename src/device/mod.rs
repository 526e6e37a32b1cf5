// src/device/mod.rs

pub mod config;
pub mod sync_device;

// Re-export the public session types
pub use config::SessionConfig;
pub use sync_device::{DeviceState, Sps30};
