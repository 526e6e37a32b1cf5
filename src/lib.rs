// src/lib.rs

#![cfg_attr(not(test), no_std)] // Specify no_std at the crate root (tests run on the host)

#[cfg(feature = "std")]
extern crate std;

pub mod common;
pub mod device;

// Re-export key types for convenience
pub use common::Command;
pub use common::Sps30Error;
pub use device::{Sps30, SessionConfig};
