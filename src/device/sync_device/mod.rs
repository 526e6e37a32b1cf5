// src/device/sync_device/mod.rs

use crate::common::{
    command::Command,
    error::Sps30Error,
    hal_traits::{Sps30Serial, Sps30Timer},
    response::{
        decode_ascii, decode_firmware_version, decode_measurement, decode_status_register,
        FirmwareVersion, Identifier, Measurement, StatusRegister,
    },
};
use crate::device::config::SessionConfig;
use core::fmt::Debug;
use log::warn;

mod io_helpers;
mod transaction;

/// Measurement mode of the sensor as last commanded through this session.
///
/// Tracked for diagnostics only: the device itself decides whether a command
/// is allowed and reports violations in the response state byte.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DeviceState {
    #[default]
    Idle,
    Measuring,
}

/// Represents an SPS30 sensor on a UART, for SYNCHRONOUS (blocking) operations.
///
/// The session owns the interface exclusively and every operation takes
/// `&mut self`, so commands can never overlap on the wire. Share a session
/// between callers by wrapping it in a mutex.
#[derive(Debug)]
pub struct Sps30<IF>
where
    IF: Sps30Serial + Sps30Timer,
    IF::Error: Debug,
{
    interface: IF,
    config: SessionConfig,
    state: DeviceState,
}

impl<IF> Sps30<IF>
where
    IF: Sps30Serial + Sps30Timer,
    IF::Error: Debug,
{
    pub fn new(interface: IF) -> Self {
        Self::with_config(interface, SessionConfig::default())
    }

    pub fn with_config(interface: IF, config: SessionConfig) -> Self {
        Sps30 {
            interface,
            config,
            state: DeviceState::Idle,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SessionConfig) {
        self.config = config;
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    /// Gives the interface back.
    pub fn release(self) -> IF {
        self.interface
    }

    // --- Public Blocking Methods ---

    /// Starts continuous measurement (float output format).
    pub fn start_measurement(&mut self) -> Result<(), Sps30Error<IF::Error>> {
        self.execute_transaction(Command::StartMeasurement)?;
        self.state = DeviceState::Measuring;
        Ok(())
    }

    /// Stops measuring and returns the device to idle mode.
    pub fn stop_measurement(&mut self) -> Result<(), Sps30Error<IF::Error>> {
        self.execute_transaction(Command::StopMeasurement)?;
        self.state = DeviceState::Idle;
        Ok(())
    }

    /// Reads the latest measured values, stamped with the interface clock.
    pub fn read_measurement(&mut self) -> Result<Measurement, Sps30Error<IF::Error>> {
        if self.state == DeviceState::Idle {
            warn!("sps30: reading measurement while not measuring");
        }
        let payload = self.execute_transaction(Command::ReadMeasurement)?;
        let timestamp = self.interface.now_utc();
        Ok(decode_measurement(&payload, self.config.precision, timestamp)?)
    }

    /// Reads the product type. Always "00080000" for an SPS30; anything else
    /// suggests the wrong port.
    pub fn read_product_type(&mut self) -> Result<Identifier, Sps30Error<IF::Error>> {
        let payload = self.execute_transaction(Command::ReadProductType)?;
        Ok(decode_ascii(&payload)?)
    }

    /// Reads the serial number (at most 32 ASCII characters).
    pub fn read_serial_number(&mut self) -> Result<Identifier, Sps30Error<IF::Error>> {
        let payload = self.execute_transaction(Command::ReadSerialNumber)?;
        Ok(decode_ascii(&payload)?)
    }

    pub fn read_firmware_version(&mut self) -> Result<FirmwareVersion, Sps30Error<IF::Error>> {
        let payload = self.execute_transaction(Command::ReadFirmwareVersion)?;
        Ok(decode_firmware_version(&payload)?)
    }

    /// Reads the device status register without clearing it.
    pub fn read_status_register(&mut self) -> Result<StatusRegister, Sps30Error<IF::Error>> {
        let payload = self.execute_transaction(Command::ReadStatusRegister)?;
        Ok(decode_status_register(&payload)?)
    }
}
