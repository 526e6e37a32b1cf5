// src/common/hal_traits.rs

use chrono::{DateTime, Utc};
use core::fmt::Debug;

/// Abstraction for the byte-stream connection to the sensor (a UART at 115200 8N1).
///
/// Link setup (baud rate, pins) is up to the implementor.
pub trait Sps30Serial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Queues `data` for transmission.
    ///
    /// Returns the number of bytes accepted. Anything short of `data.len()`,
    /// including `Ok(0)` on a transmit timeout, is treated as a failed send.
    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error>;

    /// Returns how many received bytes are waiting to be read.
    fn read_available(&mut self) -> Result<usize, Self::Error>;

    /// Reads waiting bytes into `buffer`, returning how many were copied.
    ///
    /// Must not block; returns `Ok(0)` when nothing is waiting.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Abstraction for the delay and wall-clock operations the driver needs.
pub trait Sps30Timer {
    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Current wall-clock time in UTC, used to stamp measurements.
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Bundles a serial port and a timer into a single interface for `Sps30`.
#[derive(Debug, Clone)]
pub struct Interface<S, T> {
    pub serial: S,
    pub timer: T,
}

impl<S, T> Interface<S, T> {
    pub fn new(serial: S, timer: T) -> Self {
        Interface { serial, timer }
    }

    /// Splits the interface back into its parts.
    pub fn release(self) -> (S, T) {
        (self.serial, self.timer)
    }
}

impl<S: Sps30Serial, T> Sps30Serial for Interface<S, T> {
    type Error = S::Error;

    fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
        self.serial.write(data)
    }

    fn read_available(&mut self) -> Result<usize, Self::Error> {
        self.serial.read_available()
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        self.serial.read(buffer)
    }
}

impl<S, T: Sps30Timer> Sps30Timer for Interface<S, T> {
    fn delay_ms(&mut self, ms: u32) {
        self.timer.delay_ms(ms)
    }

    fn now_utc(&self) -> DateTime<Utc> {
        self.timer.now_utc()
    }
}

/// Host timer backed by `std::thread::sleep` and the system clock (requires 'std' feature).
#[cfg(feature = "std")]
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemTimer;

#[cfg(feature = "std")]
impl Sps30Timer for SystemTimer {
    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(core::time::Duration::from_millis(ms as u64));
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Adapts an `embedded_hal::delay::DelayNs` into an `Sps30Timer`.
///
/// Targets without a real-time clock get their wall-clock time from a caller
/// supplied `epoch` (e.g. set once from NTP or an RTC at boot), advanced by
/// every delay performed through this adapter. Time spent outside the driver
/// is not counted, so call `set_epoch` again to resynchronise.
///
/// Requires `embedded-hal` v1.0 traits.
#[cfg(feature = "impl-native")]
#[derive(Debug)]
pub struct DelayTimer<D> {
    delay: D,
    epoch: DateTime<Utc>,
    elapsed_ms: u64,
}

#[cfg(feature = "impl-native")]
impl<D: embedded_hal::delay::DelayNs> DelayTimer<D> {
    pub fn new(delay: D, epoch: DateTime<Utc>) -> Self {
        DelayTimer { delay, epoch, elapsed_ms: 0 }
    }

    /// Resets the clock to `epoch`.
    pub fn set_epoch(&mut self, epoch: DateTime<Utc>) {
        self.epoch = epoch;
        self.elapsed_ms = 0;
    }

    pub fn release(self) -> D {
        self.delay
    }
}

#[cfg(feature = "impl-native")]
impl<D: embedded_hal::delay::DelayNs> Sps30Timer for DelayTimer<D> {
    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
        self.elapsed_ms = self.elapsed_ms.saturating_add(ms as u64);
    }

    fn now_utc(&self) -> DateTime<Utc> {
        let elapsed = i64::try_from(self.elapsed_ms).unwrap_or(i64::MAX);
        chrono::TimeDelta::try_milliseconds(elapsed)
            .and_then(|delta| self.epoch.checked_add_signed(delta))
            .unwrap_or(self.epoch)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    struct LoopbackSerial {
        buffer: Vec<u8>,
    }

    impl Sps30Serial for LoopbackSerial {
        type Error = core::convert::Infallible;

        fn write(&mut self, data: &[u8]) -> Result<usize, Self::Error> {
            self.buffer.extend_from_slice(data);
            Ok(data.len())
        }

        fn read_available(&mut self) -> Result<usize, Self::Error> {
            Ok(self.buffer.len())
        }

        fn read(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
            let n = buffer.len().min(self.buffer.len());
            buffer[..n].copy_from_slice(&self.buffer[..n]);
            self.buffer.drain(..n);
            Ok(n)
        }
    }

    struct CountingTimer {
        slept_ms: u32,
    }

    impl Sps30Timer for CountingTimer {
        fn delay_ms(&mut self, ms: u32) {
            self.slept_ms += ms;
        }

        fn now_utc(&self) -> DateTime<Utc> {
            DateTime::from_timestamp(1_700_000_000 + self.slept_ms as i64 / 1000, 0).unwrap()
        }
    }

    #[test]
    fn test_interface_forwards_to_parts() {
        let mut iface = Interface::new(LoopbackSerial { buffer: Vec::new() }, CountingTimer { slept_ms: 0 });

        assert_eq!(iface.write(&[1, 2, 3]).unwrap(), 3);
        assert_eq!(iface.read_available().unwrap(), 3);
        let mut buf = [0u8; 2];
        assert_eq!(iface.read(&mut buf).unwrap(), 2);
        assert_eq!(buf, [1, 2]);
        assert_eq!(iface.read_available().unwrap(), 1);

        iface.delay_ms(2_000);
        assert_eq!(iface.now_utc().timestamp(), 1_700_000_002);

        let (serial, timer) = iface.release();
        assert_eq!(serial.buffer, vec![3]);
        assert_eq!(timer.slept_ms, 2_000);
    }
}
