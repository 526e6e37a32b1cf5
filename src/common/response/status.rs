// src/common/response/status.rs

use core::fmt;

// Bit positions in the device status register (datasheet, "Read Device Status Register").
const FAN_ERROR_BIT: u32 = 4;
const LASER_ERROR_BIT: u32 = 5;
const SPEED_WARNING_BIT: u32 = 21;

/// Health flags decoded from the 32-bit device status register.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StatusRegister {
    /// False if the fan speed is out of range (too high or too low).
    pub fan_speed_ok: bool,
    /// False if the laser current is out of range.
    pub laser_current_ok: bool,
    /// False if the fan is switched on but not turning.
    pub fan_ok: bool,
    /// Register value the flags were decoded from.
    pub raw: u32,
}

impl Default for StatusRegister {
    fn default() -> Self {
        StatusRegister {
            fan_speed_ok: true,
            laser_current_ok: true,
            fan_ok: true,
            raw: 0,
        }
    }
}

impl StatusRegister {
    /// True when no monitored flag reports a fault.
    pub fn is_healthy(&self) -> bool {
        self.fan_speed_ok && self.laser_current_ok && self.fan_ok
    }
}

#[inline]
const fn is_set(register: u32, bit: u32) -> bool {
    register & (1 << bit) != 0
}

/// Maps the monitored bits of `register` to health flags. Unmonitored bits are ignored.
pub fn parse_status_register(register: u32) -> StatusRegister {
    let mut status = StatusRegister::default();

    // if the register is 0 everything is ok
    if register == 0 {
        return status;
    }

    status.raw = register;
    status.fan_ok = !is_set(register, FAN_ERROR_BIT);
    status.laser_current_ok = !is_set(register, LASER_ERROR_BIT);
    status.fan_speed_ok = !is_set(register, SPEED_WARNING_BIT);
    status
}

impl fmt::Display for StatusRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StatusRegister(fan_speed_ok={}; laser_current_ok={}; fan_ok={})",
            self.fan_speed_ok, self.laser_current_ok, self.fan_ok
        )
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_register_is_all_ok() {
        let status = parse_status_register(0);
        assert_eq!(status, StatusRegister::default());
        assert!(status.is_healthy());
    }

    #[test]
    fn test_fan_error_bit() {
        let status = parse_status_register(1 << 4);
        assert!(!status.fan_ok);
        assert!(status.laser_current_ok);
        assert!(status.fan_speed_ok);
        assert!(!status.is_healthy());
    }

    #[test]
    fn test_all_monitored_bits() {
        let status = parse_status_register((1 << 4) | (1 << 5) | (1 << 21));
        assert!(!status.fan_ok);
        assert!(!status.laser_current_ok);
        assert!(!status.fan_speed_ok);
        assert_eq!(status.raw, 0x0020_0030);
    }

    #[test]
    fn test_unmonitored_bits_are_ignored() {
        let status = parse_status_register(!((1 << 4) | (1 << 5) | (1 << 21)));
        assert!(status.is_healthy());
        assert_ne!(status.raw, 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            parse_status_register(1 << 5).to_string(),
            "StatusRegister(fan_speed_ok=true; laser_current_ok=false; fan_ok=true)"
        );
    }
}
