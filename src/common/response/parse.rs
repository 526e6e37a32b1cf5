// src/common/response/parse.rs

use super::identification::{FirmwareVersion, Identifier, MAX_IDENTIFIER_LEN};
use super::measurement::{round_to_precision, Measurement};
use super::status::{parse_status_register, StatusRegister};

use crate::common::error::DecodeError;

use chrono::{DateTime, Utc};

// --- Payload Sizes ---
const MEASUREMENT_VALUES: usize = 10;
const MEASUREMENT_PAYLOAD_LEN: usize = MEASUREMENT_VALUES * 4;
const FIRMWARE_PAYLOAD_LEN: usize = 7;
const STATUS_PAYLOAD_LEN: usize = 5;

// --- Internal Helpers ---
#[inline]
fn expect_len(payload: &[u8], expected: usize) -> Result<(), DecodeError> {
    if payload.len() == expected {
        Ok(())
    } else {
        Err(DecodeError::InvalidLength { expected, got: payload.len() })
    }
}

// --- Public Decode Functions ---

/// Decodes the 40 byte payload of Read Measured Values.
///
/// Ten consecutive big-endian IEEE754 floats, each rounded to `precision`
/// decimal places, stamped with `timestamp`.
pub fn decode_measurement(
    payload: &[u8],
    precision: u8,
    timestamp: DateTime<Utc>,
) -> Result<Measurement, DecodeError> {
    expect_len(payload, MEASUREMENT_PAYLOAD_LEN)?;

    let mut values = [0f32; MEASUREMENT_VALUES];
    for (value, chunk) in values.iter_mut().zip(payload.chunks_exact(4)) {
        let raw = f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        *value = round_to_precision(raw, precision);
    }

    Ok(Measurement::from_values(values, timestamp))
}

/// Decodes an ASCII identifier (product type or serial number).
///
/// The device terminates strings with NUL, trailing NULs are dropped. The
/// remainder must be ASCII and at most 32 characters long.
pub fn decode_ascii(payload: &[u8]) -> Result<Identifier, DecodeError> {
    if let Some((offset, &byte)) = payload.iter().enumerate().find(|(_, b)| !b.is_ascii()) {
        return Err(DecodeError::NonAscii { byte, offset });
    }

    let end = payload.iter().rposition(|&b| b != 0).map_or(0, |idx| idx + 1);
    let text = &payload[..end];
    if text.len() > MAX_IDENTIFIER_LEN {
        return Err(DecodeError::TooLong { max: MAX_IDENTIFIER_LEN, got: text.len() });
    }

    let mut identifier = Identifier::new();
    for &byte in text {
        identifier
            .push(byte as char)
            .map_err(|_| DecodeError::TooLong { max: MAX_IDENTIFIER_LEN, got: text.len() })?;
    }
    Ok(identifier)
}

/// Decodes the 7 signed bytes of Read Version, keeping firmware major and minor.
pub fn decode_firmware_version(payload: &[u8]) -> Result<FirmwareVersion, DecodeError> {
    expect_len(payload, FIRMWARE_PAYLOAD_LEN)?;
    // Remaining bytes: reserved, hardware revision, reserved, SHDLC major/minor.
    Ok(FirmwareVersion::new(payload[0] as i8, payload[1] as i8))
}

/// Decodes Read Device Status Register: a big-endian u32 followed by one reserved byte.
pub fn decode_status_register(payload: &[u8]) -> Result<StatusRegister, DecodeError> {
    expect_len(payload, STATUS_PAYLOAD_LEN)?;
    let register = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
    Ok(parse_status_register(register))
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn ts() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn float_payload(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_be_bytes()).collect()
    }

    #[test]
    fn test_decode_measurement() {
        let expected = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let payload = float_payload(&expected);
        assert_eq!(payload.len(), 40);

        let m = decode_measurement(&payload, 1, ts()).unwrap();
        assert_eq!(m.values(), expected);
        assert_eq!(m.timestamp, ts());
    }

    #[test]
    fn test_decode_measurement_rounds_each_value() {
        let payload = float_payload(&[
            12.345, 0.04, 0.06, 99.99, 1.25, 7.0, 0.0, 3.14159, 2.71828, 0.55,
        ]);
        let m = decode_measurement(&payload, 1, ts()).unwrap();
        assert_eq!(m.mass_pm1_0, 12.3);
        assert_eq!(m.mass_pm2_5, 0.0);
        assert_eq!(m.mass_pm4_0, 0.1);
        assert_eq!(m.mass_pm10, 100.0);
        assert_eq!(m.number_pm0_5, 1.2);
        assert_eq!(m.number_pm4_0, 3.1);
        assert_eq!(m.number_pm10, 2.7);

        let m = decode_measurement(&payload, 3, ts()).unwrap();
        assert_eq!(m.number_pm4_0, 3.142);
    }

    #[test]
    fn test_decode_measurement_wrong_length() {
        let payload = [0u8; 39];
        assert_eq!(
            decode_measurement(&payload, 1, ts()),
            Err(DecodeError::InvalidLength { expected: 40, got: 39 })
        );
        assert_eq!(
            decode_measurement(&[0u8; 41], 1, ts()),
            Err(DecodeError::InvalidLength { expected: 40, got: 41 })
        );
    }

    #[test]
    fn test_decode_ascii_product_type() {
        let payload = b"00080000\0";
        assert_eq!(decode_ascii(payload).unwrap().as_str(), "00080000");
    }

    #[test]
    fn test_decode_ascii_serial_number() {
        let payload = b"9D5C2E16A2E0C1F3\0";
        assert_eq!(decode_ascii(payload).unwrap().as_str(), "9D5C2E16A2E0C1F3");
        assert_eq!(decode_ascii(b"").unwrap().as_str(), "");
        assert_eq!(decode_ascii(b"\0\0").unwrap().as_str(), "");
    }

    #[test]
    fn test_decode_ascii_rejects_non_ascii() {
        assert_eq!(
            decode_ascii(&[b'0', b'0', 0xC3, 0xA9, 0x00]),
            Err(DecodeError::NonAscii { byte: 0xC3, offset: 2 })
        );
    }

    #[test]
    fn test_decode_ascii_rejects_overlong() {
        let payload = [b'A'; 33];
        assert_eq!(
            decode_ascii(&payload),
            Err(DecodeError::TooLong { max: 32, got: 33 })
        );
        let payload = [b'A'; 32];
        assert_eq!(decode_ascii(&payload).unwrap().len(), 32);
    }

    #[test]
    fn test_decode_firmware_version() {
        let version = decode_firmware_version(&[1, 2, 0, 0, 0, 0, 0]).unwrap();
        assert_eq!(<(i8, i8)>::from(version), (1, 2));
        assert_eq!(version.to_string(), "1.2");

        // Bytes are signed.
        let version = decode_firmware_version(&[0xFF, 0x80, 0, 0, 0, 0, 0]).unwrap();
        assert_eq!(version, FirmwareVersion::new(-1, -128));

        assert_eq!(
            decode_firmware_version(&[2, 2]),
            Err(DecodeError::InvalidLength { expected: 7, got: 2 })
        );
    }

    #[test]
    fn test_decode_status_register() {
        let status = decode_status_register(&[0x00, 0x20, 0x00, 0x10, 0x00]).unwrap();
        assert!(!status.fan_speed_ok);
        assert!(status.laser_current_ok);
        assert!(!status.fan_ok);
        assert_eq!(status.raw, 0x0020_0010);

        // Reserved byte is ignored.
        let status = decode_status_register(&[0, 0, 0, 0, 0xFF]).unwrap();
        assert_eq!(status, StatusRegister::default());

        assert_eq!(
            decode_status_register(&[0, 0, 0, 0]),
            Err(DecodeError::InvalidLength { expected: 5, got: 4 })
        );
    }
}
