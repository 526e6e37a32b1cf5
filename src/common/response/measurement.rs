// src/common/response/measurement.rs

use chrono::{DateTime, Datelike, Timelike, Utc};
use core::fmt;

/// Decimal places kept by default when rounding measured values.
pub const DEFAULT_PRECISION: u8 = 1;

// f32 carries about 7 significant digits, more decimals only add noise.
const MAX_PRECISION: u8 = 7;

/// A single set of measured values (Read Measured Values, float format).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Measurement {
    /// Capture time (UTC) at decode.
    pub timestamp: DateTime<Utc>,
    /// Mass Concentration PM1.0 [µg/m³]
    pub mass_pm1_0: f32,
    /// Mass Concentration PM2.5 [µg/m³]
    pub mass_pm2_5: f32,
    /// Mass Concentration PM4.0 [µg/m³]
    pub mass_pm4_0: f32,
    /// Mass Concentration PM10 [µg/m³]
    pub mass_pm10: f32,
    /// Number Concentration PM0.5 [#/cm³]
    pub number_pm0_5: f32,
    /// Number Concentration PM1.0 [#/cm³]
    pub number_pm1_0: f32,
    /// Number Concentration PM2.5 [#/cm³]
    pub number_pm2_5: f32,
    /// Number Concentration PM4.0 [#/cm³]
    pub number_pm4_0: f32,
    /// Number Concentration PM10 [#/cm³]
    pub number_pm10: f32,
    /// Typical Particle Size [µm]
    pub typical_particle_size: f32,
}

impl Measurement {
    /// Builds a measurement from the ten values in wire order.
    pub fn from_values(values: [f32; 10], timestamp: DateTime<Utc>) -> Self {
        let [
            mass_pm1_0,
            mass_pm2_5,
            mass_pm4_0,
            mass_pm10,
            number_pm0_5,
            number_pm1_0,
            number_pm2_5,
            number_pm4_0,
            number_pm10,
            typical_particle_size,
        ] = values;
        Measurement {
            timestamp,
            mass_pm1_0,
            mass_pm2_5,
            mass_pm4_0,
            mass_pm10,
            number_pm0_5,
            number_pm1_0,
            number_pm2_5,
            number_pm4_0,
            number_pm10,
            typical_particle_size,
        }
    }

    /// The ten values in wire order.
    pub fn values(&self) -> [f32; 10] {
        [
            self.mass_pm1_0,
            self.mass_pm2_5,
            self.mass_pm4_0,
            self.mass_pm10,
            self.number_pm0_5,
            self.number_pm1_0,
            self.number_pm2_5,
            self.number_pm4_0,
            self.number_pm10,
            self.typical_particle_size,
        ]
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Measurement(ts={:04}-{:02}-{:02} {:02}:{:02}:{:02}, pm1.0={}, pm2.5={}, pm4.0={}, pm10={}, n0.5={}, n1.0={}, n2.5={}, n4.0={}, n10={}, tps={})",
            self.timestamp.year(),
            self.timestamp.month(),
            self.timestamp.day(),
            self.timestamp.hour(),
            self.timestamp.minute(),
            self.timestamp.second(),
            self.mass_pm1_0,
            self.mass_pm2_5,
            self.mass_pm4_0,
            self.mass_pm10,
            self.number_pm0_5,
            self.number_pm1_0,
            self.number_pm2_5,
            self.number_pm4_0,
            self.number_pm10,
            self.typical_particle_size,
        )
    }
}

/// Rounds `value` to `precision` decimal places, exact halves to even.
///
/// Works without `std` (no `f32::round` in core). Non-finite values and
/// values too large to carry any decimals are returned unchanged.
pub fn round_to_precision(value: f32, precision: u8) -> f32 {
    if !value.is_finite() {
        return value;
    }

    let mut scale = 1.0f64;
    for _ in 0..precision.min(MAX_PRECISION) {
        scale *= 10.0;
    }

    let scaled = value as f64 * scale;
    // Beyond 2^52 an f64 has no fractional part left to round.
    if scaled.abs() >= 4_503_599_627_370_496.0 {
        return value;
    }

    let truncated = scaled as i64;
    let floor = if (truncated as f64) > scaled {
        truncated - 1
    } else {
        truncated
    };
    let fraction = scaled - floor as f64;
    let rounded = if fraction > 0.5 || (fraction == 0.5 && floor % 2 != 0) {
        floor + 1
    } else {
        floor
    };
    (rounded as f64 / scale) as f32
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_precision() {
        assert_eq!(round_to_precision(12.345_678, 1), 12.3);
        assert_eq!(round_to_precision(12.345_678, 2), 12.35);
        assert_eq!(round_to_precision(12.345_678, 0), 12.0);
        assert_eq!(round_to_precision(0.05, 0), 0.0);
        assert_eq!(round_to_precision(-1.26, 1), -1.3);
    }

    #[test]
    fn test_round_exact_halves_to_even() {
        assert_eq!(round_to_precision(0.25, 1), 0.2);
        assert_eq!(round_to_precision(1.25, 1), 1.2);
        assert_eq!(round_to_precision(0.75, 1), 0.8);
        assert_eq!(round_to_precision(2.5, 0), 2.0);
        assert_eq!(round_to_precision(3.5, 0), 4.0);
        assert_eq!(round_to_precision(-2.5, 0), -2.0);
        assert_eq!(round_to_precision(-0.25, 1), -0.2);
        assert_eq!(round_to_precision(7.0, 1), 7.0);
    }

    #[test]
    fn test_round_passes_through_special_values() {
        assert!(round_to_precision(f32::NAN, 1).is_nan());
        assert_eq!(round_to_precision(f32::INFINITY, 1), f32::INFINITY);
        assert_eq!(round_to_precision(f32::MAX, 3), f32::MAX);
    }

    #[test]
    fn test_values_order() {
        let ts = DateTime::from_timestamp(0, 0).unwrap();
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let m = Measurement::from_values(values, ts);
        assert_eq!(m.mass_pm1_0, 1.0);
        assert_eq!(m.mass_pm10, 4.0);
        assert_eq!(m.number_pm0_5, 5.0);
        assert_eq!(m.typical_particle_size, 10.0);
        assert_eq!(m.values(), values);
    }

    #[test]
    fn test_display() {
        let ts = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let m = Measurement::from_values([1.5, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 0.6], ts);
        assert_eq!(
            m.to_string(),
            "Measurement(ts=2023-11-14 22:13:20, pm1.0=1.5, pm2.5=2, pm4.0=3, pm10=4, n0.5=5, n1.0=6, n2.5=7, n4.0=8, n10=9, tps=0.6)"
        );
    }
}
