//! Fixed-point math utilities for deterministic simulation.
//!
//! All unit-state arithmetic uses fixed-point numbers so that two clients
//! replaying the same turn arrive at bit-identical pools and modifiers.

use fixed::types::I32F32;

/// Fixed-point number type for all simulation math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
/// Range: approximately -2,147,483,648 to 2,147,483,647
/// Precision: approximately 0.00000000023
pub type Fixed = I32F32;

/// Tolerance used when rounding products of modifier tables.
///
/// Decimal constants such as `0.1` are not exact in binary; products are
/// snapped to this grid before taking a ceiling so `10 × 0.1` rounds to 1.
const ROUNDING_EPSILON_BITS: i64 = 1 << 12;

/// Build a fixed-point value from a percentage (100 = 1.0).
#[must_use]
pub fn percent(value: i32) -> Fixed {
    Fixed::from_num(value) / Fixed::from_num(100)
}

/// Ceiling-round a fixed-point value to an integer.
#[must_use]
pub fn ceil_to_i32(value: Fixed) -> i32 {
    let snapped = Fixed::from_bits(value.to_bits() - ROUNDING_EPSILON_BITS);
    snapped.ceil().to_num::<i32>()
}

/// Scale an integer rating by a modifier, rounding up.
#[must_use]
pub fn scale_rating(base: i32, modifier: Fixed) -> i32 {
    ceil_to_i32(Fixed::from_num(base) * modifier)
}

/// Convert to hundredths, rounded to nearest, for display and events.
#[must_use]
pub fn to_centi(value: Fixed) -> i64 {
    (value * Fixed::from_num(100)).round().to_num::<i64>()
}

/// Clamp a fixed-point value into `[min, max]`.
#[must_use]
pub fn clamp(value: Fixed, min: Fixed, max: Fixed) -> Fixed {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Serde support for fixed-point numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}

/// Serde support for fixed-point numbers written by hand in data files.
///
/// Content authors write `2.5` rather than raw bits; values are converted
/// with `Fixed::from_num` on load.
pub mod fixed_decimal_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as a decimal.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_num::<f64>().serialize(serializer)
    }

    /// Deserialize a fixed-point number from a decimal.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Fixed::checked_from_num(value)
            .ok_or_else(|| serde::de::Error::custom(format!("value {value} out of range")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_determinism() {
        // Same operations must produce identical results
        let a = Fixed::from_num(1) / Fixed::from_num(3);
        let b = Fixed::from_num(1) / Fixed::from_num(3);
        assert_eq!(a, b);

        let result1 = a * Fixed::from_num(7);
        let result2 = b * Fixed::from_num(7);
        assert_eq!(result1, result2);
    }

    #[test]
    fn test_ceil_to_i32_exact_values() {
        assert_eq!(ceil_to_i32(Fixed::from_num(4)), 4);
        assert_eq!(ceil_to_i32(Fixed::from_num(4.25)), 5);
        assert_eq!(ceil_to_i32(Fixed::ZERO), 0);
    }

    #[test]
    fn test_ceil_absorbs_decimal_error() {
        // 0.1 and 0.9 are inexact in binary fixed-point
        assert_eq!(scale_rating(10, percent(10)), 1);
        assert_eq!(scale_rating(30, percent(90)), 27);
    }

    #[test]
    fn test_scale_rating_rounds_up() {
        assert_eq!(scale_rating(10, Fixed::from_num(0.75)), 8);
        assert_eq!(scale_rating(7, Fixed::from_num(0.5)), 4);
    }

    #[test]
    fn test_to_centi() {
        assert_eq!(to_centi(Fixed::from_num(3.75)), 375);
        assert_eq!(to_centi(percent(10)), 10);
    }

    #[test]
    fn test_clamp() {
        let lo = Fixed::from_num(0);
        let hi = Fixed::from_num(10);
        assert_eq!(clamp(Fixed::from_num(-3), lo, hi), lo);
        assert_eq!(clamp(Fixed::from_num(13), lo, hi), hi);
        assert_eq!(clamp(Fixed::from_num(5), lo, hi), Fixed::from_num(5));
    }
}
