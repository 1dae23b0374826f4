//! Damage-driven operational capacity.

use serde::{Deserialize, Serialize};

use crate::constants::MAX_FACILITY_DAMAGE;
use crate::math::{percent, Fixed};

/// Degradation tier of a facility, derived purely from its damage.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum OperationalCapacity {
    /// Damage 0–20.
    #[default]
    Full,
    /// Damage 21–40.
    SlightlyDegraded,
    /// Damage 41–60.
    ModeratelyDegraded,
    /// Damage 61–80.
    HeavilyDegraded,
    /// Damage 81–100.
    OutOfOperation,
}

impl OperationalCapacity {
    /// Capacity tier for a damage value. Out-of-range input is clamped first.
    #[must_use]
    pub const fn from_damage(damage: i32) -> Self {
        let damage = if damage < 0 {
            0
        } else if damage > MAX_FACILITY_DAMAGE {
            MAX_FACILITY_DAMAGE
        } else {
            damage
        };
        match damage {
            0..=20 => Self::Full,
            21..=40 => Self::SlightlyDegraded,
            41..=60 => Self::ModeratelyDegraded,
            61..=80 => Self::HeavilyDegraded,
            _ => Self::OutOfOperation,
        }
    }

    /// Output multiplier for this tier.
    #[must_use]
    pub fn efficiency(self) -> Fixed {
        percent(match self {
            Self::Full => 100,
            Self::SlightlyDegraded => 75,
            Self::ModeratelyDegraded => 50,
            Self::HeavilyDegraded => 25,
            Self::OutOfOperation => 0,
        })
    }

    /// Check if the facility can still function.
    #[must_use]
    pub const fn is_operational(self) -> bool {
        !matches!(self, Self::OutOfOperation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_edges() {
        use OperationalCapacity::*;
        let cases = [
            (0, Full),
            (20, Full),
            (21, SlightlyDegraded),
            (40, SlightlyDegraded),
            (41, ModeratelyDegraded),
            (60, ModeratelyDegraded),
            (61, HeavilyDegraded),
            (80, HeavilyDegraded),
            (81, OutOfOperation),
            (100, OutOfOperation),
        ];
        for (damage, expected) in cases {
            assert_eq!(OperationalCapacity::from_damage(damage), expected, "damage {damage}");
        }
    }

    #[test]
    fn test_capacity_is_monotonic() {
        let mut previous = OperationalCapacity::from_damage(0);
        for damage in 1..=100 {
            let current = OperationalCapacity::from_damage(damage);
            assert!(current >= previous, "capacity improved at damage {damage}");
            assert!(current.efficiency() <= previous.efficiency());
            previous = current;
        }
    }

    #[test]
    fn test_out_of_range_damage_is_clamped() {
        assert_eq!(
            OperationalCapacity::from_damage(-5),
            OperationalCapacity::Full
        );
        assert_eq!(
            OperationalCapacity::from_damage(250),
            OperationalCapacity::OutOfOperation
        );
    }

    #[test]
    fn test_efficiency_values() {
        assert_eq!(OperationalCapacity::Full.efficiency(), Fixed::ONE);
        assert_eq!(
            OperationalCapacity::ModeratelyDegraded.efficiency(),
            Fixed::from_num(0.5)
        );
        assert!(!OperationalCapacity::OutOfOperation.is_operational());
        assert!(OperationalCapacity::HeavilyDegraded.is_operational());
    }
}
