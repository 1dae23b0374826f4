//! Bounded resource pools.
//!
//! Every unit pool (hit points, supply, movement, action tokens) is a
//! [`MaxCurrent`]. No operation can leave `current` outside `[0, max]`.

use serde::{Deserialize, Serialize};

use crate::math::{clamp, fixed_serde, Fixed};

/// A bounded quantity with a ceiling and a current value.
///
/// Deserialization goes through [`MaxCurrent::with_current`], so a
/// tampered save cannot produce an out-of-range pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "PoolRepr", into = "PoolRepr")]
pub struct MaxCurrent {
    /// Ceiling for `current`.
    max: Fixed,
    /// Current value, always in `[0, max]`.
    current: Fixed,
}

/// Wire form of a pool: `(max, current)` as raw fixed-point bits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PoolRepr {
    #[serde(with = "fixed_serde")]
    max: Fixed,
    #[serde(with = "fixed_serde")]
    current: Fixed,
}

impl From<PoolRepr> for MaxCurrent {
    fn from(repr: PoolRepr) -> Self {
        Self::with_current(repr.max, repr.current)
    }
}

impl From<MaxCurrent> for PoolRepr {
    fn from(pool: MaxCurrent) -> Self {
        Self {
            max: pool.max,
            current: pool.current,
        }
    }
}

impl MaxCurrent {
    /// Create a full pool. Negative maxima are treated as zero.
    #[must_use]
    pub fn new(max: Fixed) -> Self {
        let max = max.max(Fixed::ZERO);
        Self { max, current: max }
    }

    /// Create a full pool from an integer maximum.
    #[must_use]
    pub fn from_int(max: i32) -> Self {
        Self::new(Fixed::from_num(max))
    }

    /// Create a pool with an explicit current value (clamped).
    #[must_use]
    pub fn with_current(max: Fixed, current: Fixed) -> Self {
        let mut pool = Self::new(max);
        pool.set_current(current);
        pool
    }

    /// Maximum value.
    #[must_use]
    pub const fn max(&self) -> Fixed {
        self.max
    }

    /// Current value.
    #[must_use]
    pub const fn current(&self) -> Fixed {
        self.current
    }

    /// Current value truncated to whole units, for token pools.
    #[must_use]
    pub fn current_whole(&self) -> u32 {
        self.current.to_num::<u32>()
    }

    /// Restore `current` to `max`.
    pub fn reset_to_max(&mut self) {
        self.current = self.max;
    }

    /// Remove one whole unit.
    ///
    /// Returns `false` and leaves the pool unchanged when less than one
    /// unit remains.
    pub fn decrement(&mut self) -> bool {
        if self.current < Fixed::ONE {
            return false;
        }
        self.current -= Fixed::ONE;
        true
    }

    /// Set `current`, clamped into `[0, max]`.
    pub fn set_current(&mut self, value: Fixed) {
        self.current = clamp(value, Fixed::ZERO, self.max);
    }

    /// Change the ceiling, re-clamping `current` into the new range.
    pub fn set_max(&mut self, max: Fixed) {
        self.max = max.max(Fixed::ZERO);
        self.current = clamp(self.current, Fixed::ZERO, self.max);
    }

    /// Add to `current`, saturating at `max`. Returns the amount added.
    pub fn add(&mut self, amount: Fixed) -> Fixed {
        let before = self.current;
        self.set_current(self.current.saturating_add(amount.max(Fixed::ZERO)));
        self.current - before
    }

    /// Subtract from `current`, saturating at zero. Returns the amount removed.
    pub fn subtract(&mut self, amount: Fixed) -> Fixed {
        let before = self.current;
        self.set_current(self.current.saturating_sub(amount.max(Fixed::ZERO)));
        before - self.current
    }

    /// Whether at least `amount` is available.
    #[must_use]
    pub fn has_at_least(&self, amount: Fixed) -> bool {
        self.current >= amount
    }

    /// `current / max`, or zero for an empty pool.
    #[must_use]
    pub fn fraction(&self) -> Fixed {
        if self.max == Fixed::ZERO {
            Fixed::ZERO
        } else {
            self.current / self.max
        }
    }

    /// Check if the pool is at its ceiling.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }

    /// Check if the pool is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current <= Fixed::ZERO
    }
}
