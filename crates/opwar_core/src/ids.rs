//! Identifiers for units and leaders.
//!
//! Units and leaders refer to each other only through these IDs; live
//! entities are looked up through a directory owned by the caller.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Unique identifier of a unit. Immutable once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(u32);

impl UnitId {
    /// Create a unit ID from its numeric value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Key used in "kind:ID" reference strings.
    #[must_use]
    pub fn reference_key(self) -> String {
        format!("unit:{self}")
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U{:04}", self.0)
    }
}

impl FromStr for UnitId {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_prefixed(s, 'U').map(Self)
    }
}

/// Identifier of an externally-owned leader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeaderId(u32);

impl LeaderId {
    /// Create a leader ID from its numeric value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw numeric value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Key used in "kind:ID" reference strings.
    #[must_use]
    pub fn reference_key(self) -> String {
        format!("leader:{self}")
    }
}

impl fmt::Display for LeaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{:04}", self.0)
    }
}

impl FromStr for LeaderId {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_prefixed(s, 'L').map(Self)
    }
}

fn parse_prefixed(s: &str, prefix: char) -> Result<u32, GameError> {
    s.strip_prefix(prefix)
        .and_then(|digits| digits.parse::<u32>().ok())
        .ok_or_else(|| GameError::Reference(format!("malformed identifier '{s}'")))
}

/// Deterministic source of fresh unit IDs.
///
/// IDs are handed out in increasing order; after loading a save, call
/// [`UnitIdAllocator::observe`] for every loaded ID so new IDs never collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitIdAllocator {
    next: u32,
}

impl UnitIdAllocator {
    /// Create an allocator starting at ID 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocate the next unused ID.
    pub fn allocate(&mut self) -> UnitId {
        let id = UnitId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    /// Make sure future IDs are greater than `id`.
    pub fn observe(&mut self, id: UnitId) {
        if id.0 >= self.next {
            self.next = id.0.saturating_add(1);
        }
    }
}

impl Default for UnitIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_id_text_form() {
        let id = UnitId::new(42);
        assert_eq!(id.to_string(), "U0042");
        assert_eq!("U0042".parse::<UnitId>().unwrap(), id);
        assert_eq!(id.reference_key(), "unit:U0042");
    }

    #[test]
    fn test_malformed_ids_are_reference_errors() {
        assert!(matches!(
            "L0042".parse::<UnitId>(),
            Err(GameError::Reference(_))
        ));
        assert!("U-1".parse::<UnitId>().is_err());
        assert!("".parse::<LeaderId>().is_err());
    }

    #[test]
    fn test_leader_id_text_form() {
        let id = LeaderId::new(7);
        assert_eq!(id.to_string(), "L0007");
        assert_eq!("L7".parse::<LeaderId>().unwrap(), id);
    }

    #[test]
    fn test_allocator_is_sequential() {
        let mut ids = UnitIdAllocator::new();
        assert_eq!(ids.allocate(), UnitId::new(1));
        assert_eq!(ids.allocate(), UnitId::new(2));
    }

    #[test]
    fn test_allocator_observe_skips_loaded_ids() {
        let mut ids = UnitIdAllocator::new();
        ids.observe(UnitId::new(10));
        ids.observe(UnitId::new(3));
        assert_eq!(ids.allocate(), UnitId::new(11));
    }
}
