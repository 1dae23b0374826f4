//! Facility state for base-type units.
//!
//! A [`FacilityData`] is attached to a unit only when its classification is
//! a base kind (headquarters, supply depot, airbase). The damage/capacity
//! sub-machine is shared; depots and airbases add their own sub-state.
//!
//! ## Module Structure
//!
//! - [`capacity`] - Damage bands and operational capacity tiers
//! - [`depot`] - Supply stockpile, generation and projection
//! - [`airbase`] - Aircraft attachment

pub mod airbase;
pub mod capacity;
pub mod depot;

use serde::{Deserialize, Serialize};

pub use airbase::Airbase;
pub use capacity::OperationalCapacity;
pub use depot::{DepotCategory, DepotSize, GenerationRate, ProjectionRadius, SupplyDepot};

use crate::classification::FacilityKind;
use crate::constants::MAX_FACILITY_DAMAGE;
use crate::error::{GameError, Result};

/// Kind-specific facility state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacilityDetail {
    /// Headquarters carry no extra state.
    Headquarters,
    /// Supply depot state.
    SupplyDepot(SupplyDepot),
    /// Airbase state.
    Airbase(Airbase),
}

/// Facility state embedded in a base-type unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityData {
    damage: i32,
    capacity: OperationalCapacity,
    detail: FacilityDetail,
}

impl FacilityData {
    /// Create an undamaged facility.
    #[must_use]
    pub fn new(detail: FacilityDetail) -> Self {
        Self {
            damage: 0,
            capacity: OperationalCapacity::Full,
            detail,
        }
    }

    /// Create an undamaged headquarters.
    #[must_use]
    pub fn headquarters() -> Self {
        Self::new(FacilityDetail::Headquarters)
    }

    /// Create an undamaged depot with a full stockpile.
    #[must_use]
    pub fn supply_depot(size: DepotSize, category: DepotCategory) -> Self {
        Self::new(FacilityDetail::SupplyDepot(SupplyDepot::new(size, category)))
    }

    /// Create an undamaged, empty airbase.
    #[must_use]
    pub fn new_airbase() -> Self {
        Self::new(FacilityDetail::Airbase(Airbase::new()))
    }

    /// Restore a facility with persisted damage. Damage is clamped and the
    /// capacity tier recomputed from it.
    #[must_use]
    pub fn restore(damage: i32, detail: FacilityDetail) -> Self {
        let damage = damage.clamp(0, MAX_FACILITY_DAMAGE);
        Self {
            damage,
            capacity: OperationalCapacity::from_damage(damage),
            detail,
        }
    }

    /// Facility kind.
    #[must_use]
    pub const fn kind(&self) -> FacilityKind {
        match self.detail {
            FacilityDetail::Headquarters => FacilityKind::Headquarters,
            FacilityDetail::SupplyDepot(_) => FacilityKind::SupplyDepot,
            FacilityDetail::Airbase(_) => FacilityKind::Airbase,
        }
    }

    /// Damage in `[0, 100]`.
    #[must_use]
    pub const fn damage(&self) -> i32 {
        self.damage
    }

    /// Capacity tier for the current damage.
    #[must_use]
    pub const fn capacity(&self) -> OperationalCapacity {
        self.capacity
    }

    /// Kind-specific state.
    #[must_use]
    pub const fn detail(&self) -> &FacilityDetail {
        &self.detail
    }

    /// Depot state, if this is a depot.
    #[must_use]
    pub const fn depot(&self) -> Option<&SupplyDepot> {
        match &self.detail {
            FacilityDetail::SupplyDepot(depot) => Some(depot),
            _ => None,
        }
    }

    /// Mutable depot state, if this is a depot.
    pub fn depot_mut(&mut self) -> Option<&mut SupplyDepot> {
        match &mut self.detail {
            FacilityDetail::SupplyDepot(depot) => Some(depot),
            _ => None,
        }
    }

    /// Airbase state, if this is an airbase.
    #[must_use]
    pub const fn airbase(&self) -> Option<&Airbase> {
        match &self.detail {
            FacilityDetail::Airbase(airbase) => Some(airbase),
            _ => None,
        }
    }

    /// Mutable airbase state, if this is an airbase.
    pub fn airbase_mut(&mut self) -> Option<&mut Airbase> {
        match &mut self.detail {
            FacilityDetail::Airbase(airbase) => Some(airbase),
            _ => None,
        }
    }

    fn set_damage(&mut self, damage: i32) {
        self.damage = damage.clamp(0, MAX_FACILITY_DAMAGE);
        self.capacity = OperationalCapacity::from_damage(self.damage);
    }

    /// Add damage, clamped to 100. Returns the new damage.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] for negative amounts.
    pub fn add_damage(&mut self, amount: i32) -> Result<i32> {
        if amount < 0 {
            return Err(GameError::Validation(format!(
                "facility damage must be non-negative, got {amount}"
            )));
        }
        self.set_damage(self.damage.saturating_add(amount));
        Ok(self.damage)
    }

    /// Repair damage, clamped to 0. Returns the new damage.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] for negative amounts.
    pub fn repair(&mut self, amount: i32) -> Result<i32> {
        if amount < 0 {
            return Err(GameError::Validation(format!(
                "facility repair must be non-negative, got {amount}"
            )));
        }
        self.set_damage(self.damage.saturating_sub(amount));
        Ok(self.damage)
    }

    /// Reset to a fresh state: no damage, empty stockpile, no attachments.
    pub fn reset(&mut self) {
        self.set_damage(0);
        match &mut self.detail {
            FacilityDetail::Headquarters => {}
            FacilityDetail::SupplyDepot(depot) => depot.clear_stockpile(),
            FacilityDetail::Airbase(airbase) => airbase.clear(),
        }
    }
}
