//! Supply depot state: stockpile, generation and projection.
//!
//! The depot is a pure sub-machine. It receives the facility's current
//! [`OperationalCapacity`] as an argument and never reads unit state.

use serde::{Deserialize, Serialize};

use super::capacity::OperationalCapacity;
use crate::constants::{
    AIR_SUPPLY_MAX_RANGE, DISTANCE_FALLOFF_PERCENT, MAX_ZOC_CROSSINGS,
    MIN_SUPPLY_EFFECTIVENESS_PERCENT, NAVAL_SUPPLY_MAX_RANGE, SUPPLY_PER_DELIVERY,
    ZOC_PENALTY_PERCENT,
};
use crate::error::{GameError, Result};
use crate::math::{percent, Fixed};
use crate::stats::MaxCurrent;

/// Depot size tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum DepotSize {
    /// Forward supply point.
    #[default]
    Small,
    /// Divisional depot.
    Medium,
    /// Army depot.
    Large,
    /// Front depot.
    Huge,
}

impl DepotSize {
    /// Maximum stockpile in days of supply.
    #[must_use]
    pub const fn max_stockpile(self) -> i32 {
        match self {
            Self::Small => 30,
            Self::Medium => 50,
            Self::Large => 80,
            Self::Huge => 110,
        }
    }

    /// Default generation rate for a freshly built or upgraded depot.
    #[must_use]
    pub const fn default_generation(self) -> GenerationRate {
        match self {
            Self::Small => GenerationRate::Minimal,
            Self::Medium => GenerationRate::Basic,
            Self::Large => GenerationRate::Standard,
            Self::Huge => GenerationRate::Enhanced,
        }
    }

    /// Default projection radius for a freshly built or upgraded depot.
    #[must_use]
    pub const fn default_projection(self) -> ProjectionRadius {
        match self {
            Self::Small => ProjectionRadius::Local,
            Self::Medium => ProjectionRadius::Extended,
            Self::Large => ProjectionRadius::Regional,
            Self::Huge => ProjectionRadius::Strategic,
        }
    }

    /// Next tier up, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Small => Some(Self::Medium),
            Self::Medium => Some(Self::Large),
            Self::Large => Some(Self::Huge),
            Self::Huge => None,
        }
    }
}

/// Main depots can run air and naval supply; secondary depots cannot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DepotCategory {
    /// Theatre main depot.
    Main,
    /// Secondary depot.
    #[default]
    Secondary,
}

/// Days of supply a depot produces per turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum GenerationRate {
    /// 1 day per turn.
    #[default]
    Minimal,
    /// 2 days per turn.
    Basic,
    /// 3 days per turn.
    Standard,
    /// 4 days per turn.
    Enhanced,
}

impl GenerationRate {
    /// Days generated per turn at full capacity.
    #[must_use]
    pub fn days_per_turn(self) -> Fixed {
        Fixed::from_num(match self {
            Self::Minimal => 1,
            Self::Basic => 2,
            Self::Standard => 3,
            Self::Enhanced => 4,
        })
    }
}

/// How far a depot can push supply, in hexes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum ProjectionRadius {
    /// 4 hexes.
    #[default]
    Local,
    /// 6 hexes.
    Extended,
    /// 8 hexes.
    Regional,
    /// 10 hexes.
    Strategic,
}

impl ProjectionRadius {
    /// Radius in hexes.
    #[must_use]
    pub const fn hexes(self) -> u32 {
        match self {
            Self::Local => 4,
            Self::Extended => 6,
            Self::Regional => 8,
            Self::Strategic => 10,
        }
    }
}

/// Efficiency remaining after travelling `distance` of a `range`.
fn distance_factor(distance: u32, range: u32) -> Fixed {
    if range == 0 {
        return Fixed::ZERO;
    }
    let traveled = Fixed::from_num(distance) / Fixed::from_num(range);
    Fixed::ONE - traveled * percent(DISTANCE_FALLOFF_PERCENT)
}

/// Efficiency remaining after crossing `zocs` enemy zones of control.
fn zoc_factor(zocs: u32) -> Fixed {
    let penalty = Fixed::from_num(zocs) * percent(ZOC_PENALTY_PERCENT);
    (Fixed::ONE - penalty).max(Fixed::ZERO)
}

/// Delivery effectiveness, floored so a delivery is never worthless.
fn floored_effectiveness(raw: Fixed) -> Fixed {
    raw.max(percent(MIN_SUPPLY_EFFECTIVENESS_PERCENT))
}

/// Supply depot sub-state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyDepot {
    size: DepotSize,
    category: DepotCategory,
    stockpile: MaxCurrent,
    generation: GenerationRate,
    projection: ProjectionRadius,
    supply_penetration: bool,
}

impl SupplyDepot {
    /// Create a depot with a full stockpile and the size's defaults.
    #[must_use]
    pub fn new(size: DepotSize, category: DepotCategory) -> Self {
        Self {
            size,
            category,
            stockpile: MaxCurrent::from_int(size.max_stockpile()),
            generation: size.default_generation(),
            projection: size.default_projection(),
            supply_penetration: false,
        }
    }

    /// Restore a depot from persisted fields. The stockpile is re-clamped
    /// to the size-derived maximum.
    #[must_use]
    pub fn restore(
        size: DepotSize,
        category: DepotCategory,
        stockpile: Fixed,
        generation: GenerationRate,
        projection: ProjectionRadius,
        supply_penetration: bool,
    ) -> Self {
        Self {
            size,
            category,
            stockpile: MaxCurrent::with_current(Fixed::from_num(size.max_stockpile()), stockpile),
            generation,
            projection,
            supply_penetration,
        }
    }

    /// Size tier.
    #[must_use]
    pub const fn size(&self) -> DepotSize {
        self.size
    }

    /// Category.
    #[must_use]
    pub const fn category(&self) -> DepotCategory {
        self.category
    }

    /// Check if this is a main depot.
    #[must_use]
    pub fn is_main(&self) -> bool {
        self.category == DepotCategory::Main
    }

    /// Stockpile pool.
    #[must_use]
    pub const fn stockpile(&self) -> &MaxCurrent {
        &self.stockpile
    }

    /// Generation rate tier.
    #[must_use]
    pub const fn generation(&self) -> GenerationRate {
        self.generation
    }

    /// Projection radius tier.
    #[must_use]
    pub const fn projection(&self) -> ProjectionRadius {
        self.projection
    }

    /// Whether supply may be pushed through enemy ZOC.
    #[must_use]
    pub const fn supply_penetration(&self) -> bool {
        self.supply_penetration
    }

    /// Set the category.
    pub fn set_category(&mut self, category: DepotCategory) {
        self.category = category;
    }

    /// Enable or disable ZOC penetration.
    pub fn set_supply_penetration(&mut self, enabled: bool) {
        self.supply_penetration = enabled;
    }

    /// Set the generation rate tier.
    pub fn set_generation(&mut self, generation: GenerationRate) {
        self.generation = generation;
    }

    /// Set the projection radius tier.
    pub fn set_projection(&mut self, projection: ProjectionRadius) {
        self.projection = projection;
    }

    /// Empty the stockpile.
    pub fn clear_stockpile(&mut self) {
        self.stockpile.set_current(Fixed::ZERO);
    }

    /// Advance one size tier.
    ///
    /// The stockpile is refilled to the new maximum and generation and
    /// projection reset to the new tier's defaults. Returns `false` at the
    /// top tier.
    pub fn upgrade(&mut self) -> bool {
        let Some(next) = self.size.next() else {
            return false;
        };
        self.size = next;
        self.stockpile = MaxCurrent::from_int(next.max_stockpile());
        self.generation = next.default_generation();
        self.projection = next.default_projection();
        true
    }

    /// Check if a unit at `distance` behind `zocs` enemy ZOCs is in reach.
    #[must_use]
    pub fn can_supply_at(&self, capacity: OperationalCapacity, distance: u32, zocs: u32) -> bool {
        if !capacity.is_operational() {
            return false;
        }
        if distance > self.projection.hexes() {
            return false;
        }
        if zocs > 0 && (!self.supply_penetration || zocs > MAX_ZOC_CROSSINGS) {
            return false;
        }
        true
    }

    fn has_delivery_in_stock(&self) -> bool {
        self.stockpile.current() > Fixed::from_num(SUPPLY_PER_DELIVERY)
    }

    /// Deliver supply to a unit over land.
    ///
    /// Returns the days delivered, or zero when the unit is out of reach or
    /// the stockpile is at or below one delivery. The stockpile always
    /// drops by exactly [`SUPPLY_PER_DELIVERY`].
    pub fn supply_unit(&mut self, capacity: OperationalCapacity, distance: u32, zocs: u32) -> Fixed {
        if !self.can_supply_at(capacity, distance, zocs) || !self.has_delivery_in_stock() {
            return Fixed::ZERO;
        }

        let effectiveness = floored_effectiveness(
            distance_factor(distance, self.projection.hexes())
                * zoc_factor(zocs)
                * capacity.efficiency(),
        );
        self.deliver(effectiveness)
    }

    /// Deliver supply by air. Main depots only, no ZOC term.
    pub fn air_supply(&mut self, capacity: OperationalCapacity, distance: u32) -> Fixed {
        self.long_range_supply(capacity, distance, AIR_SUPPLY_MAX_RANGE)
    }

    /// Deliver supply by sea. Main depots only, no ZOC term.
    pub fn naval_supply(&mut self, capacity: OperationalCapacity, distance: u32) -> Fixed {
        self.long_range_supply(capacity, distance, NAVAL_SUPPLY_MAX_RANGE)
    }

    fn long_range_supply(
        &mut self,
        capacity: OperationalCapacity,
        distance: u32,
        max_range: u32,
    ) -> Fixed {
        if !self.is_main()
            || !capacity.is_operational()
            || distance > max_range
            || !self.has_delivery_in_stock()
        {
            return Fixed::ZERO;
        }

        let effectiveness =
            floored_effectiveness(distance_factor(distance, max_range) * capacity.efficiency());
        self.deliver(effectiveness)
    }

    fn deliver(&mut self, effectiveness: Fixed) -> Fixed {
        let per_delivery = Fixed::from_num(SUPPLY_PER_DELIVERY);
        self.stockpile.subtract(per_delivery);
        per_delivery * effectiveness
    }

    /// Produce one turn's supply, scaled by capacity. Returns days added.
    pub fn generate(&mut self, capacity: OperationalCapacity) -> Fixed {
        self.stockpile
            .add(self.generation.days_per_turn() * capacity.efficiency())
    }

    /// Add supply to the stockpile, saturating at the maximum.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] for negative amounts and
    /// [`GameError::Capacity`] when the stockpile is already full.
    pub fn add_supplies(&mut self, amount: Fixed) -> Result<Fixed> {
        if amount < Fixed::ZERO {
            return Err(GameError::Validation(format!(
                "cannot add negative supply ({amount})"
            )));
        }
        if self.stockpile.is_full() {
            return Err(GameError::Capacity("depot stockpile already full".to_string()));
        }
        Ok(self.stockpile.add(amount))
    }

    /// Remove supply from the stockpile. Returns the amount actually removed.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] for negative amounts.
    pub fn remove_supplies(&mut self, amount: Fixed) -> Result<Fixed> {
        if amount < Fixed::ZERO {
            return Err(GameError::Validation(format!(
                "cannot remove negative supply ({amount})"
            )));
        }
        Ok(self.stockpile.subtract(amount))
    }
}
