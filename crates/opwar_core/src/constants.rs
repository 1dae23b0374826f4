//! Game-balance constants for unit state.
//!
//! Percent-valued constants are converted with [`crate::math::percent`].
//! Modifier tables favour eighths so their products stay exact in
//! fixed-point.

// ============================================================================
// Unit pools
// ============================================================================

/// Hit points at or below this value mark a unit as destroyed.
pub const DESTROYED_HIT_POINTS: i32 = 0;

/// Upper bound for a template's maximum hit points.
pub const MAX_HIT_POINTS_LIMIT: i32 = 1000;

/// Upper bound for a template's maximum days of supply.
pub const MAX_DAYS_SUPPLY_LIMIT: i32 = 30;

/// Upper bound for a template's maximum movement points.
pub const MAX_MOVEMENT_POINTS_LIMIT: i32 = 30;

/// Individual combat modifier bounds (percent).
pub const INDIVIDUAL_MODIFIER_MIN_PERCENT: i32 = 50;
/// Individual combat modifier bounds (percent).
pub const INDIVIDUAL_MODIFIER_MAX_PERCENT: i32 = 150;

// ============================================================================
// Action economy
// ============================================================================

/// Fraction of max movement spent by a combat action (percent).
pub const COMBAT_MOVEMENT_PERCENT: i32 = 25;
/// Fraction of max movement spent by an intel action (percent).
pub const INTEL_MOVEMENT_PERCENT: i32 = 15;
/// Fraction of max movement spent by a deployment change (percent).
pub const DEPLOY_MOVEMENT_PERCENT: i32 = 50;
/// Opportunity actions are reactive and spend no movement.
pub const OPPORTUNITY_MOVEMENT_PERCENT: i32 = 0;

/// Supply consumed by one combat action (percent of a day).
pub const COMBAT_SUPPLY_COST_PERCENT: i32 = 100;
/// Supply that must remain after a combat action (percent of a day).
pub const COMBAT_SUPPLY_THRESHOLD_PERCENT: i32 = 100;
/// Supply consumed by one move action.
pub const MOVE_SUPPLY_COST_PERCENT: i32 = 25;
/// Supply that must remain after a move action.
pub const MOVE_SUPPLY_THRESHOLD_PERCENT: i32 = 100;
/// Supply consumed by one intel action.
pub const INTEL_SUPPLY_COST_PERCENT: i32 = 25;
/// Supply that must remain after an intel action.
pub const INTEL_SUPPLY_THRESHOLD_PERCENT: i32 = 50;
/// Supply consumed by one opportunity action.
pub const OPPORTUNITY_SUPPLY_COST_PERCENT: i32 = 50;
/// Supply that must remain after an opportunity action.
pub const OPPORTUNITY_SUPPLY_THRESHOLD_PERCENT: i32 = 50;
/// Supply consumed by one deployment change.
pub const DEPLOY_SUPPLY_COST_PERCENT: i32 = 50;
/// Supply that must remain after a deployment change.
pub const DEPLOY_SUPPLY_THRESHOLD_PERCENT: i32 = 50;

// ============================================================================
// Combat modifiers
// ============================================================================

/// Hit-point fraction at or above which a unit fights at full strength.
pub const FULL_STRENGTH_FLOOR_PERCENT: i32 = 80;
/// Hit-point fraction at or above which a unit fights depleted.
pub const DEPLETED_STRENGTH_FLOOR_PERCENT: i32 = 40;

/// Strength modifier at full strength.
pub const STRENGTH_MOD_FULL_PERCENT: i32 = 100;
/// Strength modifier when depleted.
pub const STRENGTH_MOD_DEPLETED_PERCENT: i32 = 75;
/// Strength modifier below the depleted floor.
pub const STRENGTH_MOD_LOW_PERCENT: i32 = 50;

// ============================================================================
// Experience
// ============================================================================

/// Experience points needed to reach Green.
pub const GREEN_XP: u32 = 50;
/// Experience points needed to reach Trained.
pub const TRAINED_XP: u32 = 120;
/// Experience points needed to reach Experienced.
pub const EXPERIENCED_XP: u32 = 220;
/// Experience points needed to reach Veteran.
pub const VETERAN_XP: u32 = 350;
/// Experience points needed to reach Elite.
pub const ELITE_XP: u32 = 500;
/// Experience points cap.
pub const MAX_XP: u32 = 600;

// ============================================================================
// Facilities
// ============================================================================

/// Maximum facility damage.
pub const MAX_FACILITY_DAMAGE: i32 = 100;

/// Maximum number of aircraft attached to one airbase.
pub const MAX_AIR_UNITS: usize = 4;

/// Days of supply removed from a depot stockpile per delivery.
pub const SUPPLY_PER_DELIVERY: i32 = 5;

/// Floor applied to delivery effectiveness (percent).
pub const MIN_SUPPLY_EFFECTIVENESS_PERCENT: i32 = 10;

/// Efficiency lost at the edge of the projection radius (percent).
pub const DISTANCE_FALLOFF_PERCENT: i32 = 40;

/// Efficiency lost per enemy ZOC crossed (percent).
pub const ZOC_PENALTY_PERCENT: i32 = 30;

/// Maximum enemy ZOCs a penetrating depot can push supply through.
pub const MAX_ZOC_CROSSINGS: u32 = 2;

/// Maximum range of an air supply run from a main depot.
pub const AIR_SUPPLY_MAX_RANGE: u32 = 16;

/// Maximum range of a naval supply run from a main depot.
pub const NAVAL_SUPPLY_MAX_RANGE: u32 = 12;

// ============================================================================
// Leaders
// ============================================================================

/// Reputation needed for promotion to senior grade.
pub const SENIOR_GRADE_REPUTATION: u32 = 100;
/// Reputation needed for promotion to top grade.
pub const TOP_GRADE_REPUTATION: u32 = 300;
