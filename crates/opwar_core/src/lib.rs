//! # Opwar Core
//!
//! Unit-state core for an operational wargame.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No randomness
//! - No floating-point math in game state (uses fixed-point)
//!
//! Maps, pathfinding and AI live elsewhere. Distances and movement costs
//! arrive here as plain numbers.
//!
//! ## Crate Structure
//!
//! - [`stats`] - Bounded resource pools
//! - [`actions`] - Per-turn action economy
//! - [`modifiers`] - Combat modifier composition
//! - [`facility`] - Headquarters, supply depots and airbases
//! - [`leader`] - Leaders and the leader directory
//! - [`unit`] - The unit itself
//! - [`registry`] - ID-keyed unit ownership and reference resolution
//! - [`templates`] - Unit templates loaded from RON
//! - [`persistence`] - Save records
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod actions;
pub mod classification;
pub mod constants;
pub mod error;
pub mod events;
pub mod facility;
pub mod ids;
pub mod leader;
pub mod math;
pub mod modifiers;
pub mod persistence;
pub mod registry;
pub mod stats;
pub mod templates;
pub mod unit;
pub mod weapons;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::actions::{ActionBlocked, ActionKind, ActionPools, AvailableActions};
    pub use crate::classification::{
        DeploymentPosition, EfficiencyLevel, ExperienceLevel, FacilityKind, Nationality, Side,
        UnitClassification, UnitRole,
    };
    pub use crate::error::{GameError, Result};
    pub use crate::events::{MessageLog, NotificationSink, NullSink, UnitEvent};
    pub use crate::facility::{
        Airbase, DepotCategory, DepotSize, FacilityData, FacilityDetail, GenerationRate,
        OperationalCapacity, ProjectionRadius, SupplyDepot,
    };
    pub use crate::ids::{LeaderId, UnitId, UnitIdAllocator};
    pub use crate::leader::{
        CommandAbility, CommandGrade, Leader, LeaderBonus, LeaderCapability, LeaderDirectory,
        LeaderRoster, ReputationAction,
    };
    pub use crate::math::Fixed;
    pub use crate::modifiers::{CombatConditions, CombatStrength};
    pub use crate::persistence::{UnitRecord, UnitSave};
    pub use crate::registry::{ReferenceDirectory, UnitRegistry};
    pub use crate::stats::MaxCurrent;
    pub use crate::templates::{FacilityConfig, TemplateLibrary, UnitConfig};
    pub use crate::unit::Unit;
    pub use crate::weapons::{
        ProfileRegistry, WeaponCategory, WeaponProfile, WeaponProfileDatabase, WeaponSystemId,
    };
}
