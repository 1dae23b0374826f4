//! Unit classification and the tiers that describe a unit's condition.
//!
//! This module is the single source of truth for "what kind of unit is
//! this": the classification enumeration, the per-classification action
//! allotment table, and the ordered tiers (deployment, efficiency,
//! experience) that feed the combat modifier composer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{ELITE_XP, EXPERIENCED_XP, GREEN_XP, TRAINED_XP, VETERAN_XP};

/// Fixed classification of a unit.
///
/// Ground kinds can entrench, air kinds fly, and the three base kinds carry
/// facility data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnitClassification {
    /// Main battle tank formation.
    Tank,
    /// Mechanized infantry (IFV-mounted).
    Mechanized,
    /// Motorized infantry (truck-mounted).
    Motorized,
    /// Foot infantry.
    Infantry,
    /// Airborne infantry.
    Airborne,
    /// Naval infantry.
    Marine,
    /// Anti-tank formation.
    AntiTank,
    /// Towed artillery.
    Artillery,
    /// Self-propelled artillery.
    SelfPropelledArtillery,
    /// Multiple rocket launchers.
    RocketArtillery,
    /// Towed or static air defense.
    AirDefense,
    /// Self-propelled air defense.
    SelfPropelledAirDefense,
    /// Ground reconnaissance.
    Reconnaissance,
    /// Combat engineers.
    Engineer,
    /// Special forces.
    SpecialForces,
    /// Attack helicopters.
    Helicopter,
    /// Fixed-wing air superiority fighters.
    Fighter,
    /// Fixed-wing ground attack aircraft.
    Attack,
    /// Fixed-wing bombers.
    Bomber,
    /// Fixed-wing reconnaissance aircraft.
    ReconAircraft,
    /// Headquarters base.
    Headquarters,
    /// Supply depot base.
    SupplyDepot,
    /// Airbase.
    Airbase,
}

/// Facility kind for base-type classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacilityKind {
    /// Headquarters.
    Headquarters,
    /// Supply depot.
    SupplyDepot,
    /// Airbase.
    Airbase,
}

/// Initial maximum of each per-turn action pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionAllotment {
    /// Move actions.
    pub moves: u8,
    /// Combat actions.
    pub combat: u8,
    /// Deployment-change actions.
    pub deploy: u8,
    /// Opportunity (reactive) actions.
    pub opportunity: u8,
    /// Intelligence-gathering actions.
    pub intel: u8,
}

impl ActionAllotment {
    /// One of everything.
    pub const STANDARD: Self = Self {
        moves: 1,
        combat: 1,
        deploy: 1,
        opportunity: 1,
        intel: 1,
    };

    /// Reconnaissance: an extra move action.
    pub const RECON: Self = Self {
        moves: 2,
        ..Self::STANDARD
    };

    /// Air defense: an extra opportunity action.
    pub const AIR_DEFENSE: Self = Self {
        opportunity: 2,
        ..Self::STANDARD
    };

    /// Fixed-wing aircraft: two extra moves, no deployment changes.
    pub const FIXED_WING: Self = Self {
        moves: 3,
        deploy: 0,
        ..Self::STANDARD
    };

    /// Facilities never act.
    pub const NONE: Self = Self {
        moves: 0,
        combat: 0,
        deploy: 0,
        opportunity: 0,
        intel: 0,
    };
}

impl UnitClassification {
    /// Every classification, in declaration order.
    pub const ALL: [Self; 23] = [
        Self::Tank,
        Self::Mechanized,
        Self::Motorized,
        Self::Infantry,
        Self::Airborne,
        Self::Marine,
        Self::AntiTank,
        Self::Artillery,
        Self::SelfPropelledArtillery,
        Self::RocketArtillery,
        Self::AirDefense,
        Self::SelfPropelledAirDefense,
        Self::Reconnaissance,
        Self::Engineer,
        Self::SpecialForces,
        Self::Helicopter,
        Self::Fighter,
        Self::Attack,
        Self::Bomber,
        Self::ReconAircraft,
        Self::Headquarters,
        Self::SupplyDepot,
        Self::Airbase,
    ];

    /// Facility kind, if this is a base classification.
    #[must_use]
    pub const fn facility_kind(self) -> Option<FacilityKind> {
        match self {
            Self::Headquarters => Some(FacilityKind::Headquarters),
            Self::SupplyDepot => Some(FacilityKind::SupplyDepot),
            Self::Airbase => Some(FacilityKind::Airbase),
            _ => None,
        }
    }

    /// Check if this is a base (facility) classification.
    #[must_use]
    pub const fn is_base(self) -> bool {
        self.facility_kind().is_some()
    }

    /// Check if this unit flies.
    #[must_use]
    pub const fn is_air(self) -> bool {
        matches!(
            self,
            Self::Helicopter | Self::Fighter | Self::Attack | Self::Bomber | Self::ReconAircraft
        )
    }

    /// Check if this is a fixed-wing aircraft.
    #[must_use]
    pub const fn is_fixed_wing(self) -> bool {
        matches!(
            self,
            Self::Fighter | Self::Attack | Self::Bomber | Self::ReconAircraft
        )
    }

    /// Check if this classification may be attached to an airbase.
    #[must_use]
    pub const fn is_air_combat(self) -> bool {
        self.is_fixed_wing()
    }

    /// Check if this is a ground unit (not air, not a base).
    #[must_use]
    pub const fn is_ground(self) -> bool {
        !self.is_air() && !self.is_base()
    }

    /// Check if this is a reconnaissance classification.
    #[must_use]
    pub const fn is_reconnaissance(self) -> bool {
        matches!(self, Self::Reconnaissance)
    }

    /// Check if this is an air defense classification.
    #[must_use]
    pub const fn is_air_defense(self) -> bool {
        matches!(self, Self::AirDefense | Self::SelfPropelledAirDefense)
    }

    /// Initial per-turn action maxima for this classification.
    #[must_use]
    pub const fn action_allotment(self) -> ActionAllotment {
        match self {
            Self::Reconnaissance => ActionAllotment::RECON,
            Self::AirDefense | Self::SelfPropelledAirDefense => ActionAllotment::AIR_DEFENSE,
            Self::Fighter | Self::Attack | Self::Bomber | Self::ReconAircraft => {
                ActionAllotment::FIXED_WING
            }
            Self::Headquarters | Self::SupplyDepot | Self::Airbase => ActionAllotment::NONE,
            _ => ActionAllotment::STANDARD,
        }
    }
}

impl fmt::Display for UnitClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Battlefield role of a unit, independent of its classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitRole {
    /// Front-line manoeuvre unit.
    #[default]
    GroundCombat,
    /// Fire support and combat support.
    GroundSupport,
    /// Reconnaissance and screening.
    Reconnaissance,
    /// Air superiority.
    AirSuperiority,
    /// Air-to-ground strike.
    AirStrike,
    /// Air defense coverage.
    AirDefense,
    /// Logistics and command.
    Logistics,
}

/// Which player controls the unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Side {
    /// Human player.
    #[default]
    Player,
    /// Computer opponent.
    Ai,
}

/// Nationality of the unit's parent formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Nationality {
    /// Soviet Union.
    #[default]
    Ussr,
    /// United States.
    Usa,
    /// West Germany.
    Frg,
    /// United Kingdom.
    Uk,
    /// France.
    Fra,
    /// Mujahideen.
    Mj,
    /// Iran.
    Ir,
    /// Iraq.
    Iq,
    /// Saudi Arabia.
    Saud,
}

/// Posture of a unit on the map, in ladder order.
///
/// Changes move one step at a time; see
/// [`crate::unit::Unit::change_deployment_position`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum DeploymentPosition {
    /// Loaded on transport.
    Embarked,
    /// Mounted and ready to move.
    Mobile,
    /// Dismounted and deployed.
    #[default]
    Deployed,
    /// Hasty defensive positions.
    HastyDefense,
    /// Dug in.
    Entrenched,
    /// Prepared fortifications.
    Fortified,
}

impl DeploymentPosition {
    /// Ladder in ascending order.
    pub const LADDER: [Self; 6] = [
        Self::Embarked,
        Self::Mobile,
        Self::Deployed,
        Self::HastyDefense,
        Self::Entrenched,
        Self::Fortified,
    ];

    /// Position on the ladder.
    #[must_use]
    pub const fn rank(self) -> usize {
        self as usize
    }

    /// Check if two positions are adjacent ladder rungs.
    #[must_use]
    pub const fn is_adjacent_to(self, other: Self) -> bool {
        self.rank().abs_diff(other.rank()) == 1
    }

    /// Check if the unit rides its transport in this position.
    #[must_use]
    pub const fn is_mounted(self) -> bool {
        matches!(self, Self::Embarked | Self::Mobile)
    }
}

/// Organizational readiness tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum EfficiencyLevel {
    /// Barely holding together.
    StaticOperations,
    /// Degraded.
    DegradedOperations,
    /// Normal readiness.
    NormalOperations,
    /// Full readiness.
    #[default]
    FullOperations,
}

/// Combat experience tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum ExperienceLevel {
    /// No experience.
    #[default]
    Raw,
    /// Some exposure.
    Green,
    /// Fully trained.
    Trained,
    /// Combat experienced.
    Experienced,
    /// Veterans.
    Veteran,
    /// Elite.
    Elite,
}

impl ExperienceLevel {
    /// Level reached with the given experience points.
    #[must_use]
    pub const fn from_points(points: u32) -> Self {
        if points >= ELITE_XP {
            Self::Elite
        } else if points >= VETERAN_XP {
            Self::Veteran
        } else if points >= EXPERIENCED_XP {
            Self::Experienced
        } else if points >= TRAINED_XP {
            Self::Trained
        } else if points >= GREEN_XP {
            Self::Green
        } else {
            Self::Raw
        }
    }

    /// Minimum experience points for this level.
    #[must_use]
    pub const fn min_points(self) -> u32 {
        match self {
            Self::Raw => 0,
            Self::Green => GREEN_XP,
            Self::Trained => TRAINED_XP,
            Self::Experienced => EXPERIENCED_XP,
            Self::Veteran => VETERAN_XP,
            Self::Elite => ELITE_XP,
        }
    }
}
