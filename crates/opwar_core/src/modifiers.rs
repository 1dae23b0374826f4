//! Combat modifier composition.
//!
//! The final modifier is the product of five factors:
//!
//! ```text
//! strength × combat_state × efficiency × experience × individual
//! ```
//!
//! Air units drop the combat-state factor; deployment means nothing in the
//! air. Table values are multiples of 1/8 so products are exact.

use serde::{Deserialize, Serialize};

use crate::classification::{DeploymentPosition, EfficiencyLevel, ExperienceLevel};
use crate::constants::{
    DEPLETED_STRENGTH_FLOOR_PERCENT, FULL_STRENGTH_FLOOR_PERCENT, STRENGTH_MOD_DEPLETED_PERCENT,
    STRENGTH_MOD_FULL_PERCENT, STRENGTH_MOD_LOW_PERCENT,
};
use crate::leader::LeaderBonus;
use crate::math::{percent, scale_rating, Fixed};
use crate::weapons::WeaponProfile;

fn eighths(n: i32) -> Fixed {
    Fixed::from_num(n) / Fixed::from_num(8)
}

/// Step function of the current/max hit-point fraction.
#[must_use]
pub fn strength_modifier(hit_point_fraction: Fixed) -> Fixed {
    if hit_point_fraction >= percent(FULL_STRENGTH_FLOOR_PERCENT) {
        percent(STRENGTH_MOD_FULL_PERCENT)
    } else if hit_point_fraction >= percent(DEPLETED_STRENGTH_FLOOR_PERCENT) {
        percent(STRENGTH_MOD_DEPLETED_PERCENT)
    } else {
        percent(STRENGTH_MOD_LOW_PERCENT)
    }
}

/// Posture factor for ground units.
#[must_use]
pub fn combat_state_modifier(position: DeploymentPosition) -> Fixed {
    eighths(match position {
        DeploymentPosition::Embarked => 4,
        DeploymentPosition::Mobile => 7,
        DeploymentPosition::Deployed => 8,
        DeploymentPosition::HastyDefense => 9,
        DeploymentPosition::Entrenched => 10,
        DeploymentPosition::Fortified => 12,
    })
}

/// Readiness factor.
#[must_use]
pub fn efficiency_modifier(level: EfficiencyLevel) -> Fixed {
    eighths(match level {
        EfficiencyLevel::StaticOperations => 4,
        EfficiencyLevel::DegradedOperations => 6,
        EfficiencyLevel::NormalOperations => 7,
        EfficiencyLevel::FullOperations => 8,
    })
}

/// Experience factor.
#[must_use]
pub fn experience_modifier(level: ExperienceLevel) -> Fixed {
    eighths(match level {
        ExperienceLevel::Raw => 6,
        ExperienceLevel::Green => 7,
        ExperienceLevel::Trained => 8,
        ExperienceLevel::Experienced => 9,
        ExperienceLevel::Veteran => 10,
        ExperienceLevel::Elite => 11,
    })
}

/// Everything about a unit's condition that feeds the modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatConditions {
    /// Current/max hit points.
    pub hit_point_fraction: Fixed,
    /// Deployment position.
    pub deployment: DeploymentPosition,
    /// Efficiency tier.
    pub efficiency: EfficiencyLevel,
    /// Experience tier.
    pub experience: ExperienceLevel,
    /// Per-unit override.
    pub individual: Fixed,
}

impl CombatConditions {
    /// Full composite for ground units.
    #[must_use]
    pub fn ground_modifier(&self) -> Fixed {
        self.air_modifier() * combat_state_modifier(self.deployment)
    }

    /// Composite without the combat-state factor.
    #[must_use]
    pub fn air_modifier(&self) -> Fixed {
        strength_modifier(self.hit_point_fraction)
            * efficiency_modifier(self.efficiency)
            * experience_modifier(self.experience)
            * self.individual
    }
}

/// Scenario-adjusted combat ratings. Transient, never persisted on a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CombatStrength {
    /// Attack against armour.
    pub hard_attack: i32,
    /// Defense against armour.
    pub hard_defense: i32,
    /// Attack against soft targets.
    pub soft_attack: i32,
    /// Defense against soft targets.
    pub soft_defense: i32,
    /// Ground-to-air attack.
    pub ground_air_attack: i32,
    /// Ground-to-air defense.
    pub ground_air_defense: i32,
    /// Air-to-air rating.
    pub dogfighting: i32,
    /// Passed through.
    pub maneuverability: i32,
    /// Passed through.
    pub top_speed: i32,
    /// Passed through.
    pub survivability: i32,
    /// Air-to-ground attack.
    pub ground_attack: i32,
    /// Ordinance load.
    pub ordinance_load: i32,
    /// Passed through.
    pub stealth: i32,
}

impl CombatStrength {
    /// Apply a modifier to a base profile and add leader bonuses.
    ///
    /// `bonus` returns the leader's additive bonus for a rating, zero when
    /// no leader is assigned. Results are never negative.
    #[must_use]
    pub fn compose(
        profile: &WeaponProfile,
        conditions: &CombatConditions,
        is_air: bool,
        bonus: impl Fn(LeaderBonus) -> i32,
    ) -> Self {
        let modifier = if is_air {
            conditions.air_modifier()
        } else {
            conditions.ground_modifier()
        };
        let scaled = |base: i32, kind: LeaderBonus| {
            scale_rating(base, modifier).saturating_add(bonus(kind)).max(0)
        };

        Self {
            hard_attack: scaled(profile.hard_attack, LeaderBonus::HardAttack),
            hard_defense: scaled(profile.hard_defense, LeaderBonus::HardDefense),
            soft_attack: scaled(profile.soft_attack, LeaderBonus::SoftAttack),
            soft_defense: scaled(profile.soft_defense, LeaderBonus::SoftDefense),
            ground_air_attack: scaled(profile.ground_air_attack, LeaderBonus::AirAttack),
            ground_air_defense: scaled(profile.ground_air_defense, LeaderBonus::AirDefense),
            dogfighting: scaled(profile.dogfighting, LeaderBonus::Dogfighting),
            maneuverability: profile.maneuverability,
            top_speed: profile.top_speed,
            survivability: profile.survivability,
            ground_attack: scaled(profile.ground_attack, LeaderBonus::GroundAttack),
            ordinance_load: scale_rating(profile.ordinance_load, conditions.air_modifier()),
            stealth: profile.stealth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weapons::WeaponSystemId;

    fn conditions() -> CombatConditions {
        CombatConditions {
            hit_point_fraction: Fixed::ONE,
            deployment: DeploymentPosition::Deployed,
            efficiency: EfficiencyLevel::FullOperations,
            experience: ExperienceLevel::Trained,
            individual: Fixed::ONE,
        }
    }

    fn no_bonus(_: LeaderBonus) -> i32 {
        0
    }

    // ========================================================================
    // Factor tables
    // ========================================================================

    #[test]
    fn test_strength_steps() {
        assert_eq!(strength_modifier(Fixed::ONE), Fixed::ONE);
        assert_eq!(strength_modifier(percent(80)), Fixed::ONE);
        assert_eq!(strength_modifier(percent(79)), Fixed::from_num(0.75));
        assert_eq!(strength_modifier(percent(40)), Fixed::from_num(0.75));
        assert_eq!(strength_modifier(percent(39)), Fixed::from_num(0.5));
        assert_eq!(strength_modifier(Fixed::ZERO), Fixed::from_num(0.5));
    }

    #[test]
    fn test_tables_are_ordered() {
        let mut last = Fixed::ZERO;
        for position in DeploymentPosition::LADDER {
            let value = combat_state_modifier(position);
            assert!(value > last, "{position:?}");
            last = value;
        }
        assert!(
            efficiency_modifier(EfficiencyLevel::StaticOperations)
                < efficiency_modifier(EfficiencyLevel::FullOperations)
        );
        assert!(experience_modifier(ExperienceLevel::Raw) < experience_modifier(ExperienceLevel::Elite));
    }

    #[test]
    fn test_neutral_conditions_compose_to_one() {
        assert_eq!(conditions().ground_modifier(), Fixed::ONE);
        assert_eq!(conditions().air_modifier(), Fixed::ONE);
    }

    #[test]
    fn test_air_modifier_ignores_deployment() {
        let mut c = conditions();
        c.deployment = DeploymentPosition::Embarked;
        assert_eq!(c.air_modifier(), Fixed::ONE);
        assert_eq!(c.ground_modifier(), Fixed::from_num(0.5));
    }

    // ========================================================================
    // Composed strength
    // ========================================================================

    #[test]
    fn test_ground_strength_scales_and_rounds_up() {
        let profile = WeaponProfile::new(WeaponSystemId::new("TANK_T72A"), "T-72A")
            .with_ground_ratings(10, 9, 5, 7);
        let mut c = conditions();
        c.deployment = DeploymentPosition::Mobile; // 0.875

        let strength = CombatStrength::compose(&profile, &c, false, no_bonus);
        assert_eq!(strength.hard_attack, 9); // 8.75
        assert_eq!(strength.hard_defense, 8); // 7.875
        assert_eq!(strength.soft_attack, 5); // 4.375
        assert_eq!(strength.soft_defense, 7); // 6.125
    }

    #[test]
    fn test_air_strength_pass_through_fields() {
        let profile = WeaponProfile::new(WeaponSystemId::new("FGT_MIG29"), "MiG-29")
            .with_air_ratings(12, 9, 8, 6, 4, 10, 2);
        let mut c = conditions();
        c.experience = ExperienceLevel::Elite; // 1.375
        c.deployment = DeploymentPosition::Embarked;

        let strength = CombatStrength::compose(&profile, &c, true, no_bonus);
        assert_eq!(strength.dogfighting, 17); // 16.5
        assert_eq!(strength.ordinance_load, 14); // 13.75
        assert_eq!(strength.maneuverability, 9);
        assert_eq!(strength.top_speed, 8);
        assert_eq!(strength.survivability, 6);
        assert_eq!(strength.stealth, 2);
    }

    #[test]
    fn test_leader_bonus_added_after_scaling() {
        let profile = WeaponProfile::new(WeaponSystemId::new("INF_MOTOR"), "Motor Rifles")
            .with_ground_ratings(4, 6, 8, 8);
        let strength = CombatStrength::compose(&profile, &conditions(), false, |kind| match kind {
            LeaderBonus::SoftAttack => 2,
            LeaderBonus::HardDefense => -10,
            _ => 0,
        });
        assert_eq!(strength.soft_attack, 10);
        assert_eq!(strength.hard_defense, 0);
        assert_eq!(strength.hard_attack, 4);
    }
}
