//! Test fixtures and helpers.
//!
//! Sample weapon profiles, unit templates and leaders, plus a small
//! [`SampleWorld`] that bundles them for scenario tests.

use fixed::types::I32F32;
use opwar_core::classification::{Nationality, Side, UnitClassification, UnitRole};
use opwar_core::facility::{DepotCategory, DepotSize};
use opwar_core::ids::{LeaderId, UnitId};
use opwar_core::leader::LeaderRoster;
use opwar_core::registry::UnitRegistry;
use opwar_core::templates::{FacilityConfig, TemplateLibrary, UnitConfig};
use opwar_core::unit::Unit;
use opwar_core::weapons::{ProfileRegistry, WeaponSystemId};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: Unit state never uses floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// Weapon profiles used by the sample templates, in RON.
pub const SAMPLE_PROFILES_RON: &str = r#"[
    (id: "TANK_T80B", name: "T-80B", hard_attack: 18, hard_defense: 16, soft_attack: 8, soft_defense: 10, ground_air_defense: 4),
    (id: "IFV_BMP2", name: "BMP-2", hard_attack: 8, hard_defense: 6, soft_attack: 12, soft_defense: 8, ground_air_attack: 2, ground_air_defense: 3),
    (id: "INF_MR", name: "Motor Rifle", hard_attack: 5, hard_defense: 4, soft_attack: 10, soft_defense: 12),
    (id: "RCN_BRDM2", name: "BRDM-2", hard_attack: 3, hard_defense: 3, soft_attack: 6, soft_defense: 4),
    (id: "HEL_MI24", name: "Mi-24", hard_attack: 14, soft_attack: 12, dogfighting: 2, ground_attack: 10, ordinance_load: 6),
    (id: "FGT_MIG29", name: "MiG-29", dogfighting: 16, maneuverability: 14, top_speed: 12, survivability: 8, ground_attack: 4, ordinance_load: 4, stealth: 2),
    (id: "FAC_HQ", name: "Headquarters", soft_defense: 4),
    (id: "FAC_DEPOT", name: "Supply Depot", soft_defense: 2),
    (id: "FAC_AIRBASE", name: "Airbase", soft_defense: 3, ground_air_attack: 4),
]"#;

/// Leaders for the sample roster, in RON.
pub const SAMPLE_LEADERS_RON: &str = r#"[
    (id: 1, name: "Konev", nationality: Ussr, ability: Good, bonuses: {HardAttack: 2, SoftAttack: 1}, capabilities: [Reconnaissance]),
    (id: 2, name: "Chuikov", nationality: Ussr, ability: Superior, bonuses: {HardDefense: 3}, capabilities: [Engineering, NightCombat]),
    (id: 3, name: "Pokryshkin", nationality: Ussr, bonuses: {Dogfighting: 3, AirAttack: 1}),
]"#;

/// Profile identifier shorthand.
#[must_use]
pub fn profile_id(id: &str) -> WeaponSystemId {
    WeaponSystemId::new(id)
}

/// Parse `text` as RON, panicking with the parse error on failure.
///
/// # Panics
///
/// Panics if `text` is not valid RON for `T`.
#[must_use]
pub fn parse_ron<T: DeserializeOwned>(text: &str) -> T {
    match ron::from_str(text) {
        Ok(value) => value,
        Err(e) => panic!("fixture RON failed to parse: {e}"),
    }
}

/// Write `value` as RON and read it back.
///
/// # Panics
///
/// Panics if either direction fails.
#[must_use]
pub fn ron_round_trip<T: Serialize + DeserializeOwned>(value: &T) -> T {
    let text = match ron::to_string(value) {
        Ok(text) => text,
        Err(e) => panic!("fixture RON failed to serialize: {e}"),
    };
    parse_ron(&text)
}

/// The sample profile database.
///
/// # Panics
///
/// Panics if [`SAMPLE_PROFILES_RON`] is malformed.
#[must_use]
pub fn sample_profiles() -> ProfileRegistry {
    match ProfileRegistry::from_ron_str("sample_profiles.ron", SAMPLE_PROFILES_RON) {
        Ok(profiles) => profiles,
        Err(e) => panic!("sample profiles invalid: {e}"),
    }
}

/// The sample leader roster, all unassigned.
///
/// # Panics
///
/// Panics if [`SAMPLE_LEADERS_RON`] is malformed.
#[must_use]
pub fn sample_roster() -> LeaderRoster {
    match LeaderRoster::from_ron_str("sample_leaders.ron", SAMPLE_LEADERS_RON) {
        Ok(roster) => roster,
        Err(e) => panic!("sample leaders invalid: {e}"),
    }
}

/// Leader shorthand.
#[must_use]
pub const fn leader(id: u32) -> LeaderId {
    LeaderId::new(id)
}

// ============================================================================
// Templates
// ============================================================================

/// T-80B tank regiment: 40 HP, 7 days supply, 12 MP.
#[must_use]
pub fn tank_config() -> UnitConfig {
    let mut config = UnitConfig::new(
        "1st Guards Tank Regiment",
        UnitClassification::Tank,
        profile_id("TANK_T80B"),
    )
    .with_pools(40, 7, 12)
    .with_side(Side::Player, Nationality::Ussr);
    config.role = UnitRole::GroundCombat;
    config
}

/// Motor rifle regiment that rides BMP-2s while mounted.
#[must_use]
pub fn mech_config() -> UnitConfig {
    UnitConfig::new(
        "47th Motor Rifle Regiment",
        UnitClassification::Mechanized,
        profile_id("INF_MR"),
    )
    .with_mounted_profile(profile_id("IFV_BMP2"))
    .with_pools(40, 7, 10)
    .with_side(Side::Player, Nationality::Ussr)
}

/// Reconnaissance battalion: two move actions.
#[must_use]
pub fn recon_config() -> UnitConfig {
    let mut config = UnitConfig::new(
        "7th Recon Battalion",
        UnitClassification::Reconnaissance,
        profile_id("RCN_BRDM2"),
    )
    .with_pools(20, 5, 16);
    config.role = UnitRole::Reconnaissance;
    config
}

/// Attack helicopter regiment.
#[must_use]
pub fn helicopter_config() -> UnitConfig {
    UnitConfig::new(
        "325th Helicopter Regiment",
        UnitClassification::Helicopter,
        profile_id("HEL_MI24"),
    )
    .with_pools(20, 4, 20)
}

/// Fighter regiment.
#[must_use]
pub fn fighter_config() -> UnitConfig {
    let mut config = UnitConfig::new(
        "33rd Fighter Regiment",
        UnitClassification::Fighter,
        profile_id("FGT_MIG29"),
    )
    .with_pools(24, 4, 30);
    config.role = UnitRole::AirSuperiority;
    config
}

/// Army headquarters.
#[must_use]
pub fn headquarters_config() -> UnitConfig {
    UnitConfig::new(
        "8th Guards Army HQ",
        UnitClassification::Headquarters,
        profile_id("FAC_HQ"),
    )
    .with_pools(20, 10, 0)
}

/// Supply depot of the given size and category.
#[must_use]
pub fn depot_config(size: DepotSize, category: DepotCategory) -> UnitConfig {
    let mut config = UnitConfig::new(
        format!("{size:?} {category:?} Depot"),
        UnitClassification::SupplyDepot,
        profile_id("FAC_DEPOT"),
    )
    .with_pools(30, 0, 0)
    .with_facility(FacilityConfig {
        depot_size: size,
        depot_category: category,
        supply_penetration: false,
    });
    config.role = UnitRole::Logistics;
    config
}

/// Forward airbase.
#[must_use]
pub fn airbase_config() -> UnitConfig {
    UnitConfig::new(
        "Wittstock Airbase",
        UnitClassification::Airbase,
        profile_id("FAC_AIRBASE"),
    )
    .with_pools(30, 10, 0)
}

/// Every sample template, keyed by a short name.
#[must_use]
pub fn sample_library() -> TemplateLibrary {
    let mut library = TemplateLibrary::new();
    library.insert("tank", tank_config());
    library.insert("mech", mech_config());
    library.insert("recon", recon_config());
    library.insert("helicopter", helicopter_config());
    library.insert("fighter", fighter_config());
    library.insert("hq", headquarters_config());
    library.insert(
        "depot",
        depot_config(DepotSize::Small, DepotCategory::Secondary),
    );
    library.insert(
        "main_depot",
        depot_config(DepotSize::Medium, DepotCategory::Main),
    );
    library.insert("airbase", airbase_config());
    library
}

// ============================================================================
// Sample world
// ============================================================================

/// Profiles, leaders and a unit registry wired together.
#[derive(Debug, Clone)]
pub struct SampleWorld {
    /// Weapon profiles.
    pub profiles: ProfileRegistry,
    /// Leader pool.
    pub leaders: LeaderRoster,
    /// Live units.
    pub registry: UnitRegistry,
}

impl SampleWorld {
    /// Create a world with the sample profiles and roster and no units.
    #[must_use]
    pub fn new() -> Self {
        Self {
            profiles: sample_profiles(),
            leaders: sample_roster(),
            registry: UnitRegistry::new(),
        }
    }

    /// Build a unit from `config` without registering it.
    ///
    /// # Panics
    ///
    /// Panics if the config fails validation.
    pub fn build(&mut self, config: &UnitConfig) -> Unit {
        match Unit::new(config, &self.profiles, self.registry.ids_mut()) {
            Ok(unit) => unit,
            Err(e) => panic!("fixture config '{}' invalid: {e}", config.name),
        }
    }

    /// Build and register a unit. Returns its ID.
    ///
    /// # Panics
    ///
    /// Panics if the config fails validation.
    pub fn spawn(&mut self, config: &UnitConfig) -> UnitId {
        let unit = self.build(config);
        let id = match self.registry.insert(unit) {
            Ok(id) => id,
            Err(e) => panic!("fixture insert failed: {e}"),
        };
        debug!(unit = %id, name = %config.name, "Spawned fixture unit");
        id
    }

    /// Registered unit.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not registered.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> &Unit {
        match self.registry.get(id) {
            Some(unit) => unit,
            None => panic!("no unit {id} in fixture world"),
        }
    }

    /// Registered unit, mutably.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not registered.
    pub fn unit_mut(&mut self, id: UnitId) -> &mut Unit {
        match self.registry.get_mut(id) {
            Some(unit) => unit,
            None => panic!("no unit {id} in fixture world"),
        }
    }
}

impl Default for SampleWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opwar_core::weapons::WeaponProfileDatabase;

    #[test]
    fn test_sample_content_is_valid() {
        let profiles = sample_profiles();
        let failures = sample_library().validate_all(&profiles);
        assert!(failures.is_empty(), "invalid templates: {failures:?}");
        assert!(profiles.contains(&profile_id("IFV_BMP2")));
    }

    #[test]
    fn test_sample_roster() {
        let roster = sample_roster();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.unassigned().count(), 3);
    }

    #[test]
    fn test_world_spawn_allocates_fresh_ids() {
        let mut world = SampleWorld::new();
        let a = world.spawn(&tank_config());
        let b = world.spawn(&tank_config());
        assert_ne!(a, b);
        assert_eq!(world.registry.len(), 2);
    }
}
