//! Weapon-system profiles and the read-only profile database.
//!
//! Profiles are immutable combat-stat records looked up by an opaque
//! [`WeaponSystemId`]. The core never mutates the database; units hold
//! only profile identifiers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};

/// Opaque identifier of a weapon-system profile (e.g. `"TANK_T80B"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeaponSystemId(String);

impl WeaponSystemId {
    /// Create a new profile identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WeaponSystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Broad weapon category, derived from the profile identifier prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponCategory {
    /// Tanks and assault guns.
    Armor,
    /// IFVs, APCs and infantry weapons.
    Infantry,
    /// Tube and rocket artillery.
    Artillery,
    /// Anti-tank systems.
    AntiTank,
    /// Guns and missiles against aircraft.
    AirDefense,
    /// Rotary-wing aircraft.
    Helicopter,
    /// Fixed-wing aircraft.
    Aircraft,
    /// Base installations.
    Facility,
    /// Anything without a recognised prefix.
    Generic,
}

/// Prefix → category lookup. First match wins, so longer prefixes that
/// share a stem must come first.
const PREFIX_TABLE: &[(&str, WeaponCategory)] = &[
    ("TANK_", WeaponCategory::Armor),
    ("IFV_", WeaponCategory::Infantry),
    ("APC_", WeaponCategory::Infantry),
    ("INF_", WeaponCategory::Infantry),
    ("RCN_", WeaponCategory::Infantry),
    ("SPA_", WeaponCategory::Artillery),
    ("ART_", WeaponCategory::Artillery),
    ("ROC_", WeaponCategory::Artillery),
    ("AT_", WeaponCategory::AntiTank),
    ("SPSAM_", WeaponCategory::AirDefense),
    ("SAM_", WeaponCategory::AirDefense),
    ("AAA_", WeaponCategory::AirDefense),
    ("HEL_", WeaponCategory::Helicopter),
    ("FGT_", WeaponCategory::Aircraft),
    ("ATT_", WeaponCategory::Aircraft),
    ("BMB_", WeaponCategory::Aircraft),
    ("RCNA_", WeaponCategory::Aircraft),
    ("FAC_", WeaponCategory::Facility),
];

impl WeaponCategory {
    /// Category for a profile identifier.
    #[must_use]
    pub fn from_profile_id(id: &WeaponSystemId) -> Self {
        PREFIX_TABLE
            .iter()
            .find(|(prefix, _)| id.as_str().starts_with(prefix))
            .map_or(Self::Generic, |(_, category)| *category)
    }
}

/// Immutable combat-stat record for one weapon system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponProfile {
    /// Profile identifier.
    pub id: WeaponSystemId,
    /// Display name.
    pub name: String,

    /// Attack against armored targets.
    #[serde(default)]
    pub hard_attack: i32,
    /// Defense against armored attackers.
    #[serde(default)]
    pub hard_defense: i32,
    /// Attack against soft targets.
    #[serde(default)]
    pub soft_attack: i32,
    /// Defense against soft attackers.
    #[serde(default)]
    pub soft_defense: i32,
    /// Ground-based attack against aircraft.
    #[serde(default)]
    pub ground_air_attack: i32,
    /// Defense against air attack.
    #[serde(default)]
    pub ground_air_defense: i32,

    /// Air-to-air rating.
    #[serde(default)]
    pub dogfighting: i32,
    /// Manoeuvrability (air units).
    #[serde(default)]
    pub maneuverability: i32,
    /// Top speed (air units).
    #[serde(default)]
    pub top_speed: i32,
    /// Survivability (air units).
    #[serde(default)]
    pub survivability: i32,
    /// Air-to-ground attack.
    #[serde(default)]
    pub ground_attack: i32,
    /// Ordinance load.
    #[serde(default)]
    pub ordinance_load: i32,
    /// Stealth rating.
    #[serde(default)]
    pub stealth: i32,
}

impl WeaponProfile {
    /// Create a profile with all ratings at zero.
    #[must_use]
    pub fn new(id: WeaponSystemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            hard_attack: 0,
            hard_defense: 0,
            soft_attack: 0,
            soft_defense: 0,
            ground_air_attack: 0,
            ground_air_defense: 0,
            dogfighting: 0,
            maneuverability: 0,
            top_speed: 0,
            survivability: 0,
            ground_attack: 0,
            ordinance_load: 0,
            stealth: 0,
        }
    }

    /// Builder method to set the ground ratings.
    #[must_use]
    pub fn with_ground_ratings(
        mut self,
        hard_attack: i32,
        hard_defense: i32,
        soft_attack: i32,
        soft_defense: i32,
    ) -> Self {
        self.hard_attack = hard_attack;
        self.hard_defense = hard_defense;
        self.soft_attack = soft_attack;
        self.soft_defense = soft_defense;
        self
    }

    /// Builder method to set the anti-air ratings.
    #[must_use]
    pub fn with_air_defense(mut self, ground_air_attack: i32, ground_air_defense: i32) -> Self {
        self.ground_air_attack = ground_air_attack;
        self.ground_air_defense = ground_air_defense;
        self
    }

    /// Builder method to set the aircraft ratings.
    #[must_use]
    pub fn with_air_ratings(
        mut self,
        dogfighting: i32,
        maneuverability: i32,
        top_speed: i32,
        survivability: i32,
        ground_attack: i32,
        ordinance_load: i32,
        stealth: i32,
    ) -> Self {
        self.dogfighting = dogfighting;
        self.maneuverability = maneuverability;
        self.top_speed = top_speed;
        self.survivability = survivability;
        self.ground_attack = ground_attack;
        self.ordinance_load = ordinance_load;
        self.stealth = stealth;
        self
    }

    /// Category derived from the identifier prefix.
    #[must_use]
    pub fn category(&self) -> WeaponCategory {
        WeaponCategory::from_profile_id(&self.id)
    }
}

/// Read-only lookup of weapon profiles.
pub trait WeaponProfileDatabase {
    /// Look up a profile by identifier.
    fn profile(&self, id: &WeaponSystemId) -> Option<&WeaponProfile>;

    /// Check whether a profile exists.
    fn contains(&self, id: &WeaponSystemId) -> bool {
        self.profile(id).is_some()
    }
}

/// In-memory profile database.
///
/// Profiles are stored in a `BTreeMap` so iteration order is stable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileRegistry {
    profiles: BTreeMap<WeaponSystemId, WeaponProfile>,
}

impl ProfileRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a profile, replacing any previous profile with the same ID.
    pub fn register(&mut self, profile: WeaponProfile) {
        self.profiles.insert(profile.id.clone(), profile);
    }

    /// Number of registered profiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Iterate all profiles in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &WeaponProfile> {
        self.profiles.values()
    }

    /// Parse a RON list of profiles.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Data`] if the text is not a valid profile list,
    /// or [`GameError::Validation`] on duplicate identifiers.
    pub fn from_ron_str(source_name: &str, text: &str) -> Result<Self> {
        let profiles: Vec<WeaponProfile> = ron::from_str(text).map_err(|e| GameError::Data {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

        let mut registry = Self::new();
        for profile in profiles {
            if registry.contains(&profile.id) {
                return Err(GameError::Validation(format!(
                    "duplicate weapon profile '{}' in {source_name}",
                    profile.id
                )));
            }
            registry.register(profile);
        }
        Ok(registry)
    }
}

impl WeaponProfileDatabase for ProfileRegistry {
    fn profile(&self, id: &WeaponSystemId) -> Option<&WeaponProfile> {
        self.profiles.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_table() {
        let cases = [
            ("TANK_T80B", WeaponCategory::Armor),
            ("SPSAM_SA8", WeaponCategory::AirDefense),
            ("SAM_SA2", WeaponCategory::AirDefense),
            ("RCNA_MIG25R", WeaponCategory::Aircraft),
            ("RCN_BRDM2", WeaponCategory::Infantry),
            ("FGT_MIG29", WeaponCategory::Aircraft),
            ("FAC_DEPOT", WeaponCategory::Facility),
            ("MYSTERY", WeaponCategory::Generic),
        ];
        for (id, expected) in cases {
            assert_eq!(
                WeaponCategory::from_profile_id(&WeaponSystemId::new(id)),
                expected,
                "prefix lookup for {id}"
            );
        }
    }

    #[test]
    fn test_registry_lookup() {
        let mut registry = ProfileRegistry::new();
        let id = WeaponSystemId::new("TANK_T80B");
        registry.register(WeaponProfile::new(id.clone(), "T-80B").with_ground_ratings(18, 16, 8, 10));

        assert!(registry.contains(&id));
        assert_eq!(registry.profile(&id).map(|p| p.hard_attack), Some(18));
        assert!(registry.profile(&WeaponSystemId::new("TANK_M1")).is_none());
    }

    #[test]
    fn test_registry_from_ron() {
        let text = r#"[
            (id: "INF_MR", name: "Motor Rifle", soft_attack: 9, soft_defense: 8),
            (id: "FGT_MIG29", name: "MiG-29", dogfighting: 14, ordinance_load: 4),
        ]"#;
        let registry = ProfileRegistry::from_ron_str("profiles.ron", text).unwrap();
        assert_eq!(registry.len(), 2);
        let mig = registry.profile(&WeaponSystemId::new("FGT_MIG29")).unwrap();
        assert_eq!(mig.dogfighting, 14);
        assert_eq!(mig.hard_attack, 0);
    }

    #[test]
    fn test_registry_rejects_duplicates() {
        let text = r#"[
            (id: "INF_MR", name: "Motor Rifle"),
            (id: "INF_MR", name: "Motor Rifle (again)"),
        ]"#;
        let err = ProfileRegistry::from_ron_str("profiles.ron", text).unwrap_err();
        assert!(matches!(err, GameError::Validation(_)));
    }

    #[test]
    fn test_registry_reports_parse_errors() {
        let err = ProfileRegistry::from_ron_str("broken.ron", "[(id: ").unwrap_err();
        assert!(matches!(err, GameError::Data { .. }));
    }
}
