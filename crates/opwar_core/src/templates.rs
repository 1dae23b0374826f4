//! Unit templates: baseline configurations units are spawned from.
//!
//! Templates are content data, written in RON:
//!
//! ```ron
//! {
//!     "T-80B Tank Regiment": (
//!         name: "T-80B Tank Regiment",
//!         classification: Tank,
//!         max_hit_points: 40.0,
//!         max_days_supply: 7.0,
//!         max_movement_points: 12.0,
//!         deployed_profile: "TANK_T80B",
//!     ),
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::classification::{DeploymentPosition, Nationality, Side, UnitClassification, UnitRole};
use crate::constants::{
    INDIVIDUAL_MODIFIER_MAX_PERCENT, INDIVIDUAL_MODIFIER_MIN_PERCENT, MAX_DAYS_SUPPLY_LIMIT,
    MAX_HIT_POINTS_LIMIT, MAX_MOVEMENT_POINTS_LIMIT,
};
use crate::error::{GameError, Result};
use crate::facility::{DepotCategory, DepotSize};
use crate::ids::UnitIdAllocator;
use crate::math::{fixed_decimal_serde, Fixed};
use crate::unit::Unit;
use crate::weapons::{WeaponProfileDatabase, WeaponSystemId};

fn default_individual_modifier() -> i32 {
    100
}

/// Facility settings for base-kind templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FacilityConfig {
    /// Depot size. Ignored by other facility kinds.
    #[serde(default)]
    pub depot_size: DepotSize,
    /// Depot category. Ignored by other facility kinds.
    #[serde(default)]
    pub depot_category: DepotCategory,
    /// Whether the depot can push supply through enemy ZOC.
    #[serde(default)]
    pub supply_penetration: bool,
}

/// Baseline configuration of a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitConfig {
    /// Display name.
    pub name: String,
    /// Classification.
    pub classification: UnitClassification,
    /// Role.
    #[serde(default)]
    pub role: UnitRole,
    /// Side.
    #[serde(default)]
    pub side: Side,
    /// Nationality.
    #[serde(default)]
    pub nationality: Nationality,
    /// Maximum hit points.
    #[serde(with = "fixed_decimal_serde")]
    pub max_hit_points: Fixed,
    /// Maximum days of supply carried.
    #[serde(with = "fixed_decimal_serde")]
    pub max_days_supply: Fixed,
    /// Maximum movement points per turn.
    #[serde(with = "fixed_decimal_serde")]
    pub max_movement_points: Fixed,
    /// Profile used when deployed.
    pub deployed_profile: WeaponSystemId,
    /// Profile used while mounted (Mobile or Embarked), if any.
    #[serde(default)]
    pub mounted_profile: Option<WeaponSystemId>,
    /// Starting deployment position.
    #[serde(default)]
    pub deployment: DeploymentPosition,
    /// Individual combat modifier in percent.
    #[serde(default = "default_individual_modifier")]
    pub individual_modifier_percent: i32,
    /// Facility settings. Only valid for base kinds.
    #[serde(default)]
    pub facility: Option<FacilityConfig>,
}

impl UnitConfig {
    /// Create a config with neutral defaults.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        classification: UnitClassification,
        deployed_profile: WeaponSystemId,
    ) -> Self {
        Self {
            name: name.into(),
            classification,
            role: UnitRole::default(),
            side: Side::default(),
            nationality: Nationality::default(),
            max_hit_points: Fixed::from_num(40),
            max_days_supply: Fixed::from_num(7),
            max_movement_points: Fixed::from_num(10),
            deployed_profile,
            mounted_profile: None,
            deployment: DeploymentPosition::default(),
            individual_modifier_percent: default_individual_modifier(),
            facility: None,
        }
    }

    /// Builder method to set pool maxima.
    #[must_use]
    pub fn with_pools(mut self, hit_points: i32, days_supply: i32, movement_points: i32) -> Self {
        self.max_hit_points = Fixed::from_num(hit_points);
        self.max_days_supply = Fixed::from_num(days_supply);
        self.max_movement_points = Fixed::from_num(movement_points);
        self
    }

    /// Builder method to set the mounted profile.
    #[must_use]
    pub fn with_mounted_profile(mut self, profile: WeaponSystemId) -> Self {
        self.mounted_profile = Some(profile);
        self
    }

    /// Builder method to set the facility settings.
    #[must_use]
    pub fn with_facility(mut self, facility: FacilityConfig) -> Self {
        self.facility = Some(facility);
        self
    }

    /// Builder method to set side and nationality.
    #[must_use]
    pub fn with_side(mut self, side: Side, nationality: Nationality) -> Self {
        self.side = side;
        self.nationality = nationality;
        self
    }

    /// Builder method to set the starting deployment.
    #[must_use]
    pub fn with_deployment(mut self, deployment: DeploymentPosition) -> Self {
        self.deployment = deployment;
        self
    }

    /// Individual combat modifier as a fixed-point factor.
    #[must_use]
    pub fn individual_modifier(&self) -> Fixed {
        crate::math::percent(self.individual_modifier_percent)
    }

    /// Check the config against pool limits and the profile database.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] describing the first problem.
    pub fn validate<D: WeaponProfileDatabase + ?Sized>(&self, profiles: &D) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(GameError::Validation("unit name is empty".to_string()));
        }
        check_pool("hit points", self.max_hit_points, 1, MAX_HIT_POINTS_LIMIT)?;
        check_pool("days of supply", self.max_days_supply, 0, MAX_DAYS_SUPPLY_LIMIT)?;
        check_pool(
            "movement points",
            self.max_movement_points,
            0,
            MAX_MOVEMENT_POINTS_LIMIT,
        )?;

        if !(INDIVIDUAL_MODIFIER_MIN_PERCENT..=INDIVIDUAL_MODIFIER_MAX_PERCENT)
            .contains(&self.individual_modifier_percent)
        {
            return Err(GameError::Validation(format!(
                "individual modifier {}% outside {INDIVIDUAL_MODIFIER_MIN_PERCENT}-{INDIVIDUAL_MODIFIER_MAX_PERCENT}%",
                self.individual_modifier_percent
            )));
        }

        if !profiles.contains(&self.deployed_profile) {
            return Err(GameError::Validation(format!(
                "missing weapon profile '{}' for {}",
                self.deployed_profile, self.name
            )));
        }
        if let Some(mounted) = &self.mounted_profile {
            if !profiles.contains(mounted) {
                return Err(GameError::Validation(format!(
                    "missing mounted weapon profile '{mounted}' for {}",
                    self.name
                )));
            }
        }

        if self.facility.is_some() && !self.classification.is_base() {
            return Err(GameError::Validation(format!(
                "{} is a {}, which cannot carry facility settings",
                self.name, self.classification
            )));
        }
        Ok(())
    }
}

fn check_pool(label: &str, value: Fixed, min: i32, max: i32) -> Result<()> {
    if value < Fixed::from_num(min) || value > Fixed::from_num(max) {
        return Err(GameError::Validation(format!(
            "max {label} {value} outside {min}-{max}"
        )));
    }
    Ok(())
}

/// Named templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateLibrary {
    templates: BTreeMap<String, UnitConfig>,
}

impl TemplateLibrary {
    /// Create an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a template under `key`.
    pub fn insert(&mut self, key: impl Into<String>, config: UnitConfig) {
        self.templates.insert(key.into(), config);
    }

    /// Look up a template.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&UnitConfig> {
        self.templates.get(key)
    }

    /// Template keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Check if the library is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Parse a RON map of templates.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Data`] if the text is malformed.
    pub fn from_ron_str(source_name: &str, text: &str) -> Result<Self> {
        let templates: BTreeMap<String, UnitConfig> =
            ron::from_str(text).map_err(|e| GameError::Data {
                source_name: source_name.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { templates })
    }

    /// Validate every template, collecting failures by key.
    pub fn validate_all<D: WeaponProfileDatabase + ?Sized>(
        &self,
        profiles: &D,
    ) -> Vec<(String, GameError)> {
        self.templates
            .iter()
            .filter_map(|(key, config)| config.validate(profiles).err().map(|e| (key.clone(), e)))
            .collect()
    }

    /// Build a fresh unit from a template.
    ///
    /// # Errors
    ///
    /// - [`GameError::Reference`] if no template has that key.
    /// - Any construction error from [`Unit::new`].
    pub fn spawn<D: WeaponProfileDatabase + ?Sized>(
        &self,
        key: &str,
        profiles: &D,
        ids: &mut UnitIdAllocator,
    ) -> Result<Unit> {
        let config = self
            .get(key)
            .ok_or_else(|| GameError::Reference(format!("template:{key}")))?;
        Unit::new(config, profiles, ids)
    }
}
