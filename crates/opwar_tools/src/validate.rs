//! Data validation utilities.

use std::collections::BTreeSet;
use std::path::Path;

use opwar_core::error::GameError;
use opwar_core::ids::UnitIdAllocator;
use opwar_core::weapons::WeaponSystemId;
use tracing::{debug, warn};

use crate::data::DataSet;
use crate::error::Result;

/// A template that failed to validate or build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFailure {
    /// Template key.
    pub key: String,
    /// Why it failed.
    pub error: GameError,
}

/// Outcome of validating a data set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Number of weapon profiles loaded.
    pub profiles: usize,
    /// Number of templates checked.
    pub templates: usize,
    /// Profiles no template references.
    pub unused_profiles: Vec<WeaponSystemId>,
    /// Templates that failed.
    pub failures: Vec<TemplateFailure>,
}

impl ValidationReport {
    /// Check if every template built.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Validate every template and build each one through unit construction.
///
/// Unused profiles are reported but do not fail validation.
#[must_use]
pub fn validate_data(data: &DataSet) -> ValidationReport {
    let mut failures: Vec<TemplateFailure> = data
        .templates
        .validate_all(&data.profiles)
        .into_iter()
        .map(|(key, error)| TemplateFailure { key, error })
        .collect();

    let mut ids = UnitIdAllocator::new();
    let mut referenced = BTreeSet::new();
    for key in data.templates.keys() {
        if failures.iter().any(|f| f.key == key) {
            continue;
        }
        match data.templates.spawn(key, &data.profiles, &mut ids) {
            Ok(unit) => {
                debug!(template = key, unit = %unit.id(), "Template builds");
                let template = unit.template();
                referenced.insert(template.deployed_profile.clone());
                if let Some(mounted) = &template.mounted_profile {
                    referenced.insert(mounted.clone());
                }
            }
            Err(error) => failures.push(TemplateFailure {
                key: key.to_string(),
                error,
            }),
        }
    }

    let unused_profiles: Vec<WeaponSystemId> = data
        .profiles
        .iter()
        .map(|p| p.id.clone())
        .filter(|id| !referenced.contains(id))
        .collect();
    for id in &unused_profiles {
        warn!(profile = %id, "Weapon profile is not used by any template");
    }

    ValidationReport {
        profiles: data.profiles.len(),
        templates: data.templates.len(),
        unused_profiles,
        failures,
    }
}

/// Validate all RON data files in a directory.
///
/// # Errors
///
/// Returns an error if a data file cannot be read or parsed. Template
/// failures are reported in the returned [`ValidationReport`].
pub fn validate_data_directory(path: &Path) -> Result<ValidationReport> {
    let data = DataSet::load(path)?;
    Ok(validate_data(&data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use opwar_test_utils::fixtures::SAMPLE_PROFILES_RON;

    const TEMPLATES: &str = r#"{
        "tank": (
            name: "Tank Regiment",
            classification: Tank,
            max_hit_points: 40.0,
            max_days_supply: 7.0,
            max_movement_points: 12.0,
            deployed_profile: "TANK_T80B",
        ),
        "ghost": (
            name: "Ghost Regiment",
            classification: Tank,
            max_hit_points: 40.0,
            max_days_supply: 7.0,
            max_movement_points: 12.0,
            deployed_profile: "TANK_M1",
        ),
        "overloaded": (
            name: "Overloaded Regiment",
            classification: Infantry,
            max_hit_points: 40.0,
            max_days_supply: 45.0,
            max_movement_points: 6.0,
            deployed_profile: "INF_MR",
        ),
        "tank_with_depot": (
            name: "Confused Regiment",
            classification: Tank,
            max_hit_points: 40.0,
            max_days_supply: 7.0,
            max_movement_points: 12.0,
            deployed_profile: "TANK_T80B",
            facility: Some((depot_size: Large)),
        ),
    }"#;

    fn report() -> ValidationReport {
        let data = DataSet::from_sources(SAMPLE_PROFILES_RON, TEMPLATES).unwrap();
        validate_data(&data)
    }

    #[test]
    fn test_failures_are_collected_by_key() {
        let report = report();
        assert!(!report.is_ok());
        assert_eq!(report.templates, 4);

        let keys: Vec<&str> = report.failures.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, ["ghost", "overloaded", "tank_with_depot"]);
        assert!(report
            .failures
            .iter()
            .all(|f| matches!(f.error, GameError::Validation(_))));
    }

    #[test]
    fn test_unused_profiles_reported() {
        let report = report();
        assert!(report
            .unused_profiles
            .iter()
            .any(|id| id.as_str() == "FGT_MIG29"));
        assert!(!report
            .unused_profiles
            .iter()
            .any(|id| id.as_str() == "TANK_T80B"));
    }

    #[test]
    fn test_empty_data_is_valid() {
        let data = DataSet::from_sources("[]", "{}").unwrap();
        let report = validate_data(&data);
        assert!(report.is_ok());
        assert_eq!(report.profiles, 0);
    }
}
