//! Spawn a template and dump the resulting unit.

use opwar_core::ids::UnitIdAllocator;
use opwar_core::persistence::UnitRecord;
use tracing::info;

use crate::data::DataSet;
use crate::error::{Result, ToolError};

/// How to print the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty RON, the save format.
    #[default]
    Ron,
    /// Pretty JSON.
    Json,
}

/// Build the template `key` and return its save record.
///
/// # Errors
///
/// Returns [`ToolError::Game`] if the template is unknown or fails to build.
pub fn spawn_record(data: &DataSet, key: &str) -> Result<UnitRecord> {
    let mut ids = UnitIdAllocator::new();
    let unit = data.templates.spawn(key, &data.profiles, &mut ids)?;
    let actions = unit.available_actions();
    info!(
        template = key,
        classification = %unit.classification(),
        profile = %unit.active_profile_id(),
        moves = actions.moves,
        combat = actions.combat,
        "Spawned template"
    );
    Ok(unit.to_record())
}

/// Build the template `key` and encode its save record.
///
/// # Errors
///
/// - [`ToolError::Game`] if the template is unknown or fails to build.
/// - [`ToolError::Encode`] if the record cannot be encoded.
pub fn inspect_template(data: &DataSet, key: &str, format: OutputFormat) -> Result<String> {
    let record = spawn_record(data, key)?;
    match format {
        OutputFormat::Ron => {
            ron::ser::to_string_pretty(&record, ron::ser::PrettyConfig::default())
                .map_err(|e| ToolError::Encode(e.to_string()))
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(&record).map_err(|e| ToolError::Encode(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opwar_core::error::GameError;
    use opwar_test_utils::fixtures::SAMPLE_PROFILES_RON;

    const TEMPLATES: &str = r#"{
        "depot": (
            name: "Forward Supply Point",
            classification: SupplyDepot,
            max_hit_points: 30.0,
            max_days_supply: 0.0,
            max_movement_points: 0.0,
            deployed_profile: "FAC_DEPOT",
            facility: Some((depot_size: Medium, depot_category: Main)),
        ),
    }"#;

    fn data() -> DataSet {
        DataSet::from_sources(SAMPLE_PROFILES_RON, TEMPLATES).unwrap()
    }

    #[test]
    fn test_record_is_a_fresh_unit() {
        let record = spawn_record(&data(), "depot").unwrap();
        assert!(record.hit_points.is_full());
        assert!(record.leader.is_none());

        let depot = record.facility.unwrap().depot.unwrap();
        assert_eq!(depot.stockpile, opwar_core::math::Fixed::from_num(50));
    }

    #[test]
    fn test_ron_output_reads_back() {
        let text = inspect_template(&data(), "depot", OutputFormat::Ron).unwrap();
        let record: UnitRecord = ron::from_str(&text).unwrap();
        assert_eq!(record, spawn_record(&data(), "depot").unwrap());
    }

    #[test]
    fn test_json_output() {
        let text = inspect_template(&data(), "depot", OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["template"]["name"], "Forward Supply Point");
        assert_eq!(value["facility"]["damage"], 0);
    }

    #[test]
    fn test_unknown_template() {
        let err = inspect_template(&data(), "battleship", OutputFormat::Ron).unwrap_err();
        assert!(matches!(err, ToolError::Game(GameError::Reference(_))));
    }
}
