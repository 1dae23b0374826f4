//! Persisted unit records.
//!
//! A [`UnitRecord`] is the logical save schema of one unit. Facility fields
//! are written only for base kinds. Airbase attachments are written as ID
//! strings and turned back into attachments by
//! [`UnitRegistry::resolve_all_references`] once every unit is loaded.
//!
//! Records encode to RON for human-readable saves and to bincode for
//! compact ones.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::actions::ActionPools;
use crate::classification::{DeploymentPosition, EfficiencyLevel, ExperienceLevel, FacilityKind};
use crate::error::{GameError, Result};
use crate::facility::{
    Airbase, DepotCategory, DepotSize, FacilityData, FacilityDetail, GenerationRate,
    ProjectionRadius, SupplyDepot,
};
use crate::ids::{LeaderId, UnitId};
use crate::leader::LeaderDirectory;
use crate::math::{fixed_serde, Fixed};
use crate::registry::UnitRegistry;
use crate::stats::MaxCurrent;
use crate::templates::UnitConfig;
use crate::unit::{Unit, UnitParts};

/// Save format version. Bump on any schema change.
pub const SAVE_VERSION: u32 = 1;

/// Persisted depot fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepotRecord {
    /// Size tier.
    pub size: DepotSize,
    /// Category.
    pub category: DepotCategory,
    /// Stockpile on hand. The maximum comes from the size.
    #[serde(with = "fixed_serde")]
    pub stockpile: Fixed,
    /// Generation tier.
    pub generation: GenerationRate,
    /// Projection tier.
    pub projection: ProjectionRadius,
    /// ZOC penetration flag.
    pub supply_penetration: bool,
}

/// Persisted facility fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityRecord {
    /// Damage; the capacity tier is recomputed on load.
    pub damage: i32,
    /// Depot fields, for depots.
    pub depot: Option<DepotRecord>,
    /// Attached aircraft IDs, for airbases.
    pub attached_unit_ids: Vec<String>,
}

/// Logical save schema of one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    /// Unit ID.
    pub id: UnitId,
    /// Template, carrying name, classification, role, side, nationality
    /// and profiles.
    pub template: UnitConfig,
    /// Hit points.
    pub hit_points: MaxCurrent,
    /// Days of supply.
    pub supply: MaxCurrent,
    /// Movement points.
    pub movement: MaxCurrent,
    /// Action pools.
    pub actions: ActionPools,
    /// Deployment position.
    pub deployment: DeploymentPosition,
    /// Efficiency tier.
    pub efficiency: EfficiencyLevel,
    /// Experience tier.
    pub experience: ExperienceLevel,
    /// Experience points.
    pub experience_points: u32,
    /// Individual combat modifier.
    #[serde(with = "fixed_serde")]
    pub individual_modifier: Fixed,
    /// Assigned leader.
    pub leader: Option<LeaderId>,
    /// Facility fields; `None` for non-base units.
    pub facility: Option<FacilityRecord>,
}

fn facility_record(facility: &FacilityData) -> FacilityRecord {
    FacilityRecord {
        damage: facility.damage(),
        depot: facility.depot().map(|d| DepotRecord {
            size: d.size(),
            category: d.category(),
            stockpile: d.stockpile().current(),
            generation: d.generation(),
            projection: d.projection(),
            supply_penetration: d.supply_penetration(),
        }),
        attached_unit_ids: facility
            .airbase()
            .map(Airbase::persisted_ids)
            .unwrap_or_default(),
    }
}

fn restore_facility(id: UnitId, kind: FacilityKind, record: FacilityRecord) -> Result<FacilityData> {
    let detail = match kind {
        FacilityKind::Headquarters => FacilityDetail::Headquarters,
        FacilityKind::SupplyDepot => {
            let depot = record.depot.ok_or_else(|| {
                GameError::Validation(format!("{id} is a supply depot but has no depot record"))
            })?;
            FacilityDetail::SupplyDepot(SupplyDepot::restore(
                depot.size,
                depot.category,
                depot.stockpile,
                depot.generation,
                depot.projection,
                depot.supply_penetration,
            ))
        }
        FacilityKind::Airbase => FacilityDetail::Airbase(Airbase::with_pending(record.attached_unit_ids)),
    };
    Ok(FacilityData::restore(record.damage, detail))
}

impl Unit {
    /// Snapshot this unit's persisted fields.
    #[must_use]
    pub fn to_record(&self) -> UnitRecord {
        UnitRecord {
            id: self.id(),
            template: self.template().clone(),
            hit_points: *self.hit_points(),
            supply: *self.supply(),
            movement: *self.movement(),
            actions: self.actions().clone(),
            deployment: self.deployment(),
            efficiency: self.efficiency(),
            experience: self.experience(),
            experience_points: self.experience_points(),
            individual_modifier: self.individual_modifier(),
            leader: self.leader_id(),
            facility: self.facility().map(facility_record),
        }
    }

    /// Rebuild a unit from a record.
    ///
    /// Airbase attachments come back pending; resolve them once every unit
    /// is loaded.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] if a base kind has no facility
    /// record or a depot has no depot record.
    pub fn from_record(record: UnitRecord) -> Result<Self> {
        let id = record.id;
        let classification = record.template.classification;
        let facility = match (classification.facility_kind(), record.facility) {
            (Some(kind), Some(facility)) => Some(restore_facility(id, kind, facility)?),
            (Some(_), None) => {
                return Err(GameError::Validation(format!(
                    "{id} is a {classification} but has no facility record"
                )));
            }
            (None, Some(_)) => {
                warn!(unit = %id, %classification, "Ignoring facility record on non-base unit");
                None
            }
            (None, None) => None,
        };

        Ok(Self::from_parts(UnitParts {
            id,
            template: record.template,
            hit_points: record.hit_points,
            supply: record.supply,
            movement: record.movement,
            actions: record.actions,
            deployment: record.deployment,
            efficiency: record.efficiency,
            experience: record.experience,
            experience_points: record.experience_points,
            individual_modifier: record.individual_modifier,
            leader: record.leader,
            facility,
        }))
    }
}

/// A versioned set of unit records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSave {
    /// Format version.
    pub version: u32,
    /// Records in ID order.
    pub units: Vec<UnitRecord>,
}

impl UnitSave {
    /// Snapshot every unit in a registry.
    #[must_use]
    pub fn capture(registry: &UnitRegistry) -> Self {
        Self {
            version: SAVE_VERSION,
            units: registry.iter().map(Unit::to_record).collect(),
        }
    }

    /// Rebuild a registry and resolve references.
    ///
    /// Returns the registry and any integrity warnings raised while
    /// resolving.
    ///
    /// # Errors
    ///
    /// - [`GameError::InvalidState`] on a version mismatch.
    /// - Any error from [`Unit::from_record`] or duplicate IDs.
    pub fn restore(self) -> Result<(UnitRegistry, Vec<String>)> {
        if self.version != SAVE_VERSION {
            return Err(GameError::InvalidState(format!(
                "Save version mismatch: expected {SAVE_VERSION}, got {}",
                self.version
            )));
        }
        let mut registry = UnitRegistry::new();
        for record in self.units {
            registry.insert(Unit::from_record(record)?)?;
        }
        let warnings = registry.resolve_all_references();
        debug!(units = registry.len(), warnings = warnings.len(), "Save restored");
        Ok((registry, warnings))
    }

    /// [`Self::restore`], then bring `leaders` in line with the loaded
    /// assignments through [`UnitRegistry::reconcile_leaders`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::restore`].
    pub fn restore_with_leaders<L: LeaderDirectory + ?Sized>(
        self,
        leaders: &mut L,
    ) -> Result<(UnitRegistry, Vec<String>)> {
        let (mut registry, mut warnings) = self.restore()?;
        warnings.extend(registry.reconcile_leaders(leaders));
        Ok((registry, warnings))
    }

    /// Encode as pretty RON.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] if serialization fails.
    pub fn to_ron_string(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| GameError::InvalidState(format!("Failed to serialize save: {e}")))
    }

    /// Decode from RON.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Data`] on malformed input.
    pub fn from_ron_str(source_name: &str, text: &str) -> Result<Self> {
        ron::from_str(text).map_err(|e| GameError::Data {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })
    }

    /// Encode as bincode.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| GameError::InvalidState(format!("Failed to serialize save: {e}")))
    }

    /// Decode from bincode.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Data`] on malformed input.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes).map_err(|e| GameError::Data {
            source_name: "bincode".to_string(),
            message: e.to_string(),
        })
    }
}
