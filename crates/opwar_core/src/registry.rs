//! ID-keyed unit ownership and load-time reference resolution.
//!
//! Units never hold pointers to each other. Anything that needs a live unit
//! (airbase attachments, scenario code) goes through a
//! [`ReferenceDirectory`], and [`UnitRegistry`] is the in-memory one.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::error::{GameError, Result};
use crate::events::UnitEvent;
use crate::ids::{LeaderId, UnitId, UnitIdAllocator};
use crate::leader::LeaderDirectory;
use crate::unit::Unit;

/// Resolves unit IDs to live units after loading.
pub trait ReferenceDirectory {
    /// Look up a unit by ID.
    fn unit(&self, id: UnitId) -> Option<&Unit>;

    /// Airbase that currently has `aircraft` attached, if any.
    fn airbase_holding(&self, aircraft: UnitId) -> Option<UnitId>;

    /// `kind:ID` keys of references that are still unresolved.
    fn unresolved_reference_ids(&self) -> Vec<String>;

    /// Check if any reference is still unresolved.
    fn has_unresolved_references(&self) -> bool {
        !self.unresolved_reference_ids().is_empty()
    }
}

/// Owns units by ID.
#[derive(Debug, Clone, Default)]
pub struct UnitRegistry {
    units: BTreeMap<UnitId, Unit>,
    ids: UnitIdAllocator,
}

impl UnitRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ID allocator shared by everything spawned into this registry.
    pub fn ids_mut(&mut self) -> &mut UnitIdAllocator {
        &mut self.ids
    }

    /// Insert a unit.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] if the ID is already taken.
    pub fn insert(&mut self, unit: Unit) -> Result<UnitId> {
        let id = unit.id();
        if self.units.contains_key(&id) {
            return Err(GameError::Validation(format!("unit {id} already registered")));
        }
        self.ids.observe(id);
        self.units.insert(id, unit);
        Ok(id)
    }

    /// Remove a unit, returning it.
    ///
    /// The unit is detached from any airbase holding it and its leader is
    /// released in `leaders`, so nothing keeps pointing at the removed ID.
    pub fn remove<L: LeaderDirectory + ?Sized>(
        &mut self,
        id: UnitId,
        leaders: &mut L,
    ) -> Option<Unit> {
        let mut unit = self.units.remove(&id)?;

        for base in self.units.values_mut() {
            if base.attached_air_unit_ids().contains(&id) {
                if let Err(err) = base.try_detach_air_unit(id) {
                    warn!(
                        airbase = %base.id(),
                        aircraft = %id,
                        error = %err,
                        "Detach on removal failed"
                    );
                }
            }
        }
        if unit.leader_id().is_some() {
            if let Err(err) = unit.try_remove_leader(leaders) {
                warn!(unit = %id, error = %err, "Leader not released on removal");
            }
        }

        debug!(unit = %id, "Unit removed");
        Some(unit)
    }

    /// Look up a unit.
    #[must_use]
    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Look up a unit mutably.
    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    /// Number of units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Iterate units in ID order.
    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Remove every destroyed unit, returning their IDs.
    ///
    /// Each removal goes through [`Self::remove`].
    pub fn remove_destroyed<L: LeaderDirectory + ?Sized>(
        &mut self,
        leaders: &mut L,
    ) -> Vec<UnitId> {
        let destroyed: Vec<UnitId> = self
            .units
            .values()
            .filter(|u| u.is_destroyed())
            .map(Unit::id)
            .collect();
        for id in &destroyed {
            self.remove(*id, leaders);
        }
        destroyed
    }

    /// Resolve every unit's persisted references. Call once after loading.
    ///
    /// Each unit is taken out of the map while it resolves so it can look up
    /// its neighbours. Aircraft claimed by two airbases stay with the lower
    /// airbase ID. A leader named by two units stays with the lower unit ID.
    /// Returns the integrity warnings raised.
    pub fn resolve_all_references(&mut self) -> Vec<String> {
        let ids: Vec<UnitId> = self.units.keys().copied().collect();
        let mut warnings = Vec::new();

        for id in ids {
            let Some(mut unit) = self.units.remove(&id) else {
                continue;
            };
            warnings.extend(unit.resolve_references(&*self));
            self.units.insert(id, unit);
        }

        let mut commanders: BTreeMap<LeaderId, UnitId> = BTreeMap::new();
        for unit in self.units.values_mut() {
            let Some(leader) = unit.leader_id() else {
                continue;
            };
            match commanders.entry(leader) {
                Entry::Vacant(slot) => {
                    slot.insert(unit.id());
                }
                Entry::Occupied(slot) => {
                    let reason = format!("already commands {}", slot.get());
                    warnings.extend(unit.drop_leader_reference(&reason));
                }
            }
        }

        debug!(warnings = warnings.len(), "Resolved unit references");
        warnings
    }

    /// Bring a leader directory in line with the loaded units.
    ///
    /// Leaders the directory does not know, or knows as commanding a
    /// different unit, are dropped from the unit with an integrity warning.
    /// Free leaders are recorded as commanding the unit that names them.
    pub fn reconcile_leaders<L: LeaderDirectory + ?Sized>(
        &mut self,
        leaders: &mut L,
    ) -> Vec<String> {
        let mut warnings = Vec::new();

        for unit in self.units.values_mut() {
            let Some(leader) = unit.leader_id() else {
                continue;
            };
            let reason = match leaders.leader(leader).map(|l| l.assigned_unit) {
                None => Some("not found".to_string()),
                Some(Some(holder)) if holder != unit.id() => {
                    Some(format!("already commands {holder}"))
                }
                Some(Some(_)) => None,
                Some(None) => leaders.assign(leader, unit.id()).err().map(|e| e.to_string()),
            };
            if let Some(reason) = reason {
                warnings.extend(unit.drop_leader_reference(&reason));
            }
        }

        debug!(warnings = warnings.len(), "Reconciled leaders");
        warnings
    }

    /// Attach an aircraft to an airbase, both looked up by ID.
    ///
    /// # Errors
    ///
    /// - [`GameError::Validation`] if another airbase already holds the
    ///   aircraft.
    /// - [`GameError::Reference`] if either unit is missing.
    /// - Any error from [`Unit::try_attach_air_unit`].
    pub fn attach_air_unit(&mut self, airbase: UnitId, aircraft: UnitId) -> Result<()> {
        if let Some(holder) = self.airbase_holding(aircraft).filter(|h| *h != airbase) {
            return Err(GameError::Validation(format!(
                "{aircraft} is already attached to {holder}"
            )));
        }
        let classification = self
            .units
            .get(&aircraft)
            .map(Unit::classification)
            .ok_or_else(|| GameError::Reference(aircraft.reference_key()))?;
        let base = self
            .units
            .get_mut(&airbase)
            .ok_or_else(|| GameError::Reference(airbase.reference_key()))?;
        base.try_attach_air_unit(aircraft, classification)
    }

    /// Detach an aircraft from an airbase.
    ///
    /// # Errors
    ///
    /// - [`GameError::Reference`] if the airbase is missing.
    /// - Any error from [`Unit::try_detach_air_unit`].
    pub fn detach_air_unit(&mut self, airbase: UnitId, aircraft: UnitId) -> Result<()> {
        let base = self
            .units
            .get_mut(&airbase)
            .ok_or_else(|| GameError::Reference(airbase.reference_key()))?;
        base.try_detach_air_unit(aircraft)
    }

    /// Drain every unit's buffered events, in unit order.
    pub fn drain_events(&mut self) -> Vec<UnitEvent> {
        self.units
            .values_mut()
            .flat_map(Unit::take_events)
            .collect()
    }
}

impl ReferenceDirectory for UnitRegistry {
    fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    fn airbase_holding(&self, aircraft: UnitId) -> Option<UnitId> {
        self.units
            .values()
            .find(|u| u.attached_air_unit_ids().contains(&aircraft))
            .map(Unit::id)
    }

    fn unresolved_reference_ids(&self) -> Vec<String> {
        let mut keys = Vec::new();
        for unit in self.units.values() {
            for raw in unit.unresolved_references() {
                match raw.parse::<UnitId>() {
                    Ok(id) => keys.push(id.reference_key()),
                    Err(_) => {
                        warn!(unit = %unit.id(), raw = %raw, "Malformed unit reference");
                        keys.push(format!("unit:{raw}"));
                    }
                }
            }
        }
        keys
    }
}
