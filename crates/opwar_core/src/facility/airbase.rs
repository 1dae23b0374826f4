//! Airbase aircraft attachment.
//!
//! Attachments are stored once, as unit IDs. Live units are materialized on
//! demand through a [`ReferenceDirectory`]. IDs read from a save sit in a
//! pending list until [`Airbase::resolve`] runs after loading.

use serde::{Deserialize, Serialize};

use crate::classification::UnitClassification;
use crate::constants::MAX_AIR_UNITS;
use crate::error::{GameError, Result};
use crate::ids::UnitId;
use crate::registry::ReferenceDirectory;
use crate::unit::Unit;

/// Airbase sub-state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Airbase {
    attached: Vec<UnitId>,
    pending: Vec<String>,
}

impl Airbase {
    /// Create an empty airbase.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an airbase whose attachments still need resolving.
    #[must_use]
    pub fn with_pending(ids: Vec<String>) -> Self {
        Self {
            attached: Vec::new(),
            pending: ids,
        }
    }

    /// Resolved attachments, in attachment order.
    #[must_use]
    pub fn attached_ids(&self) -> &[UnitId] {
        &self.attached
    }

    /// Persisted IDs not yet resolved.
    #[must_use]
    pub fn pending_ids(&self) -> &[String] {
        &self.pending
    }

    /// IDs to write to a save: resolved attachments, then anything pending.
    #[must_use]
    pub fn persisted_ids(&self) -> Vec<String> {
        self.attached
            .iter()
            .map(ToString::to_string)
            .chain(self.pending.iter().cloned())
            .collect()
    }

    /// Number of attached aircraft.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attached.len()
    }

    /// Check if no aircraft are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attached.is_empty()
    }

    /// Check if the airbase is at capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.attached.len() >= MAX_AIR_UNITS
    }

    /// Remaining attachment slots.
    #[must_use]
    pub fn available_slots(&self) -> usize {
        MAX_AIR_UNITS.saturating_sub(self.attached.len())
    }

    /// Check if an aircraft is attached.
    #[must_use]
    pub fn is_attached(&self, id: UnitId) -> bool {
        self.attached.contains(&id)
    }

    /// Attach an aircraft.
    ///
    /// # Errors
    ///
    /// - [`GameError::Validation`] if the classification cannot use an
    ///   airbase or the aircraft is already attached.
    /// - [`GameError::Capacity`] if the airbase is full.
    pub fn attach(&mut self, id: UnitId, classification: UnitClassification) -> Result<()> {
        if !classification.is_air_combat() {
            return Err(GameError::Validation(format!(
                "{id} is a {classification}, not an air combat unit"
            )));
        }
        if self.is_attached(id) {
            return Err(GameError::Validation(format!("{id} is already attached")));
        }
        if self.is_full() {
            return Err(GameError::Capacity(format!(
                "airbase holds at most {MAX_AIR_UNITS} aircraft"
            )));
        }
        self.attached.push(id);
        Ok(())
    }

    /// Detach an aircraft.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Reference`] if the aircraft is not attached.
    pub fn detach(&mut self, id: UnitId) -> Result<()> {
        let Some(index) = self.attached.iter().position(|a| *a == id) else {
            return Err(GameError::Reference(format!("{id} is not attached")));
        };
        self.attached.remove(index);
        Ok(())
    }

    /// Drop every attachment, resolved or pending.
    pub fn clear(&mut self) {
        self.attached.clear();
        self.pending.clear();
    }

    /// Turn pending IDs into attachments.
    ///
    /// The pending list is always drained. Malformed or unknown IDs are
    /// dropped, as are aircraft held by another airbase in the directory.
    /// Attachment errors (wrong classification, duplicates, capacity) drop
    /// the ID too. Every drop is described in the returned warnings.
    pub fn resolve<D: ReferenceDirectory + ?Sized>(&mut self, directory: &D) -> Vec<String> {
        let mut warnings = Vec::new();

        for raw in std::mem::take(&mut self.pending) {
            let id = match raw.parse::<UnitId>() {
                Ok(id) => id,
                Err(e) => {
                    warnings.push(format!("dropped attachment '{raw}': {e}"));
                    continue;
                }
            };
            let Some(unit) = directory.unit(id) else {
                warnings.push(format!("dropped attachment {id}: unit not found"));
                continue;
            };
            if let Some(holder) = directory.airbase_holding(id) {
                warnings.push(format!("dropped attachment {id}: already attached to {holder}"));
                continue;
            }
            if let Err(e) = self.attach(id, unit.classification()) {
                warnings.push(format!("dropped attachment {id}: {e}"));
            }
        }

        warnings
    }

    /// Materialize attached aircraft through the directory.
    ///
    /// Units the directory no longer knows (destroyed and removed by the
    /// caller) are skipped.
    pub fn attached_units<'a, D: ReferenceDirectory + ?Sized>(
        &self,
        directory: &'a D,
    ) -> Vec<&'a Unit> {
        self.attached
            .iter()
            .filter_map(|id| directory.unit(*id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_and_detach() {
        let mut base = Airbase::new();
        let id = UnitId::new(5);
        base.attach(id, UnitClassification::Fighter).unwrap();
        assert!(base.is_attached(id));
        assert_eq!(base.available_slots(), MAX_AIR_UNITS - 1);

        base.detach(id).unwrap();
        assert!(base.is_empty());
        assert!(matches!(base.detach(id), Err(GameError::Reference(_))));
    }

    #[test]
    fn test_attach_rejects_non_air_units() {
        let mut base = Airbase::new();
        let err = base
            .attach(UnitId::new(1), UnitClassification::Tank)
            .unwrap_err();
        assert!(matches!(err, GameError::Validation(_)));
        let err = base
            .attach(UnitId::new(2), UnitClassification::Helicopter)
            .unwrap_err();
        assert!(matches!(err, GameError::Validation(_)));
        assert!(base.is_empty());
    }

    #[test]
    fn test_attach_rejects_duplicates() {
        let mut base = Airbase::new();
        base.attach(UnitId::new(1), UnitClassification::Bomber).unwrap();
        assert!(base.attach(UnitId::new(1), UnitClassification::Bomber).is_err());
        assert_eq!(base.len(), 1);
    }

    #[test]
    fn test_capacity_limit() {
        let mut base = Airbase::new();
        for n in 0..MAX_AIR_UNITS {
            base.attach(UnitId::new(n as u32 + 1), UnitClassification::Attack)
                .unwrap();
        }
        let err = base
            .attach(UnitId::new(99), UnitClassification::Attack)
            .unwrap_err();
        assert!(matches!(err, GameError::Capacity(_)));
        assert_eq!(base.len(), MAX_AIR_UNITS);
        assert!(base.is_full());
    }

    #[test]
    fn test_persisted_ids_include_pending() {
        let mut base = Airbase::with_pending(vec!["U0009".to_string()]);
        base.attach(UnitId::new(3), UnitClassification::Fighter).unwrap();
        assert_eq!(base.persisted_ids(), vec!["U0003", "U0009"]);
    }
}
