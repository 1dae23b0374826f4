//! Leaders and the directory units use to reach them.
//!
//! Leaders are owned outside the unit. A unit stores only a [`LeaderId`];
//! every read or write goes through a [`LeaderDirectory`]. Both sides of an
//! assignment are ID-only, so there is nothing to drift out of sync.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classification::Nationality;
use crate::constants::{SENIOR_GRADE_REPUTATION, TOP_GRADE_REPUTATION};
use crate::error::{GameError, Result};
use crate::ids::{LeaderId, UnitId};

/// Command grade, from brigade to front level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum CommandGrade {
    /// Brigade or regimental commander.
    #[default]
    JuniorGrade,
    /// Division commander.
    SeniorGrade,
    /// Corps or army commander.
    TopGrade,
}

impl CommandGrade {
    /// Grade earned by a reputation total.
    #[must_use]
    pub const fn from_reputation(reputation: u32) -> Self {
        if reputation >= TOP_GRADE_REPUTATION {
            Self::TopGrade
        } else if reputation >= SENIOR_GRADE_REPUTATION {
            Self::SeniorGrade
        } else {
            Self::JuniorGrade
        }
    }

    /// Rank title shown to the player.
    #[must_use]
    pub const fn title(self, nationality: Nationality) -> &'static str {
        match (nationality, self) {
            (Nationality::Ussr, Self::JuniorGrade) => "Polkovnik",
            (Nationality::Ussr, Self::SeniorGrade) => "General-Mayor",
            (Nationality::Ussr, Self::TopGrade) => "General-Leytenant",
            (_, Self::JuniorGrade) => "Colonel",
            (_, Self::SeniorGrade) => "Major General",
            (_, Self::TopGrade) => "Lieutenant General",
        }
    }
}

/// Innate command ability.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum CommandAbility {
    /// Poor.
    Poor,
    /// Below average.
    BelowAverage,
    /// Average. The neutral value when no leader is assigned.
    #[default]
    Average,
    /// Good.
    Good,
    /// Superior.
    Superior,
    /// Genius.
    Genius,
}

/// Combat rating a leader adds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LeaderBonus {
    /// Attack against armour.
    HardAttack,
    /// Defense against armour.
    HardDefense,
    /// Attack against soft targets.
    SoftAttack,
    /// Defense against soft targets.
    SoftDefense,
    /// Ground-to-air attack.
    AirAttack,
    /// Ground-to-air defense.
    AirDefense,
    /// Air-to-air combat.
    Dogfighting,
    /// Air-to-ground attack.
    GroundAttack,
}

/// Non-numeric skills a leader may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LeaderCapability {
    /// Improved reconnaissance.
    Reconnaissance,
    /// Improved logistics.
    Logistics,
    /// Airmobile operations.
    AirMobile,
    /// Combat engineering.
    Engineering,
    /// Night fighting.
    NightCombat,
}

/// Events that earn a leader reputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReputationAction {
    /// Completed a move.
    Move,
    /// Changed deployment position.
    Redeploy,
    /// Gathered intelligence.
    Intel,
    /// Fought an engagement.
    Combat,
    /// Won an attack.
    SuccessfulAttack,
    /// Held against an attack.
    SuccessfulDefense,
    /// Forced an enemy retreat.
    ForcedRetreat,
    /// Destroyed an enemy unit.
    UnitDestroyed,
}

impl ReputationAction {
    /// Reputation awarded for this action.
    #[must_use]
    pub const fn reputation(self) -> u32 {
        match self {
            Self::Move | Self::Redeploy => 1,
            Self::Intel => 2,
            Self::Combat => 3,
            Self::SuccessfulDefense => 4,
            Self::SuccessfulAttack => 5,
            Self::ForcedRetreat => 6,
            Self::UnitDestroyed => 10,
        }
    }
}

/// A commander that can be assigned to one unit at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leader {
    /// Identifier.
    pub id: LeaderId,
    /// Display name.
    pub name: String,
    /// Nationality, used for rank titles.
    #[serde(default)]
    pub nationality: Nationality,
    /// Current grade.
    #[serde(default)]
    pub grade: CommandGrade,
    /// Innate ability.
    #[serde(default)]
    pub ability: CommandAbility,
    /// Additive combat bonuses.
    #[serde(default)]
    pub bonuses: BTreeMap<LeaderBonus, i32>,
    /// Skills.
    #[serde(default)]
    pub capabilities: BTreeSet<LeaderCapability>,
    /// Accumulated reputation.
    #[serde(default)]
    pub reputation: u32,
    /// Unit currently commanded.
    #[serde(default)]
    pub assigned_unit: Option<UnitId>,
}

impl Leader {
    /// Create an unassigned junior leader with no bonuses.
    #[must_use]
    pub fn new(id: LeaderId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            nationality: Nationality::default(),
            grade: CommandGrade::default(),
            ability: CommandAbility::default(),
            bonuses: BTreeMap::new(),
            capabilities: BTreeSet::new(),
            reputation: 0,
            assigned_unit: None,
        }
    }

    /// Builder: set a bonus.
    #[must_use]
    pub fn with_bonus(mut self, bonus: LeaderBonus, value: i32) -> Self {
        self.bonuses.insert(bonus, value);
        self
    }

    /// Builder: add a capability.
    #[must_use]
    pub fn with_capability(mut self, capability: LeaderCapability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    /// Bonus for a rating, zero if none.
    #[must_use]
    pub fn bonus(&self, bonus: LeaderBonus) -> i32 {
        self.bonuses.get(&bonus).copied().unwrap_or(0)
    }

    /// Check for a capability.
    #[must_use]
    pub fn has_capability(&self, capability: LeaderCapability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Rank title for the current grade.
    #[must_use]
    pub fn rank_title(&self) -> &'static str {
        self.grade.title(self.nationality)
    }

    /// Check if the leader commands a unit.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        self.assigned_unit.is_some()
    }

    /// Add reputation. Returns `true` if the leader was promoted.
    ///
    /// Grades only ever go up.
    pub fn award_reputation(&mut self, action: ReputationAction) -> bool {
        self.reputation = self.reputation.saturating_add(action.reputation());
        let earned = CommandGrade::from_reputation(self.reputation);
        if earned > self.grade {
            self.grade = earned;
            info!(leader = %self.id, grade = ?earned, "Leader promoted");
            return true;
        }
        false
    }
}

/// Lookup plus the assignment hooks a unit calls on its leader.
///
/// Implementations must keep "a leader commands at most one unit".
pub trait LeaderDirectory {
    /// Look up a leader.
    fn leader(&self, id: LeaderId) -> Option<&Leader>;

    /// Record that `leader` now commands `unit`.
    ///
    /// # Errors
    ///
    /// - [`GameError::Reference`] if the leader is unknown.
    /// - [`GameError::InvalidState`] if it already commands another unit.
    fn assign(&mut self, leader: LeaderId, unit: UnitId) -> Result<()>;

    /// Record that `leader` commands nothing.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Reference`] if the leader is unknown.
    fn unassign(&mut self, leader: LeaderId) -> Result<()>;

    /// Award reputation. Returns `true` on promotion.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Reference`] if the leader is unknown.
    fn award_reputation(&mut self, leader: LeaderId, action: ReputationAction) -> Result<bool>;

    /// Check whether a leader is free to take `unit`.
    fn is_available_for(&self, leader: LeaderId, unit: UnitId) -> bool {
        self.leader(leader)
            .is_some_and(|l| l.assigned_unit.map_or(true, |current| current == unit))
    }
}

/// In-memory leader pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderRoster {
    leaders: BTreeMap<LeaderId, Leader>,
}

impl LeaderRoster {
    /// Create an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a leader, replacing any with the same ID.
    pub fn insert(&mut self, leader: Leader) {
        self.leaders.insert(leader.id, leader);
    }

    /// Number of leaders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.leaders.len()
    }

    /// Check if the roster is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.leaders.is_empty()
    }

    /// Leaders not commanding anything.
    pub fn unassigned(&self) -> impl Iterator<Item = &Leader> {
        self.leaders.values().filter(|l| !l.is_assigned())
    }

    /// Parse a RON list of leaders.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Data`] on malformed text and
    /// [`GameError::Validation`] on duplicate IDs or a unit claimed by two
    /// leaders.
    pub fn from_ron_str(source_name: &str, text: &str) -> Result<Self> {
        let leaders: Vec<Leader> = ron::from_str(text).map_err(|e| GameError::Data {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

        let mut roster = Self::new();
        let mut claimed = BTreeSet::new();
        for leader in leaders {
            if roster.leaders.contains_key(&leader.id) {
                return Err(GameError::Validation(format!(
                    "duplicate leader '{}' in {source_name}",
                    leader.id
                )));
            }
            if let Some(unit) = leader.assigned_unit {
                if !claimed.insert(unit) {
                    return Err(GameError::Validation(format!(
                        "unit {unit} commanded by more than one leader in {source_name}"
                    )));
                }
            }
            roster.insert(leader);
        }
        Ok(roster)
    }

    fn get_mut(&mut self, id: LeaderId) -> Result<&mut Leader> {
        self.leaders
            .get_mut(&id)
            .ok_or_else(|| GameError::Reference(id.reference_key()))
    }
}

impl LeaderDirectory for LeaderRoster {
    fn leader(&self, id: LeaderId) -> Option<&Leader> {
        self.leaders.get(&id)
    }

    fn assign(&mut self, leader: LeaderId, unit: UnitId) -> Result<()> {
        let entry = self.get_mut(leader)?;
        match entry.assigned_unit {
            Some(current) if current != unit => Err(GameError::InvalidState(format!(
                "{leader} already commands {current}"
            ))),
            _ => {
                entry.assigned_unit = Some(unit);
                debug!(%leader, %unit, "Leader assigned");
                Ok(())
            }
        }
    }

    fn unassign(&mut self, leader: LeaderId) -> Result<()> {
        let entry = self.get_mut(leader)?;
        entry.assigned_unit = None;
        debug!(%leader, "Leader unassigned");
        Ok(())
    }

    fn award_reputation(&mut self, leader: LeaderId, action: ReputationAction) -> Result<bool> {
        Ok(self.get_mut(leader)?.award_reputation(action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> LeaderRoster {
        let mut roster = LeaderRoster::new();
        roster.insert(Leader::new(LeaderId::new(1), "Konev").with_bonus(LeaderBonus::HardAttack, 2));
        roster.insert(Leader::new(LeaderId::new(2), "Rokossovsky"));
        roster
    }

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(CommandGrade::from_reputation(0), CommandGrade::JuniorGrade);
        assert_eq!(
            CommandGrade::from_reputation(SENIOR_GRADE_REPUTATION),
            CommandGrade::SeniorGrade
        );
        assert_eq!(
            CommandGrade::from_reputation(TOP_GRADE_REPUTATION + 50),
            CommandGrade::TopGrade
        );
    }

    #[test]
    fn test_bonus_and_capability_defaults() {
        let leader = Leader::new(LeaderId::new(3), "Zhukov")
            .with_capability(LeaderCapability::Logistics);
        assert_eq!(leader.bonus(LeaderBonus::SoftAttack), 0);
        assert!(leader.has_capability(LeaderCapability::Logistics));
        assert!(!leader.has_capability(LeaderCapability::NightCombat));
        assert_eq!(leader.rank_title(), "Polkovnik");
    }

    #[test]
    fn test_promotion_on_reputation() {
        let mut leader = Leader::new(LeaderId::new(1), "Chuikov");
        let mut promoted = false;
        for _ in 0..10 {
            promoted |= leader.award_reputation(ReputationAction::UnitDestroyed);
        }
        assert!(promoted);
        assert_eq!(leader.reputation, 100);
        assert_eq!(leader.grade, CommandGrade::SeniorGrade);
        assert!(!leader.award_reputation(ReputationAction::Move));
    }

    #[test]
    fn test_roster_assign_is_exclusive() {
        let mut roster = roster();
        let leader = LeaderId::new(1);
        roster.assign(leader, UnitId::new(10)).unwrap();
        assert!(matches!(
            roster.assign(leader, UnitId::new(11)),
            Err(GameError::InvalidState(_))
        ));
        assert_eq!(
            roster.leader(leader).unwrap().assigned_unit,
            Some(UnitId::new(10))
        );
        // Re-assigning to the same unit is idempotent
        roster.assign(leader, UnitId::new(10)).unwrap();
        assert!(roster.is_available_for(leader, UnitId::new(10)));
        assert!(!roster.is_available_for(leader, UnitId::new(11)));
    }

    #[test]
    fn test_roster_unknown_leader() {
        let mut roster = roster();
        let missing = LeaderId::new(99);
        assert!(matches!(
            roster.assign(missing, UnitId::new(1)),
            Err(GameError::Reference(_))
        ));
        assert!(roster.unassign(missing).is_err());
        assert!(!roster.is_available_for(missing, UnitId::new(1)));
    }

    #[test]
    fn test_roster_from_ron() {
        let text = r#"[
            (id: 1, name: "Vatutin", bonuses: {SoftAttack: 3}),
            (id: 2, name: "Malinovsky", capabilities: [AirMobile], assigned_unit: Some(7)),
        ]"#;
        let roster = LeaderRoster::from_ron_str("leaders.ron", text).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(
            roster.leader(LeaderId::new(1)).unwrap().bonus(LeaderBonus::SoftAttack),
            3
        );
        assert_eq!(roster.unassigned().count(), 1);
    }

    #[test]
    fn test_roster_rejects_double_command() {
        let text = r#"[
            (id: 1, name: "A", assigned_unit: Some(7)),
            (id: 2, name: "B", assigned_unit: Some(7)),
        ]"#;
        assert!(matches!(
            LeaderRoster::from_ron_str("leaders.ron", text),
            Err(GameError::Validation(_))
        ));
    }
}
