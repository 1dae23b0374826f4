//! The unit: pools, condition, action economy, facility and leader hooks.
//!
//! # Failure policy
//!
//! Operations come in two layers:
//!
//! - `try_*` methods return [`Result`] and never leave partial mutation.
//! - The plain methods are turn-loop boundaries. They catch the error, log
//!   it, record an [`UnitEvent::OperationRejected`] and return `false` or
//!   zero.
//!
//! Running out of tokens, movement or supply is an expected outcome, not a
//! fault; action methods just return `false` for it.

use tracing::{debug, info, warn};

use crate::actions::{ActionBlocked, ActionKind, ActionPools, AvailableActions};
use crate::classification::{
    DeploymentPosition, EfficiencyLevel, ExperienceLevel, FacilityKind, Nationality, Side,
    UnitClassification, UnitRole,
};
use crate::constants::{DESTROYED_HIT_POINTS, MAX_XP};
use crate::error::{GameError, Result};
use crate::events::{NotificationSink, UnitEvent};
use crate::facility::{
    Airbase, DepotCategory, FacilityData, FacilityDetail, OperationalCapacity, SupplyDepot,
};
use crate::ids::{LeaderId, UnitId, UnitIdAllocator};
use crate::leader::{
    CommandAbility, CommandGrade, Leader, LeaderBonus, LeaderCapability, LeaderDirectory,
    ReputationAction,
};
use crate::math::{to_centi, Fixed};
use crate::modifiers::{CombatConditions, CombatStrength};
use crate::registry::ReferenceDirectory;
use crate::stats::MaxCurrent;
use crate::templates::{FacilityConfig, UnitConfig};
use crate::weapons::{WeaponProfileDatabase, WeaponSystemId};

/// A military unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    id: UnitId,
    name: String,
    classification: UnitClassification,
    role: UnitRole,
    side: Side,
    nationality: Nationality,

    hit_points: MaxCurrent,
    supply: MaxCurrent,
    movement: MaxCurrent,
    actions: ActionPools,

    deployment: DeploymentPosition,
    efficiency: EfficiencyLevel,
    experience: ExperienceLevel,
    experience_points: u32,
    individual_modifier: Fixed,

    leader: Option<LeaderId>,
    deployed_profile: WeaponSystemId,
    mounted_profile: Option<WeaponSystemId>,
    facility: Option<FacilityData>,

    template: UnitConfig,
    events: Vec<UnitEvent>,
}

/// Facility state for a freshly built unit of this classification.
fn initial_facility(
    classification: UnitClassification,
    config: Option<FacilityConfig>,
) -> Option<FacilityData> {
    let config = config.unwrap_or_default();
    classification.facility_kind().map(|kind| match kind {
        FacilityKind::Headquarters => FacilityData::headquarters(),
        FacilityKind::SupplyDepot => {
            let mut depot = SupplyDepot::new(config.depot_size, config.depot_category);
            depot.set_supply_penetration(config.supply_penetration);
            FacilityData::new(FacilityDetail::SupplyDepot(depot))
        }
        FacilityKind::Airbase => FacilityData::new_airbase(),
    })
}

impl Unit {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Build a unit from a config with a freshly allocated ID.
    ///
    /// Pools start full and a depot starts with a full stockpile.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Validation`] if the config is invalid or names a
    /// profile the database does not have.
    pub fn new<D: WeaponProfileDatabase + ?Sized>(
        config: &UnitConfig,
        profiles: &D,
        ids: &mut UnitIdAllocator,
    ) -> Result<Self> {
        config.validate(profiles)?;
        Ok(Self::build(ids.allocate(), config))
    }

    /// Build a unit from a config under an existing ID.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn with_id<D: WeaponProfileDatabase + ?Sized>(
        id: UnitId,
        config: &UnitConfig,
        profiles: &D,
    ) -> Result<Self> {
        config.validate(profiles)?;
        Ok(Self::build(id, config))
    }

    fn build(id: UnitId, config: &UnitConfig) -> Self {
        let unit = Self {
            id,
            name: config.name.clone(),
            classification: config.classification,
            role: config.role,
            side: config.side,
            nationality: config.nationality,
            hit_points: MaxCurrent::new(config.max_hit_points),
            supply: MaxCurrent::new(config.max_days_supply),
            movement: MaxCurrent::new(config.max_movement_points),
            actions: ActionPools::from_allotment(config.classification.action_allotment()),
            deployment: config.deployment,
            efficiency: EfficiencyLevel::default(),
            experience: ExperienceLevel::default(),
            experience_points: 0,
            individual_modifier: config.individual_modifier(),
            leader: None,
            deployed_profile: config.deployed_profile.clone(),
            mounted_profile: config.mounted_profile.clone(),
            facility: initial_facility(config.classification, config.facility),
            template: config.clone(),
            events: Vec::new(),
        };
        debug!(unit = %unit.id, name = %unit.name, class = %unit.classification, "Unit created");
        unit
    }

    /// Spawn a fresh unit from this unit's template.
    ///
    /// The clone has a new ID, full pools, default efficiency and
    /// experience, no leader and no attachments. Facilities start
    /// undamaged with an empty stockpile.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn create_template_clone<D: WeaponProfileDatabase + ?Sized>(
        &self,
        profiles: &D,
        ids: &mut UnitIdAllocator,
    ) -> Result<Self> {
        let mut clone = Self::new(&self.template, profiles, ids)?;
        clone.empty_stockpile();
        Ok(clone)
    }

    /// Reset this unit in place to `template`'s baseline, keeping its ID.
    ///
    /// Any assigned leader is released first.
    ///
    /// # Errors
    ///
    /// Returns construction errors; the unit is unchanged on failure.
    pub fn copy_template_from<D, L>(
        &mut self,
        template: &Self,
        profiles: &D,
        leaders: &mut L,
    ) -> Result<()>
    where
        D: WeaponProfileDatabase + ?Sized,
        L: LeaderDirectory + ?Sized,
    {
        let mut fresh = Self::with_id(self.id, &template.template, profiles)?;
        fresh.empty_stockpile();
        if self.leader.is_some() {
            self.try_remove_leader(leaders)?;
        }
        fresh.events = std::mem::take(&mut self.events);
        *self = fresh;
        Ok(())
    }

    fn empty_stockpile(&mut self) {
        if let Some(depot) = self.facility.as_mut().and_then(FacilityData::depot_mut) {
            depot.clear_stockpile();
        }
    }

    /// Rebuild a unit from persisted parts. No validation against the
    /// profile database; that happened when the unit was first built.
    pub(crate) fn from_parts(parts: UnitParts) -> Self {
        let unit = Self {
            id: parts.id,
            name: parts.template.name.clone(),
            classification: parts.template.classification,
            role: parts.template.role,
            side: parts.template.side,
            nationality: parts.template.nationality,
            hit_points: parts.hit_points,
            supply: parts.supply,
            movement: parts.movement,
            actions: parts.actions,
            deployment: parts.deployment,
            efficiency: parts.efficiency,
            experience: parts.experience,
            experience_points: parts.experience_points.min(MAX_XP),
            individual_modifier: parts.individual_modifier,
            leader: parts.leader,
            deployed_profile: parts.template.deployed_profile.clone(),
            mounted_profile: parts.template.mounted_profile.clone(),
            facility: parts.facility,
            template: parts.template,
            events: Vec::new(),
        };
        unit.check_invariants();
        unit
    }

    // ========================================================================
    // Identity and state accessors
    // ========================================================================

    /// Unique ID.
    #[must_use]
    pub const fn id(&self) -> UnitId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Classification.
    #[must_use]
    pub const fn classification(&self) -> UnitClassification {
        self.classification
    }

    /// Role.
    #[must_use]
    pub const fn role(&self) -> UnitRole {
        self.role
    }

    /// Side.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Nationality.
    #[must_use]
    pub const fn nationality(&self) -> Nationality {
        self.nationality
    }

    /// Hit points.
    #[must_use]
    pub const fn hit_points(&self) -> &MaxCurrent {
        &self.hit_points
    }

    /// Days of supply.
    #[must_use]
    pub const fn supply(&self) -> &MaxCurrent {
        &self.supply
    }

    /// Movement points.
    #[must_use]
    pub const fn movement(&self) -> &MaxCurrent {
        &self.movement
    }

    /// Action token pools.
    #[must_use]
    pub const fn actions(&self) -> &ActionPools {
        &self.actions
    }

    /// Deployment position.
    #[must_use]
    pub const fn deployment(&self) -> DeploymentPosition {
        self.deployment
    }

    /// Efficiency tier.
    #[must_use]
    pub const fn efficiency(&self) -> EfficiencyLevel {
        self.efficiency
    }

    /// Experience tier.
    #[must_use]
    pub const fn experience(&self) -> ExperienceLevel {
        self.experience
    }

    /// Experience points.
    #[must_use]
    pub const fn experience_points(&self) -> u32 {
        self.experience_points
    }

    /// Individual combat modifier.
    #[must_use]
    pub const fn individual_modifier(&self) -> Fixed {
        self.individual_modifier
    }

    /// Template this unit was built from.
    #[must_use]
    pub const fn template(&self) -> &UnitConfig {
        &self.template
    }

    /// Facility state, for base kinds.
    #[must_use]
    pub const fn facility(&self) -> Option<&FacilityData> {
        self.facility.as_ref()
    }

    /// Check if this is a base kind.
    #[must_use]
    pub const fn is_base(&self) -> bool {
        self.classification.is_base()
    }

    /// Destroyed units have hit points at or below the threshold. Removing
    /// them from any collection is the owner's job.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.hit_points.current() <= Fixed::from_num(DESTROYED_HIT_POINTS)
    }

    /// Weapon profile in use for the current deployment.
    #[must_use]
    pub fn active_profile_id(&self) -> &WeaponSystemId {
        match &self.mounted_profile {
            Some(mounted) if self.deployment.is_mounted() => mounted,
            _ => &self.deployed_profile,
        }
    }

    // ========================================================================
    // Events
    // ========================================================================

    fn record(&mut self, event: UnitEvent) {
        debug!(unit = %self.id, event = %event, "Unit event");
        self.events.push(event);
    }

    fn reject(&mut self, operation: &str, err: &GameError) {
        warn!(unit = %self.id, operation, kind = err.kind(), error = %err, "Operation rejected");
        self.record(UnitEvent::OperationRejected {
            unit: self.id,
            operation: operation.to_string(),
            reason: err.to_string(),
        });
    }

    /// Buffered events, oldest first.
    #[must_use]
    pub fn pending_events(&self) -> &[UnitEvent] {
        &self.events
    }

    /// Drain buffered events.
    pub fn take_events(&mut self) -> Vec<UnitEvent> {
        std::mem::take(&mut self.events)
    }

    /// Send buffered events to a sink. Returns how many were sent.
    pub fn flush_events<S: NotificationSink + ?Sized>(&mut self, sink: &mut S) -> usize {
        let events = self.take_events();
        for event in &events {
            sink.notify(&event.to_string());
        }
        events.len()
    }

    // ========================================================================
    // Action economy
    // ========================================================================

    /// Take one action of `kind`, as a single check-then-commit step.
    ///
    /// `move_cost` is only read for moves.
    ///
    /// # Errors
    ///
    /// Returns why the action is blocked; nothing is mutated in that case.
    pub fn try_perform_action(
        &mut self,
        kind: ActionKind,
        move_cost: Fixed,
    ) -> std::result::Result<(), ActionBlocked> {
        if self.is_destroyed() {
            return Err(ActionBlocked::NotAllowed("unit is destroyed"));
        }
        if move_cost < Fixed::ZERO {
            return Err(ActionBlocked::NotAllowed("movement cost is negative"));
        }
        let spend = self
            .actions
            .evaluate(kind, &self.movement, &self.supply, move_cost)?;
        self.actions
            .commit(spend, &mut self.movement, &mut self.supply);
        self.check_invariants();
        Ok(())
    }

    fn perform(&mut self, kind: ActionKind, move_cost: Fixed) -> bool {
        match self.try_perform_action(kind, move_cost) {
            Ok(()) => true,
            Err(reason) => {
                debug!(unit = %self.id, action = ?kind, %reason, "Action not taken");
                false
            }
        }
    }

    /// Attack. Returns `false` without mutation when any gate fails.
    pub fn perform_combat_action(&mut self) -> bool {
        self.perform(ActionKind::Combat, Fixed::ZERO)
    }

    /// Move, spending the externally computed `movement_cost`.
    pub fn perform_move_action(&mut self, movement_cost: Fixed) -> bool {
        self.perform(ActionKind::Move, movement_cost)
    }

    /// Gather intelligence.
    pub fn perform_intel_action(&mut self) -> bool {
        self.perform(ActionKind::Intel, Fixed::ZERO)
    }

    /// Take reactive fire.
    pub fn perform_opportunity_action(&mut self) -> bool {
        self.perform(ActionKind::Opportunity, Fixed::ZERO)
    }

    /// Spend a deploy action without changing position.
    ///
    /// [`Unit::change_deployment_position`] spends the same action as part
    /// of a ladder step.
    pub fn perform_deploy_action(&mut self) -> bool {
        self.perform(ActionKind::Deploy, Fixed::ZERO)
    }

    /// Exercisable actions, without side effects.
    #[must_use]
    pub fn available_actions(&self) -> AvailableActions {
        if self.is_destroyed() {
            return AvailableActions::default();
        }
        self.actions.available(&self.movement, &self.supply)
    }

    /// Restore every action pool. Call once per turn.
    pub fn refresh_all_actions(&mut self) {
        self.actions.refresh();
    }

    /// Restore movement points. Call once per turn.
    pub fn refresh_movement_points(&mut self) {
        self.movement.reset_to_max();
    }

    /// Step one rung along the deployment ladder, spending a deploy action.
    ///
    /// # Errors
    ///
    /// Blocked for non-ground units, non-adjacent targets, or when the
    /// deploy action's gates fail.
    pub fn try_change_deployment_position(
        &mut self,
        target: DeploymentPosition,
    ) -> std::result::Result<(), ActionBlocked> {
        if !self.classification.is_ground() {
            return Err(ActionBlocked::NotAllowed(
                "only ground units change deployment",
            ));
        }
        if !self.deployment.is_adjacent_to(target) {
            return Err(ActionBlocked::NotAllowed(
                "deployment changes move one step at a time",
            ));
        }
        self.try_perform_action(ActionKind::Deploy, Fixed::ZERO)?;
        debug!(unit = %self.id, from = ?self.deployment, to = ?target, "Deployment changed");
        self.deployment = target;
        Ok(())
    }

    /// Boundary form of [`Self::try_change_deployment_position`].
    pub fn change_deployment_position(&mut self, target: DeploymentPosition) -> bool {
        match self.try_change_deployment_position(target) {
            Ok(()) => true,
            Err(reason) => {
                debug!(unit = %self.id, ?target, %reason, "Deployment unchanged");
                false
            }
        }
    }

    // ========================================================================
    // Pools and condition
    // ========================================================================

    /// Remove hit points. Returns the amount removed.
    pub fn take_damage(&mut self, amount: Fixed) -> Fixed {
        let removed = self.hit_points.subtract(amount);
        if self.is_destroyed() {
            info!(unit = %self.id, "Unit destroyed");
        }
        removed
    }

    /// Restore hit points. Returns the amount restored.
    pub fn repair(&mut self, amount: Fixed) -> Fixed {
        self.hit_points.add(amount)
    }

    /// Spend supply. Returns `false` without mutation if short.
    pub fn consume_supplies(&mut self, amount: Fixed) -> bool {
        if amount < Fixed::ZERO || !self.supply.has_at_least(amount) {
            return false;
        }
        self.supply.subtract(amount);
        true
    }

    /// Receive supply, saturating at the maximum. Returns the amount taken.
    pub fn receive_supplies(&mut self, amount: Fixed) -> Fixed {
        self.supply.add(amount)
    }

    /// Spend movement points. Returns `false` without mutation if short.
    pub fn consume_movement_points(&mut self, amount: Fixed) -> bool {
        if amount < Fixed::ZERO || !self.movement.has_at_least(amount) {
            return false;
        }
        self.movement.subtract(amount);
        true
    }

    /// Set the efficiency tier.
    pub fn set_efficiency(&mut self, efficiency: EfficiencyLevel) {
        self.efficiency = efficiency;
    }

    /// Add experience points. Returns `true` if the level changed.
    pub fn add_experience(&mut self, points: u32) -> bool {
        self.experience_points = self.experience_points.saturating_add(points).min(MAX_XP);
        let level = ExperienceLevel::from_points(self.experience_points);
        if level == self.experience {
            return false;
        }
        self.experience = level;
        self.record(UnitEvent::ExperienceGained {
            unit: self.id,
            level: format!("{level:?}"),
        });
        true
    }

    // ========================================================================
    // Combat
    // ========================================================================

    /// Inputs to the combat modifier.
    #[must_use]
    pub fn combat_conditions(&self) -> CombatConditions {
        CombatConditions {
            hit_point_fraction: self.hit_points.fraction(),
            deployment: self.deployment,
            efficiency: self.efficiency,
            experience: self.experience,
            individual: self.individual_modifier,
        }
    }

    /// Final combat modifier for this unit's domain.
    #[must_use]
    pub fn combat_modifier(&self) -> Fixed {
        let conditions = self.combat_conditions();
        if self.classification.is_air() {
            conditions.air_modifier()
        } else {
            conditions.ground_modifier()
        }
    }

    /// Scenario-adjusted ratings of the active profile.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Reference`] if the active profile is missing.
    pub fn try_combat_strength<D, L>(&self, profiles: &D, leaders: &L) -> Result<CombatStrength>
    where
        D: WeaponProfileDatabase + ?Sized,
        L: LeaderDirectory + ?Sized,
    {
        let id = self.active_profile_id();
        let profile = profiles
            .profile(id)
            .ok_or_else(|| GameError::Reference(format!("weapon:{id}")))?;
        let leader = self.assigned_leader(leaders);
        Ok(CombatStrength::compose(
            profile,
            &self.combat_conditions(),
            self.classification.is_air(),
            |bonus| leader.map_or(0, |l| l.bonus(bonus)),
        ))
    }

    /// Boundary form of [`Self::try_combat_strength`]. Zero ratings on
    /// failure.
    pub fn current_combat_strength<D, L>(&self, profiles: &D, leaders: &L) -> CombatStrength
    where
        D: WeaponProfileDatabase + ?Sized,
        L: LeaderDirectory + ?Sized,
    {
        self.try_combat_strength(profiles, leaders)
            .unwrap_or_else(|err| {
                warn!(unit = %self.id, error = %err, "Combat strength unavailable");
                CombatStrength::default()
            })
    }

    // ========================================================================
    // Facility: damage
    // ========================================================================

    fn facility_mut(&mut self) -> Result<&mut FacilityData> {
        let (id, classification) = (self.id, self.classification);
        self.facility.as_mut().ok_or_else(|| {
            GameError::InvalidState(format!("{id} is a {classification}, not a facility"))
        })
    }

    fn depot_mut(&mut self) -> Result<(&mut SupplyDepot, OperationalCapacity)> {
        let id = self.id;
        let facility = self.facility_mut()?;
        let capacity = facility.capacity();
        facility
            .depot_mut()
            .map(|depot| (depot, capacity))
            .ok_or_else(|| GameError::InvalidState(format!("{id} is not a supply depot")))
    }

    /// Supply depot state, if this is a depot.
    #[must_use]
    pub fn depot(&self) -> Option<&SupplyDepot> {
        self.facility.as_ref().and_then(FacilityData::depot)
    }

    /// Add facility damage. Returns the new damage.
    ///
    /// # Errors
    ///
    /// - [`GameError::InvalidState`] for non-base units.
    /// - [`GameError::Validation`] for negative amounts.
    pub fn try_add_facility_damage(&mut self, amount: i32) -> Result<i32> {
        let facility = self.facility_mut()?;
        let damage = facility.add_damage(amount)?;
        let capacity = facility.capacity();
        self.record(UnitEvent::FacilityDamaged {
            unit: self.id,
            damage,
            capacity,
        });
        Ok(damage)
    }

    /// Boundary form of [`Self::try_add_facility_damage`].
    pub fn add_facility_damage(&mut self, amount: i32) -> bool {
        match self.try_add_facility_damage(amount) {
            Ok(_) => true,
            Err(err) => {
                self.reject("add_facility_damage", &err);
                false
            }
        }
    }

    /// Repair facility damage. Returns the new damage.
    ///
    /// # Errors
    ///
    /// Same as [`Self::try_add_facility_damage`].
    pub fn try_repair_facility_damage(&mut self, amount: i32) -> Result<i32> {
        let facility = self.facility_mut()?;
        let damage = facility.repair(amount)?;
        let capacity = facility.capacity();
        self.record(UnitEvent::FacilityRepaired {
            unit: self.id,
            damage,
            capacity,
        });
        Ok(damage)
    }

    /// Boundary form of [`Self::try_repair_facility_damage`].
    pub fn repair_facility_damage(&mut self, amount: i32) -> bool {
        match self.try_repair_facility_damage(amount) {
            Ok(_) => true,
            Err(err) => {
                self.reject("repair_facility_damage", &err);
                false
            }
        }
    }

    // ========================================================================
    // Facility: supply depot
    // ========================================================================

    /// Upgrade the depot one size. `Ok(false)` at the top size.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidState`] if this is not a depot.
    pub fn try_upgrade_depot_size(&mut self) -> Result<bool> {
        let (depot, _) = self.depot_mut()?;
        if !depot.upgrade() {
            return Ok(false);
        }
        let size = format!("{:?}", depot.size());
        info!(unit = %self.id, %size, "Depot upgraded");
        self.record(UnitEvent::DepotUpgraded {
            depot: self.id,
            size,
        });
        Ok(true)
    }

    /// Boundary form of [`Self::try_upgrade_depot_size`].
    pub fn upgrade_depot_size(&mut self) -> bool {
        self.try_upgrade_depot_size().unwrap_or_else(|err| {
            self.reject("upgrade_depot_size", &err);
            false
        })
    }

    /// Check if the depot can reach a unit. `false` for non-depots.
    #[must_use]
    pub fn can_supply_unit_at(&self, distance: u32, zocs: u32) -> bool {
        self.facility.as_ref().is_some_and(|f| {
            f.depot()
                .is_some_and(|d| d.can_supply_at(f.capacity(), distance, zocs))
        })
    }

    fn record_delivery(&mut self, delivered: Fixed) -> Fixed {
        if delivered > Fixed::ZERO {
            let remaining = self
                .depot()
                .map_or(Fixed::ZERO, |d| d.stockpile().current());
            self.record(UnitEvent::SupplyDelivered {
                depot: self.id,
                delivered_centi: to_centi(delivered),
                remaining_centi: to_centi(remaining),
            });
        }
        delivered
    }

    /// Deliver supply overland. Returns the days delivered.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidState`] if this is not a depot.
    pub fn try_supply_unit(&mut self, distance: u32, zocs: u32) -> Result<Fixed> {
        let (depot, capacity) = self.depot_mut()?;
        let delivered = depot.supply_unit(capacity, distance, zocs);
        Ok(self.record_delivery(delivered))
    }

    /// Boundary form of [`Self::try_supply_unit`].
    pub fn supply_unit(&mut self, distance: u32, zocs: u32) -> Fixed {
        self.try_supply_unit(distance, zocs).unwrap_or_else(|err| {
            self.reject("supply_unit", &err);
            Fixed::ZERO
        })
    }

    /// Deliver supply by air from a main depot.
    pub fn perform_air_supply(&mut self, distance: u32) -> Fixed {
        match self.depot_mut() {
            Ok((depot, capacity)) => {
                let delivered = depot.air_supply(capacity, distance);
                self.record_delivery(delivered)
            }
            Err(err) => {
                self.reject("perform_air_supply", &err);
                Fixed::ZERO
            }
        }
    }

    /// Deliver supply by sea from a main depot.
    pub fn perform_naval_supply(&mut self, distance: u32) -> Fixed {
        match self.depot_mut() {
            Ok((depot, capacity)) => {
                let delivered = depot.naval_supply(capacity, distance);
                self.record_delivery(delivered)
            }
            Err(err) => {
                self.reject("perform_naval_supply", &err);
                Fixed::ZERO
            }
        }
    }

    /// Produce one turn of depot supply. Returns days added.
    pub fn generate_depot_supplies(&mut self) -> Fixed {
        match self.depot_mut() {
            Ok((depot, capacity)) => depot.generate(capacity),
            Err(err) => {
                self.reject("generate_depot_supplies", &err);
                Fixed::ZERO
            }
        }
    }

    /// Add to the depot stockpile. Returns days added.
    ///
    /// # Errors
    ///
    /// - [`GameError::InvalidState`] if this is not a depot.
    /// - [`GameError::Validation`] for negative amounts.
    /// - [`GameError::Capacity`] if the stockpile is already full.
    pub fn try_add_depot_supplies(&mut self, amount: Fixed) -> Result<Fixed> {
        let (depot, _) = self.depot_mut()?;
        depot.add_supplies(amount)
    }

    /// Boundary form of [`Self::try_add_depot_supplies`].
    pub fn add_depot_supplies(&mut self, amount: Fixed) -> Fixed {
        self.try_add_depot_supplies(amount).unwrap_or_else(|err| {
            self.reject("add_depot_supplies", &err);
            Fixed::ZERO
        })
    }

    /// Remove from the depot stockpile. Returns days removed.
    ///
    /// # Errors
    ///
    /// - [`GameError::InvalidState`] if this is not a depot.
    /// - [`GameError::Validation`] for negative amounts.
    pub fn try_remove_depot_supplies(&mut self, amount: Fixed) -> Result<Fixed> {
        let (depot, _) = self.depot_mut()?;
        depot.remove_supplies(amount)
    }

    /// Boundary form of [`Self::try_remove_depot_supplies`].
    pub fn remove_depot_supplies(&mut self, amount: Fixed) -> Fixed {
        self.try_remove_depot_supplies(amount).unwrap_or_else(|err| {
            self.reject("remove_depot_supplies", &err);
            Fixed::ZERO
        })
    }

    /// Enable or disable pushing supply through enemy ZOC.
    pub fn set_supply_penetration(&mut self, enabled: bool) -> bool {
        match self.depot_mut() {
            Ok((depot, _)) => {
                depot.set_supply_penetration(enabled);
                true
            }
            Err(err) => {
                self.reject("set_supply_penetration", &err);
                false
            }
        }
    }

    /// Change the depot category.
    pub fn set_depot_category(&mut self, category: DepotCategory) -> bool {
        match self.depot_mut() {
            Ok((depot, _)) => {
                depot.set_category(category);
                true
            }
            Err(err) => {
                self.reject("set_depot_category", &err);
                false
            }
        }
    }

    // ========================================================================
    // Facility: airbase
    // ========================================================================

    fn airbase_mut(&mut self) -> Result<&mut Airbase> {
        let id = self.id;
        self.facility_mut()?
            .airbase_mut()
            .ok_or_else(|| GameError::InvalidState(format!("{id} is not an airbase")))
    }

    /// Attach an aircraft by ID.
    ///
    /// # Errors
    ///
    /// - [`GameError::InvalidState`] if this is not an airbase.
    /// - [`GameError::Validation`] for non-air-combat classifications or
    ///   duplicates.
    /// - [`GameError::Capacity`] when full.
    pub fn try_attach_air_unit(
        &mut self,
        aircraft: UnitId,
        classification: UnitClassification,
    ) -> Result<()> {
        self.airbase_mut()?.attach(aircraft, classification)?;
        info!(airbase = %self.id, %aircraft, "Aircraft attached");
        self.record(UnitEvent::AircraftAttached {
            airbase: self.id,
            aircraft,
        });
        Ok(())
    }

    /// Boundary form of [`Self::try_attach_air_unit`].
    pub fn attach_air_unit(&mut self, aircraft: &Self) -> bool {
        match self.try_attach_air_unit(aircraft.id(), aircraft.classification()) {
            Ok(()) => true,
            Err(err) => {
                self.reject("attach_air_unit", &err);
                false
            }
        }
    }

    /// Detach an aircraft.
    ///
    /// # Errors
    ///
    /// - [`GameError::InvalidState`] if this is not an airbase.
    /// - [`GameError::Reference`] if it is not attached.
    pub fn try_detach_air_unit(&mut self, aircraft: UnitId) -> Result<()> {
        self.airbase_mut()?.detach(aircraft)?;
        info!(airbase = %self.id, %aircraft, "Aircraft detached");
        self.record(UnitEvent::AircraftDetached {
            airbase: self.id,
            aircraft,
        });
        Ok(())
    }

    /// Boundary form of [`Self::try_detach_air_unit`].
    pub fn detach_air_unit(&mut self, aircraft: UnitId) -> bool {
        match self.try_detach_air_unit(aircraft) {
            Ok(()) => true,
            Err(err) => {
                self.reject("detach_air_unit", &err);
                false
            }
        }
    }

    /// IDs of attached aircraft. Empty for non-airbases.
    #[must_use]
    pub fn attached_air_unit_ids(&self) -> &[UnitId] {
        self.facility
            .as_ref()
            .and_then(FacilityData::airbase)
            .map(Airbase::attached_ids)
            .unwrap_or_default()
    }

    /// Remaining attachment slots. Zero for non-airbases.
    #[must_use]
    pub fn available_air_slots(&self) -> usize {
        self.facility
            .as_ref()
            .and_then(FacilityData::airbase)
            .map_or(0, Airbase::available_slots)
    }

    /// Attached aircraft, looked up through `directory`.
    pub fn attached_units<'a, D: ReferenceDirectory + ?Sized>(
        &self,
        directory: &'a D,
    ) -> Vec<&'a Self> {
        self.facility
            .as_ref()
            .and_then(FacilityData::airbase)
            .map_or_else(Vec::new, |a| a.attached_units(directory))
    }

    /// Check if the airbase is operational with aircraft on hand.
    #[must_use]
    pub fn can_launch_air_operations(&self) -> bool {
        self.facility.as_ref().is_some_and(|f| {
            f.capacity().is_operational() && f.airbase().is_some_and(|a| !a.is_empty())
        })
    }

    // ========================================================================
    // Leader
    // ========================================================================

    /// Assigned leader ID.
    #[must_use]
    pub const fn leader_id(&self) -> Option<LeaderId> {
        self.leader
    }

    /// Assigned leader, looked up through `leaders`.
    ///
    /// `None` when no leader is assigned or the directory no longer has it.
    pub fn assigned_leader<'a, L: LeaderDirectory + ?Sized>(
        &self,
        leaders: &'a L,
    ) -> Option<&'a Leader> {
        self.leader.and_then(|id| leaders.leader(id))
    }

    /// Put a leader in command, releasing any current leader first.
    ///
    /// Both sides change together or not at all.
    ///
    /// # Errors
    ///
    /// - [`GameError::Reference`] if the leader is unknown.
    /// - [`GameError::InvalidState`] if it commands another unit.
    pub fn try_assign_leader<L: LeaderDirectory + ?Sized>(
        &mut self,
        leader: LeaderId,
        leaders: &mut L,
    ) -> Result<()> {
        if self.leader == Some(leader) {
            return Ok(());
        }
        let Some(entry) = leaders.leader(leader) else {
            return Err(GameError::Reference(leader.reference_key()));
        };
        if let Some(other) = entry.assigned_unit.filter(|u| *u != self.id) {
            return Err(GameError::InvalidState(format!(
                "{leader} already commands {other}"
            )));
        }

        let previous = self.leader;
        if let Some(old) = previous {
            leaders.unassign(old)?;
        }
        if let Err(err) = leaders.assign(leader, self.id) {
            if let Some(old) = previous {
                if let Err(rollback) = leaders.assign(old, self.id) {
                    warn!(unit = %self.id, leader = %old, error = %rollback, "Leader rollback failed");
                }
            }
            return Err(err);
        }

        self.leader = Some(leader);
        if let Some(old) = previous {
            self.record(UnitEvent::LeaderRemoved {
                unit: self.id,
                leader: old,
            });
        }
        self.record(UnitEvent::LeaderAssigned {
            unit: self.id,
            leader,
        });
        Ok(())
    }

    /// Boundary form of [`Self::try_assign_leader`].
    pub fn assign_leader<L: LeaderDirectory + ?Sized>(
        &mut self,
        leader: LeaderId,
        leaders: &mut L,
    ) -> bool {
        match self.try_assign_leader(leader, leaders) {
            Ok(()) => true,
            Err(err) => {
                self.reject("assign_leader", &err);
                false
            }
        }
    }

    /// Release the current leader. Returns its ID.
    ///
    /// A leader the directory no longer knows is dropped from this side
    /// with an integrity warning.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidState`] if no leader is assigned.
    pub fn try_remove_leader<L: LeaderDirectory + ?Sized>(
        &mut self,
        leaders: &mut L,
    ) -> Result<LeaderId> {
        let Some(leader) = self.leader else {
            return Err(GameError::InvalidState(format!(
                "{} has no leader assigned",
                self.id
            )));
        };
        match leaders.unassign(leader) {
            Ok(()) => {}
            Err(GameError::Reference(_)) => {
                warn!(unit = %self.id, %leader, "Dropping unknown leader");
                self.record(UnitEvent::IntegrityWarning {
                    unit: self.id,
                    detail: format!("leader {leader} not found, assignment dropped"),
                });
            }
            Err(err) => return Err(err),
        }
        self.leader = None;
        self.record(UnitEvent::LeaderRemoved {
            unit: self.id,
            leader,
        });
        Ok(leader)
    }

    /// Boundary form of [`Self::try_remove_leader`].
    pub fn remove_leader<L: LeaderDirectory + ?Sized>(&mut self, leaders: &mut L) -> bool {
        match self.try_remove_leader(leaders) {
            Ok(_) => true,
            Err(err) => {
                self.reject("remove_leader", &err);
                false
            }
        }
    }

    /// Leader bonus for a rating. Zero without a leader.
    pub fn leader_bonus<L: LeaderDirectory + ?Sized>(&self, bonus: LeaderBonus, leaders: &L) -> i32 {
        self.assigned_leader(leaders).map_or(0, |l| l.bonus(bonus))
    }

    /// Check a leader capability. `false` without a leader.
    pub fn has_leader_capability<L: LeaderDirectory + ?Sized>(
        &self,
        capability: LeaderCapability,
        leaders: &L,
    ) -> bool {
        self.assigned_leader(leaders)
            .is_some_and(|l| l.has_capability(capability))
    }

    /// Leader grade. The default grade without a leader.
    pub fn leader_grade<L: LeaderDirectory + ?Sized>(&self, leaders: &L) -> CommandGrade {
        self.assigned_leader(leaders)
            .map_or_else(CommandGrade::default, |l| l.grade)
    }

    /// Leader ability. [`CommandAbility::Average`] without a leader.
    pub fn leader_ability<L: LeaderDirectory + ?Sized>(&self, leaders: &L) -> CommandAbility {
        self.assigned_leader(leaders)
            .map_or_else(CommandAbility::default, |l| l.ability)
    }

    /// Leader name. Empty without a leader.
    pub fn leader_name<L: LeaderDirectory + ?Sized>(&self, leaders: &L) -> String {
        self.assigned_leader(leaders)
            .map_or_else(String::new, |l| l.name.clone())
    }

    /// Leader rank title. Empty without a leader.
    pub fn leader_rank<L: LeaderDirectory + ?Sized>(&self, leaders: &L) -> &'static str {
        self.assigned_leader(leaders).map_or("", Leader::rank_title)
    }

    /// Award the leader reputation. A no-op returning `false` without one;
    /// otherwise returns whether the leader was promoted.
    pub fn award_leader_reputation<L: LeaderDirectory + ?Sized>(
        &mut self,
        action: ReputationAction,
        leaders: &mut L,
    ) -> bool {
        let Some(leader) = self.leader else {
            return false;
        };
        match leaders.award_reputation(leader, action) {
            Ok(promoted) => promoted,
            Err(err) => {
                self.reject("award_leader_reputation", &err);
                false
            }
        }
    }

    // ========================================================================
    // References
    // ========================================================================

    /// Persisted attachment IDs still waiting for resolution.
    #[must_use]
    pub fn unresolved_references(&self) -> &[String] {
        self.facility
            .as_ref()
            .and_then(FacilityData::airbase)
            .map(Airbase::pending_ids)
            .unwrap_or_default()
    }

    /// Resolve persisted references through `directory`. Call once after
    /// every unit is loaded.
    ///
    /// Anything that fails to resolve is dropped and reported as an
    /// integrity warning; this never fails.
    pub fn resolve_references<D: ReferenceDirectory + ?Sized>(
        &mut self,
        directory: &D,
    ) -> Vec<String> {
        let Some(airbase) = self.facility.as_mut().and_then(FacilityData::airbase_mut) else {
            return Vec::new();
        };
        let warnings = airbase.resolve(directory);
        for detail in &warnings {
            warn!(unit = %self.id, detail = %detail, "Reference integrity warning");
            self.record(UnitEvent::IntegrityWarning {
                unit: self.id,
                detail: detail.clone(),
            });
        }
        warnings
    }

    /// Forget the assigned leader without touching any directory.
    ///
    /// Used when loading finds the assignment cannot stand. Returns the
    /// integrity warning, or `None` when no leader was assigned.
    pub(crate) fn drop_leader_reference(&mut self, reason: &str) -> Option<String> {
        let leader = self.leader.take()?;
        let detail = format!("leader {leader} {reason}, assignment dropped");
        warn!(unit = %self.id, detail = %detail, "Reference integrity warning");
        self.record(UnitEvent::IntegrityWarning {
            unit: self.id,
            detail: detail.clone(),
        });
        Some(detail)
    }

    // ========================================================================
    // Invariants
    // ========================================================================

    #[cfg(feature = "debug-validation")]
    fn check_invariants(&self) {
        for pool in [&self.hit_points, &self.supply, &self.movement] {
            debug_assert!(pool.current() >= Fixed::ZERO && pool.current() <= pool.max());
        }
        for kind in ActionKind::ALL {
            let pool = self.actions.pool(kind);
            debug_assert!(pool.current() >= Fixed::ZERO && pool.current() <= pool.max());
        }
        debug_assert_eq!(self.facility.is_some(), self.classification.is_base());
        if let Some(facility) = &self.facility {
            debug_assert_eq!(
                facility.capacity(),
                OperationalCapacity::from_damage(facility.damage())
            );
        }
    }

    #[cfg(not(feature = "debug-validation"))]
    #[allow(clippy::unused_self)]
    fn check_invariants(&self) {}
}

/// Everything [`Unit::from_parts`] needs.
#[derive(Debug, Clone)]
pub(crate) struct UnitParts {
    pub id: UnitId,
    pub template: UnitConfig,
    pub hit_points: MaxCurrent,
    pub supply: MaxCurrent,
    pub movement: MaxCurrent,
    pub actions: ActionPools,
    pub deployment: DeploymentPosition,
    pub efficiency: EfficiencyLevel,
    pub experience: ExperienceLevel,
    pub experience_points: u32,
    pub individual_modifier: Fixed,
    pub leader: Option<LeaderId>,
    pub facility: Option<FacilityData>,
}
