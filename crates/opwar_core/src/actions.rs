//! Per-turn action economy.
//!
//! Five independent token pools gated jointly on movement points and
//! supply. Gating is evaluated here without touching unit state; the unit
//! commits the returned [`ActionSpend`] only when every check passed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classification::ActionAllotment;
use crate::constants::{
    COMBAT_MOVEMENT_PERCENT, COMBAT_SUPPLY_COST_PERCENT, COMBAT_SUPPLY_THRESHOLD_PERCENT,
    DEPLOY_MOVEMENT_PERCENT, DEPLOY_SUPPLY_COST_PERCENT, DEPLOY_SUPPLY_THRESHOLD_PERCENT,
    INTEL_MOVEMENT_PERCENT, INTEL_SUPPLY_COST_PERCENT, INTEL_SUPPLY_THRESHOLD_PERCENT,
    MOVE_SUPPLY_COST_PERCENT, MOVE_SUPPLY_THRESHOLD_PERCENT, OPPORTUNITY_MOVEMENT_PERCENT,
    OPPORTUNITY_SUPPLY_COST_PERCENT, OPPORTUNITY_SUPPLY_THRESHOLD_PERCENT,
};
use crate::math::{ceil_to_i32, percent, Fixed};
use crate::stats::MaxCurrent;

/// Kinds of per-turn action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// Movement.
    Move,
    /// Attack.
    Combat,
    /// Deployment position change.
    Deploy,
    /// Reactive fire.
    Opportunity,
    /// Intelligence gathering.
    Intel,
}

impl ActionKind {
    /// All kinds.
    pub const ALL: [Self; 5] = [
        Self::Move,
        Self::Combat,
        Self::Deploy,
        Self::Opportunity,
        Self::Intel,
    ];

    /// Cost table entry.
    #[must_use]
    pub const fn cost(self) -> ActionCost {
        match self {
            Self::Move => ActionCost {
                movement_percent: None,
                supply_cost_percent: MOVE_SUPPLY_COST_PERCENT,
                supply_threshold_percent: MOVE_SUPPLY_THRESHOLD_PERCENT,
            },
            Self::Combat => ActionCost {
                movement_percent: Some(COMBAT_MOVEMENT_PERCENT),
                supply_cost_percent: COMBAT_SUPPLY_COST_PERCENT,
                supply_threshold_percent: COMBAT_SUPPLY_THRESHOLD_PERCENT,
            },
            Self::Deploy => ActionCost {
                movement_percent: Some(DEPLOY_MOVEMENT_PERCENT),
                supply_cost_percent: DEPLOY_SUPPLY_COST_PERCENT,
                supply_threshold_percent: DEPLOY_SUPPLY_THRESHOLD_PERCENT,
            },
            Self::Opportunity => ActionCost {
                movement_percent: Some(OPPORTUNITY_MOVEMENT_PERCENT),
                supply_cost_percent: OPPORTUNITY_SUPPLY_COST_PERCENT,
                supply_threshold_percent: OPPORTUNITY_SUPPLY_THRESHOLD_PERCENT,
            },
            Self::Intel => ActionCost {
                movement_percent: Some(INTEL_MOVEMENT_PERCENT),
                supply_cost_percent: INTEL_SUPPLY_COST_PERCENT,
                supply_threshold_percent: INTEL_SUPPLY_THRESHOLD_PERCENT,
            },
        }
    }
}

/// Movement and supply prices of one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionCost {
    /// Fraction of max movement spent, or `None` when the caller supplies
    /// the movement cost (moves).
    pub movement_percent: Option<i32>,
    /// Supply consumed.
    pub supply_cost_percent: i32,
    /// Supply that must remain on hand after paying.
    pub supply_threshold_percent: i32,
}

impl ActionCost {
    /// Movement spent for a unit with `max_movement` points.
    ///
    /// Zero for units with no movement allowance; such units are immobile
    /// and the movement gate passes trivially.
    #[must_use]
    pub fn movement_for(&self, max_movement: Fixed, supplied: Fixed) -> Fixed {
        match self.movement_percent {
            Some(p) => Fixed::from_num(ceil_to_i32(max_movement * percent(p)).max(0)),
            None => supplied,
        }
    }

    /// Supply consumed.
    #[must_use]
    pub fn supply_cost(&self) -> Fixed {
        percent(self.supply_cost_percent)
    }

    /// Supply that must be on hand before paying.
    #[must_use]
    pub fn supply_required(&self) -> Fixed {
        percent(self.supply_cost_percent + self.supply_threshold_percent)
    }
}

/// The three pool changes of an allowed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSpend {
    /// Kind whose token is consumed.
    pub kind: ActionKind,
    /// Movement points to subtract.
    pub movement: Fixed,
    /// Supply to subtract.
    pub supply: Fixed,
}

/// Why an action cannot be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ActionBlocked {
    /// No tokens of this kind left this turn.
    #[error("no {0:?} actions remaining")]
    NoTokens(ActionKind),
    /// Not enough movement points.
    #[error("needs {required} movement, has {available}")]
    Movement {
        /// Points needed.
        required: Fixed,
        /// Points on hand.
        available: Fixed,
    },
    /// Not enough supply.
    #[error("needs {required} days of supply, has {available}")]
    Supply {
        /// Days needed.
        required: Fixed,
        /// Days on hand.
        available: Fixed,
    },
    /// The unit cannot take this action at all.
    #[error("{0}")]
    NotAllowed(&'static str),
}

/// Token pools for one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPools {
    /// Move tokens.
    pub moves: MaxCurrent,
    /// Combat tokens.
    pub combat: MaxCurrent,
    /// Deploy tokens.
    pub deploy: MaxCurrent,
    /// Opportunity tokens.
    pub opportunity: MaxCurrent,
    /// Intel tokens.
    pub intel: MaxCurrent,
}

impl ActionPools {
    /// Full pools for an allotment.
    #[must_use]
    pub fn from_allotment(allotment: ActionAllotment) -> Self {
        Self {
            moves: MaxCurrent::from_int(i32::from(allotment.moves)),
            combat: MaxCurrent::from_int(i32::from(allotment.combat)),
            deploy: MaxCurrent::from_int(i32::from(allotment.deploy)),
            opportunity: MaxCurrent::from_int(i32::from(allotment.opportunity)),
            intel: MaxCurrent::from_int(i32::from(allotment.intel)),
        }
    }

    /// Pool for a kind.
    #[must_use]
    pub const fn pool(&self, kind: ActionKind) -> &MaxCurrent {
        match kind {
            ActionKind::Move => &self.moves,
            ActionKind::Combat => &self.combat,
            ActionKind::Deploy => &self.deploy,
            ActionKind::Opportunity => &self.opportunity,
            ActionKind::Intel => &self.intel,
        }
    }

    /// Mutable pool for a kind.
    pub fn pool_mut(&mut self, kind: ActionKind) -> &mut MaxCurrent {
        match kind {
            ActionKind::Move => &mut self.moves,
            ActionKind::Combat => &mut self.combat,
            ActionKind::Deploy => &mut self.deploy,
            ActionKind::Opportunity => &mut self.opportunity,
            ActionKind::Intel => &mut self.intel,
        }
    }

    /// Reset every pool to its maximum.
    pub fn refresh(&mut self) {
        for kind in ActionKind::ALL {
            self.pool_mut(kind).reset_to_max();
        }
    }

    /// Check every gate for `kind`. Nothing is mutated.
    ///
    /// `move_cost` is only read for [`ActionKind::Move`].
    pub fn evaluate(
        &self,
        kind: ActionKind,
        movement: &MaxCurrent,
        supply: &MaxCurrent,
        move_cost: Fixed,
    ) -> Result<ActionSpend, ActionBlocked> {
        if self.pool(kind).current() < Fixed::ONE {
            return Err(ActionBlocked::NoTokens(kind));
        }

        let cost = kind.cost();
        let movement_cost = cost.movement_for(movement.max(), move_cost);
        if !movement.has_at_least(movement_cost) {
            return Err(ActionBlocked::Movement {
                required: movement_cost,
                available: movement.current(),
            });
        }

        let required = cost.supply_required();
        if !supply.has_at_least(required) {
            return Err(ActionBlocked::Supply {
                required,
                available: supply.current(),
            });
        }

        Ok(ActionSpend {
            kind,
            movement: movement_cost,
            supply: cost.supply_cost(),
        })
    }

    /// Commit a spend produced by [`Self::evaluate`].
    pub fn commit(
        &mut self,
        spend: ActionSpend,
        movement: &mut MaxCurrent,
        supply: &mut MaxCurrent,
    ) {
        self.pool_mut(spend.kind).decrement();
        movement.subtract(spend.movement);
        supply.subtract(spend.supply);
    }

    /// Exercisable token counts for planning.
    ///
    /// A kind reports its remaining tokens when every gate passes for one
    /// action, otherwise zero. Moves only need some movement left.
    #[must_use]
    pub fn available(&self, movement: &MaxCurrent, supply: &MaxCurrent) -> AvailableActions {
        let count = |kind: ActionKind| {
            if kind == ActionKind::Move && movement.current() <= Fixed::ZERO {
                return 0;
            }
            match self.evaluate(kind, movement, supply, Fixed::ZERO) {
                Ok(_) => self.pool(kind).current_whole(),
                Err(_) => 0,
            }
        };

        AvailableActions {
            moves: count(ActionKind::Move),
            combat: count(ActionKind::Combat),
            deploy: count(ActionKind::Deploy),
            opportunity: count(ActionKind::Opportunity),
            intel: count(ActionKind::Intel),
        }
    }
}

/// Exercisable actions per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AvailableActions {
    /// Moves.
    pub moves: u32,
    /// Combat.
    pub combat: u32,
    /// Deploy.
    pub deploy: u32,
    /// Opportunity.
    pub opportunity: u32,
    /// Intel.
    pub intel: u32,
}

impl AvailableActions {
    /// Count for one kind.
    #[must_use]
    pub const fn get(&self, kind: ActionKind) -> u32 {
        match kind {
            ActionKind::Move => self.moves,
            ActionKind::Combat => self.combat,
            ActionKind::Deploy => self.deploy,
            ActionKind::Opportunity => self.opportunity,
            ActionKind::Intel => self.intel,
        }
    }

    /// Check if nothing can be done.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.moves == 0
            && self.combat == 0
            && self.deploy == 0
            && self.opportunity == 0
            && self.intel == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(n: i32) -> Fixed {
        Fixed::from_num(n)
    }

    fn pools() -> ActionPools {
        ActionPools::from_allotment(ActionAllotment::STANDARD)
    }

    #[test]
    fn test_movement_cost_is_ceiling() {
        // 10 × 25% = 2.5 → 3
        let cost = ActionKind::Combat.cost();
        assert_eq!(cost.movement_for(fixed(10), Fixed::ZERO), fixed(3));
        // 10 × 15% = 1.5 → 2
        assert_eq!(
            ActionKind::Intel.cost().movement_for(fixed(10), Fixed::ZERO),
            fixed(2)
        );
        // Immobile
        assert_eq!(cost.movement_for(Fixed::ZERO, Fixed::ZERO), Fixed::ZERO);
        // Moves use the caller's figure
        assert_eq!(
            ActionKind::Move.cost().movement_for(fixed(10), fixed(4)),
            fixed(4)
        );
    }

    #[test]
    fn test_evaluate_and_commit_combat() {
        let mut pools = pools();
        let mut movement = MaxCurrent::from_int(10);
        let mut supply = MaxCurrent::from_int(5);

        let spend = pools
            .evaluate(ActionKind::Combat, &movement, &supply, Fixed::ZERO)
            .unwrap();
        pools.commit(spend, &mut movement, &mut supply);

        assert_eq!(pools.combat.current(), Fixed::ZERO);
        assert_eq!(movement.current(), fixed(7));
        assert_eq!(supply.current(), fixed(4));
    }

    #[test]
    fn test_evaluate_blocks() {
        let mut pools = pools();
        let movement = MaxCurrent::from_int(10);
        let supply = MaxCurrent::with_current(fixed(10), Fixed::from_num(1.5));

        // Combat needs 2 days on hand
        assert!(matches!(
            pools.evaluate(ActionKind::Combat, &movement, &supply, Fixed::ZERO),
            Err(ActionBlocked::Supply { .. })
        ));
        // Intel needs 0.75
        assert!(pools
            .evaluate(ActionKind::Intel, &movement, &supply, Fixed::ZERO)
            .is_ok());

        pools.intel.set_current(Fixed::ZERO);
        assert_eq!(
            pools.evaluate(ActionKind::Intel, &movement, &supply, Fixed::ZERO),
            Err(ActionBlocked::NoTokens(ActionKind::Intel))
        );

        let tired = MaxCurrent::with_current(fixed(10), fixed(2));
        assert!(matches!(
            pools.evaluate(ActionKind::Deploy, &tired, &supply, Fixed::ZERO),
            Err(ActionBlocked::Movement { .. })
        ));
        assert!(matches!(
            pools.evaluate(ActionKind::Move, &tired, &supply, fixed(3)),
            Err(ActionBlocked::Movement { .. })
        ));
    }

    #[test]
    fn test_available_matches_gates() {
        let mut pools = ActionPools::from_allotment(ActionAllotment::RECON);
        let movement = MaxCurrent::from_int(8);
        let supply = MaxCurrent::with_current(fixed(10), Fixed::from_num(1.5));

        let available = pools.available(&movement, &supply);
        assert_eq!(available.moves, 2);
        assert_eq!(available.combat, 0); // needs 2 days
        assert_eq!(available.intel, 1);
        assert_eq!(available.opportunity, 1);
        assert_eq!(available.deploy, 1);

        pools.refresh();
        let stranded = MaxCurrent::with_current(fixed(8), Fixed::ZERO);
        assert_eq!(pools.available(&stranded, &supply).moves, 0);
    }

    #[test]
    fn test_facilities_have_nothing_available() {
        let pools = ActionPools::from_allotment(ActionAllotment::NONE);
        let available = pools.available(&MaxCurrent::from_int(0), &MaxCurrent::from_int(30));
        assert!(available.is_exhausted());
    }
}
