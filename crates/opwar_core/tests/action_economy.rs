//! Per-turn action gating: tokens, movement and supply.

use opwar_core::prelude::*;
use opwar_test_utils::fixtures::{
    fighter_config, fixed, fixed_f, headquarters_config, recon_config, tank_config, SampleWorld,
};
use opwar_test_utils::strategies::arb_action;
use proptest::prelude::*;

fn tank() -> Unit {
    SampleWorld::new().build(&tank_config())
}

/// Pools that must not move when an action is refused.
fn snapshot(unit: &Unit) -> (MaxCurrent, MaxCurrent, ActionPools) {
    (*unit.movement(), *unit.supply(), unit.actions().clone())
}

// =============================================================================
// Combat
// =============================================================================

#[test]
fn test_combat_spends_token_movement_and_supply() {
    let mut unit = tank();
    assert!(unit.perform_combat_action());

    // 25% of 12 movement, one day of supply.
    assert_eq!(unit.movement().current(), fixed(9));
    assert_eq!(unit.supply().current(), fixed(6));
    assert_eq!(unit.actions().combat.current(), fixed(0));
}

#[test]
fn test_exhausted_combat_leaves_state_unchanged() {
    let mut unit = tank();
    assert!(unit.perform_combat_action());
    let before = snapshot(&unit);

    assert!(!unit.perform_combat_action());
    assert_eq!(snapshot(&unit), before);
    assert_eq!(
        unit.try_perform_action(ActionKind::Combat, Fixed::ZERO),
        Err(ActionBlocked::NoTokens(ActionKind::Combat))
    );
    // Running out is not a fault; nothing is recorded.
    assert!(unit.pending_events().is_empty());
}

#[test]
fn test_combat_needs_supply_reserve() {
    let mut unit = tank();
    assert!(unit.consume_supplies(fixed_f(5.5)));
    let before = snapshot(&unit);

    // Needs cost plus threshold: two days.
    assert!(matches!(
        unit.try_perform_action(ActionKind::Combat, Fixed::ZERO),
        Err(ActionBlocked::Supply { .. })
    ));
    assert_eq!(snapshot(&unit), before);

    // Intel only needs three quarters of a day.
    assert!(unit.perform_intel_action());
    assert_eq!(unit.supply().current(), fixed_f(1.25));
}

#[test]
fn test_combat_needs_movement() {
    let mut unit = tank();
    assert!(unit.consume_movement_points(fixed(10)));
    let before = snapshot(&unit);

    assert!(matches!(
        unit.try_perform_action(ActionKind::Combat, Fixed::ZERO),
        Err(ActionBlocked::Movement { .. })
    ));
    assert_eq!(snapshot(&unit), before);
}

// =============================================================================
// Moves and other kinds
// =============================================================================

#[test]
fn test_move_pays_supplied_cost() {
    let mut world = SampleWorld::new();
    let mut recon = world.build(&recon_config());

    assert!(recon.perform_move_action(fixed(7)));
    assert!(recon.perform_move_action(fixed(9)));
    assert_eq!(recon.movement().current(), fixed(0));
    assert_eq!(recon.supply().current(), fixed_f(4.5));
    assert!(!recon.perform_move_action(fixed(0)));
}

#[test]
fn test_move_rejects_negative_cost() {
    let mut unit = tank();
    assert_eq!(
        unit.try_perform_action(ActionKind::Move, fixed(-3)),
        Err(ActionBlocked::NotAllowed("movement cost is negative"))
    );
    assert!(unit.movement().is_full());
}

#[test]
fn test_opportunity_costs_no_movement() {
    let mut unit = tank();
    assert!(unit.consume_movement_points(fixed(12)));
    assert!(unit.perform_opportunity_action());
    assert_eq!(unit.supply().current(), fixed_f(6.5));
}

#[test]
fn test_facilities_never_act() {
    let mut world = SampleWorld::new();
    let mut hq = world.build(&headquarters_config());

    assert!(!hq.perform_combat_action());
    assert!(!hq.perform_move_action(Fixed::ZERO));
    assert!(hq.available_actions().is_exhausted());
}

// =============================================================================
// Planning and refresh
// =============================================================================

#[test]
fn test_available_actions_fresh_units() {
    let mut world = SampleWorld::new();

    let counts = world.build(&recon_config()).available_actions();
    assert_eq!(counts.get(ActionKind::Move), 2);
    assert_eq!(counts.get(ActionKind::Combat), 1);

    let fighter = world.build(&fighter_config()).available_actions();
    assert_eq!(fighter.get(ActionKind::Move), 3);
    assert_eq!(fighter.get(ActionKind::Deploy), 0);
}

#[test]
fn test_available_actions_reflect_gates() {
    let mut unit = tank();
    assert!(unit.consume_supplies(fixed_f(5.5)));
    let counts = unit.available_actions();

    assert_eq!(counts.get(ActionKind::Combat), 0);
    assert_eq!(counts.get(ActionKind::Move), 1);
    assert_eq!(counts.get(ActionKind::Intel), 1);
    assert_eq!(counts.get(ActionKind::Opportunity), 1);
    assert_eq!(counts.get(ActionKind::Deploy), 1);

    // Planning never mutates.
    assert_eq!(unit.supply().current(), fixed_f(1.5));
}

#[test]
fn test_refresh_restores_tokens_only() {
    let mut unit = tank();
    assert!(unit.perform_combat_action());
    assert!(unit.perform_intel_action());

    unit.refresh_all_actions();
    assert!(unit.actions().combat.is_full());
    assert!(unit.actions().intel.is_full());
    assert!(!unit.movement().is_full());

    unit.refresh_movement_points();
    assert!(unit.movement().is_full());
    assert!(unit.perform_combat_action());
}

// =============================================================================
// Deployment ladder
// =============================================================================

#[test]
fn test_deployment_moves_one_rung() {
    let mut unit = tank();

    assert_eq!(
        unit.try_change_deployment_position(DeploymentPosition::Fortified),
        Err(ActionBlocked::NotAllowed(
            "deployment changes move one step at a time"
        ))
    );
    assert!(unit.change_deployment_position(DeploymentPosition::HastyDefense));
    assert_eq!(unit.deployment(), DeploymentPosition::HastyDefense);
    // Half of 12 movement and half a day of supply.
    assert_eq!(unit.movement().current(), fixed(6));
    assert_eq!(unit.supply().current(), fixed_f(6.5));

    assert!(!unit.change_deployment_position(DeploymentPosition::Entrenched));
    assert_eq!(unit.deployment(), DeploymentPosition::HastyDefense);
}

#[test]
fn test_deploy_action_without_position_change() {
    let mut unit = tank();
    assert!(unit.perform_deploy_action());
    assert_eq!(unit.deployment(), DeploymentPosition::Deployed);
    assert_eq!(unit.movement().current(), fixed(6));
    assert_eq!(unit.supply().current(), fixed_f(6.5));

    // The single deploy token is gone, so the ladder is locked too.
    let before = snapshot(&unit);
    assert!(!unit.perform_deploy_action());
    assert!(!unit.change_deployment_position(DeploymentPosition::HastyDefense));
    assert_eq!(snapshot(&unit), before);
}

#[test]
fn test_aircraft_cannot_deploy() {
    let mut world = SampleWorld::new();
    let mut fighter = world.build(&fighter_config());
    assert!(!fighter.change_deployment_position(DeploymentPosition::Mobile));
    assert!(!fighter.perform_deploy_action());
    assert_eq!(fighter.deployment(), DeploymentPosition::Deployed);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// No script of actions can push a pool outside its bounds, and a
    /// refused action never changes anything.
    #[test]
    fn prop_action_scripts_keep_pools_bounded(
        script in prop::collection::vec(arb_action(), 0..24),
    ) {
        let mut unit = tank();
        for (kind, cost) in script {
            let before = snapshot(&unit);
            if unit.try_perform_action(kind, cost).is_err() {
                prop_assert_eq!(snapshot(&unit), before);
            }
            for pool in [unit.movement(), unit.supply()] {
                prop_assert!(pool.current() >= Fixed::ZERO);
                prop_assert!(pool.current() <= pool.max());
            }
            for kind in ActionKind::ALL {
                let tokens = unit.actions().pool(kind);
                prop_assert!(tokens.current() >= Fixed::ZERO);
            }
        }
    }

    /// Whatever the planner reports can actually be taken once.
    #[test]
    fn prop_available_actions_are_exercisable(
        script in prop::collection::vec(arb_action(), 0..12),
    ) {
        let mut unit = tank();
        for (kind, cost) in script {
            let _ = unit.try_perform_action(kind, cost);
        }
        let counts = unit.available_actions();
        for kind in ActionKind::ALL {
            if kind != ActionKind::Move && counts.get(kind) > 0 {
                let mut probe = unit.clone();
                prop_assert!(probe.try_perform_action(kind, Fixed::ZERO).is_ok());
            }
        }
    }
}
