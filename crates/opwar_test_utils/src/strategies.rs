//! Property-based testing strategies.
//!
//! Fixed-point values are generated as whole hundredths so shrinking stays
//! readable.

use opwar_core::actions::ActionKind;
use opwar_core::classification::{DeploymentPosition, EfficiencyLevel, ExperienceLevel};
use opwar_core::facility::DepotSize;
use opwar_core::math::{percent, Fixed};
use opwar_core::stats::MaxCurrent;
use proptest::prelude::*;

/// Fixed-point value in `[min, max]`, in steps of 0.01.
pub fn arb_fixed(min: i32, max: i32) -> impl Strategy<Value = Fixed> {
    (min * 100..=max * 100).prop_map(percent)
}

/// A pool built from arbitrary, possibly out-of-range, inputs.
pub fn arb_pool() -> impl Strategy<Value = MaxCurrent> {
    (arb_fixed(0, 100), arb_fixed(-50, 150))
        .prop_map(|(max, current)| MaxCurrent::with_current(max, current))
}

/// Facility damage deltas, including negative ones.
pub fn arb_damage_steps() -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(-30..=70i32, 0..20)
}

/// Any deployment position.
pub fn arb_deployment() -> impl Strategy<Value = DeploymentPosition> {
    prop::sample::select(DeploymentPosition::LADDER.to_vec())
}

/// Any efficiency tier.
pub fn arb_efficiency() -> impl Strategy<Value = EfficiencyLevel> {
    prop_oneof![
        Just(EfficiencyLevel::StaticOperations),
        Just(EfficiencyLevel::DegradedOperations),
        Just(EfficiencyLevel::NormalOperations),
        Just(EfficiencyLevel::FullOperations),
    ]
}

/// Any experience tier.
pub fn arb_experience() -> impl Strategy<Value = ExperienceLevel> {
    prop_oneof![
        Just(ExperienceLevel::Raw),
        Just(ExperienceLevel::Green),
        Just(ExperienceLevel::Trained),
        Just(ExperienceLevel::Experienced),
        Just(ExperienceLevel::Veteran),
        Just(ExperienceLevel::Elite),
    ]
}

/// Any depot size.
pub fn arb_depot_size() -> impl Strategy<Value = DepotSize> {
    prop_oneof![
        Just(DepotSize::Small),
        Just(DepotSize::Medium),
        Just(DepotSize::Large),
        Just(DepotSize::Huge),
    ]
}

/// One step of a turn script: an action with the move cost it would pay.
pub fn arb_action() -> impl Strategy<Value = (ActionKind, Fixed)> {
    (prop::sample::select(ActionKind::ALL.to_vec()), arb_fixed(0, 15))
}
