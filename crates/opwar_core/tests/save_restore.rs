//! Saving a populated registry and loading it back.

use opwar_core::constants::MAX_AIR_UNITS;
use opwar_core::persistence::{FacilityRecord, SAVE_VERSION};
use opwar_core::prelude::*;
use opwar_test_utils::fixtures::{
    airbase_config, depot_config, fighter_config, fixed, leader, parse_ron, sample_roster,
    tank_config, SampleWorld,
};

/// A tank with a leader, a worked depot and an airbase with two fighters.
fn populated_world() -> (SampleWorld, UnitId, UnitId, [UnitId; 2]) {
    let mut world = SampleWorld::new();
    let tank = world.spawn(&tank_config());
    let depot = world.spawn(&depot_config(DepotSize::Medium, DepotCategory::Main));
    let base = world.spawn(&airbase_config());
    let fighters = [world.spawn(&fighter_config()), world.spawn(&fighter_config())];

    let unit = world.registry.get_mut(tank).unwrap();
    assert!(unit.assign_leader(leader(2), &mut world.leaders));
    assert!(unit.perform_combat_action());
    assert!(unit.change_deployment_position(DeploymentPosition::HastyDefense));
    unit.take_damage(fixed(9));
    unit.add_experience(130);

    let depot_unit = world.unit_mut(depot);
    assert!(depot_unit.add_facility_damage(30));
    assert!(depot_unit.set_supply_penetration(true));
    depot_unit.supply_unit(1, 0);

    for fighter in fighters {
        world.registry.attach_air_unit(base, fighter).unwrap();
    }
    world.registry.drain_events();

    (world, tank, base, fighters)
}

fn records(registry: &UnitRegistry) -> Vec<UnitRecord> {
    registry.iter().map(Unit::to_record).collect()
}

#[test]
fn test_ron_save_restores_everything() {
    let (world, _, base, fighters) = populated_world();

    let text = UnitSave::capture(&world.registry).to_ron_string().unwrap();
    let (restored, warnings) = UnitSave::from_ron_str("save.ron", &text)
        .unwrap()
        .restore()
        .unwrap();

    assert!(warnings.is_empty(), "{warnings:?}");
    assert_eq!(records(&restored), records(&world.registry));
    assert_eq!(restored.get(base).unwrap().attached_air_unit_ids(), &fighters);
    assert!(!restored.has_unresolved_references());
}

#[test]
fn test_bincode_save_restores_everything() {
    let (world, tank, _, _) = populated_world();

    let bytes = UnitSave::capture(&world.registry).to_bytes().unwrap();
    let (restored, warnings) = UnitSave::from_bytes(&bytes).unwrap().restore().unwrap();

    assert!(warnings.is_empty());
    assert_eq!(records(&restored), records(&world.registry));

    let unit = restored.get(tank).unwrap();
    assert_eq!(unit.leader_id(), Some(leader(2)));
    assert_eq!(unit.deployment(), DeploymentPosition::HastyDefense);
    assert_eq!(unit.experience(), ExperienceLevel::Trained);
    assert_eq!(unit.actions().combat.current(), fixed(0));
}

#[test]
fn test_restored_units_keep_working() {
    let (world, tank, _, _) = populated_world();
    let save = UnitSave::capture(&world.registry);
    let (mut restored, _) = save.restore().unwrap();

    let unit = restored.get_mut(tank).unwrap();
    assert!(!unit.perform_combat_action());
    unit.refresh_all_actions();
    assert!(unit.perform_intel_action());

    // New IDs never collide with loaded ones.
    let fresh = restored.ids_mut().allocate();
    assert!(restored.get(fresh).is_none());
    assert!(restored.iter().all(|u| u.id() < fresh));
}

#[test]
fn test_missing_aircraft_becomes_integrity_warning() {
    let (world, _, base, fighters) = populated_world();
    let mut save = UnitSave::capture(&world.registry);
    save.units.retain(|r| r.id != fighters[0]);

    let (mut restored, warnings) = save.restore().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("not found"), "{}", warnings[0]);

    let airbase = restored.get(base).unwrap();
    assert_eq!(airbase.attached_air_unit_ids(), &fighters[1..]);
    assert!(airbase.unresolved_references().is_empty());

    let events = restored.drain_events();
    assert!(matches!(
        events.as_slice(),
        [UnitEvent::IntegrityWarning { unit, .. }] if *unit == base
    ));
}

#[test]
fn test_malformed_attachment_id_is_dropped() {
    let (world, _, base, _) = populated_world();
    let mut save = UnitSave::capture(&world.registry);
    let record = save.units.iter_mut().find(|r| r.id == base).unwrap();
    record
        .facility
        .as_mut()
        .unwrap()
        .attached_unit_ids
        .push("hangar-7".to_string());

    let (restored, warnings) = save.restore().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(restored.get(base).unwrap().attached_air_unit_ids().len(), 2);
}

#[test]
fn test_tampered_pools_are_clamped() {
    let (world, tank, _, _) = populated_world();
    let mut save = UnitSave::capture(&world.registry);
    let record = save.units.iter_mut().find(|r| r.id == tank).unwrap();
    // Raw bits for 40 and 400.
    record.hit_points = parse_ron("(max: 171798691840, current: 1717986918400)");
    record.facility = Some(FacilityRecord {
        damage: 10,
        depot: None,
        attached_unit_ids: Vec::new(),
    });

    let (restored, _) = save.restore().unwrap();
    let unit = restored.get(tank).unwrap();
    assert_eq!(unit.hit_points().current(), fixed(40));
    // Field units never carry a facility, whatever the save says.
    assert!(unit.facility().is_none());
}

#[test]
fn test_version_and_decode_errors() {
    let (world, _, _, _) = populated_world();
    let mut save = UnitSave::capture(&world.registry);
    assert_eq!(save.version, SAVE_VERSION);

    save.version = SAVE_VERSION + 1;
    assert!(matches!(save.restore(), Err(GameError::InvalidState(_))));

    assert!(matches!(
        UnitSave::from_ron_str("broken.ron", "(version: 1, units: [("),
        Err(GameError::Data { .. })
    ));
    assert!(matches!(
        UnitSave::from_bytes(&[1, 2, 3]),
        Err(GameError::Data { .. })
    ));
}

#[test]
fn test_registry_bookkeeping() {
    let (mut world, tank, base, _) = populated_world();

    let duplicate = world.unit(tank).clone();
    assert!(matches!(
        world.registry.insert(duplicate),
        Err(GameError::Validation(_))
    ));

    let unit = world.unit_mut(tank);
    unit.take_damage(fixed(100));
    assert_eq!(world.registry.remove_destroyed(&mut world.leaders), vec![tank]);
    assert!(world.registry.get(tank).is_none());
    assert_eq!(world.registry.len(), 4);

    let fighter = world.unit(base).attached_air_unit_ids()[0];
    assert!(world.registry.remove(fighter, &mut world.leaders).is_some());
    assert_eq!(world.unit(base).attached_air_unit_ids().len(), 1);
    assert_eq!(world.unit(base).attached_units(&world.registry).len(), 1);
}

// =============================================================================
// Removal keeps references consistent
// =============================================================================

#[test]
fn test_removed_aircraft_frees_its_slot() {
    let (mut world, _, base, fighters) = populated_world();
    for _ in fighters.len()..MAX_AIR_UNITS {
        let extra = world.spawn(&fighter_config());
        world.registry.attach_air_unit(base, extra).unwrap();
    }
    assert_eq!(world.unit(base).available_air_slots(), 0);
    world.registry.drain_events();

    world.unit_mut(fighters[0]).take_damage(fixed(1000));
    assert_eq!(
        world.registry.remove_destroyed(&mut world.leaders),
        vec![fighters[0]]
    );

    let airbase = world.unit(base);
    assert!(!airbase.attached_air_unit_ids().contains(&fighters[0]));
    assert_eq!(airbase.available_air_slots(), 1);
    assert_eq!(
        airbase.attached_units(&world.registry).len(),
        airbase.attached_air_unit_ids().len()
    );
    assert_eq!(
        world.registry.drain_events(),
        vec![UnitEvent::AircraftDetached {
            airbase: base,
            aircraft: fighters[0]
        }]
    );

    let replacement = world.spawn(&fighter_config());
    assert!(world.registry.attach_air_unit(base, replacement).is_ok());
}

#[test]
fn test_removed_unit_releases_leader() {
    let (mut world, tank, _, _) = populated_world();
    world.unit_mut(tank).take_damage(fixed(1000));

    let removed = world.registry.remove(tank, &mut world.leaders).unwrap();
    assert!(removed.leader_id().is_none());
    assert!(!world.leaders.leader(leader(2)).unwrap().is_assigned());

    let successor = world.spawn(&tank_config());
    let unit = world.registry.get_mut(successor).unwrap();
    assert!(unit.assign_leader(leader(2), &mut world.leaders));
}

#[test]
fn test_aircraft_cannot_join_two_airbases() {
    let (mut world, _, base, fighters) = populated_world();
    let second = world.spawn(&airbase_config());

    assert!(matches!(
        world.registry.attach_air_unit(second, fighters[0]),
        Err(GameError::Validation(_))
    ));
    assert!(world.unit(second).attached_air_unit_ids().is_empty());

    world.registry.detach_air_unit(base, fighters[0]).unwrap();
    world.registry.attach_air_unit(second, fighters[0]).unwrap();
    assert_eq!(world.registry.airbase_holding(fighters[0]), Some(second));
}

#[test]
fn test_aircraft_claimed_twice_in_save_stays_with_first_airbase() {
    let (mut world, _, base, fighters) = populated_world();
    let second = world.spawn(&airbase_config());
    let mut save = UnitSave::capture(&world.registry);
    let record = save.units.iter_mut().find(|r| r.id == second).unwrap();
    record
        .facility
        .as_mut()
        .unwrap()
        .attached_unit_ids
        .push(fighters[1].to_string());

    let (restored, warnings) = save.restore().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("already attached"), "{}", warnings[0]);
    assert_eq!(restored.get(base).unwrap().attached_air_unit_ids(), &fighters);
    assert!(restored.get(second).unwrap().attached_air_unit_ids().is_empty());
}

// =============================================================================
// Leader integrity across loading
// =============================================================================

#[test]
fn test_leader_claimed_twice_in_save_stays_with_first_unit() {
    let (mut world, tank, _, _) = populated_world();
    let rival = world.spawn(&tank_config());
    let mut save = UnitSave::capture(&world.registry);
    save.units.iter_mut().find(|r| r.id == rival).unwrap().leader = Some(leader(2));

    let (mut restored, warnings) = save.restore().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("already commands"), "{}", warnings[0]);
    assert_eq!(restored.get(tank).unwrap().leader_id(), Some(leader(2)));
    assert!(restored.get(rival).unwrap().leader_id().is_none());

    let events = restored.drain_events();
    assert!(matches!(
        events.as_slice(),
        [UnitEvent::IntegrityWarning { unit, .. }] if *unit == rival
    ));
}

#[test]
fn test_restore_with_leaders_records_assignments() {
    let (world, tank, _, _) = populated_world();
    let save = UnitSave::capture(&world.registry);

    let mut roster = sample_roster();
    let (restored, warnings) = save.restore_with_leaders(&mut roster).unwrap();
    assert!(warnings.is_empty(), "{warnings:?}");
    assert_eq!(roster.leader(leader(2)).unwrap().assigned_unit, Some(tank));
    assert_eq!(restored.get(tank).unwrap().leader_id(), Some(leader(2)));
}

#[test]
fn test_restore_with_leaders_drops_conflicts() {
    let (world, tank, _, _) = populated_world();

    let mut roster = sample_roster();
    roster.assign(leader(2), UnitId::new(999)).unwrap();
    let (restored, warnings) = UnitSave::capture(&world.registry)
        .restore_with_leaders(&mut roster)
        .unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(restored.get(tank).unwrap().leader_id().is_none());
    assert_eq!(
        roster.leader(leader(2)).unwrap().assigned_unit,
        Some(UnitId::new(999))
    );

    let mut empty = LeaderRoster::new();
    let (restored, warnings) = UnitSave::capture(&world.registry)
        .restore_with_leaders(&mut empty)
        .unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("not found"), "{}", warnings[0]);
    assert!(restored.get(tank).unwrap().leader_id().is_none());
}
