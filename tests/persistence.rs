//! Roster persistence round-trip tests
//!
//! Exercises the full save/load path through the filesystem: every unit
//! field survives, and id allocation resumes past the stored ids.

use std::collections::BTreeMap;

use thrall::combat::{Ability, AttackKind, SequenceRoller};
use thrall::roster::{shared_allocator, Roster, UnitId};
use thrall::store::{self, RosterSet};

fn battle_worn_roster() -> Roster {
    let ids = shared_allocator();
    ids.lock().initialize(1);

    let mut roster = Roster::new(12, 13, 2, ids)
        .with_roller(Box::new(SequenceRoller::new([
            5, 20, // unit 1: crit for (11+5+3)*2
            2, 1, // unit 2: fumble
            14, // unit 3: save succeeds, takes 3
            1, // unit 4: save critically fails, takes 7
        ])));
    roster.add_units(4).unwrap();

    roster.add_damage_buff(3, 2);
    roster.group_attack(&[1, 2], 18, AttackKind::Sword);
    roster.group_saving_throw(&[3, 4], 15, 7, Ability::Dexterity);
    roster.update_health(&BTreeMap::from([(2, 4)]));
    roster
}

#[test]
fn file_round_trip_preserves_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("horde.json");

    let mut rosters = RosterSet::new();
    rosters.insert("horde".to_string(), battle_worn_roster());
    store::save_to_path(&path, &rosters).unwrap();

    let restored = store::load_from_path(&path, shared_allocator()).unwrap();

    assert_eq!(restored.len(), 1);
    let original = rosters["horde"].units();
    let loaded = restored["horde"].units();
    assert_eq!(loaded, original);

    // Spot-check the battle scars made it through
    let unit1 = &loaded[0];
    assert_eq!(unit1.last_roll, Some(20));
    assert_eq!(unit1.damage_done, 38);
    assert_eq!(unit1.num_successes, 1);
    assert_eq!(unit1.buff_duration, 1);
    assert_eq!(unit1.damage_buff, 3);

    let unit2 = &loaded[1];
    assert_eq!(unit2.current_health, 8);
    assert_eq!(unit2.num_fails, 1);
}

#[test]
fn allocation_resumes_past_stored_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("horde.json");

    let mut rosters = RosterSet::new();
    rosters.insert("horde".to_string(), battle_worn_roster());
    store::save_to_path(&path, &rosters).unwrap();

    let ids = shared_allocator();
    let mut restored = store::load_from_path(&path, ids.clone()).unwrap();

    let added = restored.get_mut("horde").unwrap().add_units(2).unwrap();
    assert_eq!(added, vec![5, 6]);
}

#[test]
fn multiple_rosters_round_trip_together() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hoard.json");

    let ids = shared_allocator();
    ids.lock().initialize(1);
    let mut first = Roster::new(10, 13, 2, ids.clone());
    let mut second = Roster::new(30, 10, 1, ids.clone());
    first.add_units(3).unwrap();
    second.add_units(2).unwrap();

    let mut rosters = RosterSet::new();
    rosters.insert("skeletons".to_string(), first);
    rosters.insert("zombies".to_string(), second);
    store::save_to_path(&path, &rosters).unwrap();

    let fresh_ids = shared_allocator();
    let restored = store::load_from_path(&path, fresh_ids.clone()).unwrap();

    let skeleton_ids: Vec<UnitId> = restored["skeletons"].units().iter().map(|u| u.id).collect();
    let zombie_ids: Vec<UnitId> = restored["zombies"].units().iter().map(|u| u.id).collect();
    assert_eq!(skeleton_ids, vec![1, 2, 3]);
    assert_eq!(zombie_ids, vec![4, 5]);

    // The shared counter sits past the highest id across both rosters
    assert_eq!(fresh_ids.lock().peek(), Some(6));
}
