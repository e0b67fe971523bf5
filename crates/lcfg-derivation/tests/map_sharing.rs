/*
 * map_sharing.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Interning and sharing behaviour across derivation lists and the
 * derivation map.
 */

use std::rc::Rc;

use lcfg_derivation::{Change, Derivation, DerivationList, DerivationMap, MapConfig};
use pretty_assertions::assert_eq;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_interned_lists_are_shared() {
    init_tracing();
    let mut map = DerivationMap::new();
    let a = map.find_or_insert_string("site.h:3 node.rpms:10,12").unwrap();
    let b = map.find_or_insert_string("site.h:3 node.rpms:10,12").unwrap();
    assert!(Rc::ptr_eq(&a, &b));
    assert_eq!(map.len(), 1);
    assert_eq!(Rc::strong_count(&a), 3);
}

#[test]
fn test_resize_preserves_membership() {
    init_tracing();
    let mut map = DerivationMap::with_config(MapConfig {
        initial_capacity: 5,
        ..MapConfig::default()
    })
    .unwrap();

    let inputs: Vec<String> = (0..200).map(|i| format!("file{}.h:{}", i % 17, i)).collect();
    let lists: Vec<Rc<DerivationList>> = inputs
        .iter()
        .map(|input| map.find_or_insert_string(input).unwrap())
        .collect();

    assert_eq!(map.len(), 200);
    assert!(map.capacity() > 5);
    assert!(map.load_factor() < map.config().max_load);

    for (input, list) in inputs.iter().zip(&lists) {
        let again = map.find_or_insert_string(input).unwrap();
        assert!(Rc::ptr_eq(&again, list));
        let id = list.id().unwrap();
        assert!(Rc::ptr_eq(map.find_list(id).unwrap(), list));
    }
    assert_eq!(map.len(), 200);
    assert_eq!(map.iter().count(), 200);
}

#[test]
fn test_copy_on_write_does_not_leak_into_interned_list() {
    init_tracing();
    let mut map = DerivationMap::new();
    let interned = map.find_or_insert_string("a.h:1 b.h:2").unwrap();

    // Start a new list from the interned one; the derivations are shared.
    let mut edited = DerivationList::clone(&interned);
    assert!(Rc::ptr_eq(edited.find("a.h").unwrap(), interned.find("a.h").unwrap()));

    assert_eq!(edited.merge_file_line("a.h", Some(9)).unwrap(), Change::Modified);
    assert_eq!(edited.to_string(), "a.h:1,9 b.h:2");
    assert_eq!(interned.to_string(), "a.h:1 b.h:2");
    assert!(Rc::ptr_eq(edited.find("b.h").unwrap(), interned.find("b.h").unwrap()));

    // The edited list has no id until it is interned.
    assert_eq!(edited.id(), None);
    assert_eq!(map.insert_list(Rc::new(edited)).unwrap(), Change::Added);
    assert_eq!(map.len(), 2);
}

#[test]
fn test_shared_derivation_across_lists() {
    let shared = Rc::new(Derivation::from_string("profile.h:4").unwrap());
    let mut lists: Vec<DerivationList> = (0..3).map(|_| DerivationList::new()).collect();
    for list in &mut lists {
        list.merge_derivation(Rc::clone(&shared)).unwrap();
    }
    assert_eq!(Rc::strong_count(&shared), 4);

    lists[1].merge_file_line("profile.h", Some(5)).unwrap();
    assert_eq!(Rc::strong_count(&shared), 3);
    assert_eq!(lists[0].to_string(), "profile.h:4");
    assert_eq!(lists[1].to_string(), "profile.h:4,5");
    assert_eq!(lists[2].to_string(), "profile.h:4");

    drop(lists);
    assert_eq!(Rc::strong_count(&shared), 1);
}

#[test]
fn test_config_from_toml_drives_map() {
    let config = MapConfig::from_toml_str("initial_capacity = 2\nmax_load = 0.5\ntarget_load = 0.25").unwrap();
    let mut map = DerivationMap::with_config(config).unwrap();
    map.find_or_insert_string("x").unwrap();
    // 1 / 2 >= 0.5: grows to ceil(1 / 0.25)
    assert_eq!(map.capacity(), 4);
}
