/*
 * tag_list_properties.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Property-based tests for tag list parsing, serialization and set algebra.
 */

use lcfg_tags::TagList;
use proptest::prelude::*;

fn tag_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z][a-z0-9_]{0,5}", 0..12)
}

fn build(names: &[String]) -> TagList {
    TagList::from_string(&names.join(" ")).expect("generated names are valid")
}

fn dedup_in_order(names: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for name in names {
        if !seen.contains(name) {
            seen.push(name.clone());
        }
    }
    seen
}

proptest! {
    #[test]
    fn roundtrip_single_spaced(names in tag_names()) {
        let input = names.join(" ");
        let list = TagList::from_string(&input).unwrap();
        prop_assert_eq!(list.len(), names.len());
        prop_assert_eq!(list.to_string(), input);
    }

    #[test]
    fn separators_are_interchangeable(names in tag_names()) {
        let spaced = TagList::from_string(&names.join(" ")).unwrap();
        let mixed = TagList::from_string(&names.join("\t\r\n  ")).unwrap();
        prop_assert_eq!(spaced, mixed);
    }

    #[test]
    fn set_operations_with_self(names in tag_names()) {
        let list = build(&names);
        let unique = list.unique();
        prop_assert_eq!(list.union(&list), unique.clone());
        prop_assert_eq!(list.intersection(&list), unique);
        prop_assert!(list.subtract(&list).is_empty());
    }

    #[test]
    fn unique_keeps_first_occurrence(names in tag_names()) {
        let list = build(&names);
        let expected = dedup_in_order(&names);
        let actual: Vec<String> = list.unique().names().into_iter().map(String::from).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn union_intersection_subtract_partition(a in tag_names(), b in tag_names()) {
        let la = build(&a);
        let lb = build(&b);

        let union = la.union(&lb);
        let inter = la.intersection(&lb);
        let diff = la.subtract(&lb);

        for name in a.iter().chain(b.iter()) {
            prop_assert!(union.contains(name));
        }
        prop_assert_eq!(union.len(), union.unique().len());

        for name in dedup_in_order(&a) {
            let in_b = b.contains(&name);
            prop_assert_eq!(inter.contains(&name), in_b);
            prop_assert_eq!(diff.contains(&name), !in_b);
        }
        prop_assert_eq!(inter.len() + diff.len(), la.unique().len());
    }

    #[test]
    fn sort_orders_bytewise(names in tag_names()) {
        let mut list = build(&names);
        list.sort();
        let mut expected = names.clone();
        expected.sort();
        let actual: Vec<String> = list.names().into_iter().map(String::from).collect();
        prop_assert_eq!(actual, expected);
    }
}
