use std::collections::BTreeSet;

use ordbtree::{BTreeIndexSet, Error};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn rejects_small_orders() {
    assert_eq!(
        BTreeIndexSet::<u8>::new(2).unwrap_err(),
        Error::InvalidOrder { order: 2 }
    );
}

#[test]
fn membership_after_mixed_updates() {
    let mut set = BTreeIndexSet::new(4).unwrap();
    set.extend([8, 3, 10, 1, 6, 14, 4, 7, 13]);

    assert!(set.remove(&6));
    assert!(set.remove(&8));
    assert!(!set.remove(&8));

    for present in [1, 3, 4, 7, 10, 13, 14] {
        assert!(set.contains(&present), "contains({present})");
    }
    assert!(!set.contains(&6));
    assert_eq!(set.get(&13), Some(&13));
    assert_eq!(set.len(), 7);
    assert_eq!(set.validate(), Ok(()));
}

#[test]
fn string_elements_borrow_as_str() {
    let mut set = BTreeIndexSet::new(3).unwrap();
    for word in ["pear", "apple", "plum", "fig", "quince"] {
        set.insert(String::from(word));
    }
    assert!(set.contains("fig"));
    assert_eq!(set.take("plum"), Some(String::from("plum")));
    let words: Vec<&str> = set.collect_keys().into_iter().map(String::as_str).collect();
    assert_eq!(words, ["apple", "fig", "pear", "quince"]);
}

#[test]
fn dump_shows_the_split_root() {
    let mut set = BTreeIndexSet::new(3).unwrap();
    set.extend(1..=3);
    assert_eq!(set.dump().to_string(), "order 3\n[2]\n  [1]\n  [3]\n");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Inserts only values not yet present and removes at random, comparing with
    /// `BTreeSet` throughout.
    #[test]
    fn set_ops_match_btreeset(
        order in 3usize..10,
        ops in proptest::collection::vec((any::<bool>(), -200i32..200), 1..800),
    ) {
        let mut set = BTreeIndexSet::new(order).unwrap();
        let mut model = BTreeSet::new();

        for &(insert, value) in &ops {
            if insert {
                if !set.contains(&value) {
                    set.insert(value);
                }
                model.insert(value);
            } else {
                prop_assert_eq!(set.remove(&value), model.remove(&value), "remove({})", value);
            }
            prop_assert_eq!(set.len(), model.len());
        }

        prop_assert_eq!(set.validate(), Ok(()));
        prop_assert_eq!(set.collect_keys(), model.iter().collect::<Vec<_>>());

        for value in &model {
            prop_assert!(set.remove(value));
        }
        prop_assert!(set.is_empty());
        prop_assert_eq!(set.height(), 1);
        prop_assert_eq!(set.node_count(), 1);
    }
}
