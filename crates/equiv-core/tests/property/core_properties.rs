//! Property tests for score arithmetic and edge-direction algebra.

use proptest::prelude::*;

use equiv_core::lookup::{ContentCategory, Direction, EquivRefs, LookupRef};
use equiv_core::{Publisher, Score};

fn score_strategy() -> impl Strategy<Value = Score> {
    prop_oneof![
        Just(Score::Null),
        (-10.0f64..10.0).prop_map(Score::Real),
    ]
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Outgoing),
        Just(Direction::Incoming),
        Just(Direction::Bidirectional),
    ]
}

proptest! {
    #[test]
    fn null_is_additive_identity(s in score_strategy()) {
        prop_assert_eq!(s + Score::Null, s);
        prop_assert_eq!(Score::Null + s, s);
    }

    #[test]
    fn addition_is_commutative(a in score_strategy(), b in score_strategy()) {
        prop_assert_eq!(a + b, b + a);
    }

    #[test]
    fn max_never_prefers_null(a in score_strategy(), b in score_strategy()) {
        let m = a.max(b);
        if a.is_real() || b.is_real() {
            prop_assert!(m.is_real());
        }
    }

    #[test]
    fn merge_then_remove_restores(a in direction_strategy(), b in direction_strategy()) {
        prop_assume!(a != Direction::Bidirectional && b != Direction::Bidirectional && a != b);
        let merged = a.merge(b);
        prop_assert_eq!(merged, Direction::Bidirectional);
        prop_assert_eq!(merged.without(b), Some(a));
    }

    #[test]
    fn reverse_is_involution(d in direction_strategy()) {
        prop_assert_eq!(d.reverse().reverse(), d);
    }

    #[test]
    fn fill_ids_never_changes_edge_set(uris in proptest::collection::btree_set("[a-e]", 1..5)) {
        let mut refs: EquivRefs = uris
            .iter()
            .map(|u| (LookupRef::new(u.clone(), None, Publisher::new("p"), ContentCategory::TopLevelItem), Direction::Outgoing))
            .collect();
        let before: Vec<String> = refs.uris().map(String::from).collect();
        refs.fill_ids(|u| Some(u.len() as u64));
        let after: Vec<String> = refs.uris().map(String::from).collect();
        prop_assert_eq!(before, after);
        prop_assert!(!refs.has_missing_ids());
    }
}
