//! Property tests for natural ordering.

use std::cmp::Ordering;

use proptest::prelude::*;

use cartopub::domain::services::natural_cmp;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the ordering is antisymmetric and reflexive.
    #[test]
    fn property_natural_cmp_is_antisymmetric(a in "[A-Za-z0-9 ./]{0,16}", b in "[A-Za-z0-9 ./]{0,16}") {
        prop_assert_eq!(natural_cmp(&a, &a), Ordering::Equal);
        prop_assert_eq!(natural_cmp(&a, &b), natural_cmp(&b, &a).reverse());
    }

    /// PROPERTY: numbered names sort by value, not by text.
    #[test]
    fn property_numbers_sort_by_value(x in 0u32..10_000, y in 0u32..10_000) {
        let a = format!("Map {}.png", x);
        let b = format!("Map {}.png", y);
        prop_assert_eq!(natural_cmp(&a, &b), x.cmp(&y));
    }

    /// PROPERTY: sorting with it is stable across input permutations.
    #[test]
    fn property_sort_is_order_independent(mut items in proptest::collection::vec("[A-Za-z0-9]{0,6}", 0..12)) {
        let mut sorted = items.clone();
        sorted.sort_by(|a, b| natural_cmp(a, b));
        items.reverse();
        items.sort_by(|a, b| natural_cmp(a, b));
        prop_assert_eq!(items, sorted);
    }
}
