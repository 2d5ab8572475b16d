//! Property tests for sentinel block upsert.

use proptest::prelude::*;

use cartopub::domain::services::{upsert_block, Sentinels};

const BEGIN: &str = "/* cartopub:begin */";
const END: &str = "/* cartopub:end */";

fn line() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9 ;(){}.=']{0,30}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 96,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: upserting twice equals upserting once.
    #[test]
    fn property_upsert_is_idempotent(
        doc in proptest::collection::vec(line(), 0..8),
        body in proptest::collection::vec(line(), 1..5),
    ) {
        let sentinels = Sentinels::new(BEGIN, END);
        let doc = doc.join("\n");
        let body = body.join("\n");
        let once = upsert_block(&doc, sentinels, &body);
        let twice = upsert_block(&once, sentinels, &body);
        prop_assert_eq!(once, twice);
    }

    /// PROPERTY: text outside the block survives a replacement.
    #[test]
    fn property_surrounding_text_is_preserved(
        head in "[A-Za-z]{1,20}",
        tail in "[A-Za-z]{1,20}",
        old in "[a-z ]{0,20}",
        new in "[a-z ]{1,20}",
    ) {
        let sentinels = Sentinels::new(BEGIN, END);
        let doc = format!("{}\n{}\n{}\n{}\n{}\n", head, BEGIN, old, END, tail);
        let out = upsert_block(&doc, sentinels, &new);
        let expected_prefix = format!("{}\n\n{}\n", head, BEGIN);
        let expected_suffix = format!("{}\n\n{}\n", END, tail);
        prop_assert!(out.starts_with(&expected_prefix));
        prop_assert!(out.ends_with(&expected_suffix));
    }
}
