//! Property tests for key normalization and artifact ids.

use proptest::prelude::*;

use cartopub::domain::value_objects::{ArtifactId, NormalizedKey};

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9][A-Za-z0-9 _.-]{0,11}").unwrap()
}

fn vault_path() -> impl Strategy<Value = String> {
    proptest::collection::vec(segment(), 1..=4).prop_map(|parts| parts.join("/"))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: spellings that normalize identically get the same id.
    #[test]
    fn property_equivalent_spellings_share_an_id(path in vault_path()) {
        let plain = NormalizedKey::new(&path);
        let variants = [
            format!("./{}", path),
            format!("/{}", path),
            path.replace('/', "\\"),
            format!("[[{}]]", path),
            format!("  {}  ", path),
        ];
        for variant in &variants {
            let key = NormalizedKey::new(variant);
            if key == plain {
                prop_assert_eq!(ArtifactId::for_path(&key), ArtifactId::for_path(&plain));
            }
        }
    }

    /// PROPERTY: hashing is deterministic and always yields a valid id.
    #[test]
    fn property_ids_are_deterministic_and_valid(raw in ".{0,64}") {
        let key = NormalizedKey::new(&raw);
        let first = ArtifactId::for_path(&key);
        let second = ArtifactId::for_path(&NormalizedKey::new(&raw));
        prop_assert_eq!(&first, &second);
        prop_assert!(ArtifactId::is_valid(first.as_str()), "invalid id {}", first);
    }

    /// PROPERTY: name ids ignore case and surrounding whitespace.
    #[test]
    fn property_name_ids_ignore_case(name in "[A-Za-z][A-Za-z0-9 ]{0,20}") {
        prop_assert_eq!(
            ArtifactId::for_name(&name),
            ArtifactId::for_name(&format!(" {} ", name.to_uppercase()))
        );
    }

    /// PROPERTY: normalization is idempotent.
    #[test]
    fn property_normalization_is_idempotent(path in vault_path()) {
        let once = NormalizedKey::new(&format!("./{}", path.replace('/', "\\")));
        let twice = NormalizedKey::new(once.as_str());
        prop_assert_eq!(once, twice);
    }
}
