//! Property-based tests for identifier derivation and qualification

use proptest::prelude::*;
use wixfiles::manifest::ident::{
    derive_identifier, qualify_identifier, shorten_identifier, IdStrategy, MAX_IDENTIFIER_LEN,
};

fn allowed(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '.'
}

proptest! {
    /// Derivation is deterministic, keeps one char per input char and only emits allowed chars
    #[test]
    fn derive_identifier_uses_allowed_alphabet(name in "\\PC{1,64}") {
        let id = derive_identifier(&name);
        prop_assert_eq!(&id, &derive_identifier(&name));
        prop_assert_eq!(id.chars().count(), name.chars().count());
        prop_assert!(id.chars().all(allowed));
    }

    /// Allowed characters pass through untouched
    #[test]
    fn derive_identifier_is_identity_on_allowed_names(name in "[A-Za-z0-9_.]{1,64}") {
        prop_assert_eq!(derive_identifier(&name), name);
    }

    /// Truncation keeps "_" plus the final 71 characters
    #[test]
    fn truncate_keeps_tail(id in "[A-Za-z0-9_.]{73,200}") {
        let short = shorten_identifier(id.clone(), IdStrategy::Truncate);
        prop_assert_eq!(short.len(), MAX_IDENTIFIER_LEN);
        prop_assert!(short.starts_with('_'));
        prop_assert_eq!(&short[1..], &id[id.len() - 71..]);
    }

    /// Both strategies leave identifiers within the limit alone
    #[test]
    fn short_identifiers_are_untouched(id in "[A-Za-z0-9_.]{1,72}") {
        prop_assert_eq!(shorten_identifier(id.clone(), IdStrategy::Truncate), id.clone());
        prop_assert_eq!(shorten_identifier(id.clone(), IdStrategy::Hashed), id);
    }

    /// Hashed shortening is exactly the limit and only uses allowed characters
    #[test]
    fn hashed_identifiers_are_legal(id in "[A-Za-z0-9_.]{73,200}") {
        let short = shorten_identifier(id, IdStrategy::Hashed);
        prop_assert_eq!(short.len(), MAX_IDENTIFIER_LEN);
        prop_assert!(short.starts_with('_'));
        prop_assert!(short.chars().all(allowed));
    }

    /// Same leaf under different parents yields different identifiers
    #[test]
    fn qualification_separates_parents(
        a in "[A-Z]{1,10}",
        b in "[A-Z]{1,10}",
        leaf in "[a-z]{1,20}\\.txt",
    ) {
        prop_assume!(a != b);
        for strategy in [IdStrategy::Hashed, IdStrategy::Truncate] {
            prop_assert_ne!(
                qualify_identifier(&a, &leaf, strategy),
                qualify_identifier(&b, &leaf, strategy)
            );
        }
    }

    /// Under the hashed strategy long siblings stay distinct too
    #[test]
    fn hashed_qualification_separates_long_parents(
        a in "[A-Z]{1,10}",
        b in "[A-Z]{1,10}",
        leaf in "[a-z]{80,120}",
    ) {
        prop_assume!(a != b);
        prop_assert_ne!(
            qualify_identifier(&a, &leaf, IdStrategy::Hashed),
            qualify_identifier(&b, &leaf, IdStrategy::Hashed)
        );
    }
}

#[test]
fn test_documented_examples() {
    assert_eq!(derive_identifier("My File (v2).txt"), "My_File__v2_.txt");
    assert_eq!(
        qualify_identifier("ROOT.X", "a.txt", IdStrategy::Hashed),
        "ROOT.X.a.txt"
    );
    assert_eq!(
        qualify_identifier("ROOT.Y", "a.txt", IdStrategy::Hashed),
        "ROOT.Y.a.txt"
    );
}
