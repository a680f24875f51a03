//! Property-based tests for grimoire classification
//!
//! Whatever the input, classification must terminate and yield spans that are ordered,
//! non-overlapping and non-empty, so that stitching gaps and spans back together restores
//! the input exactly.

use grimoire::highlight::testing::{assert_well_formed, reconstruct};
use grimoire::highlight::{LanguageVariant, TokenCategory};
use proptest::prelude::*;

/// Strings built from the characters the grimoire rules care about
fn grimoire_like_strategy() -> impl Strategy<Value = String> {
    let fragments = prop::sample::select(vec![
        "class ", "new ", "catch (", "extends ", "if", "return", "true", "export", "public",
        "Foo", "a.b", "x\\y", "0x1F", "1.5f", "2e3", ".5", "_", "//", "/*", "*/", "\"", "'",
        "\\", ":", "::", " ", "\t", "\n", "\r\n", "@", "!==", "?=", "+", "{", "}", "(", ")",
        ";", "é", "λ",
    ]);
    prop::collection::vec(fragments, 0..24).prop_map(|parts| parts.concat())
}

fn check(variant: LanguageVariant, input: &str) {
    let spans: Vec<_> = variant.table().classify(input).collect();
    assert_well_formed(input, &spans);
    assert_eq!(reconstruct(input, &spans), input);
}

proptest! {
    #[test]
    fn test_arbitrary_text_is_well_formed(input in any::<String>()) {
        check(LanguageVariant::V1, &input);
        check(LanguageVariant::V2, &input);
    }

    #[test]
    fn test_grimoire_like_text_is_well_formed(input in grimoire_like_strategy()) {
        check(LanguageVariant::V1, &input);
        check(LanguageVariant::V2, &input);
    }

    #[test]
    fn test_nested_spans_are_class_name_punctuation(input in grimoire_like_strategy()) {
        for span in LanguageVariant::V1.table().classify(&input) {
            for child in &span.children {
                prop_assert_eq!(span.category, TokenCategory::ClassName);
                prop_assert_eq!(child.category, TokenCategory::Punctuation);
            }
        }
    }

    #[test]
    fn test_classification_is_deterministic(input in grimoire_like_strategy()) {
        let table = LanguageVariant::V1.table();
        let first: Vec<_> = table.classify(&input).collect();
        let second: Vec<_> = table.classify(&input).collect();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_contextless_spans_reclassify_as_themselves(input in grimoire_like_strategy()) {
        let table = LanguageVariant::V1.table();
        for span in table.classify(&input) {
            if !matches!(
                span.category,
                TokenCategory::String | TokenCategory::Operator | TokenCategory::Punctuation
            ) {
                continue;
            }
            let text = span.text(&input);
            let own_rules = table.subset(span.category).unwrap();
            let again: Vec<_> = own_rules.classify(text).collect();
            prop_assert_eq!(again.len(), 1);
            prop_assert_eq!(again[0].range(), 0..text.len());
        }
    }
}
