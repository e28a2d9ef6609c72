//! Property-based tests using proptest.
//!
//! Folding must be total and idempotent, matching must follow the
//! lowercase-substring law and results must be ordered and stable.

use proptest::prelude::*;
use std::collections::BTreeMap;

use cadop_search::dataset::{fold_diacritics, normalize, Dataset, Organization};
use cadop_search::search::search;

// ============================================================================
// STRATEGIES
// ============================================================================

/// Words mixing ASCII, Portuguese accents and a few harder letters.
fn word_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex("[a-zA-Z]{1,6}").unwrap(),
        prop::sample::select(vec![
            "São".to_string(),
            "saúde".to_string(),
            "AÇÃO".to_string(),
            "Conceição".to_string(),
            "Médica".to_string(),
            "Straße".to_string(),
            "Øster".to_string(),
            "Ñandú".to_string(),
        ]),
    ]
}

fn name_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(word_strategy(), 1..4).prop_map(|words| words.join(" "))
}

fn record_strategy() -> impl Strategy<Value = (Option<String>, Option<String>)> {
    (prop::option::of(name_strategy()), prop::option::of(name_strategy()))
}

fn build(rows: &[(Option<String>, Option<String>)]) -> Dataset {
    let records = rows
        .iter()
        .enumerate()
        .map(|(idx, (legal, trade))| Organization {
            legal_name: normalize(legal.as_deref()),
            trade_name: normalize(trade.as_deref()),
            city: None,
            street: None,
            district: None,
            tax_id: idx.to_string(),
            extra: BTreeMap::new(),
        })
        .collect();
    Dataset::from_records(records, "proptest")
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn prop_fold_is_total(text in any::<String>()) {
        let _ = fold_diacritics(&text);
    }

    #[test]
    fn prop_fold_is_idempotent(text in any::<String>()) {
        let once = fold_diacritics(&text);
        prop_assert_eq!(fold_diacritics(&once), once);
    }

    #[test]
    fn prop_fold_strips_latin_diacritics(text in name_strategy()) {
        let folded = fold_diacritics(&text);
        prop_assert!(folded.is_ascii(), "{:?} folded to {:?}", text, folded);
    }

    #[test]
    fn prop_normalize_preserves_absence(text in prop::option::of(any::<String>())) {
        prop_assert_eq!(normalize(text.as_deref()).is_none(), text.is_none());
    }

    #[test]
    fn prop_match_follows_substring_law(
        rows in prop::collection::vec(record_strategy(), 0..12),
        query in word_strategy(),
    ) {
        let dataset = build(&rows);
        let response = search(&dataset, &query).unwrap();

        let key = fold_diacritics(&query.trim().to_lowercase());
        let matches = |name: &Option<String>| {
            name.as_ref().is_some_and(|n| n.to_lowercase().contains(&key))
        };

        let mut expected: Vec<&str> = dataset
            .records()
            .iter()
            .filter(|r| matches(&r.legal_name) || matches(&r.trade_name))
            .map(|r| r.tax_id.as_str())
            .collect();

        let mut returned: Vec<&str> = response.results.iter().map(|r| r.tax_id.as_str()).collect();
        returned.sort();
        expected.sort();
        prop_assert_eq!(returned, expected);
    }

    #[test]
    fn prop_results_ordered_and_stable(
        rows in prop::collection::vec(record_strategy(), 0..12),
        query in word_strategy(),
    ) {
        let dataset = build(&rows);
        let response = search(&dataset, &query).unwrap();

        for pair in response.results.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            match (&a.legal_name, &b.legal_name) {
                (Some(x), Some(y)) => {
                    prop_assert!(x.as_bytes() <= y.as_bytes());
                    if x == y {
                        let ia: usize = a.tax_id.parse().unwrap();
                        let ib: usize = b.tax_id.parse().unwrap();
                        prop_assert!(ia < ib, "equal names lost dataset order");
                    }
                }
                (None, Some(_)) => prop_assert!(false, "absent legal name sorted first"),
                (Some(_), None) => {}
                (None, None) => {
                    let ia: usize = a.tax_id.parse().unwrap();
                    let ib: usize = b.tax_id.parse().unwrap();
                    prop_assert!(ia < ib);
                }
            }
        }
    }
}
