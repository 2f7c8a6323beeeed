//! Deterministic substring-overlap scoring.
//!
//! Used whenever the embedding backend is unavailable. The score of an entry
//! is the number of keywords that occur as substrings of its case-folded
//! title, tech stack, and description. Entries scoring zero are dropped; the
//! rest are ordered by descending score with catalog order breaking ties.
//!
//! # Example
//!
//! ```rust
//! use folio_core::fallback::score;
//! use folio_core::keywords::KeywordSet;
//! use folio_core::models::{CatalogEntry, CatalogRow};
//!
//! let entries = vec![
//!     CatalogEntry::from_row("1".into(), &CatalogRow::new("API Backend", "REST service", "Python, FastAPI", "http://x/1")),
//!     CatalogEntry::from_row("2".into(), &CatalogRow::new("Mobile App", "iOS app", "React Native", "http://x/2")),
//! ];
//! let matches = score(&KeywordSet::from_terms(["python", "fastapi"]), &entries, 5);
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].score, 2.0);
//! ```

use crate::keywords::KeywordSet;
use crate::models::{CatalogEntry, RankedMatch, ScoringPath};

/// Rank `entries` by keyword overlap and return at most `top_k` matches.
///
/// Pure and total: any keyword set and entry list produce a result.
pub fn score<'a, I>(keywords: &KeywordSet, entries: I, top_k: usize) -> Vec<RankedMatch>
where
    I: IntoIterator<Item = &'a CatalogEntry>,
{
    if keywords.is_empty() || top_k == 0 {
        return Vec::new();
    }

    let terms: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    let mut scored: Vec<(usize, &CatalogEntry)> = entries
        .into_iter()
        .filter_map(|entry| {
            let text = entry.search_text();
            let hits = terms.iter().filter(|t| text.contains(t.as_str())).count();
            (hits > 0).then_some((hits, entry))
        })
        .collect();

    // sort_by is stable: equal scores keep catalog order
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(top_k);

    scored
        .into_iter()
        .map(|(hits, entry)| RankedMatch {
            entry: entry.clone(),
            score: hits as f64,
            path: ScoringPath::Fallback,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CatalogRow;
    use proptest::prelude::*;

    fn entry(id: &str, title: &str, desc: &str, stack: &str) -> CatalogEntry {
        CatalogEntry::from_row(
            id.to_string(),
            &CatalogRow::new(title, desc, stack, &format!("http://x/{}", id)),
        )
    }

    fn sample() -> Vec<CatalogEntry> {
        vec![
            entry("1", "API Backend", "REST service", "Python, FastAPI"),
            entry("2", "Mobile App", "iOS app", "React Native"),
        ]
    }

    #[test]
    fn test_python_fastapi_scenario() {
        let result = score(&KeywordSet::from_terms(["python", "fastapi"]), &sample(), 10);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].entry.id, "1");
        assert_eq!(result[0].score, 2.0);
        assert_eq!(result[0].path, ScoringPath::Fallback);
        assert_eq!(result[0].entry.link, "http://x/1");
    }

    #[test]
    fn test_empty_keywords() {
        assert!(score(&KeywordSet::default(), &sample(), 10).is_empty());
    }

    #[test]
    fn test_top_k_zero() {
        let result = score(&KeywordSet::from_terms(["python"]), &sample(), 0);
        assert!(result.is_empty());
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let entries = vec![
            entry("a", "Shop", "storefront", "Shopify"),
            entry("b", "Blog", "content site", "WordPress, PHP"),
            entry("c", "Store", "checkout", "Shopify, PHP"),
            entry("d", "Portal", "intranet", "PHP"),
        ];
        let result = score(&KeywordSet::from_terms(["php", "shopify"]), &entries, 10);
        let ids: Vec<&str> = result.iter().map(|m| m.entry.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_case_insensitive_substring() {
        let entries = vec![entry("1", "ETL", "Nightly PostgreSQL loads", "Airflow")];
        let result = score(&KeywordSet::from_terms(["postgres", "AIRFLOW"]), &entries, 3);
        assert_eq!(result[0].score, 2.0);
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let entries = vec![CatalogEntry::from_row("1".to_string(), &CatalogRow::default())];
        assert!(score(&KeywordSet::from_terms(["rust"]), &entries, 3).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let keywords = KeywordSet::from_terms(["app", "react", "python"]);
        let first = score(&keywords, &sample(), 5);
        let second = score(&keywords, &sample(), 5);
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_sorted_and_bounded(
            stacks in prop::collection::vec("[a-z ]{0,24}", 0..12),
            terms in prop::collection::vec("[a-z]{1,4}", 0..6),
            top_k in 0usize..15,
        ) {
            let entries: Vec<CatalogEntry> = stacks
                .iter()
                .enumerate()
                .map(|(i, s)| entry(&i.to_string(), "", "", s))
                .collect();
            let keywords = KeywordSet::from_terms(&terms);
            let result = score(&keywords, &entries, top_k);

            let matching = entries
                .iter()
                .filter(|e| keywords.iter().any(|k| e.search_text().contains(k.as_str())))
                .count();
            prop_assert_eq!(result.len(), top_k.min(matching));

            for pair in result.windows(2) {
                prop_assert!(pair[0].score >= pair[1].score);
                if pair[0].score == pair[1].score {
                    let a: usize = pair[0].entry.id.parse().unwrap();
                    let b: usize = pair[1].entry.id.parse().unwrap();
                    prop_assert!(a < b);
                }
            }
        }
    }
}
