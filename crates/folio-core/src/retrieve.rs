//! Embedding-backed similarity retrieval.
//!
//! # Ranking Algorithm
//!
//! 1. Join the keyword set into one query string and embed it.
//! 2. Score every indexed document by cosine similarity to the query vector.
//! 3. Drop documents at or below `min_similarity`.
//! 4. Stable-sort by score (desc) so ties keep insertion order.
//! 5. Truncate to `top_k`.
//!
//! Any backend error is returned to the caller (the catalog store), which
//! switches to fallback scoring.

use std::cmp::Ordering;

use crate::embedding::{cosine_similarity, Embedder};
use crate::error::BackendError;
use crate::keywords::KeywordSet;
use crate::models::{IndexedDocument, RankedMatch, ScoringPath};
use crate::store::index::VectorIndex;

/// Retrieval tuning parameters.
#[derive(Debug, Clone, Copy)]
pub struct RetrieveParams {
    pub top_k: usize,
    /// Documents must score strictly above this to be returned.
    pub min_similarity: f32,
}

/// Rank `documents` against `keywords` using `embedder` and `index`.
pub fn rank(
    embedder: &dyn Embedder,
    index: &VectorIndex,
    documents: &[IndexedDocument],
    keywords: &KeywordSet,
    params: RetrieveParams,
) -> Result<Vec<RankedMatch>, BackendError> {
    if keywords.is_empty() || params.top_k == 0 || documents.is_empty() {
        return Ok(Vec::new());
    }

    let query_vec = embed_query(embedder, &keywords.to_query_string(), index.dims())?;

    let mut scored: Vec<(&IndexedDocument, f32)> = documents
        .iter()
        .filter_map(|doc| {
            index
                .get(&doc.content_hash)
                .map(|v| (doc, cosine_similarity(&query_vec, v)))
        })
        .filter(|(_, sim)| *sim > params.min_similarity)
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(params.top_k);

    Ok(scored
        .into_iter()
        .map(|(doc, sim)| RankedMatch {
            entry: doc.entry.clone(),
            score: f64::from(sim),
            path: ScoringPath::Semantic,
        })
        .collect())
}

fn embed_query(embedder: &dyn Embedder, query: &str, dims: usize) -> Result<Vec<f32>, BackendError> {
    let vector = embedder
        .embed(&[query.to_string()])
        .map_err(|e| BackendError::Embed(format!("{:#}", e)))?
        .into_iter()
        .next()
        .ok_or_else(|| BackendError::Embed("empty embedding response".to_string()))?;

    if vector.len() != dims {
        return Err(BackendError::DimensionMismatch {
            expected: dims,
            actual: vector.len(),
        });
    }
    Ok(vector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedder;
    use crate::models::{CatalogEntry, CatalogRow};
    use crate::store::index;

    fn documents() -> Vec<IndexedDocument> {
        [
            ("1", "API Backend", "REST service", "Python, FastAPI"),
            ("2", "Mobile App", "iOS app", "React Native"),
            ("3", "Data Pipeline", "Nightly batch ETL", "Python, Airflow, Spark"),
        ]
        .iter()
        .map(|(id, t, d, s)| {
            IndexedDocument::new(CatalogEntry::from_row(
                id.to_string(),
                &CatalogRow::new(t, d, s, &format!("http://x/{}", id)),
            ))
        })
        .collect()
    }

    fn params(top_k: usize) -> RetrieveParams {
        RetrieveParams {
            top_k,
            min_similarity: 0.0,
        }
    }

    #[test]
    fn test_best_match_first() {
        let embedder = HashEmbedder::default();
        let docs = documents();
        let idx = index::build(&embedder, &docs, 16).unwrap();
        let result = rank(
            &embedder,
            &idx,
            &docs,
            &KeywordSet::from_terms(["python", "fastapi"]),
            params(3),
        )
        .unwrap();
        assert_eq!(result[0].entry.id, "1");
        assert_eq!(result[0].path, ScoringPath::Semantic);
        for pair in result.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_empty_keywords() {
        let embedder = HashEmbedder::default();
        let docs = documents();
        let idx = index::build(&embedder, &docs, 16).unwrap();
        let result = rank(&embedder, &idx, &docs, &KeywordSet::default(), params(3)).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_top_k_capped() {
        let embedder = HashEmbedder::default();
        let docs = documents();
        let idx = index::build(&embedder, &docs, 16).unwrap();
        let keywords = KeywordSet::from_terms(["python"]);
        let result = rank(&embedder, &idx, &docs, &keywords, params(100)).unwrap();
        assert!(result.len() <= docs.len());
        let one = rank(&embedder, &idx, &docs, &keywords, params(1)).unwrap();
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn test_length_is_min_of_top_k_and_matching() {
        let embedder = HashEmbedder::default();
        let docs = documents();
        let idx = index::build(&embedder, &docs, 16).unwrap();
        let keywords = KeywordSet::from_terms(["python", "airflow"]);

        let query = embedder.embed_one(&keywords.to_query_string());
        let matching = docs
            .iter()
            .filter(|d| cosine_similarity(&query, idx.get(&d.content_hash).unwrap()) > 0.0)
            .count();

        for top_k in 0..=docs.len() + 1 {
            let result = rank(&embedder, &idx, &docs, &keywords, params(top_k)).unwrap();
            assert_eq!(result.len(), top_k.min(matching));
            assert!(result.iter().all(|m| m.score > 0.0));
        }
    }

    #[test]
    fn test_threshold_excludes_everything() {
        let embedder = HashEmbedder::default();
        let docs = documents();
        let idx = index::build(&embedder, &docs, 16).unwrap();
        let result = rank(
            &embedder,
            &idx,
            &docs,
            &KeywordSet::from_terms(["python"]),
            RetrieveParams {
                top_k: 3,
                min_similarity: 1.0,
            },
        )
        .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_dimension_mismatch() {
        let docs = documents();
        let idx = index::build(&HashEmbedder::new(8), &docs, 16).unwrap();
        let err = rank(
            &HashEmbedder::new(16),
            &idx,
            &docs,
            &KeywordSet::from_terms(["python"]),
            params(3),
        )
        .unwrap_err();
        assert_eq!(
            err,
            BackendError::DimensionMismatch {
                expected: 8,
                actual: 16
            }
        );
    }
}
