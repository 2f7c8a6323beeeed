//! Content-addressed vector index.
//!
//! Maps the SHA-256 of an indexed document's text to its embedding, so two
//! entries with identical text share one vector and are embedded once.

use std::collections::HashMap;

use crate::embedding::Embedder;
use crate::error::BackendError;
use crate::models::IndexedDocument;

#[derive(Debug, Clone)]
pub struct VectorIndex {
    dims: usize,
    vectors: HashMap<String, Vec<f32>>,
}

impl VectorIndex {
    pub fn new(dims: usize) -> Self {
        Self {
            dims,
            vectors: HashMap::new(),
        }
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Number of distinct vectors stored.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn get(&self, content_hash: &str) -> Option<&[f32]> {
        self.vectors.get(content_hash).map(Vec::as_slice)
    }

    /// Insert a vector, rejecting anything not `dims` long.
    pub fn insert(&mut self, content_hash: String, vector: Vec<f32>) -> Result<(), BackendError> {
        if vector.len() != self.dims {
            return Err(BackendError::DimensionMismatch {
                expected: self.dims,
                actual: vector.len(),
            });
        }
        self.vectors.insert(content_hash, vector);
        Ok(())
    }
}

/// Embed every distinct document text in batches of `batch_size`.
pub fn build(
    embedder: &dyn Embedder,
    documents: &[IndexedDocument],
    batch_size: usize,
) -> Result<VectorIndex, BackendError> {
    let mut index = VectorIndex::new(embedder.dims());

    let mut pending: Vec<&IndexedDocument> = Vec::new();
    for doc in documents {
        if !pending.iter().any(|p| p.content_hash == doc.content_hash) {
            pending.push(doc);
        }
    }

    for batch in pending.chunks(batch_size.max(1)) {
        let texts: Vec<String> = batch.iter().map(|d| d.text.clone()).collect();
        let vectors = embedder
            .embed(&texts)
            .map_err(|e| BackendError::Embed(format!("{:#}", e)))?;
        if vectors.len() != batch.len() {
            return Err(BackendError::Embed(format!(
                "expected {} vectors, backend returned {}",
                batch.len(),
                vectors.len()
            )));
        }
        for (doc, vector) in batch.iter().zip(vectors) {
            index.insert(doc.content_hash.clone(), vector)?;
        }
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedder;
    use crate::models::{CatalogEntry, CatalogRow};

    fn doc(id: &str, title: &str) -> IndexedDocument {
        IndexedDocument::new(CatalogEntry::from_row(
            id.to_string(),
            &CatalogRow::new(title, "", "", ""),
        ))
    }

    #[test]
    fn test_insert_rejects_wrong_dims() {
        let mut index = VectorIndex::new(3);
        let err = index.insert("h".to_string(), vec![1.0]).unwrap_err();
        assert_eq!(
            err,
            BackendError::DimensionMismatch {
                expected: 3,
                actual: 1
            }
        );
        assert!(index.is_empty());
    }

    #[test]
    fn test_build_dedupes_identical_text() {
        let docs = vec![doc("1", "Same"), doc("2", "Same"), doc("3", "Other")];
        let index = build(&HashEmbedder::new(16), &docs, 8).unwrap();
        assert_eq!(index.len(), 2);
        assert!(index.get(&docs[0].content_hash).is_some());
        assert_eq!(index.get(&docs[0].content_hash), index.get(&docs[1].content_hash));
    }
}
