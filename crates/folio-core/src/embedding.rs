//! Embedding trait, the built-in hashing embedder, and vector utilities.
//!
//! Defines the [`Embedder`] trait that all embedding backends implement,
//! plus [`HashEmbedder`], a deterministic feature-hashing backend that needs
//! no model download, and [`cosine_similarity`].
//!
//! Network and model-backed implementations (Ollama, OpenAI, fastembed)
//! live in the `folio` app crate.

use anyhow::Result;

/// Trait for embedding backends.
///
/// Implementations must be `Send + Sync` so a loaded store can be shared
/// across request handlers.
pub trait Embedder: Send + Sync {
    /// Returns the model identifier (e.g. `"nomic-embed-text"`).
    fn model_name(&self) -> &str;
    /// Returns the embedding vector dimensionality (e.g. `768`).
    fn dims(&self) -> usize;
    /// Embed a batch of texts, returning one vector per input in order.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Default dimensionality of [`HashEmbedder`].
pub const DEFAULT_HASH_DIMS: usize = 384;

/// Deterministic feature-hashing embedder.
///
/// Each unigram (weight 1.0) and adjacent bigram (weight 0.5) is hashed with
/// FNV-1a into a signed bucket; the result is L2-normalized. Texts sharing
/// vocabulary land close together, unrelated texts are near-orthogonal.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dims: usize,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_DIMS)
    }
}

impl HashEmbedder {
    pub fn new(dims: usize) -> Self {
        Self { dims }
    }

    /// Embed a single text.
    pub fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dims];
        if self.dims == 0 {
            return embedding;
        }

        let tokens = tokenize(text);
        for token in &tokens {
            accumulate(&mut embedding, token, 1.0);
        }
        for window in tokens.windows(2) {
            accumulate(&mut embedding, &format!("{} {}", window[0], window[1]), 0.5);
        }

        l2_normalize(&mut embedding);
        embedding
    }
}

impl Embedder for HashEmbedder {
    fn model_name(&self) -> &str {
        "hash"
    }

    fn dims(&self) -> usize {
        self.dims
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|token| token.len() >= 2)
        .map(str::to_string)
        .collect()
}

fn accumulate(embedding: &mut [f32], feature: &str, weight: f32) {
    let hash = fnv1a(feature.as_bytes());
    let bucket = ((hash >> 1) % embedding.len() as u64) as usize;
    if hash & 1 == 0 {
        embedding[bucket] += weight;
    } else {
        embedding[bucket] -= weight;
    }
}

fn fnv1a(data: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = FNV_OFFSET;
    for byte in data {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

fn l2_normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for value in vec.iter_mut() {
            *value /= norm;
        }
    }
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in `[-1.0, 1.0]`:
/// - `1.0` = identical direction
/// - `0.0` = orthogonal (unrelated)
/// - `-1.0` = opposite direction
///
/// Returns `0.0` for empty vectors or vectors of different lengths.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}
