//! Embedding backend construction and the network/model-backed embedders.
//!
//! Implements [`Embedder`] for:
//! - **[`OllamaEmbedder`]** — calls a local Ollama instance's `/api/embed` endpoint.
//! - **[`OpenAIEmbedder`]** — calls the OpenAI embeddings API.
//! - **`LocalEmbedder`** — runs a model in-process via fastembed
//!   (`local-embeddings-fastembed` feature); no network calls after the
//!   model download.
//!
//! The deterministic [`HashEmbedder`] comes from `folio-core` and is the
//! default provider.
//!
//! # Provider Selection
//!
//! | Config Value | Backend |
//! |-------------|----------|
//! | `"hash"` | [`HashEmbedder`] |
//! | `"disabled"` | none — the store scores with the fallback scorer |
//! | `"ollama"` | [`OllamaEmbedder`] |
//! | `"openai"` | [`OpenAIEmbedder`] |
//! | `"local"` | `LocalEmbedder` (feature-gated) |
//!
//! # Retry Strategy
//!
//! The HTTP embedders retry transient errors with exponential backoff:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, ... (capped at 2^5)

use anyhow::{anyhow, bail, Result};
use std::sync::Arc;
use std::time::Duration;

use folio_core::embedding::{Embedder, HashEmbedder, DEFAULT_HASH_DIMS};

use crate::config::EmbeddingConfig;

/// Build the embedder named by `config.provider`.
///
/// Returns `Ok(None)` for `"disabled"`. An `Err` means the backend could not
/// be initialized; callers hand it to
/// [`CatalogStore::from_init`](folio_core::store::CatalogStore::from_init),
/// which records it and starts in fallback mode.
pub fn create_embedder(config: &EmbeddingConfig) -> Result<Option<Arc<dyn Embedder>>> {
    let embedder: Arc<dyn Embedder> = match config.provider.as_str() {
        "disabled" => return Ok(None),
        "hash" => Arc::new(HashEmbedder::new(config.dims.unwrap_or(DEFAULT_HASH_DIMS))),
        "ollama" => Arc::new(OllamaEmbedder::new(config)?),
        "openai" => Arc::new(OpenAIEmbedder::new(config)?),
        #[cfg(feature = "local-embeddings-fastembed")]
        "local" => Arc::new(LocalEmbedder::new(config)?),
        #[cfg(not(feature = "local-embeddings-fastembed"))]
        "local" => bail!("Local embedding provider requires --features local-embeddings-fastembed"),
        other => bail!("Unknown embedding provider: {}", other),
    };
    Ok(Some(embedder))
}

fn http_client(config: &EmbeddingConfig) -> Result<reqwest::blocking::Client> {
    Ok(reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}

/// POST `body` to `url` with retry/backoff, returning the parsed JSON body.
fn post_with_retry(
    client: &reqwest::blocking::Client,
    url: &str,
    bearer: Option<&str>,
    body: &serde_json::Value,
    max_retries: u32,
    label: &str,
) -> Result<serde_json::Value> {
    let mut last_err = None;

    for attempt in 0..=max_retries {
        if attempt > 0 {
            let delay = Duration::from_secs(1 << (attempt - 1).min(5));
            std::thread::sleep(delay);
        }

        let mut request = client.post(url).json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        match request.send() {
            Ok(response) => {
                let status = response.status();

                if status.is_success() {
                    return Ok(response.json()?);
                }

                let body_text = response.text().unwrap_or_default();
                if status.as_u16() == 429 || status.is_server_error() {
                    last_err = Some(anyhow!("{} API error {}: {}", label, status, body_text));
                    continue;
                }

                bail!("{} API error {}: {}", label, status, body_text);
            }
            Err(e) => {
                last_err = Some(anyhow!("{} connection error ({}): {}", label, url, e));
                continue;
            }
        }
    }

    Err(last_err.unwrap_or_else(|| anyhow!("{} embedding failed after retries", label)))
}

// ============ Ollama ============

/// Embedder backed by a local Ollama instance.
///
/// Calls `POST {url}/api/embed` (default URL `http://localhost:11434`).
/// Requires an embedding model to be pulled, e.g. `ollama pull nomic-embed-text`.
pub struct OllamaEmbedder {
    client: reqwest::blocking::Client,
    model: String,
    dims: usize,
    url: String,
    max_retries: u32,
}

impl OllamaEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| anyhow!("embedding.model required for Ollama provider"))?;
        let dims = config
            .dims
            .ok_or_else(|| anyhow!("embedding.dims required for Ollama provider"))?;
        let url = config
            .url
            .clone()
            .unwrap_or_else(|| "http://localhost:11434".to_string());

        Ok(Self {
            client: http_client(config)?,
            model,
            dims,
            url: url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
        })
    }
}

impl Embedder for OllamaEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn dims(&self) -> usize {
        self.dims
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });
        let json = post_with_retry(
            &self.client,
            &format!("{}/api/embed", self.url),
            None,
            &body,
            self.max_retries,
            "Ollama",
        )?;
        parse_ollama_response(&json)
    }
}

fn parse_ollama_response(json: &serde_json::Value) -> Result<Vec<Vec<f32>>> {
    let embeddings = json
        .get("embeddings")
        .and_then(|e| e.as_array())
        .ok_or_else(|| anyhow!("Invalid Ollama response: missing embeddings array"))?;

    embeddings
        .iter()
        .map(|embedding| {
            embedding
                .as_array()
                .ok_or_else(|| anyhow!("Invalid Ollama response: embedding is not an array"))
                .map(|values| to_f32_vec(values))
        })
        .collect()
}

// ============ OpenAI ============

/// Embedder using the OpenAI `POST /v1/embeddings` endpoint.
///
/// Requires the `OPENAI_API_KEY` environment variable.
pub struct OpenAIEmbedder {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    dims: usize,
    max_retries: u32,
}

impl OpenAIEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let model = config
            .model
            .clone()
            .ok_or_else(|| anyhow!("embedding.model required for OpenAI provider"))?;
        let dims = config
            .dims
            .ok_or_else(|| anyhow!("embedding.dims required for OpenAI provider"))?;
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow!("OPENAI_API_KEY environment variable not set"))?;

        Ok(Self {
            client: http_client(config)?,
            api_key,
            model,
            dims,
            max_retries: config.max_retries,
        })
    }
}

impl Embedder for OpenAIEmbedder {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn dims(&self) -> usize {
        self.dims
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
        });
        let json = post_with_retry(
            &self.client,
            "https://api.openai.com/v1/embeddings",
            Some(&self.api_key),
            &body,
            self.max_retries,
            "OpenAI",
        )?;
        parse_openai_response(&json)
    }
}

/// Extract `data[].embedding`, ordered by each item's `index`.
fn parse_openai_response(json: &serde_json::Value) -> Result<Vec<Vec<f32>>> {
    let data = json
        .get("data")
        .and_then(|d| d.as_array())
        .ok_or_else(|| anyhow!("Invalid OpenAI response: missing data array"))?;

    let mut indexed = Vec::with_capacity(data.len());
    for (position, item) in data.iter().enumerate() {
        let embedding = item
            .get("embedding")
            .and_then(|e| e.as_array())
            .ok_or_else(|| anyhow!("Invalid OpenAI response: missing embedding"))?;
        let index = item
            .get("index")
            .and_then(|i| i.as_u64())
            .map_or(position, |i| i as usize);
        indexed.push((index, to_f32_vec(embedding)));
    }

    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, v)| v).collect())
}

fn to_f32_vec(values: &[serde_json::Value]) -> Vec<f32> {
    values
        .iter()
        .map(|v| v.as_f64().unwrap_or(0.0) as f32)
        .collect()
}

// ============ Local (fastembed) ============

/// In-process embedder running a fastembed model.
///
/// The model is downloaded from Hugging Face on first use and cached; after
/// that no network access is needed.
#[cfg(feature = "local-embeddings-fastembed")]
pub struct LocalEmbedder {
    model: parking_lot::Mutex<fastembed::TextEmbedding>,
    model_name: String,
    dims: usize,
    batch_size: usize,
}

#[cfg(feature = "local-embeddings-fastembed")]
impl LocalEmbedder {
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let model_name = config
            .model
            .clone()
            .unwrap_or_else(|| "all-minilm-l6-v2".to_string());
        let (fastembed_model, default_dims) = resolve_local_model(&model_name)?;

        let model = fastembed::TextEmbedding::try_new(
            fastembed::InitOptions::new(fastembed_model).with_show_download_progress(true),
        )
        .map_err(|e| anyhow!("Failed to initialize local embedding model: {}", e))?;

        Ok(Self {
            model: parking_lot::Mutex::new(model),
            model_name,
            dims: config.dims.unwrap_or(default_dims),
            batch_size: config.batch_size,
        })
    }
}

#[cfg(feature = "local-embeddings-fastembed")]
impl Embedder for LocalEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dims(&self) -> usize {
        self.dims
    }

    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.model
            .lock()
            .embed(texts.to_vec(), Some(self.batch_size))
            .map_err(|e| anyhow!("Local embedding failed: {}", e))
    }
}

#[cfg(feature = "local-embeddings-fastembed")]
fn resolve_local_model(name: &str) -> Result<(fastembed::EmbeddingModel, usize)> {
    use fastembed::EmbeddingModel;

    match name {
        "all-minilm-l6-v2" => Ok((EmbeddingModel::AllMiniLML6V2, 384)),
        "bge-small-en-v1.5" => Ok((EmbeddingModel::BGESmallENV15, 384)),
        "bge-base-en-v1.5" => Ok((EmbeddingModel::BGEBaseENV15, 768)),
        "bge-large-en-v1.5" => Ok((EmbeddingModel::BGELargeENV15, 1024)),
        "nomic-embed-text-v1.5" => Ok((EmbeddingModel::NomicEmbedTextV15, 768)),
        other => bail!(
            "Unknown local embedding model: '{}'. Supported models: \
             all-minilm-l6-v2, bge-small-en-v1.5, bge-base-en-v1.5, bge-large-en-v1.5, \
             nomic-embed-text-v1.5",
            other
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: &str) -> EmbeddingConfig {
        EmbeddingConfig {
            provider: provider.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_disabled_has_no_embedder() {
        assert!(create_embedder(&config("disabled")).unwrap().is_none());
    }

    #[test]
    fn test_hash_default_dims() {
        let embedder = create_embedder(&config("hash")).unwrap().unwrap();
        assert_eq!(embedder.model_name(), "hash");
        assert_eq!(embedder.dims(), DEFAULT_HASH_DIMS);
    }

    #[test]
    fn test_hash_configured_dims() {
        let mut cfg = config("hash");
        cfg.dims = Some(64);
        let embedder = create_embedder(&cfg).unwrap().unwrap();
        assert_eq!(embedder.dims(), 64);
    }

    #[test]
    fn test_ollama_requires_model() {
        let mut cfg = config("ollama");
        cfg.dims = Some(768);
        assert!(create_embedder(&cfg).is_err());
    }

    #[test]
    fn test_unknown_provider() {
        assert!(create_embedder(&config("magic")).is_err());
    }

    #[test]
    fn test_parse_ollama_response() {
        let json = serde_json::json!({ "embeddings": [[0.5, -1.0], [2.0, 0.0]] });
        let vecs = parse_ollama_response(&json).unwrap();
        assert_eq!(vecs, vec![vec![0.5, -1.0], vec![2.0, 0.0]]);
    }

    #[test]
    fn test_parse_ollama_response_invalid() {
        assert!(parse_ollama_response(&serde_json::json!({ "error": "no model" })).is_err());
        assert!(parse_ollama_response(&serde_json::json!({ "embeddings": [1.0] })).is_err());
    }

    #[test]
    fn test_parse_openai_response_orders_by_index() {
        let json = serde_json::json!({
            "data": [
                { "index": 1, "embedding": [1.0, 1.0] },
                { "index": 0, "embedding": [0.0, 0.5] }
            ]
        });
        let vecs = parse_openai_response(&json).unwrap();
        assert_eq!(vecs, vec![vec![0.0, 0.5], vec![1.0, 1.0]]);
    }

    #[test]
    fn test_parse_openai_response_missing_data() {
        assert!(parse_openai_response(&serde_json::json!({})).is_err());
    }

    #[test]
    fn test_unreachable_ollama_fails_embed() {
        let cfg = EmbeddingConfig {
            provider: "ollama".to_string(),
            model: Some("nomic-embed-text".to_string()),
            dims: Some(768),
            url: Some("http://127.0.0.1:9".to_string()),
            max_retries: 0,
            timeout_secs: 2,
            ..Default::default()
        };
        let embedder = OllamaEmbedder::new(&cfg).unwrap();
        let err = embedder.embed(&["hello".to_string()]).unwrap_err();
        assert!(err.to_string().contains("Ollama"));
    }
}
