//! TOML configuration.
//!
//! Every section and field has a default, so an empty file (or no file at
//! all, see [`load_config_or_default`]) yields a working configuration that
//! uses the built-in catalog and the hashing embedder.
//!
//! ```toml
//! [catalog]
//! path = "./data/portfolio.csv"
//!
//! [retrieval]
//! top_k = 2
//! min_similarity = 0.0
//!
//! [keywords]
//! max_keywords = 20
//! max_generic = 15
//! extra_vocabulary = ["power bi"]
//!
//! [embedding]
//! provider = "hash"      # hash | disabled | ollama | openai | local
//! dims = 384
//!
//! [server]
//! bind = "127.0.0.1:7341"
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use folio_core::keywords::{KeywordSet, DEFAULT_MAX_GENERIC};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub keywords: KeywordsConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CatalogConfig {
    /// CSV with `Title, Description, Techstack, Links` columns. When unset
    /// or unreadable the built-in catalog is used.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub min_similarity: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            min_similarity: 0.0,
        }
    }
}

fn default_top_k() -> usize {
    2
}

#[derive(Debug, Deserialize, Clone)]
pub struct KeywordsConfig {
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,
    #[serde(default = "default_max_generic")]
    pub max_generic: usize,
    #[serde(default)]
    pub extra_vocabulary: Vec<String>,
}

impl Default for KeywordsConfig {
    fn default() -> Self {
        Self {
            max_keywords: default_max_keywords(),
            max_generic: default_max_generic(),
            extra_vocabulary: Vec::new(),
        }
    }
}

fn default_max_keywords() -> usize {
    KeywordSet::MAX_LEN
}
fn default_max_generic() -> usize {
    DEFAULT_MAX_GENERIC
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub dims: Option<usize>,
    /// Base URL for the Ollama provider.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            dims: None,
            url: None,
            batch_size: default_batch_size(),
            max_retries: default_max_retries(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_provider() -> String {
    "hash".to_string()
}
fn default_batch_size() -> usize {
    32
}
fn default_max_retries() -> u32 {
    3
}
fn default_timeout_secs() -> u64 {
    30
}

impl EmbeddingConfig {
    pub fn is_enabled(&self) -> bool {
        self.provider != "disabled"
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7341".to_string()
}

/// Parse and validate configuration text.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).context("Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Invalid config: {}", path.display()))
}

/// Load `path` if it exists, otherwise fall back to [`Config::default`].
///
/// A file that exists but fails to parse or validate is still an error.
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        info!(path = %path.display(), "config file not found, using defaults");
        Ok(Config::default())
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.retrieval.top_k == 0 {
        bail!("retrieval.top_k must be >= 1");
    }

    if !(-1.0..=1.0).contains(&config.retrieval.min_similarity) {
        bail!("retrieval.min_similarity must be in [-1.0, 1.0]");
    }

    if config.keywords.max_keywords == 0 || config.keywords.max_keywords > KeywordSet::MAX_LEN {
        bail!("keywords.max_keywords must be in 1..={}", KeywordSet::MAX_LEN);
    }

    if config.embedding.batch_size == 0 {
        bail!("embedding.batch_size must be > 0");
    }

    if config.embedding.dims == Some(0) {
        bail!("embedding.dims must be > 0");
    }

    match config.embedding.provider.as_str() {
        "hash" | "disabled" | "local" => {}
        "ollama" | "openai" => {
            if config.embedding.model.is_none() {
                bail!(
                    "embedding.model must be specified when provider is '{}'",
                    config.embedding.provider
                );
            }
            if config.embedding.dims.is_none() {
                bail!(
                    "embedding.dims must be specified when provider is '{}'",
                    config.embedding.provider
                );
            }
        }
        other => bail!(
            "Unknown embedding provider: '{}'. Must be hash, disabled, ollama, openai, or local.",
            other
        ),
    }

    Ok(())
}
