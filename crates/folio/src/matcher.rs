//! Portfolio matcher: keyword extraction plus catalog query in one call.
//!
//! [`PortfolioMatcher`] wires a configured [`KeywordExtractor`] to a shared
//! [`CatalogStore`]. It is the entry point used by the CLI and the HTTP
//! server; both surfaces produce the same [`MatchReport`].

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use folio_core::keywords::{KeywordExtractor, KeywordSet};
use folio_core::models::RankedMatch;
use folio_core::store::{CatalogStore, StoreMode, StoreOptions};

use crate::catalog::{load_catalog, CatalogSource};
use crate::config::{Config, KeywordsConfig};
use crate::embedding::create_embedder;

/// Result of matching one piece of text against the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub keywords: KeywordSet,
    /// `true` when extraction found nothing and the generic keyword set was
    /// queried instead.
    pub fallback_keywords: bool,
    pub matches: Vec<RankedMatch>,
    pub mode: StoreMode,
}

pub struct PortfolioMatcher {
    extractor: KeywordExtractor,
    store: Arc<CatalogStore>,
    top_k: usize,
}

impl PortfolioMatcher {
    /// Build a matcher from configuration. The catalog is not loaded yet.
    ///
    /// A backend that fails to initialize does not fail construction; the
    /// store starts in fallback mode instead.
    pub fn from_config(config: &Config) -> Self {
        let extractor = keyword_extractor(&config.keywords);
        let options = StoreOptions {
            batch_size: config.embedding.batch_size,
            min_similarity: config.retrieval.min_similarity,
        };
        let store = CatalogStore::from_init(create_embedder(&config.embedding), options);
        Self::new(extractor, Arc::new(store), config.retrieval.top_k)
    }

    pub fn new(extractor: KeywordExtractor, store: Arc<CatalogStore>, top_k: usize) -> Self {
        Self {
            extractor,
            store,
            top_k,
        }
    }

    /// Build a matcher and load the configured catalog into it.
    pub fn open(config: &Config) -> (Self, CatalogSource) {
        let matcher = Self::from_config(config);
        let catalog = load_catalog(config);
        matcher.store.load(&catalog.rows);
        (matcher, catalog.source)
    }

    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }

    pub fn default_top_k(&self) -> usize {
        self.top_k
    }

    pub fn keywords(&self, text: &str) -> KeywordSet {
        self.extractor.extract(text)
    }

    /// Extract keywords from `text` and return the best catalog entries.
    ///
    /// When extraction yields nothing the generic fallback keywords are
    /// queried, so a blank posting still gets a (weak) answer.
    pub fn match_text(&self, text: &str, top_k: Option<usize>) -> MatchReport {
        let (keywords, fallback_keywords) = self.extractor.extract_or_fallback(text);
        let top_k = top_k.unwrap_or(self.top_k);
        let matches = self.store.query(&keywords, top_k);
        debug!(
            keywords = keywords.len(),
            fallback_keywords,
            matches = matches.len(),
            "matched text"
        );
        MatchReport {
            keywords,
            fallback_keywords,
            matches,
            mode: self.store.mode(),
        }
    }
}

/// Build the configured keyword extractor. Needs no embedding backend.
pub fn keyword_extractor(config: &KeywordsConfig) -> KeywordExtractor {
    KeywordExtractor::new(
        &config.extra_vocabulary,
        config.max_generic,
        config.max_keywords,
    )
}

/// Render matches as a Markdown bullet list, one `- [title](link): description`
/// line per match.
pub fn format_links(matches: &[RankedMatch]) -> String {
    matches
        .iter()
        .map(|m| {
            format!(
                "- [{}]({}): {}",
                m.entry.title, m.entry.link, m.entry.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
