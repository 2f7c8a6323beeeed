//! Catalog store with an embedding index and a one-way fallback mode.
//!
//! [`CatalogStore`] owns the indexed documents and the backend state. The
//! backend is a two-state machine:
//!
//! ```text
//!   ┌────────────────┐   init / embed / query failure   ┌──────────────────┐
//!   │ BACKEND_ACTIVE │ ────────────────────────────────▶│ FALLBACK_ACTIVE  │
//!   └────────────────┘                                  └──────────────────┘
//!            ▲                                                   │
//!            └──────────────────── reset() ──────────────────────┘
//! ```
//!
//! Whichever state the store is in, [`CatalogStore::query`] returns the same
//! [`RankedMatch`] shape; only [`RankedMatch::path`] tells them apart.
//!
//! # Concurrency
//!
//! [`CatalogStore::load`] is serialized by a one-shot guard, so concurrent
//! first-time loads populate the store exactly once. Queries take a shared
//! read lock and may run concurrently once loading is done.

pub mod index;

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::embedding::Embedder;
use crate::error::BackendError;
use crate::fallback;
use crate::keywords::KeywordSet;
use crate::models::{CatalogEntry, CatalogRow, IndexedDocument, RankedMatch};
use crate::retrieve::{self, RetrieveParams};

use index::VectorIndex;

/// Store tuning knobs.
#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
    /// Texts per embedding request during load.
    pub batch_size: usize,
    /// Semantic matches must score strictly above this.
    pub min_similarity: f32,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            batch_size: 32,
            min_similarity: 0.0,
        }
    }
}

enum BackendState {
    Active {
        embedder: Arc<dyn Embedder>,
        index: VectorIndex,
    },
    Fallback {
        reason: BackendError,
    },
}

impl BackendState {
    fn for_embedder(embedder: Option<&Arc<dyn Embedder>>) -> Self {
        match embedder {
            Some(e) if e.dims() == 0 => Self::Fallback {
                reason: BackendError::Init(format!("model '{}' reports zero dims", e.model_name())),
            },
            Some(e) => Self::Active {
                embedder: Arc::clone(e),
                index: VectorIndex::new(e.dims()),
            },
            None => Self::Fallback {
                reason: BackendError::Unavailable,
            },
        }
    }

    /// One-way transition to fallback. No-op when already there.
    fn fall_back(&mut self, reason: BackendError) {
        if let Self::Active { embedder, .. } = self {
            warn!(
                model = embedder.model_name(),
                error = %reason,
                "embedding backend unavailable, switching to fallback scoring"
            );
            *self = Self::Fallback { reason };
        }
    }
}

/// Snapshot of a store's backend state, for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum StoreMode {
    Semantic {
        model: String,
        dims: usize,
        vectors: usize,
    },
    Fallback {
        reason: String,
    },
}

struct Inner {
    documents: Vec<IndexedDocument>,
    backend: BackendState,
}

/// Portfolio catalog with embedding-indexed retrieval.
pub struct CatalogStore {
    embedder: Option<Arc<dyn Embedder>>,
    options: StoreOptions,
    load_guard: Mutex<()>,
    inner: RwLock<Inner>,
}

impl CatalogStore {
    /// Create a store backed by `embedder`.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self::with_options(Some(embedder), StoreOptions::default())
    }

    /// Create a store with no embedding backend. Every query is scored by
    /// the fallback scorer.
    pub fn fallback_only() -> Self {
        Self::with_options(None, StoreOptions::default())
    }

    pub fn with_options(embedder: Option<Arc<dyn Embedder>>, options: StoreOptions) -> Self {
        let backend = BackendState::for_embedder(embedder.as_ref());
        Self::from_parts(embedder, options, backend)
    }

    /// Create a store from the outcome of backend initialization.
    ///
    /// `Ok(None)` means no backend is configured. An initialization error
    /// is not propagated: the store starts in fallback mode with the error
    /// recorded as the reason.
    pub fn from_init(
        embedder: anyhow::Result<Option<Arc<dyn Embedder>>>,
        options: StoreOptions,
    ) -> Self {
        match embedder {
            Ok(e) => Self::with_options(e, options),
            Err(e) => {
                let reason = BackendError::Init(format!("{:#}", e));
                Self::from_parts(None, options, BackendState::Fallback { reason })
            }
        }
    }

    fn from_parts(
        embedder: Option<Arc<dyn Embedder>>,
        options: StoreOptions,
        backend: BackendState,
    ) -> Self {
        if let BackendState::Fallback { reason } = &backend {
            warn!(error = %reason, "catalog store starting in fallback mode");
        }
        Self {
            embedder,
            options,
            load_guard: Mutex::new(()),
            inner: RwLock::new(Inner {
                documents: Vec::new(),
                backend,
            }),
        }
    }

    /// Index `rows`, unless the store already holds documents.
    ///
    /// Returns the number of documents indexed by this call (`0` when the
    /// call was a no-op). Missing cells become empty strings; every entry
    /// gets a fresh UUID. An embedding failure moves the store to fallback
    /// mode but still stores the documents.
    pub fn load(&self, rows: &[CatalogRow]) -> usize {
        let _guard = self.load_guard.lock();

        if self.is_loaded() {
            debug!("catalog already loaded, skipping");
            return 0;
        }

        let documents: Vec<IndexedDocument> = rows
            .iter()
            .map(|row| IndexedDocument::new(CatalogEntry::from_row(Uuid::new_v4().to_string(), row)))
            .collect();

        let active = match &self.inner.read().backend {
            BackendState::Active { embedder, .. } => Some(Arc::clone(embedder)),
            BackendState::Fallback { .. } => None,
        };
        let built = active.map(|e| index::build(e.as_ref(), &documents, self.options.batch_size));

        let mut inner = self.inner.write();
        match built {
            Some(Ok(built_index)) => {
                if let BackendState::Active { index, .. } = &mut inner.backend {
                    *index = built_index;
                }
            }
            Some(Err(reason)) => inner.backend.fall_back(reason),
            None => {}
        }

        let count = documents.len();
        inner.documents = documents;
        info!(
            documents = count,
            fallback = matches!(inner.backend, BackendState::Fallback { .. }),
            "catalog loaded"
        );
        count
    }

    /// Whether the store holds any indexed documents.
    pub fn is_loaded(&self) -> bool {
        !self.inner.read().documents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inner.read().documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All entries in load order.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.inner
            .read()
            .documents
            .iter()
            .map(|d| d.entry.clone())
            .collect()
    }

    pub fn mode(&self) -> StoreMode {
        match &self.inner.read().backend {
            BackendState::Active { embedder, index } => StoreMode::Semantic {
                model: embedder.model_name().to_string(),
                dims: index.dims(),
                vectors: index.len(),
            },
            BackendState::Fallback { reason } => StoreMode::Fallback {
                reason: reason.to_string(),
            },
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.inner.read().backend, BackendState::Fallback { .. })
    }

    /// Drop every document and re-arm the embedding backend.
    pub fn reset(&self) {
        let _guard = self.load_guard.lock();
        let mut inner = self.inner.write();
        inner.documents.clear();
        inner.backend = BackendState::for_embedder(self.embedder.as_ref());
        info!("catalog store reset");
    }

    /// Return up to `top_k` entries ranked against `keywords`.
    ///
    /// Uses the embedding index while the backend is active. A backend
    /// failure during the query switches the store to fallback mode and
    /// the same call is answered by the fallback scorer.
    pub fn query(&self, keywords: &KeywordSet, top_k: usize) -> Vec<RankedMatch> {
        if keywords.is_empty() || top_k == 0 {
            return Vec::new();
        }

        let params = RetrieveParams {
            top_k,
            min_similarity: self.options.min_similarity,
        };

        let reason = {
            let inner = self.inner.read();
            match &inner.backend {
                BackendState::Fallback { .. } => {
                    return fallback::score(keywords, inner.documents.iter().map(|d| &d.entry), top_k);
                }
                BackendState::Active { embedder, index } => {
                    match retrieve::rank(embedder.as_ref(), index, &inner.documents, keywords, params) {
                        Ok(matches) => return matches,
                        Err(reason) => reason,
                    }
                }
            }
        };

        let mut inner = self.inner.write();
        inner.backend.fall_back(reason);
        fallback::score(keywords, inner.documents.iter().map(|d| &d.entry), top_k)
    }
}
