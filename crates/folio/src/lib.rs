//! # Folio
//!
//! **Pick the portfolio projects worth citing for a job posting.**
//!
//! Folio extracts technology keywords from a posting, ranks a small catalog
//! of portfolio projects against them, and hands back the best few with
//! their title, link, description and tech stack. The matching engine lives
//! in `folio-core`; this crate adds configuration, catalog loading, embedding
//! backends, a CLI and an HTTP API.
//!
//! ## Data Flow
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ posting  │──▶│  keywords    │──▶│ CatalogStore │──▶│ RankedMatch  │
//! │  text    │   │  extractor   │   │ embed / subs │   │  top-k list  │
//! └──────────┘   └──────────────┘   └──────────────┘   └──────┬───────┘
//!                                                              │
//!                                  ┌───────────────────────────┤
//!                                  ▼                           ▼
//!                            ┌──────────┐                ┌──────────┐
//!                            │   CLI    │                │   HTTP   │
//!                            │ (folio)  │                │  (axum)  │
//!                            └──────────┘                └──────────┘
//! ```
//!
//! ## Scoring Paths
//!
//! | Path | Engine | Used when |
//! |------|--------|-----------|
//! | `semantic` | Cosine similarity over embeddings | Backend initialized and healthy |
//! | `fallback` | Substring keyword overlap count | Backend disabled, failed to start, or failed once |
//!
//! The switch to `fallback` is permanent for the life of the store.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`catalog`] | Catalog CSV loading with a built-in default catalog |
//! | [`embedding`] | Embedder factory: hash, Ollama, OpenAI, local fastembed |
//! | [`matcher`] | `PortfolioMatcher`: extract + query, Markdown link rendering |
//! | [`server`] | HTTP JSON API (Axum) with CORS |

pub mod catalog;
pub mod config;
pub mod embedding;
pub mod matcher;
pub mod server;

pub use folio_core::keywords::{extract_keywords, KeywordSet};
pub use folio_core::models::{CatalogEntry, CatalogRow, RankedMatch, ScoringPath};
pub use folio_core::store::CatalogStore;
pub use matcher::{format_links, MatchReport, PortfolioMatcher};
