//! # Folio Core
//!
//! Matching engine for Folio: keyword extraction, the catalog store,
//! embedding-backed similarity retrieval, and the fallback scorer.
//!
//! This crate does no file or network I/O and carries no async runtime.
//! Concrete network/model embedders and catalog file loading live in the
//! `folio` app crate.
//!
//! ```text
//! raw text ─▶ keywords::extract ─▶ KeywordSet ─▶ CatalogStore::query ─▶ Vec<RankedMatch>
//!                                                   │
//!                                     retrieve (embeddings) or fallback (substrings)
//! ```

pub mod embedding;
pub mod error;
pub mod fallback;
pub mod keywords;
pub mod models;
pub mod retrieve;
pub mod store;
