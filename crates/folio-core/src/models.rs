//! Core data models used throughout Folio.
//!
//! These types represent the catalog rows, entries, indexed documents, and
//! ranked matches that flow through the matching pipeline.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Raw catalog row as it appears in the tabular catalog resource.
///
/// Every cell is optional; [`CatalogEntry::from_row`] substitutes an empty
/// string for anything missing so a partial row never fails a load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRow {
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
    #[serde(rename = "Techstack", default)]
    pub tech_stack: Option<String>,
    #[serde(rename = "Links", default)]
    pub link: Option<String>,
}

impl CatalogRow {
    /// Convenience constructor with every cell present.
    pub fn new(title: &str, description: &str, tech_stack: &str, link: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            tech_stack: Some(tech_stack.to_string()),
            link: Some(link.to_string()),
        }
    }
}

/// One portfolio project record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// UUID v4 assigned at load time.
    pub id: String,
    pub title: String,
    pub description: String,
    pub tech_stack: String,
    /// Project URL. Not validated.
    pub link: String,
}

impl CatalogEntry {
    pub fn from_row(id: String, row: &CatalogRow) -> Self {
        Self {
            id,
            title: row.title.clone().unwrap_or_default(),
            description: row.description.clone().unwrap_or_default(),
            tech_stack: row.tech_stack.clone().unwrap_or_default(),
            link: row.link.clone().unwrap_or_default(),
        }
    }

    /// Text handed to the embedding backend: title, description, tech stack.
    pub fn document_text(&self) -> String {
        [
            self.title.as_str(),
            self.description.as_str(),
            self.tech_stack.as_str(),
        ]
        .iter()
        .filter(|s| !s.trim().is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
    }

    /// Case-folded text used by substring scoring: title, tech stack, description.
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.title, self.tech_stack, self.description).to_lowercase()
    }
}

/// A catalog entry as held by the store's index.
#[derive(Debug, Clone)]
pub struct IndexedDocument {
    pub entry: CatalogEntry,
    pub text: String,
    /// Hex SHA-256 of `text`; keys the vector index.
    pub content_hash: String,
}

impl IndexedDocument {
    pub fn new(entry: CatalogEntry) -> Self {
        let text = entry.document_text();
        let content_hash = content_hash(&text);
        Self {
            entry,
            text,
            content_hash,
        }
    }
}

/// Hex-encoded SHA-256 of a document text.
pub fn content_hash(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Which scoring path produced a [`RankedMatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringPath {
    /// Cosine similarity over embeddings.
    Semantic,
    /// Substring keyword overlap.
    Fallback,
}

/// A catalog entry paired with its relevance score for one query.
///
/// Scores from different [`ScoringPath`]s are not comparable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMatch {
    #[serde(flatten)]
    pub entry: CatalogEntry,
    pub score: f64,
    pub path: ScoringPath,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cells_default_to_empty() {
        let row = CatalogRow {
            title: Some("Only a title".to_string()),
            ..Default::default()
        };
        let entry = CatalogEntry::from_row("id-1".to_string(), &row);
        assert_eq!(entry.title, "Only a title");
        assert_eq!(entry.description, "");
        assert_eq!(entry.tech_stack, "");
        assert_eq!(entry.link, "");
        assert_eq!(entry.document_text(), "Only a title");
    }

    #[test]
    fn test_search_text_is_case_folded() {
        let row = CatalogRow::new("API Backend", "REST service", "Python, FastAPI", "http://x/1");
        let entry = CatalogEntry::from_row("id".to_string(), &row);
        assert_eq!(entry.search_text(), "api backend python, fastapi rest service");
    }

    #[test]
    fn test_content_hash_stable() {
        let a = content_hash("hello");
        assert_eq!(a, content_hash("hello"));
        assert_ne!(a, content_hash("hello!"));
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_ranked_match_serializes_flat() {
        let row = CatalogRow::new("T", "D", "S", "L");
        let m = RankedMatch {
            entry: CatalogEntry::from_row("x".to_string(), &row),
            score: 2.0,
            path: ScoringPath::Fallback,
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["title"], "T");
        assert_eq!(json["link"], "L");
        assert_eq!(json["tech_stack"], "S");
        assert_eq!(json["path"], "fallback");
    }
}
