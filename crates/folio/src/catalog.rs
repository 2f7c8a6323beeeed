//! Catalog file loading.
//!
//! Reads the portfolio CSV (`Title, Description, Techstack, Links`) into
//! [`CatalogRow`]s. A missing, unreadable, malformed, or empty file never
//! fails the caller: the built-in [`default_catalog`] is substituted and a
//! warning is logged.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use folio_core::models::CatalogRow;

use crate::config::Config;

/// Where a loaded catalog came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum CatalogSource {
    File(PathBuf),
    BuiltIn,
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::BuiltIn => write!(f, "built-in catalog"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedCatalog {
    pub rows: Vec<CatalogRow>,
    pub source: CatalogSource,
}

/// Load the configured catalog, substituting the built-in one on any failure.
pub fn load_catalog(config: &Config) -> LoadedCatalog {
    let Some(path) = config.catalog.path.as_deref() else {
        info!("no catalog path configured, using built-in catalog");
        return built_in();
    };

    match read_catalog_csv(path) {
        Ok(rows) if rows.is_empty() => {
            warn!(path = %path.display(), "catalog file has no rows, using built-in catalog");
            built_in()
        }
        Ok(rows) => {
            info!(path = %path.display(), rows = rows.len(), "catalog file read");
            LoadedCatalog {
                rows,
                source: CatalogSource::File(path.to_path_buf()),
            }
        }
        Err(e) => {
            let error = format!("{:#}", e);
            warn!(path = %path.display(), error = %error, "catalog file unusable, using built-in catalog");
            built_in()
        }
    }
}

fn built_in() -> LoadedCatalog {
    LoadedCatalog {
        rows: default_catalog(),
        source: CatalogSource::BuiltIn,
    }
}

pub fn read_catalog_csv(path: &Path) -> Result<Vec<CatalogRow>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open catalog: {}", path.display()))?;
    parse_catalog_csv(file).with_context(|| format!("Failed to parse catalog: {}", path.display()))
}

/// Parse catalog CSV from any reader. Unknown columns are ignored and
/// missing ones become `None`.
pub fn parse_catalog_csv<R: Read>(reader: R) -> Result<Vec<CatalogRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (i, record) in csv_reader.deserialize::<CatalogRow>().enumerate() {
        let row = record.with_context(|| format!("Invalid catalog row {}", i + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Portfolio used when no catalog file is available.
pub fn default_catalog() -> Vec<CatalogRow> {
    [
        (
            "Commerce API Platform",
            "REST and GraphQL backend for a multi-vendor marketplace with order routing and payments",
            "Python, FastAPI, PostgreSQL, Redis, Docker",
            "https://example.com/portfolio/commerce-api",
        ),
        (
            "Field Service Mobile App",
            "Offline-first iOS and Android app for technicians with scheduling and photo reports",
            "React Native, TypeScript, Firebase",
            "https://example.com/portfolio/field-service-app",
        ),
        (
            "Retail Demand Forecasting",
            "Machine learning models forecasting store-level demand from sales and weather data",
            "Python, scikit-learn, Pandas, Airflow, Snowflake",
            "https://example.com/portfolio/demand-forecasting",
        ),
        (
            "Support Assistant",
            "LLM-powered assistant answering customer tickets from a searchable knowledge base",
            "Python, LangChain, OpenAI, Elasticsearch",
            "https://example.com/portfolio/support-assistant",
        ),
        (
            "Cloud Migration",
            "Moved a monolith to containerized microservices with automated deployments",
            "AWS, Kubernetes, Terraform, Jenkins, CI/CD",
            "https://example.com/portfolio/cloud-migration",
        ),
        (
            "Analytics Dashboard",
            "Real-time dashboard for marketing KPIs with role-based access",
            "React, Node.js, MongoDB, D3",
            "https://example.com/portfolio/analytics-dashboard",
        ),
        (
            "Headless Storefront",
            "Fast storefront on a headless commerce backend with CMS-driven landing pages",
            "Next.js, Shopify, Tailwind",
            "https://example.com/portfolio/headless-storefront",
        ),
        (
            "Enterprise Integration Hub",
            "Event-driven integration layer synchronizing ERP, CRM and billing systems",
            "Java, Spring, Kafka, Salesforce",
            "https://example.com/portfolio/integration-hub",
        ),
    ]
    .iter()
    .map(|(title, description, stack, link)| CatalogRow::new(title, description, stack, link))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_with_quotes_and_extra_columns() {
        let csv = "Title,Description,Techstack,Links,Notes\n\
                   API Backend,REST service,\"Python, FastAPI\",http://x/1,internal\n\
                   Mobile App,iOS app,React Native,http://x/2,\n";
        let rows = parse_catalog_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].tech_stack.as_deref(), Some("Python, FastAPI"));
        assert_eq!(rows[1].link.as_deref(), Some("http://x/2"));
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let csv = "Title,Techstack\nCLI Tool,Rust\n";
        let rows = parse_catalog_csv(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].title.as_deref(), Some("CLI Tool"));
        assert_eq!(rows[0].description, None);
        assert_eq!(rows[0].link, None);
    }

    #[test]
    fn test_unconfigured_path_uses_built_in() {
        let loaded = load_catalog(&Config::default());
        assert_eq!(loaded.source, CatalogSource::BuiltIn);
        assert_eq!(loaded.rows, default_catalog());
    }

    #[test]
    fn test_missing_file_uses_built_in() {
        let mut config = Config::default();
        config.catalog.path = Some(PathBuf::from("/nonexistent/portfolio.csv"));
        let loaded = load_catalog(&config);
        assert_eq!(loaded.source, CatalogSource::BuiltIn);
        assert!(!loaded.rows.is_empty());
    }

    #[test]
    fn test_header_only_file_uses_built_in() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.csv");
        std::fs::write(&path, "Title,Description,Techstack,Links\n").unwrap();
        let mut config = Config::default();
        config.catalog.path = Some(path);
        assert_eq!(load_catalog(&config).source, CatalogSource::BuiltIn);
    }

    #[test]
    fn test_file_is_used_when_valid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.csv");
        std::fs::write(
            &path,
            "Title,Description,Techstack,Links\nCLI Tool,Log shipper,Rust,http://x/cli\n",
        )
        .unwrap();
        let mut config = Config::default();
        config.catalog.path = Some(path.clone());
        let loaded = load_catalog(&config);
        assert_eq!(loaded.source, CatalogSource::File(path));
        assert_eq!(loaded.rows.len(), 1);
    }

    #[test]
    fn test_default_catalog_is_complete() {
        for row in default_catalog() {
            assert!(row.title.is_some_and(|t| !t.is_empty()));
            assert!(row.link.is_some_and(|l| l.starts_with("https://")));
        }
    }
}
