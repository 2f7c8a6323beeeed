//! HTTP JSON API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/health` | Health check with version, catalog size and store mode |
//! | `POST` | `/keywords` | Extract keywords from `{ "text": ... }` |
//! | `POST` | `/match` | Match `{ "text": ..., "top_k"?: n }` against the catalog |
//!
//! `top_k` larger than the catalog is capped; `0` yields no matches.
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "text must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `internal` (500).
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser front-ends can
//! call the API directly.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use folio_core::keywords::KeywordSet;
use folio_core::store::StoreMode;

use crate::config::Config;
use crate::matcher::{MatchReport, PortfolioMatcher};

#[derive(Clone)]
struct AppState {
    matcher: Arc<PortfolioMatcher>,
}

/// Build the router around an already-loaded matcher.
pub fn router(matcher: Arc<PortfolioMatcher>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/keywords", post(handle_keywords))
        .route("/match", post(handle_match))
        .layer(cors)
        .with_state(AppState { matcher })
}

/// Load the catalog and serve the API on `[server].bind` until the process
/// is terminated.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let config = config.clone();

    // Remote embedders use blocking HTTP clients, which must not be created
    // or driven on a runtime worker.
    let (matcher, source) =
        tokio::task::spawn_blocking(move || PortfolioMatcher::open(&config)).await?;
    info!(
        catalog = %source,
        entries = matcher.store().len(),
        "catalog ready"
    );

    let app = router(Arc::new(matcher));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

// ============ Error handling ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn internal_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: message.into(),
    }
}

// ============ Handlers ============

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    entries: usize,
    store: StoreMode,
}

async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.matcher.store();
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        entries: store.len(),
        store: store.mode(),
    })
}

#[derive(Deserialize)]
struct TextRequest {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct KeywordsResponse {
    keywords: KeywordSet,
}

async fn handle_keywords(
    State(state): State<AppState>,
    Json(request): Json<TextRequest>,
) -> Result<Json<KeywordsResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(bad_request("text must not be empty"));
    }
    Ok(Json(KeywordsResponse {
        keywords: state.matcher.keywords(&request.text),
    }))
}

#[derive(Deserialize)]
struct MatchRequest {
    #[serde(default)]
    text: String,
    #[serde(default)]
    top_k: Option<usize>,
}

async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchReport>, AppError> {
    if request.text.trim().is_empty() {
        return Err(bad_request("text must not be empty"));
    }

    // Embedding the query may block on a remote backend.
    let matcher = state.matcher.clone();
    let report =
        tokio::task::spawn_blocking(move || matcher.match_text(&request.text, request.top_k))
            .await
            .map_err(|e| internal_error(format!("match task failed: {}", e)))?;

    Ok(Json(report))
}
