//! HTTP routes for the advisor JSON API and the embedded browser UI.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use advisor_core::advisor::Advisor;
use advisor_core::model::{unix_now, InputMethod, Interaction, Language};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::loader;

const INDEX_HTML: &str = include_str!("../static/index.html");

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub advisor: Arc<Advisor>,
    /// Knowledge file re-read on demand by the reload endpoint
    pub knowledge_path: PathBuf,
    /// Fingerprint of the knowledge bytes currently serving
    pub fingerprint: Arc<tokio::sync::RwLock<String>>,
}

/// Create the router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/ask", post(ask))
        .route("/api/categories", get(categories))
        .route("/api/history", get(history))
        .route("/api/status", get(status))
        .route("/api/reload", post(reload))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

#[derive(Debug, Deserialize)]
struct AskRequest {
    #[serde(default)]
    question: String,
    #[serde(default = "default_language")]
    language: String,
    #[serde(default)]
    input_method: InputMethod,
}

fn default_language() -> String {
    "en".to_string()
}

#[derive(Debug, Serialize)]
struct AskResponse {
    question: String,
    answer: String,
    language: Language,
    matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    timestamp: u64,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: String) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message }))
}

async fn ask(
    State(state): State<AppState>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let outcome = state
        .advisor
        .ask(&req.question, &req.language, req.input_method)
        .map_err(|e| {
            warn!(error = %e, "rejected question");
            bad_request(e.to_string())
        })?;

    Ok(Json(AskResponse {
        question: outcome.question,
        answer: outcome.answer,
        language: outcome.language,
        matched: outcome.matched,
        category: outcome.category,
        timestamp: unix_now(),
    }))
}

#[derive(Debug, Serialize)]
struct CategoriesResponse {
    categories: BTreeMap<String, usize>,
}

async fn categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: state.advisor.list_categories(),
    })
}

#[derive(Debug, Deserialize)]
struct HistoryParams {
    #[serde(default = "default_history_limit")]
    limit: usize,
}

fn default_history_limit() -> usize {
    10
}

#[derive(Debug, Serialize)]
struct HistoryResponse {
    history: Vec<Interaction>,
}

async fn history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        history: state.advisor.recent_history(params.limit),
    })
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: &'static str,
    entries: usize,
    categories: usize,
    history: usize,
    history_capacity: usize,
    fingerprint: String,
    timestamp: u64,
}

async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let fingerprint = state.fingerprint.read().await.clone();
    Json(StatusResponse {
        status: "online",
        entries: state.advisor.entry_count(),
        categories: state.advisor.list_categories().len(),
        history: state.advisor.history_len(),
        history_capacity: state.advisor.history_capacity(),
        fingerprint,
        timestamp: unix_now(),
    })
}

#[derive(Debug, Serialize)]
struct ReloadResponse {
    reloaded: bool,
    loaded: usize,
    skipped: usize,
    fingerprint: String,
}

/// Re-reads the knowledge file and swaps the snapshot in if its bytes
/// changed. A failed read or parse keeps the current snapshot serving.
async fn reload(State(state): State<AppState>) -> Result<Json<ReloadResponse>, ApiError> {
    let knowledge = loader::load_knowledge(&state.knowledge_path).map_err(|e| {
        error!(error = %e, "reload failed, keeping current snapshot");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse { error: e.to_string() }),
        )
    })?;

    // Holding the write lock across the swap serializes concurrent
    // reload requests.
    let mut fingerprint = state.fingerprint.write().await;
    if *fingerprint == knowledge.fingerprint {
        info!("knowledge file unchanged, skipping reload");
        return Ok(Json(ReloadResponse {
            reloaded: false,
            loaded: state.advisor.entry_count(),
            skipped: 0,
            fingerprint: fingerprint.clone(),
        }));
    }

    let report = state.advisor.reload(knowledge.records);
    *fingerprint = knowledge.fingerprint.clone();
    Ok(Json(ReloadResponse {
        reloaded: true,
        loaded: report.loaded,
        skipped: report.skipped,
        fingerprint: knowledge.fingerprint,
    }))
}
