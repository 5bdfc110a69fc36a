//! HTTP surface over a frozen search engine.
//!
//! Every endpoint only reads the shared `Engine`, so the state sits behind a
//! plain `Arc` with no locking. Responses are JSON with permissive CORS.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use poisk_core::tokenizer::{fold_lower, tokenize};
use poisk_core::{persist, Engine};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

const SNIPPET_CONTEXT: usize = 200;
const RESULTS_PER_PAGE: usize = 10;
const DEFAULT_SEARCH_LIMIT: usize = 50;
const DEFAULT_ZIPF_LIMIT: usize = 5000;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub dump_path: PathBuf,
}

pub fn build_app(engine: Arc<Engine>, dump_path: PathBuf) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/search", get(search_handler))
        .route("/api/stats", get(stats_handler))
        .route("/api/zipf", get(zipf_handler))
        .route("/api/document", get(document_handler))
        .route("/api/dump", post(dump_handler))
        .with_state(AppState { engine, dump_path })
        .layer(cors)
}

// Numeric parameters arrive as strings so that malformed values fall back to
// their defaults instead of rejecting the request.
fn parse_or<T: std::str::FromStr>(raw: &Option<String>, default: T) -> T {
    raw.as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    q: String,
    limit: Option<String>,
    page: Option<String>,
}

#[derive(Serialize)]
pub struct SearchResponse {
    results: Vec<SearchResultItem>,
    total: usize,
    page: usize,
    pages: usize,
}

#[derive(Serialize)]
pub struct SearchResultItem {
    url: String,
    title: String,
    score: f64,
    snippet: String,
}

async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchResponse> {
    if params.q.is_empty() {
        return Json(SearchResponse {
            results: Vec::new(),
            total: 0,
            page: 1,
            pages: 0,
        });
    }
    let limit = parse_or(&params.limit, DEFAULT_SEARCH_LIMIT);
    let page = parse_or(&params.page, 1usize).max(1);

    let started = std::time::Instant::now();
    let hits = state.engine.search(&params.q, limit);
    tracing::info!(
        query = %params.q,
        hits = hits.len(),
        elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
        "search"
    );

    let total = hits.len();
    let pages = total.div_ceil(RESULTS_PER_PAGE);
    let start = ((page - 1) * RESULTS_PER_PAGE).min(total);
    let end = (start + RESULTS_PER_PAGE).min(total);

    let results = hits[start..end]
        .iter()
        .map(|hit| {
            let (title, snippet) = match state.engine.document_by_url(&hit.url) {
                Some(doc) => (doc.title.clone(), make_snippet(&doc.text, &params.q)),
                None => (String::new(), String::new()),
            };
            SearchResultItem {
                url: hit.url.clone(),
                title,
                score: hit.score,
                snippet,
            }
        })
        .collect();

    Json(SearchResponse {
        results,
        total,
        page,
        pages,
    })
}

#[derive(Serialize)]
pub struct StatsResponse {
    documents: usize,
    vocabulary: usize,
    total_terms: u64,
    unique_terms: usize,
    index_time: f64,
    status: &'static str,
}

async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let engine = &state.engine;
    Json(StatsResponse {
        documents: engine.document_count(),
        vocabulary: engine.vocabulary_size(),
        total_terms: engine.zipf.total_terms(),
        unique_terms: engine.zipf.unique_terms(),
        index_time: engine.metadata.index_time_ms as f64 / 1000.0,
        status: "ready",
    })
}

#[derive(Deserialize)]
pub struct ZipfParams {
    limit: Option<String>,
}

#[derive(Serialize)]
pub struct ZipfResponse {
    total_unique: usize,
    total_terms: u64,
    data: Vec<ZipfPoint>,
}

#[derive(Serialize)]
pub struct ZipfPoint {
    rank: usize,
    term: String,
    frequency: u64,
    log_rank: f64,
    log_frequency: f64,
    zipf_prediction: f64,
}

async fn zipf_handler(
    State(state): State<AppState>,
    Query(params): Query<ZipfParams>,
) -> Json<ZipfResponse> {
    let limit = parse_or(&params.limit, DEFAULT_ZIPF_LIMIT);
    let terms = state.engine.zipf.get_sorted_terms();
    let max_frequency = terms.first().map(|t| t.frequency).unwrap_or(1);

    let data = terms
        .iter()
        .take(limit)
        .map(|tf| ZipfPoint {
            rank: tf.rank,
            term: tf.term.clone(),
            frequency: tf.frequency,
            log_rank: (tf.rank as f64).log10(),
            log_frequency: (tf.frequency as f64).log10(),
            zipf_prediction: max_frequency as f64 / tf.rank as f64,
        })
        .collect();

    Json(ZipfResponse {
        total_unique: terms.len(),
        total_terms: state.engine.zipf.total_terms(),
        data,
    })
}

#[derive(Deserialize)]
pub struct DocumentParams {
    #[serde(default)]
    url: String,
}

async fn document_handler(
    State(state): State<AppState>,
    Query(params): Query<DocumentParams>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    match state.engine.document_by_url(&params.url) {
        Some(doc) => Ok(Json(serde_json::json!({
            "url": doc.url,
            "title": doc.title,
            "text": doc.text,
        }))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "not found" })),
        )),
    }
}

async fn dump_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    match persist::save(&state.engine, &state.dump_path) {
        Ok(()) => {
            tracing::info!(path = %state.dump_path.display(), "snapshot written");
            Ok(Json(serde_json::json!({ "status": "ok" })))
        }
        Err(err) => {
            tracing::error!(error = %err, "snapshot write failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": err.to_string() })),
            ))
        }
    }
}

fn clamp_to_char_boundary(text: &str, mut pos: usize) -> usize {
    while pos < text.len() && !text.is_char_boundary(pos) {
        pos += 1;
    }
    pos.min(text.len())
}

/// Context around the first occurrence of any query token in the document.
/// Folding is byte-length preserving, so an offset found in the folded text
/// addresses the same spot in the original.
pub fn make_snippet(text: &str, query: &str) -> String {
    let folded = fold_lower(text);
    let hit = tokenize(query)
        .iter()
        .find_map(|token| folded.find(&token.text));

    let Some(pos) = hit else {
        return text.chars().take(SNIPPET_CONTEXT).collect();
    };

    let start = clamp_to_char_boundary(text, pos.saturating_sub(SNIPPET_CONTEXT / 2));
    let end = clamp_to_char_boundary(text, pos + SNIPPET_CONTEXT / 2);

    let mut snippet = String::new();
    if start > 0 {
        snippet.push_str("...");
    }
    snippet.push_str(&text[start..end]);
    if end < text.len() {
        snippet.push_str("...");
    }
    snippet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_centres_on_the_first_hit() {
        let text = format!("{} нужное слово {}", "x".repeat(300), "y".repeat(300));
        let snippet = make_snippet(&text, "нужное");
        assert!(snippet.starts_with("..."));
        assert!(snippet.ends_with("..."));
        assert!(snippet.contains("нужное"));
    }

    #[test]
    fn snippet_without_hit_takes_the_head() {
        let text = "а".repeat(500);
        let snippet = make_snippet(&text, "отсутствует");
        assert_eq!(snippet.chars().count(), 200);
    }

    #[test]
    fn snippet_of_short_text_is_the_text() {
        assert_eq!(make_snippet("короткий текст", "текст"), "короткий текст");
    }

    #[test]
    fn lenient_numeric_parsing() {
        assert_eq!(parse_or(&Some("25".to_string()), 50usize), 25);
        assert_eq!(parse_or(&Some("abc".to_string()), 50usize), 50);
        assert_eq!(parse_or(&None, 50usize), 50);
    }
}
