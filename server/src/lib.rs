use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use vsm_core::{Boosts, EngineConfig, SearchEngine};

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_boost")]
    pub boost_title: f64,
    #[serde(default = "default_boost")]
    pub boost_abstract: f64,
    #[serde(default = "default_k")]
    pub k: usize,
}

#[derive(Deserialize)]
pub struct RankParams {
    #[serde(default = "default_boost")]
    pub boost_title: f64,
    #[serde(default = "default_boost")]
    pub boost_abstract: f64,
    #[serde(default = "default_k")]
    pub k: usize,
}

fn default_boost() -> f64 { 0.5 }
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: u32,
    pub score: f64,
    pub title: String,
}

#[derive(Clone)]
pub struct AppState {
    /// Each search rewrites the engine's ranking store, so access is serialized.
    pub engine: Arc<Mutex<SearchEngine>>,
}

type ApiError = (StatusCode, String);

/// Index the collection (and optional query file) and build the router.
pub fn build_app(collection: &str, queries: Option<&str>, config: EngineConfig) -> Result<Router> {
    let mut engine = SearchEngine::with_config(config);
    engine.build_index(collection)?;
    if let Some(queries) = queries {
        engine.build_queries(queries)?;
    }
    Ok(router(engine))
}

pub fn router(engine: SearchEngine) -> Router {
    let app_state = AppState { engine: Arc::new(Mutex::new(engine)) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/query/:id", get(query_handler))
        .route("/query/:id/search", get(query_search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn run_search(state: &AppState, text: String, boost_title: f64, boost_abstract: f64, k: usize) -> Result<SearchResponse, ApiError> {
    let boosts = Boosts::new(boost_title, boost_abstract).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let start = std::time::Instant::now();
    let mut engine = state.engine.lock();
    let total_hits = engine.search(&text, boosts).len();
    let k = k.max(1).min(100);
    let results = engine
        .top_k(k)
        .iter()
        .map(|hit| SearchHit {
            doc_id: hit.document_id,
            score: hit.score,
            title: engine.get_title(hit.document_id).unwrap_or_default().to_string(),
        })
        .collect();
    let took_s = start.elapsed().as_secs_f64();
    tracing::debug!(total_hits, took_s, "search served");
    Ok(SearchResponse { query: text, took_s, total_hits, results })
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<SearchResponse>, ApiError> {
    run_search(&state, params.q, params.boost_title, params.boost_abstract, params.k).map(Json)
}

pub async fn query_handler(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<serde_json::Value>, ApiError> {
    let engine = state.engine.lock();
    match engine.queries().get(&id) {
        Some(query) => Ok(Json(serde_json::json!({ "id": query.id, "text": query.text }))),
        None => Err((StatusCode::NOT_FOUND, format!("unknown query id: {id}"))),
    }
}

pub async fn query_search_handler(State(state): State<AppState>, Path(id): Path<String>, Query(params): Query<RankParams>) -> Result<Json<SearchResponse>, ApiError> {
    let text = {
        let engine = state.engine.lock();
        engine.query_or_err(&id).map(str::to_string).map_err(|e| (StatusCode::NOT_FOUND, e.to_string()))?
    };
    run_search(&state, text, params.boost_title, params.boost_abstract, params.k).map(Json)
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<u32>) -> Result<Json<serde_json::Value>, ApiError> {
    let engine = state.engine.lock();
    match engine.get_title(doc_id) {
        Some(title) => Ok(Json(serde_json::json!({ "doc_id": doc_id, "title": title }))),
        None => Err((StatusCode::NOT_FOUND, "not found".into())),
    }
}
