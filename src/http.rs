//! HTTP surface: the `/api/search` routes consumed by the web frontends.
//!
//! Handlers are thin wrappers around [`SearchService`]; all validation
//! happens here so the query engine only ever sees well-formed input.
//! Internal failures are logged and mapped to generic 500 bodies — the
//! frontend distinguishes "no matches" (200 with an empty list) from "search
//! unavailable" (5xx) and renders accordingly.

use crate::query::QueryOptions;
use crate::service::SearchService;
use axum::{
    extract::{Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Named HTTP cache policies for responses that are safe to cache.
///
/// Each strategy maps to a fixed `Cache-Control` directive string, so callers
/// pick a policy by name instead of hand-writing directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStrategy {
    /// Immutable build artifacts.
    Static,
    /// Content that changes on deploys: cache an hour, revalidate for a day.
    SemiStatic,
    /// Frequently changing content: cache a minute, revalidate five.
    Dynamic,
    /// Never cache.
    NoCache,
}

impl CacheStrategy {
    pub fn directive(self) -> &'static str {
        match self {
            CacheStrategy::Static => "public, max-age=31536000, immutable",
            CacheStrategy::SemiStatic => "public, max-age=3600, stale-while-revalidate=86400",
            CacheStrategy::Dynamic => "public, max-age=60, stale-while-revalidate=300",
            CacheStrategy::NoCache => "no-store",
        }
    }

    fn header_value(self) -> HeaderValue {
        HeaderValue::from_static(self.directive())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SearchService>,
}

/// Build the API router with tracing and permissive CORS (the apps in the
/// monorepo are served from several origins).
pub fn router(service: Arc<SearchService>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

    Router::new()
        .route("/api/search", get(search))
        .route("/api/search/blog", get(search_blog))
        .route("/api/search/suggest", get(suggest))
        .route("/api/search/index", get(index_summary))
        .route("/api/search/rebuild", post(rebuild))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState { service })
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    limit: Option<usize>,
}

/// GET /api/search?q=&type=&limit= — the main search endpoint.
///
/// A missing or empty `q` is an ordinary empty result set, not an error.
async fn search(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Response {
    let query = params.q.unwrap_or_default();
    let opts = QueryOptions {
        kind: params.kind,
        limit: params.limit,
    };

    match state.service.search(&query, &opts) {
        Ok(resp) => (StatusCode::OK, Json(resp)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "search request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Search failed"})),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct BlogSearchParams {
    query: Option<String>,
    limit: Option<usize>,
}

/// GET /api/search/blog?query=&limit= — blog-only search, returning a bare
/// result array. Unlike `/api/search`, a missing query here is a 400.
async fn search_blog(
    State(state): State<AppState>,
    Query(params): Query<BlogSearchParams>,
) -> Response {
    let Some(query) = params.query.filter(|q| !q.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Query parameter is required"})),
        )
            .into_response();
    };

    let opts = QueryOptions {
        kind: Some("blog".to_string()),
        limit: params.limit,
    };
    match state.service.search(&query, &opts) {
        Ok(resp) => (StatusCode::OK, Json(resp.results)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "blog search request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Internal server error"})),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct SuggestParams {
    prefix: Option<String>,
    limit: Option<usize>,
}

/// GET /api/search/suggest?prefix=&limit= — autocomplete suggestions.
async fn suggest(State(state): State<AppState>, Query(params): Query<SuggestParams>) -> Response {
    let prefix = params.prefix.unwrap_or_default();
    match state.service.suggest(&prefix, params.limit) {
        Ok(suggestions) => (StatusCode::OK, Json(json!({"suggestions": suggestions}))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "suggest request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Search failed"})),
            )
                .into_response()
        }
    }
}

/// GET /api/search/index — index summary, cacheable at the HTTP layer.
async fn index_summary(State(state): State<AppState>) -> Response {
    match state.service.index_summary() {
        Ok(summary) => {
            let mut response = (StatusCode::OK, Json(json!({"index": summary}))).into_response();
            response.headers_mut().insert(
                header::CACHE_CONTROL,
                CacheStrategy::SemiStatic.header_value(),
            );
            response
        }
        Err(e) => {
            tracing::error!(error = %e, "index summary request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to load search index"})),
            )
                .into_response()
        }
    }
}

/// POST /api/search/rebuild — administrative invalidation, called after
/// content is edited through the admin UI.
///
/// A rebuild reads the content directory and blocks on the flight lock, so
/// it runs on the blocking pool rather than a runtime worker.
async fn rebuild(State(state): State<AppState>) -> Response {
    let service = state.service.clone();
    match tokio::task::spawn_blocking(move || service.rebuild()).await {
        Ok(Ok(docs)) => (StatusCode::OK, Json(json!({"rebuilt": true, "docs": docs}))).into_response(),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "manual rebuild failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Rebuild failed"})),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "rebuild task panicked");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Rebuild failed"})),
            )
                .into_response()
        }
    }
}

/// Bind and serve the API until the process is stopped.
pub async fn serve(addr: std::net::SocketAddr, service: Arc<SearchService>) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "search API listening");
    axum::serve(listener, router(service)).await
}
