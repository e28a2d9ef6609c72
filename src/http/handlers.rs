//! HTTP handlers for the search API and health endpoint.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};

use crate::error::ServiceError;
use crate::metrics;
use crate::search::{SearchResponse, Searcher};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    searcher: Arc<dyn Searcher>,
}

/// Query string of `GET /search`.
#[derive(Debug, Default, PartialEq)]
pub struct SearchParams {
    pub query: Option<String>,
}

impl SearchParams {
    /// Keep the first `query` pair; repeats and unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let query = pairs
            .into_iter()
            .find(|(key, _)| key == "query")
            .map(|(_, value)| value);
        Self { query }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub record_count: usize,
    pub source: String,
    pub loaded_at: DateTime<Utc>,
}

/// Build the service router with permissive CORS and request tracing.
pub fn router(searcher: Arc<dyn Searcher>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/search", get(search))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState { searcher })
}

#[instrument(skip_all, fields(query))]
async fn search(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<SearchResponse>, ServiceError> {
    let start = Instant::now();

    let params = match pairs {
        Ok(Query(pairs)) => SearchParams::from_pairs(pairs),
        Err(rejection) => {
            metrics::increment_search_count();
            metrics::increment_invalid_queries();
            warn!(error = %rejection, "Rejected malformed query string");
            return Err(ServiceError::InvalidQuery);
        }
    };
    let query = params.query.unwrap_or_default();

    tracing::Span::current().record("query", query.as_str());

    info!(query = %query, "Processing search request");

    let result = state.searcher.search(&query).await;

    metrics::record_search_latency(start.elapsed().as_secs_f64() * 1000.0);
    metrics::increment_search_count();

    match result {
        Ok(response) => {
            info!(matches = response.results.len(), "Search completed");
            Ok(Json(response))
        }
        Err(ServiceError::InvalidQuery) => {
            metrics::increment_invalid_queries();
            warn!("Rejected blank query");
            Err(ServiceError::InvalidQuery)
        }
        Err(e) => {
            metrics::increment_search_errors();
            error!(error = %e, query = %query, "Search failed");
            Err(e)
        }
    }
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let searcher = &state.searcher;
    let (code, status) = if searcher.is_ready() {
        (StatusCode::OK, "serving")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_serving")
    };

    let response = HealthResponse {
        status: status.to_string(),
        record_count: searcher.record_count(),
        source: searcher.source().to_string(),
        loaded_at: searcher.loaded_at(),
    };

    (code, Json(response))
}
