//! HTTP routes

pub mod overview;
pub mod quotes;

use axum::{
    extract::State,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::cache::CacheStats;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub cache: CacheStats,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        cache: state.cache.stats(),
    })
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/quotes", post(quotes::create))
        .route("/api/v1/quotes/:id", get(quotes::show).delete(quotes::end))
        .route("/api/v1/quotes/:id/customer", put(quotes::set_customer))
        .route("/api/v1/quotes/:id/services", post(quotes::add_service))
        .route("/api/v1/quotes/:id/services/preview", post(quotes::preview))
        .route(
            "/api/v1/quotes/:id/services/:index",
            delete(quotes::remove_service),
        )
        .route("/api/v1/quotes/:id/totals", get(quotes::totals))
        .route("/api/v1/quotes/:id/export", post(quotes::export_files))
        .route(
            "/api/v1/quotes/:id/export/spreadsheet",
            get(quotes::download_spreadsheet),
        )
        .route(
            "/api/v1/quotes/:id/export/document",
            get(quotes::download_document),
        )
        .route("/quotes/:id", get(overview::show))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
