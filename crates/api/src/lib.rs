//! HTTP API server for the revenue analytics service.
//!
//! Provides REST endpoints for revenue aggregation and the CSV refresh
//! path, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use analytics::RevenueAnalytics;
use axum::Router;
use axum::routing::{get, post};
use loader::CsvLoader;
use metrics_exporter_prometheus::PrometheusHandle;
use store::SalesStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub analytics: RevenueAnalytics,
    pub loader: CsvLoader,
    pub store: SalesStore,
}

/// Creates the application state over a migrated sales store.
pub fn create_state(store: SalesStore) -> Arc<AppState> {
    Arc::new(AppState {
        analytics: RevenueAnalytics::new(store.clone()),
        loader: CsvLoader::new(store.clone()),
        store,
    })
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/refresh-data", post(routes::refresh::refresh_data))
        .route("/revenue/total", get(routes::revenue::total))
        .route("/revenue/by-product", get(routes::revenue::by_product))
        .route("/revenue/by-category", get(routes::revenue::by_category))
        .route("/revenue/by-region", get(routes::revenue::by_region))
        .route("/revenue/trends", get(routes::revenue::trends))
        .route("/revenue/summary", get(routes::revenue::summary))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
