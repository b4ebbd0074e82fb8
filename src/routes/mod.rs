//! HTTP route handlers.
//!
//! The routing table is fixed: `/` greets and counts, `/healthz` answers the
//! liveness probe, `/metrics` serves the Prometheus scrape. Anything else falls
//! through to axum's defaults (404 for unknown paths, 405 for other methods).
//!
//! Request tracing is enabled via middleware that assigns a request ID to each
//! incoming request, allowing correlation of all logs within a request.

pub mod health;
pub mod index;
pub mod metrics;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_NO_STORE;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Path of the greeting endpoint, also its `endpoint` label value
pub const INDEX_PATH: &str = "/";

/// Path of the liveness probe
pub const HEALTH_PATH: &str = "/healthz";

/// Path of the Prometheus scrape endpoint
pub const METRICS_PATH: &str = "/metrics";

/// Creates the Axum router with all routes and response headers.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(INDEX_PATH, get(index::index))
        .route(HEALTH_PATH, get(health::health))
        .route(METRICS_PATH, get(metrics::metrics))
        .with_state(state)
        // Every response here is per-request: greetings are counted, probes and scrapes must be fresh
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
