//! Prometheus scrape endpoint.

use axum::{extract::State, http::header::CONTENT_TYPE, response::IntoResponse};
use tracing::instrument;

use crate::config::METRICS_CONTENT_TYPE;
use crate::error::AppError;
use crate::state::AppState;

/// Renders the current snapshot of all registered metrics.
///
/// Read-only: scraping never changes any counter.
#[instrument(name = "routes::metrics", skip(state))]
pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let body = state.metrics.render()?;
    tracing::debug!(bytes = body.len(), "Rendered metrics");
    Ok(([(CONTENT_TYPE, METRICS_CONTENT_TYPE)], body))
}
