//! Greeting handler for the root path.

use axum::extract::State;
use tracing::instrument;

use super::INDEX_PATH;
use crate::config::GREETING;
use crate::state::AppState;

/// Root handler: counts the request under `endpoint="/"` and returns the greeting.
#[instrument(name = "routes::index", skip(state))]
pub async fn index(State(state): State<AppState>) -> &'static str {
    state.metrics.record_request(INDEX_PATH);
    GREETING
}
