//! Shared application state for request handlers.

use crate::metrics::Metrics;

/// State injected into every handler.
///
/// Cloning is cheap: `Metrics` shares its registry and counters, so all
/// request tasks observe and update the same Request Counter.
#[derive(Clone)]
pub struct AppState {
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(metrics: Metrics) -> Self {
        Self { metrics }
    }
}
