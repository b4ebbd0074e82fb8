//! Health check endpoint for container orchestration.
//!
//! Provides a simple liveness probe that returns 200 OK when the process is running.
//! Used by the Kubernetes kubelet to decide whether the pod should be restarted.

use crate::config::HEALTH_OK;

/// Health check handler.
///
/// Returns a static "ok" body. It does not read or touch the request counter,
/// so probe traffic never shows up in `request_count`.
pub async fn health() -> &'static str {
    HEALTH_OK
}
