//! Request ID middleware for correlating logs with requests.
//!
//! Reuses the caller's `x-request-id` when it is a valid UUID (ingress
//! controllers commonly set one), otherwise generates a UUID v4. The ID wraps
//! the request in a tracing span and is echoed back in the response headers.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use http::HeaderValue;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::REQUEST_ID_HEADER;
use crate::routes::{HEALTH_PATH, METRICS_PATH};

/// Extension type for accessing request ID in handlers if needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestId(pub Uuid);

impl RequestId {
    /// Take the ID from the request headers, or mint a new one.
    fn from_request(request: &Request) -> Self {
        let inbound = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value.trim()).ok());
        Self(inbound.unwrap_or_else(Uuid::new_v4))
    }
}

/// Kubelet probes and Prometheus scrapes arrive every few seconds.
fn is_polling_path(path: &str) -> bool {
    path == HEALTH_PATH || path == METRICS_PATH
}

/// Middleware that assigns a request ID and creates a request span.
///
/// This should be the outermost middleware layer so the span wraps
/// all request processing, including other middleware and handlers.
pub async fn request_id_layer(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_request(&request);
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let quiet = is_polling_path(&path);

    let span = tracing::info_span!(
        "request",
        request_id = %request_id.0,
        method = %method,
        path = %path,
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();
    request.extensions_mut().insert(request_id);

    async move {
        let mut response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::Span::current().record("duration_ms", duration_ms);
        let status = response.status().as_u16();
        if quiet {
            tracing::debug!(status, duration_ms, "Request completed");
        } else {
            tracing::info!(status, duration_ms, "Request completed");
        }

        if let Ok(value) = HeaderValue::from_str(&request_id.0.to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}
