//! aks-demo: greeting service with a liveness probe and Prometheus metrics.
//!
//! The binary in `main.rs` wires these modules together; integration tests
//! drive the router built by [`routes::create_router`].

pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use metrics::Metrics;
pub use routes::create_router;
pub use state::AppState;
