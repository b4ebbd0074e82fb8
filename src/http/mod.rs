//! HTTP listener startup.
//!
//! Plain HTTP only: TLS is terminated by the cluster ingress, and the process
//! runs until the orchestrator stops it.

mod server;

pub use server::{bind, serve, ServerError};
