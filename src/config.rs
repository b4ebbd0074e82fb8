//! Configuration constants and bind address handling.
//!
//! The service has no configuration file. The bind host and port come from CLI
//! flags or environment variables (see `main.rs`) and are validated here into a
//! `SocketAddr`. Header values and defaults are assembled at compile time.

use std::net::{IpAddr, Ipv6Addr, SocketAddr};

use const_format::formatcp;
use tokio::net::lookup_host;

// =============================================================================
// Defaults
// =============================================================================

/// Default bind host (all interfaces)
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default bind port
pub const DEFAULT_PORT: u16 = 5000;

const CRATE_NAME: &str = env!("CARGO_CRATE_NAME");

/// Default log filter when neither `--log-level` nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = formatcp!("{}=info,tower_http=info", CRATE_NAME);

// =============================================================================
// Response bodies and headers
// =============================================================================

/// Body of the root endpoint
pub const GREETING: &str = "Hello from Azure AKS DevOps demo!\n";

/// Body of the liveness probe
pub const HEALTH_OK: &str = "ok";

/// Content type of the metrics endpoint (Prometheus text format 0.0.4)
pub const METRICS_CONTENT_TYPE: &str = formatcp!("{}; charset=utf-8", prometheus::TEXT_FORMAT);

/// Probes, scrapes and counted greetings must never be answered from a cache
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

/// Header carrying the request correlation ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =============================================================================
// Runtime configuration
// =============================================================================

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// HTTP listener configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Resolve host and port into a socket address.
    ///
    /// IP literals are used as-is; IPv6 may be bracketed (`[::1]`) but the
    /// brackets must be balanced. Anything else is resolved as a hostname and
    /// the first address returned is used.
    pub async fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = match self.host.strip_prefix('[') {
            Some(rest) => rest
                .strip_suffix(']')
                .filter(|inner| inner.parse::<Ipv6Addr>().is_ok())
                .ok_or_else(|| self.invalid())?,
            None if self.host.ends_with(']') => return Err(self.invalid()),
            None => self.host.as_str(),
        };

        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, self.port));
        }

        let mut addrs = lookup_host((host, self.port))
            .await
            .map_err(|source| ConfigError::Resolve {
                host: self.host.clone(),
                source,
            })?;
        addrs.next().ok_or_else(|| self.invalid())
    }

    fn invalid(&self) -> ConfigError {
        ConfigError::InvalidAddress {
            host: self.host.clone(),
            port: self.port,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid bind address {host}:{port}")]
    InvalidAddress { host: String, port: u16 },

    #[error("Failed to resolve bind host {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },
}
