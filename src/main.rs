//! aks-demo: a greeting service for Kubernetes deployments.
//!
//! This is the application entry point. It parses flags (with environment
//! fallbacks), initializes tracing, creates the metrics registry, builds the
//! Axum router and serves it until the process is stopped.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aks_demo::config::{
    LogFormat, ServerConfig, DEFAULT_HOST, DEFAULT_LOG_FILTER, DEFAULT_PORT,
};
use aks_demo::{create_router, http, AppState, Metrics};

/// aks-demo: greeting, liveness probe and Prometheus metrics over HTTP
#[derive(Parser, Debug)]
#[command(name = "aks-demo", version, about)]
struct Args {
    /// Address to bind (IP literal)
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Log level filter (e.g., "aks_demo=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn init_tracing(log_filter: &str, format: LogFormat) {
    let registry = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_filter));

    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, args.log_format);

    let addr = ServerConfig::new(args.host, args.port).socket_addr().await?;

    let metrics = Metrics::new()?;
    tracing::info!("Initialized metrics registry");

    let app = create_router(AppState::new(metrics));

    let listener = http::bind(addr).await?;
    http::serve(listener, app).await?;

    Ok(())
}
