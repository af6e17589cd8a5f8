//! pgprobe: PostgreSQL reachability over HTTP.
//!
//! This is the application entry point. It loads configuration, initializes
//! tracing, builds the connection pool and probe, sets up the Axum router and
//! serves until a shutdown signal, then closes the pool.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pgprobe::config::{AppConfig, DEFAULT_LOG_FILTER};
use pgprobe::db::create_probe;
use pgprobe::http::start_server;
use pgprobe::routes::create_router;
use pgprobe::state::AppState;

/// pgprobe: report PostgreSQL reachability and version over HTTP
#[derive(Parser, Debug)]
#[command(name = "pgprobe", version, about)]
struct Args {
    /// Path to a TOML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "pgprobe=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration; PORT and DATABASE_URL override the file
    let config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::from_env()?,
    };

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    if config.logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!(
        config = args.config.as_deref().unwrap_or("<defaults>"),
        "Loaded configuration"
    );

    // A malformed database URL is fatal here; an unreachable server is not
    let (pool, probe) = create_probe(&config)?;
    tracing::info!(
        database = %config.database.redacted_url(),
        max_size = config.pool.max_size,
        acquire_timeout_ms = config.pool.acquire_timeout_ms,
        query_timeout_ms = config.pool.query_timeout_ms,
        "Initialized connection pool"
    );

    match probe.probe().await {
        Ok(version) => tracing::info!(%version, "Database reachable"),
        Err(_) => tracing::warn!("Database not reachable at startup, continuing"),
    }

    let state = AppState::new(probe);
    let app = create_router(state);

    let served = start_server(app, &config).await;

    // Drain the pool whether or not the server exited cleanly
    pool.close().await;
    served?;

    Ok(())
}
