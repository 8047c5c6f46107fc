//! airtree daemon - HTTP server for airports and Left/Right routes.
//!
//! A single Rust binary that provides:
//! - HTTP API for creating airports and routes
//! - Traversal and longest/shortest route queries
//! - DuckDB persistence, or an in-memory store with `--memory`

use airtree_core::{MemoryStore, RouteStore};
use airtree_daemon::config::DaemonConfig;
use airtree_daemon::server::{create_router, AppState};
use airtree_daemon::storage::RouteBase;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// airtree airport route daemon
#[derive(Parser, Debug)]
#[command(name = "airtree-daemon")]
#[command(about = "HTTP daemon for airports and Left/Right routes")]
#[command(version)]
struct Cli {
    /// Directory containing `.airtree.toml` and the default database
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Explicit configuration file (overrides `<root>/.airtree.toml`)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// HTTP port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to the DuckDB database file
    #[arg(long)]
    db: Option<PathBuf>,

    /// Keep all data in memory
    #[arg(long, conflicts_with = "db")]
    memory: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Fail on malformed configuration instead of falling back to defaults
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let root = cli.root.canonicalize().unwrap_or(cli.root.clone());
    let (mut config, config_error) = match (&cli.config, cli.strict) {
        (Some(path), _) => (DaemonConfig::from_file(path)?, None),
        (None, true) => (DaemonConfig::load_strict(&root)?, None),
        (None, false) => DaemonConfig::load(&root),
    };

    // Command-line flags override the file
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(db) = cli.db {
        config.storage.path = Some(db);
    }
    config.storage.memory |= cli.memory;
    config.logging.verbose |= cli.verbose;

    // Initialize logging
    let level = if config.logging.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .compact()
        .init();

    if let Some(e) = config_error {
        warn!("{}; using default configuration", e);
    }

    let state = if config.storage.memory {
        info!("Using in-memory store; data is lost on exit");
        let store: Arc<dyn RouteStore> = Arc::new(MemoryStore::new());
        AppState::new(store, "memory")
    } else {
        let db_path = config.database_path(&root);
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }

        info!("Opening database {:?}...", db_path);
        let routebase = RouteBase::open(&db_path)
            .with_context(|| format!("Failed to open database {:?}", db_path))?;
        let stats = routebase.stats()?;
        info!(
            "Database opened: {} airports, {} routes ({} left, {} right)",
            stats.airport_count, stats.route_count, stats.left_routes, stats.right_routes
        );

        let schema_version = routebase.schema_version()?;
        let store: Arc<dyn RouteStore> = Arc::new(routebase);
        AppState::new(store, db_path.display().to_string()).with_schema_version(schema_version)
    };

    let router = create_router(state);
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("airtree daemon listening on http://{}", addr);

    axum::serve(listener, router).await?;
    Ok(())
}
