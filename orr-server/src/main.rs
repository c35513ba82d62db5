//! Open Roadster Registry Server
//!
//! The moderated community catalog backend: staged submissions, a
//! moderator review queue, and transactional reconciliation into the
//! canonical vehicle records.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::{ConfigLoader, get_database_url};
use orr_core::cache::DerivedCache;
use orr_core::events::notify_event_channel;
use orr_core::photo_store::PhotoStore;
use orr_core::processors::Notifier;
use orr_core::reconcile::Reconciler;
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Open Roadster Registry - moderated community vehicle catalog
#[derive(Parser, Debug)]
#[command(name = "orr-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./orr-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Run database migrations on startup
    #[arg(long, default_value = "false")]
    migrate: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting orr-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = loaded_config.server.listen;
    tracing::info!("Configuration loaded from {:?}", args.config);

    // Get database URL from environment
    let database_url = get_database_url().map_err(|e| {
        tracing::error!("DATABASE_URL environment variable not set");
        e
    })?;

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            e
        })?;
    tracing::info!("Database connection established");

    // Run migrations if requested
    if args.migrate {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&db_pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to run migrations: {}", e);
                e
            })?;
        tracing::info!("Migrations completed successfully");
    }

    // Startup-only collaborators: derived cache and photo object storage
    let cache = DerivedCache::new(loaded_config.cache_ttl, loaded_config.cache_capacity);
    let photos = PhotoStore::from_url(&loaded_config.photo_storage_url).map_err(|e| {
        tracing::error!("Failed to open photo storage backend: {}", e);
        e
    })?;

    // Outbound notification pipeline
    let (notify_tx, notify_rx) = notify_event_channel();
    let (notifier_shutdown_tx, notifier_shutdown_rx) = tokio::sync::watch::channel(false);
    let notifier = Notifier::new(
        loaded_config.notify.clone().into(),
        notify_rx,
        notifier_shutdown_rx,
    );
    let notifier_handle = tokio::spawn(notifier.run());

    // Reconciliation engine
    let reconciler = Arc::new(Reconciler::new(
        db_pool.clone(),
        cache,
        photos.clone(),
        notify_tx.clone(),
    ));

    // Convert to shared config with separate locks for each section
    let shared_config = loaded_config.into_shared();

    // Create application state
    let state = AppState {
        db: db_pool.clone(),
        config: shared_config,
        reconciler,
        photos,
        notify_tx,
    };

    // Spawn config reload handler (listens for SIGHUP)
    let shutdown_notify = spawn_config_reload_handler(state.clone(), config_loader);

    // Build the router
    let router = build_router(state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Signal background tasks to stop
    shutdown_notify.notify_one();
    let _ = notifier_shutdown_tx.send(true);
    let _ = notifier_handle.await;

    // Close database connections gracefully
    tracing::info!("Closing database connections...");
    db_pool.close().await;
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
