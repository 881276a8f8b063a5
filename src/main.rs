//! PathGuard server.
//!
//! Main entry point that wires the protection engine, its store and
//! cache, and the admin API together and starts the HTTP server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use pathguard_api::AppState;
use pathguard_cache::CacheManager;
use pathguard_core::config::AppConfig;
use pathguard_core::error::AppError;
use pathguard_database::connection::DatabasePool;
use pathguard_database::repositories::protection::ProtectionRepository;
use pathguard_dav::MountResolver;
use pathguard_engine::checker::ProtectionChecker;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("PATHGUARD_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());

    let env = std::env::var("PATHGUARD_ENV").unwrap_or_else(|_| "development".to_string());

    let env_config_path = format!("config/{}.toml", env);
    let overlay = std::path::Path::new(&env_config_path)
        .exists()
        .then_some(env_config_path);

    AppConfig::load(&config_path, overlay.as_deref())
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting PathGuard v{}", env!("CARGO_PKG_VERSION"));

    // Database connection + migrations
    tracing::info!("Connecting to database...");
    let pool = DatabasePool::connect(&config.database).await?;
    let db_pool = pool.into_pool();

    tracing::info!("Running database migrations...");
    pathguard_database::migration::run_migrations(&db_pool).await?;
    tracing::info!("Database migrations complete");

    // Cache
    tracing::info!("Initializing cache (provider: {})...", config.cache.provider);
    let cache = Arc::new(CacheManager::new(&config.cache).await?);
    tracing::info!("Cache initialized");

    // Decision engine
    let store = Arc::new(ProtectionRepository::new(db_pool.clone()));
    let checker = ProtectionChecker::new(store, Arc::clone(&cache), config.protection.clone());
    let mounts = Arc::new(MountResolver::new(&config.protection.group_mount_prefix));

    if config.server.admin_token.is_none() {
        tracing::warn!("No admin token configured; mutating API endpoints are disabled");
    }

    // HTTP server
    let config = Arc::new(config);
    let state = AppState::new(Arc::clone(&config), checker, cache, mounts);
    let app = pathguard_api::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("PathGuard server listening on {}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            tracing::error!("Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => {
                tracing::error!("Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
