//! CityBike Server - Main entry point

use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use citybike_common::logging::{init_logging, LogConfig};
use serde_json::json;
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, time::Duration};
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tracing::info;

use citybike_server::{config::Config, features, ingest, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging from environment, with server-specific defaults
    let mut log_config = LogConfig::from_env()?.with_file_prefix("citybike-server");
    if log_config.filter_directives.is_none() {
        log_config = log_config
            .with_filter_directives("citybike_server=debug,tower_http=debug,sqlx=warn");
    }
    init_logging(&log_config)?;

    info!("Starting CityBike Server");

    // Load configuration
    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    // Initialize database connection pool
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(config.database.connect_timeout_secs))
        .connect(&config.database.url)
        .await?;

    info!("Database connection pool established");

    // Run migrations
    sqlx::migrate!("../../migrations")
        .run(&db_pool)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;

    info!("Database migrations completed");

    // Kick off the dataset import in the background; the API serves whatever
    // is in the database while it runs.
    let _import_handle = if config.import.enabled {
        let store = ingest::PgImportStore::new(db_pool.clone());
        let datasets_dir = config.import.datasets_dir.clone();
        info!(dir = %datasets_dir.display(), "Starting dataset import");

        Some(tokio::spawn(async move {
            match ingest::import_all(&store, &datasets_dir).await {
                Ok(()) => info!("Dataset import finished"),
                Err(e) => {
                    tracing::error!(error = %e, "Dataset import failed, will resume on next start")
                },
            }
        }))
    } else {
        info!("Dataset import disabled (IMPORT_ENABLED=false)");
        None
    };

    // Build the application router
    let app = create_router(db_pool, &config);

    // Create socket address
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.shutdown_timeout_secs))
        .await?;

    info!("Server shut down gracefully");

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_router(db: sqlx::PgPool, config: &Config) -> Router {
    let feature_state = features::FeatureState { db: db.clone() };

    Router::new()
        .route("/health", get(health_check))
        .with_state(db)
        .merge(features::router(feature_state))
        // Apply layers from innermost to outermost
        .layer(CompressionLayer::new())
        .layer(middleware::tracing_layer())
        .layer(middleware::cors_layer(&config.cors))
}

/// Health check handler
async fn health_check(State(db): State<sqlx::PgPool>) -> Result<Response, StatusCode> {
    match sqlx::query("SELECT 1").fetch_one(&db).await {
        Ok(_) => Ok((
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected"
            })),
        )
            .into_response()),
        Err(e) => {
            tracing::error!("Database health check failed: {:?}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        },
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }

    // Give ongoing requests time to complete
    info!("Waiting up to {} seconds for connections to close", timeout_secs);
    tokio::time::sleep(Duration::from_secs(timeout_secs.min(5))).await;
}
