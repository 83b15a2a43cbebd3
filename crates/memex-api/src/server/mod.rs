//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use memex_common::{AppConfig, AppError, JwtTokenVerifier};
use memex_core::{DocumentStore, SnowflakeGenerator};
use memex_db::{create_pool, ensure_schema, LocalMediaHost, MemoryDocumentStore, PgDocumentStore, PoolConfig};
use memex_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::middleware::apply_middleware_with_config;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health probes and uploaded files bypass the rate limiter.
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let api = apply_middleware_with_config(
        create_router(state.service_context().settings().max_upload_bytes),
        &config.rate_limit,
        &config.cors,
        config.app.env.is_production(),
    )?;

    let uploads = ServeDir::new(&config.storage.upload_dir);

    Ok(Router::new()
        .merge(health_routes())
        .merge(api)
        .nest_service("/uploads", uploads)
        .with_state(state))
}

/// Initialize all dependencies and create AppState
///
/// Without a database URL the documents live in memory and are lost on exit.
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let store: Arc<dyn DocumentStore> = match &config.database {
        Some(db_config) => {
            info!("Connecting to PostgreSQL...");
            let pool = create_pool(&PoolConfig::from(db_config))
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            ensure_schema(&pool)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            info!("PostgreSQL connection established");
            Arc::new(PgDocumentStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set; using the in-memory document store");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    let media_host = Arc::new(LocalMediaHost::new(
        &config.storage.upload_dir,
        config.storage.public_base_url.clone(),
    ));
    let token_verifier = Arc::new(JwtTokenVerifier::from_config(&config.auth));
    let snowflake_generator = Arc::new(SnowflakeGenerator::new(config.snowflake.worker_id));

    let service_context = ServiceContextBuilder::new()
        .store(store)
        .media_host(media_host)
        .token_verifier(token_verifier)
        .snowflake_generator(snowflake_generator)
        .vote_max_attempts(config.voting.max_attempts)
        .max_upload_bytes(config.storage.max_file_size_bytes())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address {}: {e}", config.api.address())))?;

    let state = create_app_state(config).await?;
    let app = create_app(state)?;

    run_server(app, addr).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
