use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use soundshelf_api::auth::identity::HeaderIdentityVerifier;
use soundshelf_api::config::{LogFormat, MetadataBackend, ObjectStoreConfig, ServerConfig};
use soundshelf_api::router::build_app_router;
use soundshelf_api::state::AppState;
use soundshelf_db::memory::MemoryCatalogStore;
use soundshelf_db::{CatalogStore, PgCatalogStore};
use soundshelf_storage::local::LocalObjectStore;
use soundshelf_storage::s3::S3ObjectStore;
use soundshelf_storage::ObjectStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid server configuration")?;

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "soundshelf_api=debug,soundshelf_db=debug,tower_http=debug".into());
    match config.log_format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }

    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Metadata store ---
    let store: Arc<dyn CatalogStore> = match &config.metadata {
        MetadataBackend::Postgres { database_url } => {
            let pool = soundshelf_db::create_pool(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Database connection pool created");

            soundshelf_db::health_check(&pool)
                .await
                .context("Database health check failed")?;
            tracing::info!("Database health check passed");

            soundshelf_db::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            tracing::info!("Database migrations applied");

            Arc::new(PgCatalogStore::new(pool))
        }
        MetadataBackend::Memory => {
            tracing::warn!("Using in-memory metadata store; data is lost on restart");
            Arc::new(MemoryCatalogStore::new())
        }
    };

    // --- Object store ---
    let objects: Arc<dyn ObjectStore> = match &config.object_store {
        ObjectStoreConfig::Local {
            dir,
            public_base_url,
        } => {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create media directory {}", dir.display()))?;
            tracing::info!(dir = %dir.display(), %public_base_url, "Using local object store");
            Arc::new(LocalObjectStore::new(dir.clone(), public_base_url.clone()))
        }
        ObjectStoreConfig::S3 {
            bucket,
            public_base_url,
        } => {
            tracing::info!(%bucket, %public_base_url, "Using S3 object store");
            Arc::new(S3ObjectStore::from_env(bucket.clone(), public_base_url.clone()).await)
        }
    };

    // --- App state ---
    let state = AppState {
        store,
        objects,
        identity: Arc::new(HeaderIdentityVerifier::new(config.identity_header.clone())),
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().context("Invalid HOST address")?,
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, starting graceful shutdown"),
        _ = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
