//! Lecture registration HTTP server.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lecture_registration::adapters::http::{app_router, LectureHandlers};
use lecture_registration::adapters::memory::{
    InMemoryRegistrationStore, InMemoryUserDirectory, SeedData, SeedError,
};
use lecture_registration::adapters::postgres::{
    run_migrations, PostgresRegistrationLedger, PostgresSessionStore, PostgresUserDirectory,
};
use lecture_registration::application::AdmissionController;
use lecture_registration::config::{AppConfig, ConfigError, ServerConfig, StorageBackend};
use lecture_registration::domain::foundation::DomainError;
use lecture_registration::ports::{RegistrationLedger, SessionStore, UserDirectory};

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Storage(#[from] DomainError),

    #[error(transparent)]
    Seed(#[from] SeedError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Port implementations selected by `storage.backend`.
struct Storage {
    users: Arc<dyn UserDirectory>,
    sessions: Arc<dyn SessionStore>,
    ledger: Arc<dyn RegistrationLedger>,
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config = AppConfig::load()?;
    config.validate().map_err(ConfigError::from)?;

    init_tracing(&config.server);
    info!(
        environment = ?config.server.environment,
        backend = ?config.storage.backend,
        "Starting lecture registration server"
    );

    let storage = build_storage(&config).await?;

    let admission = Arc::new(
        AdmissionController::new(storage.ledger.clone())
            .with_acquire_timeout(config.registration.admission_timeout()),
    );
    let handlers =
        LectureHandlers::from_ports(storage.users, storage.sessions, storage.ledger, admission);

    let router = app_router(
        handlers,
        config.server.request_timeout(),
        &config.server.cors_origins_list(),
    );

    let addr = config.server.socket_addr().map_err(ConfigError::from)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if server.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

async fn build_storage(config: &AppConfig) -> Result<Storage, StartupError> {
    match config.storage.backend {
        StorageBackend::Memory => {
            let users = Arc::new(InMemoryUserDirectory::new());
            let store = Arc::new(InMemoryRegistrationStore::new());

            match &config.storage.seed_file {
                Some(path) => {
                    let summary = SeedData::load_file(path)
                        .await?
                        .apply(&users, &store)
                        .await?;
                    info!(
                        path = %path,
                        users = summary.users,
                        offerings = summary.offerings,
                        sessions = summary.sessions,
                        "Seeded in-memory storage"
                    );
                }
                None => warn!("In-memory storage starts empty; no seed file configured"),
            }

            Ok(Storage {
                users,
                sessions: store.clone(),
                ledger: store,
            })
        }
        StorageBackend::Postgres => {
            let database = config.database_config().map_err(ConfigError::from)?;
            let pool = database.pool_options().connect(&database.url).await?;

            if database.run_migrations {
                run_migrations(&pool).await?;
                info!("Database migrations applied");
            }

            Ok(Storage {
                users: Arc::new(PostgresUserDirectory::new(pool.clone())),
                sessions: Arc::new(PostgresSessionStore::new(pool.clone())),
                ledger: Arc::new(PostgresRegistrationLedger::new(pool)),
            })
        }
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
