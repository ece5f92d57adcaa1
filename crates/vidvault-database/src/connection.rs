//! PostgreSQL pool management and store selection.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use vidvault_core::config::database::{DatabaseConfig, StoreProvider};
use vidvault_core::error::{AppError, ErrorKind};

use crate::memory::{MemoryFolderStore, MemoryVideoStore};
use crate::postgres::{PgFolderStore, PgVideoStore};
use crate::store::{FolderStore, VideoStore};

/// Wrapper around the sqlx PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Create a new database pool from configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            url = %mask_password(&config.url),
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
            .connect(&config.url)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to connect to database: {e}"),
                    e,
                )
            })?;

        info!("Successfully connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Apply pending migrations from the workspace `migrations/` directory.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Database,
                    format!("Failed to run migrations: {e}"),
                    e,
                )
            })?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Return a reference to the underlying sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close all connections in the pool.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

/// The folder and video stores the services run against.
#[derive(Debug, Clone)]
pub struct Stores {
    pub folders: Arc<dyn FolderStore>,
    pub videos: Arc<dyn VideoStore>,
    /// Present when the stores are PostgreSQL-backed.
    pub pool: Option<DatabasePool>,
}

impl Stores {
    /// Fresh, empty in-process stores.
    pub fn in_memory() -> Self {
        Self {
            folders: Arc::new(MemoryFolderStore::new()),
            videos: Arc::new(MemoryVideoStore::new()),
            pool: None,
        }
    }

    /// Build the stores selected by `database.provider`, running migrations
    /// for PostgreSQL.
    pub async fn from_config(config: &DatabaseConfig) -> Result<Self, AppError> {
        match config.provider {
            StoreProvider::Memory => {
                info!("Using in-memory record stores");
                Ok(Self::in_memory())
            }
            StoreProvider::Postgres => {
                if config.url.is_empty() {
                    return Err(AppError::configuration(
                        "database.url is required for the postgres provider",
                    ));
                }
                let pool = DatabasePool::connect(config).await?;
                pool.migrate().await?;
                Ok(Self {
                    folders: Arc::new(PgFolderStore::new(pool.pool().clone())),
                    videos: Arc::new(PgVideoStore::new(pool.pool().clone())),
                    pool: Some(pool),
                })
            }
        }
    }
}

/// Mask the password portion of a database URL for safe logging.
fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
            if colon_pos > scheme_end {
                return format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..]);
            }
        }
    }
    url.to_string()
}
