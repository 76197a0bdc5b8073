//! MySQL connection pool.

use async_trait::async_trait;
use folio_config::DatabaseConfig;
use folio_core::{FolioError, FolioResult, Interface};
use shaku::Component;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::sync::Arc;
use tracing::{info, warn};

/// What the repositories need from a pool.
///
/// Repositories hold an `Arc<dyn DatabasePoolInterface>` so tests can hand
/// them a pool connected to a throwaway container.
#[async_trait]
pub trait DatabasePoolInterface: Interface + Send + Sync {
    fn inner(&self) -> &MySqlPool;

    /// Round-trips `SELECT 1`.
    async fn health_check(&self) -> FolioResult<()>;

    /// Applies the embedded `migrations/` directory.
    async fn run_migrations(&self) -> FolioResult<()>;

    async fn close(&self);
}

/// Shared MySQL pool, registered with [`RepositoryModule`](crate::RepositoryModule).
#[derive(Component)]
#[shaku(interface = DatabasePoolInterface)]
pub struct DatabasePool {
    pool: MySqlPool,
}

impl DatabasePool {
    /// Wraps a pool that is already configured.
    #[must_use]
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Connects with the sizing and timeouts of `config`.
    ///
    /// Migrations are applied right away when `config.run_migrations` is set.
    ///
    /// # Errors
    ///
    /// Returns [`FolioError::Database`] when no connection can be opened or
    /// a migration fails.
    pub async fn new(config: &DatabaseConfig) -> FolioResult<Self> {
        let pool = MySqlPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout())
            .idle_timeout(Some(config.idle_timeout()))
            .connect(&config.url)
            .await
            .map_err(|e| {
                warn!(error = %e, "MySQL unreachable");
                FolioError::Database(format!("Failed to connect: {e}"))
            })?;
        info!(
            min_connections = config.min_connections,
            max_connections = config.max_connections,
            "MySQL pool ready"
        );

        let pool = Self { pool };
        if config.run_migrations {
            DatabasePoolInterface::run_migrations(&pool).await?;
        }
        Ok(pool)
    }
}

#[async_trait]
impl DatabasePoolInterface for DatabasePool {
    fn inner(&self) -> &MySqlPool {
        &self.pool
    }

    async fn health_check(&self) -> FolioResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| FolioError::Database(format!("Health check failed: {e}")))
    }

    async fn run_migrations(&self) -> FolioResult<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| FolioError::Database(format!("Migration failed: {e}")))?;
        info!("Schema migrated");
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("MySQL pool closed");
    }
}

impl std::ops::Deref for DatabasePool {
    type Target = MySqlPool;

    fn deref(&self) -> &Self::Target {
        &self.pool
    }
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabasePool")
            .field("size", &self.pool.size())
            .field("num_idle", &self.pool.num_idle())
            .finish()
    }
}

/// Connects and wraps the pool in an `Arc` for the repositories.
///
/// # Errors
///
/// See [`DatabasePool::new`].
pub async fn create_pool(config: &DatabaseConfig) -> FolioResult<Arc<DatabasePool>> {
    DatabasePool::new(config).await.map(Arc::new)
}
