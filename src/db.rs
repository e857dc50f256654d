//! Database module
//!
//! Store adapter over a PostgreSQL pool: direct statement execution,
//! scoped transactions, and connectivity checks.

use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};

use crate::config::{Config, ConfigError};

/// Tables the service expects to exist.
const REQUIRED_TABLES: [&str; 3] = ["albums", "users", "purchases"];

/// Errors raised while opening the store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Handle to the relational store.
///
/// Cloning is cheap; every clone shares the same connection pool.
#[derive(Debug, Clone)]
pub struct Store {
    pool: PgPool,
}

impl Store {
    /// Wrap an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool using the configured connection settings
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let options = config.connect_options()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .connect_with(options)
            .await?;

        tracing::info!(
            host = %config.database_host,
            database = %config.database_name,
            max_connections = config.database_max_connections,
            "Database connection established"
        );

        Ok(Self { pool })
    }

    /// Pool for statements that run outside a transaction
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Begin a scoped transaction.
    ///
    /// The returned handle rolls back when dropped unless `commit()` was
    /// called, so every early return leaves no partial effect behind.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Simple connectivity check
    pub async fn verify_connection(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Check if required tables exist
    pub async fn check_schema(&self) -> Result<bool, sqlx::Error> {
        for table in REQUIRED_TABLES {
            let exists: bool = sqlx::query_scalar(
                r#"
                SELECT EXISTS (
                    SELECT 1 FROM information_schema.tables
                    WHERE table_schema = current_schema() AND table_name = $1
                )
                "#,
            )
            .bind(table)
            .fetch_one(&self.pool)
            .await?;

            if !exists {
                tracing::error!(table, "Required table does not exist");
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Close every pooled connection
    pub async fn close(&self) {
        tracing::debug!("Closing database connection pool");
        self.pool.close().await;
        tracing::info!("Database connection closed");
    }
}
