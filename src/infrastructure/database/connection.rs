//! Database connection pool manager.
//!
//! `SQLite` with WAL mode for concurrent readers alongside the writer.
//! Migrations are embedded and applied at startup; calling `migrate` twice
//! is safe.

use anyhow::{Context, Result};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::str::FromStr;
use std::time::Duration;

pub struct DatabaseConnection {
    pool: SqlitePool,
}

impl DatabaseConnection {
    /// Open a pooled connection.
    ///
    /// # Arguments
    /// * `database_url` - `SQLite` URL, e.g. `sqlite:.tiller/tiller.db` or
    ///   `sqlite::memory:`
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .context("invalid database URL")?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);

        // An in-memory database exists per connection; more than one pooled
        // connection would see different (empty) databases.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 8 };

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .context("failed to create connection pool")?;

        Ok(Self { pool })
    }

    /// Apply pending migrations from the embedded `migrations/` directory.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("failed to run migrations")?;
        Ok(())
    }

    /// The pool handle, for passing to repository implementations.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close all connections. Call at shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
