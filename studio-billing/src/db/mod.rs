//! Database Module
//!
//! Handles the SQLite connection pool and schema setup. The pool is
//! passed explicitly into every repository call — no globally held
//! client anywhere in the crate.

pub mod repository;

use shared::BillingError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;

/// Embedded schema, applied idempotently on startup
const SCHEMA: &str = include_str!("schema.sql");

/// Database service — owns a SQLite connection pool
#[derive(Clone)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Create a new database service with WAL mode
    pub async fn new(db_path: &str) -> Result<Self, BillingError> {
        // Build connection options: WAL, foreign keys, normal sync
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| BillingError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON")
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| BillingError::database(format!("Failed to open database: {e}")))?;

        // busy_timeout: 寫衝突時等待 5s 而非立即失敗
        sqlx::query("PRAGMA busy_timeout = 5000;")
            .execute(&pool)
            .await
            .map_err(|e| BillingError::database(format!("Failed to set busy_timeout: {e}")))?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        Self::apply_schema(&pool).await?;

        Ok(Self { pool })
    }

    /// Apply the embedded schema (CREATE IF NOT EXISTS throughout, so
    /// re-running against an initialized store is a no-op)
    pub async fn apply_schema(pool: &SqlitePool) -> Result<(), BillingError> {
        sqlx::raw_sql(SCHEMA)
            .execute(pool)
            .await
            .map_err(|e| BillingError::database(format!("Failed to apply schema: {e}")))?;
        tracing::info!("Database schema applied");
        Ok(())
    }
}
