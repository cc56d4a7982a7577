//! Repository Module
//!
//! CRUD operations over the SQLite store. Repositories are plain module
//! functions receiving the pool (or a transaction) per call — the
//! session object is always passed explicitly, acquired and released per
//! operation.

// Catalog
pub mod service;

// Shopping
pub mod cart;

// Billing
pub mod bill;

// Ledger
pub mod payment;

// Members
pub mod member;

use shared::BillingError;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for BillingError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(m) => BillingError::NotFound(m),
            other => BillingError::Database(other.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
