//! Error taxonomy for the billing core
//!
//! `ValidationError` blocks cart pricing and checkout. `BillingError` is
//! the umbrella type crossing module boundaries; binaries map it to an
//! exit code. Snapshot decoding is infallible by design and has no error
//! type here — malformed fields are dropped at the decode site.

use thiserror::Error;

/// Selection validation failures, surfaced to the caller at pricing or
/// checkout time
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required variant group has no selection
    #[error("missing required variant: {0}")]
    MissingVariant(String),

    /// Selection names a variant that is inactive or does not exist
    #[error("invalid {variant_type} variant: {name}")]
    InvalidVariant { variant_type: String, name: String },
}

/// Billing core error type
#[derive(Debug, Error)]
pub enum BillingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(String),

    /// Batch job refused to start; no partial execution happened
    #[error("refusing to run: {0}")]
    ProductionGuard(String),

    /// A single member's recompute failed; the batch continues
    #[error("recompute failed for member {member_id}: {message}")]
    Aggregation { member_id: i64, message: String },
}

impl BillingError {
    pub fn database(msg: impl Into<String>) -> Self {
        BillingError::Database(msg.into())
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        BillingError::NotFound(resource.into())
    }
}

/// Result type for billing core operations
pub type BillingResult<T> = Result<T, BillingError>;
