//! Shared types for the studio billing workspace
//!
//! Common types used across crates: catalog and billing models, the
//! error taxonomy, cart/quote value types, and small ID/time utilities.

pub mod billing;
pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{BillingError, BillingResult, ValidationError};
