//! Data models
//!
//! Shared between the billing core and operator tooling.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), all monetary amounts
//! are `i64` minor currency units, all timestamps are UTC milliseconds.

pub mod bill;
pub mod member;
pub mod payment;
pub mod service;

// Re-exports
pub use bill::*;
pub use member::*;
pub use payment::*;
pub use service::*;
