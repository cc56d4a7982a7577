//! Billing value types shared across crates

pub mod types;

pub use types::*;
