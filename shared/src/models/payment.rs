//! Payment Ledger Models
//!
//! Payments and allocations are append-only audit records — never
//! deleted, never recomputed. Derived totals live on the member row and
//! are rebuilt from here by the spend aggregator.

use serde::{Deserialize, Serialize};

/// Payment against a bill
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Payment {
    pub id: i64,
    pub bill_id: i64,
    /// Amount in minor currency units
    pub amount: i64,
    pub method: String,
    pub note: Option<String>,
    pub created_at: i64,
}

/// Create payment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCreate {
    pub bill_id: i64,
    pub amount: i64,
    pub method: String,
    pub note: Option<String>,
}

/// Links a payment to a bill item it settles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct PaymentAllocation {
    pub id: i64,
    pub payment_id: i64,
    pub bill_item_id: i64,
    pub created_at: i64,
}
