//! Member Model

use serde::{Deserialize, Serialize};

/// Member entity (會員)
///
/// `total_spent` is a derived cache over the payment ledger; the spend
/// aggregator is the only writer and only touches it when the computed
/// value differs from the stored one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    /// Cached lifetime spend in minor currency units
    pub total_spent: i64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create member payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberCreate {
    pub name: String,
    pub phone: Option<String>,
}
